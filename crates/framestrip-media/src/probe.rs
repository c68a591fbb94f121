// crates/framestrip-media/src/probe.rs
//
// In-process FFmpeg metadata probing: duration, dimensions, codec,
// bitrate, framerate. One probe per run per file.

use std::path::Path;

use ffmpeg_the_third as ffmpeg;

use ffmpeg::format::input;
use ffmpeg::media::Type;

use framestrip_core::error::PreviewError;
use framestrip_core::preview_types::VideoInfo;

/// Probe one file. Duration prefers the container value and falls back to
/// the best stream's; a file with no recoverable duration probes as 0.0
/// (the planner then schedules nothing, which is the desired outcome for
/// still images and broken containers that still open).
pub fn probe_info(path: &Path) -> Result<VideoInfo, PreviewError> {
    let file_size_bytes = std::fs::metadata(path)
        .map_err(|e| PreviewError::Probe(format!("{}: {e}", path.display())))?
        .len();

    let ictx = input(path).map_err(|e| PreviewError::Probe(e.to_string()))?;

    let mut duration_secs = ictx.duration() as f64 / f64::from(ffmpeg::ffi::AV_TIME_BASE);

    let bitrate = {
        // AVFormatContext::bit_rate, same raw access the dimension read uses.
        let raw = unsafe { (*ictx.as_ptr()).bit_rate };
        (raw > 0).then_some(raw as u64)
    };

    if duration_secs <= 0.0 {
        // Container didn't know — fall back to stream duration.
        let fallback = ictx
            .streams()
            .best(Type::Video)
            .or_else(|| ictx.streams().best(Type::Audio));
        if let Some(stream) = fallback {
            let tb = stream.time_base();
            let d = stream.duration() as f64 * tb.numerator() as f64 / tb.denominator() as f64;
            duration_secs = d.max(0.0);
        }
    }

    let video = ictx.streams().best(Type::Video);

    let mut width = None;
    let mut height = None;
    let mut codec = None;
    let mut framerate = None;

    if let Some(stream) = video {
        let (w, h) = unsafe {
            let p = stream.parameters().as_ptr();
            ((*p).width as u32, (*p).height as u32)
        };
        if w > 0 && h > 0 {
            width = Some(w);
            height = Some(h);
        }
        codec = ffmpeg::decoder::find(stream.parameters().id()).map(|c| c.name().to_string());

        let rate = stream.rate();
        if rate.denominator() > 0 && rate.numerator() > 0 {
            framerate = Some(simplify_framerate(
                rate.numerator() as f64,
                rate.denominator() as f64,
            ));
        }
    }

    let display_aspect_ratio = match (width, height) {
        (Some(w), Some(h)) => Some(reduce_ratio(w, h)),
        _ => None,
    };

    log::debug!(
        "[probe] {:.2}s {}x{} ← {}",
        duration_secs,
        width.unwrap_or(0),
        height.unwrap_or(0),
        path.display()
    );

    Ok(VideoInfo {
        duration_secs: duration_secs.max(0.0),
        file_size_bytes,
        width,
        height,
        display_aspect_ratio,
        codec,
        bitrate,
        framerate,
    })
}

/// `30000/1001` → `"29.97"`.
fn simplify_framerate(num: f64, den: f64) -> String {
    format!("{:.2}", num / den)
}

/// Reduced `w:h` string, e.g. 1920×1080 → `"16:9"`.
fn reduce_ratio(w: u32, h: u32) -> String {
    let g = gcd(w, h);
    format!("{}:{}", w / g, h / g)
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framerate_simplifies_ntsc() {
        assert_eq!(simplify_framerate(30000.0, 1001.0), "29.97");
        assert_eq!(simplify_framerate(25.0, 1.0), "25.00");
    }

    #[test]
    fn ratio_reduces() {
        assert_eq!(reduce_ratio(1920, 1080), "16:9");
        assert_eq!(reduce_ratio(1080, 1920), "9:16");
        assert_eq!(reduce_ratio(640, 480), "4:3");
        assert_eq!(reduce_ratio(853, 480), "853:480");
    }

    #[test]
    fn probe_of_missing_file_fails() {
        let err = probe_info(Path::new("/definitely/not/here.mp4")).unwrap_err();
        assert!(matches!(err, PreviewError::Probe(_)));
    }
}

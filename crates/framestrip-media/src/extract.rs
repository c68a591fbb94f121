// crates/framestrip-media/src/extract.rs
//
// One-shot frame extraction: seek, decode the first frame at or after the
// target timestamp, scale to strip width, encode PNG bytes.

use std::path::Path;

use ffmpeg_the_third as ffmpeg;

use ffmpeg::format::{input, Pixel};
use ffmpeg::media::Type;
use ffmpeg::software::scaling::{context::Context as SwsContext, flag::Flags};

use framestrip_core::error::PreviewError;
use framestrip_core::preview_types::VideoFrame;

/// Output width for extracted frames; height follows the source aspect.
const FRAME_WIDTH: u32 = 320;

fn extract_err(timestamp_secs: f64, msg: impl ToString) -> PreviewError {
    PreviewError::Extract {
        timestamp_secs,
        msg: msg.to_string(),
    }
}

/// Decode a single frame at `timestamp_secs` and return it as PNG bytes.
///
/// The seek lands on the preceding keyframe; decoding then advances until
/// the target PTS. If EOF arrives first (a request at the very end of the
/// file), the last decoded frame is used instead.
pub fn extract_frame(
    path: &Path,
    timestamp_secs: f64,
    index: u32,
) -> Result<VideoFrame, PreviewError> {
    let mut ictx = input(path).map_err(|e| extract_err(timestamp_secs, e))?;

    let video_stream_idx = ictx
        .streams()
        .best(Type::Video)
        .ok_or_else(|| extract_err(timestamp_secs, "no video stream"))?
        .index();

    let seek_ts = {
        let stream = ictx
            .stream(video_stream_idx)
            .ok_or_else(|| extract_err(timestamp_secs, "stream gone"))?;
        let tb = stream.time_base();
        (timestamp_secs * tb.denominator() as f64 / tb.numerator() as f64) as i64
    };
    let _ = ictx.seek(seek_ts, ..=seek_ts);

    // Second context for decoder construction (Parameters borrows from ictx).
    let ictx2 = input(path).map_err(|e| extract_err(timestamp_secs, e))?;
    let stream2 = ictx2
        .stream(video_stream_idx)
        .ok_or_else(|| extract_err(timestamp_secs, "stream gone"))?;
    let decoder_ctx = ffmpeg::codec::context::Context::from_parameters(stream2.parameters())
        .map_err(|e| extract_err(timestamp_secs, e))?;
    let mut decoder = decoder_ctx
        .decoder()
        .video()
        .map_err(|e| extract_err(timestamp_secs, e))?;

    let raw_w = decoder.width().max(1);
    let raw_h = decoder.height().max(1);
    let out_w = FRAME_WIDTH;
    // Proportional height, kept even for the scaler.
    let out_h = ((out_w as f64 * raw_h as f64 / raw_w as f64) as u32).max(2) & !1;

    let mut scaler = SwsContext::get(
        decoder.format(),
        raw_w,
        raw_h,
        Pixel::RGB24,
        out_w,
        out_h,
        Flags::BILINEAR,
    )
    .map_err(|e| extract_err(timestamp_secs, e))?;

    // last_good holds the most recent scaled frame in case EOF arrives
    // before seek_ts (requesting the final instants of a clip).
    let mut last_good: Option<ffmpeg::util::frame::video::Video> = None;

    for (stream, packet) in ictx.packets().flatten() {
        if stream.index() != video_stream_idx {
            continue;
        }
        if decoder.send_packet(&packet).is_err() {
            continue;
        }
        let mut decoded = ffmpeg::util::frame::video::Video::empty();
        while decoder.receive_frame(&mut decoded).is_ok() {
            let mut out_frame = ffmpeg::util::frame::video::Video::empty();
            scaler
                .run(&decoded, &mut out_frame)
                .map_err(|e| extract_err(timestamp_secs, e))?;
            // Frames before the target are keyframe-seek overshoot.
            if let Some(pts) = decoded.pts() {
                if pts + 2 < seek_ts {
                    last_good = Some(out_frame);
                    continue;
                }
            }
            let data = encode_png(&out_frame, out_w, out_h)
                .map_err(|e| extract_err(timestamp_secs, e))?;
            log::debug!(
                "[extract] frame {index} at {timestamp_secs:.1}s ← {}",
                path.display()
            );
            return Ok(VideoFrame {
                index,
                timestamp_secs,
                data,
            });
        }
    }

    // EOF before seek_ts — fall back to the last frame we saw.
    if let Some(out_frame) = last_good {
        let data =
            encode_png(&out_frame, out_w, out_h).map_err(|e| extract_err(timestamp_secs, e))?;
        return Ok(VideoFrame {
            index,
            timestamp_secs,
            data,
        });
    }

    Err(extract_err(
        timestamp_secs,
        format!("no frame found at t={timestamp_secs:.3}"),
    ))
}

/// Encode a scaled RGB24 frame as PNG, copying only visible pixels — the
/// scaler's rows carry stride padding.
fn encode_png(
    frame: &ffmpeg::util::frame::video::Video,
    out_w: u32,
    out_h: u32,
) -> anyhow::Result<Vec<u8>> {
    let stride = frame.stride(0);
    let raw = frame.data(0);
    let row_bytes = out_w as usize * 3;

    let mut pixels = Vec::with_capacity(row_bytes * out_h as usize);
    for row in 0..out_h as usize {
        pixels.extend_from_slice(&raw[row * stride..row * stride + row_bytes]);
    }

    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, out_w, out_h);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&pixels)?;
    }
    Ok(buf)
}

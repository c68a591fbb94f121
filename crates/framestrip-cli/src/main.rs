//! framestrip — generate preview frame strips for video files.
//!
//! Points the engine at a single file or a whole folder, streams progress
//! to the terminal while frames arrive, then writes the PNGs (or a JSON
//! summary) once the run settles.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;

use framestrip_core::helpers::display::{format_bitrate, format_file_size, format_timestamp};
use framestrip_core::{PreviewState, SamplingPolicy, VideoInfo};
use framestrip_media::{FfmpegSource, FrameCache, PreviewEngine};

#[derive(Parser)]
#[command(
    name = "framestrip",
    about = "Generate preview frame strips for video files and folders"
)]
struct Args {
    /// Video file, or a folder to preview recursively
    path: PathBuf,

    /// Number of evenly spaced frames per file
    #[arg(long, default_value_t = 9, conflicts_with = "every")]
    frames: u32,

    /// Sample one frame every N minutes instead of a fixed count
    #[arg(long, value_name = "MINUTES")]
    every: Option<f64>,

    /// Directory the PNG files are written to
    #[arg(long, default_value = "previews")]
    out: PathBuf,

    /// Print a JSON summary instead of writing PNG files
    #[arg(long)]
    json: bool,

    /// Skip the on-disk frame cache
    #[arg(long)]
    no_cache: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let source = if args.no_cache {
        FfmpegSource::new()
    } else {
        FfmpegSource::with_cache(FrameCache::open_default()?)
    };
    let mut engine = PreviewEngine::new(Arc::new(source));

    let policy = match args.every {
        Some(minutes) => SamplingPolicy::Interval { minutes },
        None => SamplingPolicy::FixedCount { count: args.frames },
    };
    engine.set_policy(policy)?;

    let folder_mode = args.path.is_dir();
    if folder_mode {
        engine.generate_folder(args.path.clone());
    } else {
        engine.generate_single(args.path.clone());
    }

    watch_progress(&mut engine, folder_mode);

    if let Some(err) = &engine.state().error {
        bail!("{err}");
    }

    if args.json {
        let summary = Summary::from_state(engine.state());
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        write_frames(engine.state(), &args.out)?;
    }
    Ok(())
}

/// Poll the engine until the run settles, echoing progress as it streams.
fn watch_progress(engine: &mut PreviewEngine, folder_mode: bool) {
    let mut frames_seen = 0usize;
    let mut entries_seen = 0usize;
    let mut info_printed = false;
    loop {
        engine.poll();
        let state = engine.state();

        if folder_mode {
            for entry in state.folder_entries.iter().skip(entries_seen) {
                println!("{}", entry.relative_path);
            }
            entries_seen = state.folder_entries.len();
        } else {
            if !info_printed {
                if let Some(info) = &state.info {
                    print_info(info);
                    info_printed = true;
                }
            }
            let done = state.frames.len();
            if done > frames_seen {
                for frame in &state.frames[frames_seen..] {
                    println!(
                        "  frame {}/{} at {}",
                        frame.index + 1,
                        state.total_planned,
                        format_timestamp(frame.timestamp_secs)
                    );
                }
                frames_seen = done;
            }
        }

        if !state.loading {
            break;
        }
        thread::sleep(Duration::from_millis(25));
    }
    // Catch anything that landed between the last poll and the terminal event.
    engine.poll();
}

fn print_info(info: &VideoInfo) {
    let mut parts = vec![
        format_timestamp(info.duration_secs),
        format_file_size(info.file_size_bytes),
    ];
    if let (Some(w), Some(h)) = (info.width, info.height) {
        parts.push(format!("{w}x{h}"));
    }
    if let Some(codec) = &info.codec {
        parts.push(codec.clone());
    }
    if let Some(bitrate) = info.bitrate {
        parts.push(format_bitrate(bitrate));
    }
    println!("{}", parts.join("  "));
}

/// Write every extracted frame as `<stem>_<index>.png` under `out`.
fn write_frames(state: &PreviewState, out: &Path) -> Result<()> {
    std::fs::create_dir_all(out).with_context(|| format!("create {}", out.display()))?;

    let mut written = 0usize;
    if state.folder_mode {
        for entry in &state.folder_entries {
            if let Some(err) = &entry.error {
                eprintln!("skipping {}: {err}", entry.relative_path);
                continue;
            }
            let stem = entry.relative_path.replace(std::path::MAIN_SEPARATOR, "_");
            for frame in &entry.frames {
                let dest = out.join(format!("{stem}_{:02}.png", frame.index));
                std::fs::write(&dest, &frame.data)
                    .with_context(|| format!("write {}", dest.display()))?;
                written += 1;
            }
        }
    } else {
        let stem = state
            .current_path
            .as_deref()
            .and_then(Path::file_stem)
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "frame".into());
        for frame in &state.frames {
            let dest = out.join(format!("{stem}_{:02}.png", frame.index));
            std::fs::write(&dest, &frame.data)
                .with_context(|| format!("write {}", dest.display()))?;
            written += 1;
        }
    }
    println!("{written} frames → {}", out.display());
    Ok(())
}

// ── JSON summary (frame payloads elided) ─────────────────────────────────────

#[derive(Serialize)]
struct FrameSummary {
    index: u32,
    timestamp_secs: f64,
}

#[derive(Serialize)]
struct EntrySummary {
    relative_path: String,
    info: Option<VideoInfo>,
    frames: Vec<FrameSummary>,
    error: Option<String>,
}

#[derive(Serialize)]
struct Summary {
    folder_mode: bool,
    total_planned: usize,
    info: Option<VideoInfo>,
    frames: Vec<FrameSummary>,
    entries: Vec<EntrySummary>,
}

impl Summary {
    fn from_state(state: &PreviewState) -> Self {
        let frame = |f: &framestrip_core::VideoFrame| FrameSummary {
            index: f.index,
            timestamp_secs: f.timestamp_secs,
        };
        Self {
            folder_mode: state.folder_mode,
            total_planned: state.total_planned,
            info: state.info.clone(),
            frames: state.frames.iter().map(frame).collect(),
            entries: state
                .folder_entries
                .iter()
                .map(|e| EntrySummary {
                    relative_path: e.relative_path.clone(),
                    info: e.info.clone(),
                    frames: e.frames.iter().map(frame).collect(),
                    error: e.error.clone(),
                })
                .collect(),
        }
    }
}

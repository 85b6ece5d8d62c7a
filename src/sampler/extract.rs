use image::ImageFormat;
use image::imageops::{self, FilterType};
use std::fs;
use tracing::{error, info};

use super::source::{FfmpegSource, FrameSource};
use super::types::SampledFrame;
use crate::config::SamplerSettings;
use crate::error::HarnessResult;

/// Frames between samples: `round(fps * interval)`, never less than one
pub fn frame_stride(fps: f64, interval_seconds: f64) -> u64 {
    let stride = (fps * interval_seconds).round();
    if stride.is_finite() && stride >= 1.0 {
        stride as u64
    } else {
        1
    }
}

/// Name of a sampled frame, e.g. `frame_003_t9.0s.jpg`
pub fn frame_filename(index: usize, timestamp_seconds: f64) -> String {
    format!("frame_{:03}_t{:.1}s.jpg", index, timestamp_seconds)
}

/// Number of frames sampled from a stream of `total_frames` (frame 0 included)
pub fn expected_sample_count(total_frames: u64, stride: u64) -> u64 {
    total_frames.div_ceil(stride.max(1))
}

/// Walk a frame source and write every `stride`-th frame as a resized JPEG.
/// Returns the manifest of written frames in stream order.
pub fn sample_frames<S>(source: &mut S, settings: &SamplerSettings) -> HarnessResult<Vec<SampledFrame>>
where
    S: FrameSource + ?Sized,
{
    fs::create_dir_all(&settings.output_dir)?;

    let fps = source.fps();
    let stride = frame_stride(fps, settings.interval_seconds);

    println!("Video info:");
    println!("  FPS: {}", fps);
    match (source.frame_count(), source.duration_seconds()) {
        (Some(count), Some(duration)) => {
            println!("  Total frames: {}", count);
            println!("  Duration: {:.2} seconds", duration);
        }
        _ => println!("  Total frames: unknown"),
    }
    println!("  Extracting every {} seconds", settings.interval_seconds);
    let (width, height) = source.dimensions();
    info!(stride, fps, width, height, "sampling frames");

    let mut frames = Vec::new();
    let mut frame_count: u64 = 0;

    loop {
        // Frames between samples are consumed without being copied out
        if frame_count % stride != 0 {
            if !source.skip_frame() {
                break;
            }
            frame_count += 1;
            continue;
        }

        let Some(frame) = source.next_frame() else {
            break;
        };

        let timestamp = frame_count as f64 / fps;
        let filename = frame_filename(frames.len(), timestamp);
        let filepath = settings.output_dir.join(&filename);

        // Stretches to the target size; aspect ratio is not kept
        let resized = imageops::resize(
            &frame,
            settings.frame_width,
            settings.frame_height,
            FilterType::Triangle,
        );
        resized.save_with_format(&filepath, ImageFormat::Jpeg)?;

        println!("Extracted: {} (t={:.1}s)", filename, timestamp);
        frames.push(SampledFrame {
            filepath,
            timestamp_seconds: timestamp,
            source_frame_index: frame_count,
        });
        frame_count += 1;
    }

    println!(
        "\nExtracted {} frames to {}",
        frames.len(),
        settings.output_dir.display()
    );
    Ok(frames)
}

/// Sample the configured video. A video that cannot be opened is reported
/// and yields an empty manifest.
pub fn extract_frames(settings: &SamplerSettings) -> HarnessResult<Vec<SampledFrame>> {
    fs::create_dir_all(&settings.output_dir)?;

    let mut source = match FfmpegSource::open(&settings.video_path) {
        Ok(source) => source,
        Err(e) => {
            println!("Error: Could not open video {}", settings.video_path.display());
            error!("{}", e);
            return Ok(Vec::new());
        }
    };

    sample_frames(&mut source, settings)
}

//! Frame source abstraction for sequential video decoding.
//!
//! This module provides a unified interface for walking decoded frames:
//! - `FfmpegSource` decodes a real video through the `ffprobe`/`ffmpeg` tools
//! - `SyntheticVideo` generates frames in memory for tests and benches

use image::{ImageBuffer, RgbImage};
use serde::Deserialize;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};
use tracing::{debug, warn};

use super::types::VideoInfo;
use crate::error::{HarnessError, HarnessResult};

/// Trait for frame sources
///
/// A source yields frames strictly in stream order. `next_frame` returning
/// `None` ends iteration, whether the stream is exhausted or a read failed.
pub trait FrameSource {
    /// Frames per second
    fn fps(&self) -> f64;

    /// Total frame count, when known up front
    fn frame_count(&self) -> Option<u64>;

    /// Decoded frame size as `(width, height)`
    fn dimensions(&self) -> (u32, u32);

    /// Decode the next frame
    fn next_frame(&mut self) -> Option<RgbImage>;

    /// Move past the next frame without handing it out. Returns `false` at
    /// end of stream.
    fn skip_frame(&mut self) -> bool {
        self.next_frame().is_some()
    }

    /// Duration in seconds derived from frame count and rate
    fn duration_seconds(&self) -> Option<f64> {
        self.frame_count().map(|count| count as f64 / self.fps())
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
    nb_frames: Option<String>,
    #[serde(default)]
    side_data_list: Vec<ProbeSideData>,
    #[serde(default)]
    tags: ProbeTags,
}

#[derive(Debug, Deserialize)]
struct ProbeSideData {
    rotation: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct ProbeTags {
    rotate: Option<String>,
}

impl ProbeStream {
    /// Display rotation in degrees, normalized to `0..360`. The display
    /// matrix side data wins over the legacy `rotate` tag.
    fn rotation_degrees(&self) -> i64 {
        let degrees = self
            .side_data_list
            .iter()
            .find_map(|side| side.rotation)
            .or_else(|| self.tags.rotate.as_deref().and_then(|r| r.trim().parse().ok()))
            .unwrap_or(0.0);
        (degrees.round() as i64).rem_euclid(360)
    }
}

/// Parse an ffprobe rational like `30000/1001` (or a bare number)
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let fps = match rate.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => rate.trim().parse().ok()?,
    };
    (fps.is_finite() && fps > 0.0).then_some(fps)
}

/// Build stream properties from `ffprobe -of json` output.
///
/// Dimensions are reported as displayed: a stream rotated by 90 or 270
/// degrees has its coded width and height swapped, matching what `ffmpeg`
/// emits with autorotation on.
pub fn video_info_from_probe(json: &[u8]) -> HarnessResult<VideoInfo> {
    let output: ProbeOutput = serde_json::from_slice(json)?;
    let stream = output
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| HarnessError::VideoOpen("no video stream".to_string()))?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(HarnessError::VideoOpen("missing frame dimensions".to_string())),
    };
    let (width, height) = match stream.rotation_degrees() {
        90 | 270 => (height, width),
        _ => (width, height),
    };

    let fps = stream
        .avg_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .or_else(|| stream.r_frame_rate.as_deref().and_then(parse_frame_rate))
        .ok_or_else(|| HarnessError::VideoOpen("missing frame rate".to_string()))?;

    let frame_count = stream.nb_frames.as_deref().and_then(|n| n.trim().parse().ok());

    Ok(VideoInfo {
        width,
        height,
        fps,
        frame_count,
    })
}

/// Describe the first video stream of a file with `ffprobe`
pub fn probe_video(path: &Path) -> HarnessResult<VideoInfo> {
    let output = Command::new("ffprobe")
        .args([
            "-v", "error",
            "-select_streams", "v:0",
            "-show_entries",
            "stream=width,height,avg_frame_rate,r_frame_rate,nb_frames:stream_side_data=rotation:stream_tags=rotate",
            "-of", "json",
        ])
        .arg(path)
        .output()
        .map_err(|e| HarnessError::VideoOpen(format!("failed to run ffprobe: {}", e)))?;

    if !output.status.success() {
        return Err(HarnessError::VideoOpen(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    video_info_from_probe(&output.stdout).map_err(|e| match e {
        HarnessError::VideoOpen(msg) => {
            HarnessError::VideoOpen(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}

/// Reads packed RGB24 frames of a fixed size from a byte stream.
///
/// One frame buffer is reused across reads; `skip` never allocates.
pub struct RawFrameReader<R> {
    reader: R,
    width: u32,
    height: u32,
    buffer: Vec<u8>,
}

impl<R: Read> RawFrameReader<R> {
    pub fn new(reader: R, info: &VideoInfo) -> Self {
        Self {
            reader,
            width: info.width,
            height: info.height,
            buffer: vec![0u8; info.frame_bytes()],
        }
    }

    /// Fill the frame buffer. A short trailing frame counts as end of stream.
    fn fill(&mut self) -> bool {
        match self.reader.read_exact(&mut self.buffer) {
            Ok(()) => true,
            Err(e) => {
                if e.kind() != ErrorKind::UnexpectedEof {
                    warn!("frame read failed: {}", e);
                }
                false
            }
        }
    }

    /// Read the next frame as an image
    pub fn read_frame(&mut self) -> Option<RgbImage> {
        if !self.fill() {
            return None;
        }
        ImageBuffer::from_raw(self.width, self.height, self.buffer.clone())
    }

    /// Consume the next frame without copying it out
    pub fn skip(&mut self) -> bool {
        self.fill()
    }
}

/// Sequential decoder backed by an `ffmpeg` child process emitting raw RGB24
pub struct FfmpegSource {
    info: VideoInfo,
    child: Child,
    frames: RawFrameReader<BufReader<ChildStdout>>,
}

impl FfmpegSource {
    /// Probe the video and start decoding it
    pub fn open(path: &Path) -> HarnessResult<Self> {
        if !path.exists() {
            return Err(HarnessError::missing("Video file", path));
        }

        let info = probe_video(path)?;
        debug!(?info, path = %path.display(), "probed video");

        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-i"])
            .arg(path)
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| HarnessError::VideoOpen(format!("failed to spawn ffmpeg: {}", e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| HarnessError::VideoOpen("failed to capture ffmpeg stdout".to_string()))?;

        Ok(Self {
            frames: RawFrameReader::new(BufReader::new(stdout), &info),
            info,
            child,
        })
    }
}

impl FrameSource for FfmpegSource {
    fn fps(&self) -> f64 {
        self.info.fps
    }

    fn frame_count(&self) -> Option<u64> {
        self.info.frame_count
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.info.width, self.info.height)
    }

    fn next_frame(&mut self) -> Option<RgbImage> {
        self.frames.read_frame()
    }

    fn skip_frame(&mut self) -> bool {
        self.frames.skip()
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// An in-memory video of solid frames whose shade changes per frame
#[derive(Debug, Clone)]
pub struct SyntheticVideo {
    info: VideoInfo,
    emitted: u64,
}

impl SyntheticVideo {
    pub fn new(width: u32, height: u32, fps: f64, frame_count: u64) -> Self {
        Self {
            info: VideoInfo {
                width,
                height,
                fps,
                frame_count: Some(frame_count),
            },
            emitted: 0,
        }
    }

    /// Number of frames handed out or skipped so far
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    fn exhausted(&self) -> bool {
        Some(self.emitted) >= self.info.frame_count
    }
}

impl FrameSource for SyntheticVideo {
    fn fps(&self) -> f64 {
        self.info.fps
    }

    fn frame_count(&self) -> Option<u64> {
        self.info.frame_count
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.info.width, self.info.height)
    }

    fn next_frame(&mut self) -> Option<RgbImage> {
        if self.exhausted() {
            return None;
        }
        let shade = (self.emitted % 256) as u8;
        self.emitted += 1;
        Some(ImageBuffer::from_pixel(
            self.info.width,
            self.info.height,
            image::Rgb([shade, 128, 255 - shade]),
        ))
    }

    fn skip_frame(&mut self) -> bool {
        if self.exhausted() {
            return false;
        }
        self.emitted += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_frame_rate_rational() {
        assert_eq!(parse_frame_rate("30/1"), Some(30.0));
        let ntsc = parse_frame_rate("30000/1001").unwrap();
        assert!((ntsc - 29.97).abs() < 0.01);
    }

    #[test]
    fn test_parse_frame_rate_plain() {
        assert_eq!(parse_frame_rate("25"), Some(25.0));
    }

    #[test]
    fn test_parse_frame_rate_invalid() {
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("0/1"), None);
        assert_eq!(parse_frame_rate("abc"), None);
    }

    #[test]
    fn test_stream_info_falls_back_to_r_frame_rate() {
        let json = br#"{"streams":[{"width":1920,"height":1080,"avg_frame_rate":"0/0","r_frame_rate":"30/1"}]}"#;
        let info = video_info_from_probe(json).unwrap();
        assert_eq!(
            info,
            VideoInfo {
                width: 1920,
                height: 1080,
                fps: 30.0,
                frame_count: None,
            }
        );
    }

    #[test]
    fn test_stream_info_reads_frame_count() {
        let json = br#"{"streams":[{"width":640,"height":480,"avg_frame_rate":"25/1","nb_frames":"250"}]}"#;
        let info = video_info_from_probe(json).unwrap();
        assert_eq!(info.frame_count, Some(250));
        assert_eq!(info.fps, 25.0);
    }

    #[test]
    fn test_stream_info_no_streams() {
        let result = video_info_from_probe(br#"{"streams":[]}"#);
        assert!(matches!(result, Err(HarnessError::VideoOpen(_))));
    }

    #[test]
    fn test_stream_info_missing_dimensions() {
        let json = br#"{"streams":[{"width":1920,"avg_frame_rate":"30/1"}]}"#;
        let result = video_info_from_probe(json);
        assert!(matches!(result, Err(HarnessError::VideoOpen(msg)) if msg.contains("dimensions")));
    }

    #[test]
    fn test_stream_info_missing_frame_rate() {
        let json = br#"{"streams":[{"width":8,"height":8,"avg_frame_rate":"0/0","r_frame_rate":"0/0"}]}"#;
        let result = video_info_from_probe(json);
        assert!(matches!(result, Err(HarnessError::VideoOpen(msg)) if msg.contains("frame rate")));
    }

    #[test]
    fn test_stream_info_swaps_rotated_dimensions() {
        let side_data = br#"{"streams":[{"width":1920,"height":1080,"avg_frame_rate":"30/1","side_data_list":[{"rotation":-90}]}]}"#;
        let info = video_info_from_probe(side_data).unwrap();
        assert_eq!((info.width, info.height), (1080, 1920));

        let tagged = br#"{"streams":[{"width":1920,"height":1080,"avg_frame_rate":"30/1","tags":{"rotate":"270"}}]}"#;
        let info = video_info_from_probe(tagged).unwrap();
        assert_eq!((info.width, info.height), (1080, 1920));
    }

    #[test]
    fn test_stream_info_keeps_upside_down_dimensions() {
        let json = br#"{"streams":[{"width":1920,"height":1080,"avg_frame_rate":"30/1","side_data_list":[{"rotation":180}]}]}"#;
        let info = video_info_from_probe(json).unwrap();
        assert_eq!((info.width, info.height), (1920, 1080));
    }

    fn tiny_info() -> VideoInfo {
        VideoInfo {
            width: 2,
            height: 2,
            fps: 1.0,
            frame_count: None,
        }
    }

    #[test]
    fn test_raw_reader_drops_partial_trailing_frame() {
        let info = tiny_info();
        let mut bytes: Vec<u8> = (0..info.frame_bytes() as u8).collect();
        bytes.extend(std::iter::repeat_n(0xAA, info.frame_bytes() / 2));

        let mut reader = RawFrameReader::new(Cursor::new(bytes), &info);
        let frame = reader.read_frame().unwrap();
        assert_eq!(frame.dimensions(), (2, 2));
        assert_eq!(frame.get_pixel(1, 0).0, [3, 4, 5]);
        assert!(reader.read_frame().is_none());
    }

    #[test]
    fn test_raw_reader_skip_then_read() {
        let info = tiny_info();
        let mut bytes = vec![1u8; info.frame_bytes()];
        bytes.extend(vec![9u8; info.frame_bytes()]);

        let mut reader = RawFrameReader::new(Cursor::new(bytes), &info);
        assert!(reader.skip());
        let frame = reader.read_frame().unwrap();
        assert_eq!(frame.get_pixel(0, 0).0, [9, 9, 9]);
        assert!(!reader.skip());
    }

    #[test]
    fn test_synthetic_video_exhausts() {
        let mut video = SyntheticVideo::new(8, 6, 10.0, 3);
        assert_eq!(video.dimensions(), (8, 6));
        assert_eq!(video.duration_seconds(), Some(0.3));
        let first = video.next_frame().unwrap();
        assert_eq!(first.dimensions(), (8, 6));
        assert!(video.skip_frame());
        assert!(video.next_frame().is_some());
        assert!(video.next_frame().is_none());
        assert!(!video.skip_frame());
        assert_eq!(video.emitted(), 3);
    }

    #[test]
    fn test_open_missing_video() {
        let result = FfmpegSource::open(Path::new("definitely/not/here.mp4"));
        assert!(matches!(result, Err(HarnessError::MissingInput { .. })));
    }
}

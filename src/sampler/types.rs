// Core types for frame sampling

use std::path::PathBuf;

/// A still written by the frame sampler
#[derive(Debug, Clone, PartialEq)]
pub struct SampledFrame {
    /// Path of the written JPEG
    pub filepath: PathBuf,

    /// Elapsed source time of the frame
    pub timestamp_seconds: f64,

    /// Position of the frame in the decoded stream (0-based)
    pub source_frame_index: u64,
}

/// Stream properties reported by a frame source
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    /// Decoded frame width in pixels
    pub width: u32,

    /// Decoded frame height in pixels
    pub height: u32,

    /// Frames per second
    pub fps: f64,

    /// Total frame count, when the container reports one
    pub frame_count: Option<u64>,
}

impl VideoInfo {
    /// Size of one packed RGB24 frame in bytes
    pub fn frame_bytes(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

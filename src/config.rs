//! Configuration for the three pipeline stages.
//!
//! Every tunable of the harness lives here as a named default and is passed
//! explicitly into the stage that needs it:
//! - Frame sampling: source video, output directory, interval, frame size
//! - Mock inference: simulated model-load and per-inference delays
//! - Analysis: frames directory and results file
//! - Reporting: mobile multiplier, throttle target, variation threshold
//!
//! Nothing is read from the environment. The standalone entry points use
//! [`Config::defaults`]; the `simspec` binary overrides fields from its flags.
//!
//! # Example
//!
//! ```rust
//! use simspec_harness::config::{Config, InferenceSettings};
//!
//! let mut config = Config::defaults();
//! config.inference = InferenceSettings::instant();
//! assert_eq!(config.inference.inference_delay_ms, 0);
//! ```

use std::path::PathBuf;

// ============================================================================
// Default Values
// ============================================================================

/// Reference video sampled by the frame extractor
pub const DEFAULT_VIDEO_PATH: &str = "videos/PXL_20250905_170538833.LS.mp4";

/// Directory the extractor writes frames to and the runner reads them from
pub const DEFAULT_FRAMES_DIR: &str = "extracted_frames";

/// Seconds of source time between sampled frames (target device throttle)
pub const DEFAULT_INTERVAL_SECONDS: f64 = 3.0;

/// Sampled frame width (pixels)
pub const DEFAULT_FRAME_WIDTH: u32 = 512;

/// Sampled frame height (pixels)
pub const DEFAULT_FRAME_HEIGHT: u32 = 512;

/// Simulated model load time (milliseconds)
pub const DEFAULT_LOAD_DELAY_MS: u64 = 2500;

/// Simulated per-prompt inference time (milliseconds)
pub const DEFAULT_INFERENCE_DELAY_MS: u64 = 1500;

/// Results document written by the runner and read by the report
pub const DEFAULT_RESULTS_FILE: &str = "simspec_test_results.json";

/// Typical mobile slowdown relative to desktop inference
pub const DEFAULT_MOBILE_MULTIPLIER: f64 = 2.5;

/// Projected mobile average must stay strictly below this (milliseconds)
pub const DEFAULT_THROTTLE_TARGET_MS: f64 = 3000.0;

/// Per-frame max-min spread above which a frame is flagged (milliseconds)
pub const DEFAULT_VARIATION_THRESHOLD_MS: f64 = 200.0;

/// Centralized configuration for the harness
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Frame sampler settings
    pub sampler: SamplerSettings,
    /// Mock inference settings
    pub inference: InferenceSettings,
    /// Analysis runner settings
    pub analysis: AnalysisSettings,
    /// Report generator settings
    pub report: ReportSettings,
}

/// Frame sampler settings
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerSettings {
    /// Source video file
    pub video_path: PathBuf,
    /// Directory for sampled JPEG frames
    pub output_dir: PathBuf,
    /// Seconds of source time between samples
    pub interval_seconds: f64,
    /// Output frame width
    pub frame_width: u32,
    /// Output frame height
    pub frame_height: u32,
}

/// Mock inference settings
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceSettings {
    /// Simulated load delay (milliseconds)
    pub load_delay_ms: u64,
    /// Simulated per-inference delay (milliseconds)
    pub inference_delay_ms: u64,
}

/// Analysis runner settings
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    /// Directory holding previously sampled frames
    pub frames_dir: PathBuf,
    /// Output results document
    pub results_path: PathBuf,
}

/// Report generator settings
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSettings {
    /// Results document to load
    pub results_path: PathBuf,
    /// Factor applied to the pooled mean for the mobile projection
    pub mobile_multiplier: f64,
    /// Pass threshold for the projected mobile average (milliseconds)
    pub throttle_target_ms: f64,
    /// Per-frame variation that triggers a warning (milliseconds)
    pub variation_threshold_ms: f64,
}

impl Config {
    /// Create configuration with all defaults
    pub fn defaults() -> Self {
        Self {
            sampler: SamplerSettings::defaults(),
            inference: InferenceSettings::defaults(),
            analysis: AnalysisSettings::defaults(),
            report: ReportSettings::defaults(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl SamplerSettings {
    pub fn defaults() -> Self {
        Self {
            video_path: PathBuf::from(DEFAULT_VIDEO_PATH),
            output_dir: PathBuf::from(DEFAULT_FRAMES_DIR),
            interval_seconds: DEFAULT_INTERVAL_SECONDS,
            frame_width: DEFAULT_FRAME_WIDTH,
            frame_height: DEFAULT_FRAME_HEIGHT,
        }
    }
}

impl InferenceSettings {
    pub fn defaults() -> Self {
        Self {
            load_delay_ms: DEFAULT_LOAD_DELAY_MS,
            inference_delay_ms: DEFAULT_INFERENCE_DELAY_MS,
        }
    }

    /// No simulated delays, for tests and benches
    pub fn instant() -> Self {
        Self {
            load_delay_ms: 0,
            inference_delay_ms: 0,
        }
    }
}

impl AnalysisSettings {
    pub fn defaults() -> Self {
        Self {
            frames_dir: PathBuf::from(DEFAULT_FRAMES_DIR),
            results_path: PathBuf::from(DEFAULT_RESULTS_FILE),
        }
    }
}

impl ReportSettings {
    pub fn defaults() -> Self {
        Self {
            results_path: PathBuf::from(DEFAULT_RESULTS_FILE),
            mobile_multiplier: DEFAULT_MOBILE_MULTIPLIER,
            throttle_target_ms: DEFAULT_THROTTLE_TARGET_MS,
            variation_threshold_ms: DEFAULT_VARIATION_THRESHOLD_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::defaults();
        assert_eq!(config.sampler.video_path, PathBuf::from(DEFAULT_VIDEO_PATH));
        assert_eq!(config.sampler.interval_seconds, 3.0);
        assert_eq!((config.sampler.frame_width, config.sampler.frame_height), (512, 512));
        assert_eq!(config.inference.load_delay_ms, 2500);
        assert_eq!(config.inference.inference_delay_ms, 1500);
        assert_eq!(config.report.mobile_multiplier, 2.5);
        assert_eq!(config.report.throttle_target_ms, 3000.0);
    }

    #[test]
    fn test_sampler_output_feeds_runner_input() {
        let config = Config::defaults();
        assert_eq!(config.sampler.output_dir, config.analysis.frames_dir);
        assert_eq!(config.analysis.results_path, config.report.results_path);
    }

    #[test]
    fn test_instant_inference() {
        let settings = InferenceSettings::instant();
        assert_eq!(settings.load_delay_ms, 0);
        assert_eq!(settings.inference_delay_ms, 0);
    }
}

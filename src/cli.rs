//! Stage entry points shared by the `simspec` binary and the standalone
//! binaries in `src/bin`.
//!
//! Precondition failures (missing or empty inputs) are printed and end the
//! stage with success, except a missing video which exits with status 1.

use std::process::ExitCode;
use tracing::error;

use crate::config::{Config, ReportSettings, SamplerSettings};
use crate::error::HarnessError;
use crate::inference::MockInferenceService;
use crate::report::generate_report;
use crate::runner::run_progressive_analysis;
use crate::sampler::extract_frames;

fn banner(title: &str, rule: usize) {
    println!("{}", title);
    println!("{}", "=".repeat(rule));
}

/// Sample frames from the configured video
pub fn extract_stage(settings: &SamplerSettings) -> ExitCode {
    banner("SimSpec Frame Extraction", 40);

    if !settings.video_path.exists() {
        println!("Error: Video file {} not found", settings.video_path.display());
        return ExitCode::FAILURE;
    }

    match extract_frames(settings) {
        Ok(frames) => {
            println!("\nReady for AI analysis testing with {} frames", frames.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("frame extraction failed: {}", e);
            println!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Run the progressive analysis over previously sampled frames
pub fn analyze_stage(config: &Config) -> ExitCode {
    banner("SimSpec Progressive Analysis Test Harness", 50);

    let mut service = MockInferenceService::new(config.inference.clone());
    match run_progressive_analysis(&config.analysis, &mut service) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) if e.is_precondition() => {
            println!("Error: {}. Run the frame extraction first.", e);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("analysis failed: {}", e);
            println!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Print the performance report for a saved run
pub fn report_stage(settings: &ReportSettings) -> ExitCode {
    match generate_report(settings) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e @ HarnessError::MissingInput { .. }) => {
            println!("Error: {}. Run the test harness first.", e);
            ExitCode::SUCCESS
        }
        Err(e) if e.is_precondition() => {
            println!("Error: {}", e);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("report failed: {}", e);
            println!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

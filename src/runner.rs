//! Progressive analysis of sampled frames and the persisted run report.
//!
//! Each frame is run through the fixed [`PROMPTS`] in order. Every response
//! is classified and may carry a follow-up question. The whole run is saved
//! as a single JSON document that replaces any earlier one.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::classifier::classify;
use crate::config::AnalysisSettings;
use crate::error::{HarnessError, HarnessResult};
use crate::inference::InferenceBackend;
use crate::questions::{GeneratedQuestion, generate_question};

/// Progressive prompts, in the order they are asked
pub const PROMPTS: [&str; 5] = [
    "Describe the overall system or machine in this image.",
    "Identify the main mechanical component in the center of the image.",
    "Focus on the connection points. Are there bolts, welds, or clamps?",
    "Describe the surface condition. Is there evidence of wear, corrosion, or damage?",
    "Provide a summary of the component's likely function and condition.",
];

/// Result of one prompt against one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisStep {
    /// 1-based prompt position
    #[serde(rename = "step")]
    pub step_index: usize,

    pub prompt: String,

    #[serde(rename = "response")]
    pub response_text: String,

    pub inference_time_ms: f64,

    #[serde(rename = "analysis_type")]
    pub category: String,

    pub generated_question: Option<GeneratedQuestion>,
}

/// All steps for one frame, in prompt order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    #[serde(rename = "frame")]
    pub frame_name: String,

    #[serde(rename = "timestamp")]
    pub timestamp_label: String,

    pub analyses: Vec<AnalysisStep>,
}

/// The persisted result of a complete run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    #[serde(rename = "model_load_time_s")]
    pub model_load_time_seconds: f64,

    #[serde(rename = "total_frames_analyzed")]
    pub total_frames: usize,

    pub prompts_per_frame: usize,

    pub results: Vec<FrameResult>,
}

impl RunReport {
    /// Number of analysis steps across all frames
    pub fn total_analyses(&self) -> usize {
        self.results.iter().map(|r| r.analyses.len()).sum()
    }
}

/// List `.jpg` frame files in a directory, sorted by filename
pub fn frame_files(dir: &Path) -> HarnessResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(HarnessError::missing("Frames directory", dir));
    }

    let mut frames = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_jpg = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.ends_with(".jpg"))
            .unwrap_or(false);
        if is_jpg && path.is_file() {
            frames.push(path);
        }
    }

    if frames.is_empty() {
        return Err(HarnessError::EmptyInput {
            path: dir.to_path_buf(),
        });
    }

    frames.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(frames)
}

/// Timestamp label encoded in a frame name: `frame_003_t9.0s.jpg` -> `9.0s`
pub fn timestamp_label(frame_name: &str) -> String {
    frame_name
        .split_once("_t")
        .and_then(|(_, rest)| rest.split("s.jpg").next())
        .filter(|ts| !ts.is_empty())
        .map(|ts| format!("{}s", ts))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Run every prompt against one frame
pub fn analyze_frame<B>(backend: &B, frame_path: &Path) -> FrameResult
where
    B: InferenceBackend + ?Sized,
{
    let frame_name = frame_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let timestamp = timestamp_label(&frame_name);

    println!("\nAnalyzing Frame: {} (Timestamp: {})", frame_name, timestamp);
    println!("{}", "-".repeat(40));

    let mut analyses = Vec::with_capacity(PROMPTS.len());
    for (i, prompt) in PROMPTS.iter().enumerate() {
        println!("\nStep {}/{}: {}", i + 1, PROMPTS.len(), prompt);

        let (response, inference_time_ms) = backend.analyze(frame_path, prompt);
        let category = classify(&response);
        let question = generate_question(category);

        println!("Response: {}", response);
        println!("Inference time: {:.0}ms", inference_time_ms);
        println!("Analysis type: {}", category);
        if let Some(q) = &question {
            println!("Generated question: {}", q.question);
            println!("   Options: {}", q.options.join(", "));
        }

        analyses.push(AnalysisStep {
            step_index: i + 1,
            prompt: prompt.to_string(),
            response_text: response,
            inference_time_ms,
            category: category.to_string(),
            generated_question: question,
        });
    }

    FrameResult {
        frame_name,
        timestamp_label: timestamp,
        analyses,
    }
}

/// Initialize the backend, analyze every sampled frame and save the report
pub fn run_progressive_analysis<B>(
    settings: &AnalysisSettings,
    backend: &mut B,
) -> HarnessResult<RunReport>
where
    B: InferenceBackend + ?Sized,
{
    let frames = frame_files(&settings.frames_dir)?;

    println!("Initializing inference backend ({})...", backend.name());
    let load = backend.initialize();
    println!("Backend initialized in {:.2}s", load.seconds());

    info!(count = frames.len(), dir = %settings.frames_dir.display(), "analyzing frames");

    let results: Vec<FrameResult> = frames
        .iter()
        .map(|frame| analyze_frame(&*backend, frame))
        .collect();

    let report = RunReport {
        model_load_time_seconds: load.seconds(),
        total_frames: results.len(),
        prompts_per_frame: PROMPTS.len(),
        results,
    };

    write_run_report(&report, &settings.results_path)?;

    println!("\nTest Results Summary");
    println!("{}", "=".repeat(30));
    println!("Model load time: {:.2}s", report.model_load_time_seconds);
    println!("Frames analyzed: {}", report.total_frames);
    println!("Total analyses: {}", report.total_analyses());
    println!("Results saved to: {}", settings.results_path.display());

    Ok(report)
}

/// Write the report as pretty JSON, replacing any existing file
pub fn write_run_report(report: &RunReport, path: &Path) -> HarnessResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(report)?)?;
    Ok(())
}

/// Load a report written by [`write_run_report`]
pub fn load_run_report(path: &Path) -> HarnessResult<RunReport> {
    if !path.is_file() {
        return Err(HarnessError::missing("Results file", path));
    }
    let report: RunReport = serde_json::from_str(&fs::read_to_string(path)?)?;
    if report.results.len() != report.total_frames {
        warn!(
            declared = report.total_frames,
            actual = report.results.len(),
            "frame count mismatch in results file"
        );
    }
    Ok(report)
}

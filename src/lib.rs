//! SimSpec Harness - desktop prototyping of progressive on-device image
//! analysis for industrial equipment.
//!
//! This crate provides:
//! - Frame sampling from a reference video at a fixed throttle interval
//! - An inference backend seam with a deterministic mock model
//! - Keyword classification of responses into engineering-analysis categories
//! - Follow-up question generation per category
//! - A JSON run report and a performance summary over it
//!
//! The three stages run independently and meet only through files on disk.
//!
//! # Example
//!
//! ```rust,no_run
//! use simspec_harness::config::Config;
//! use simspec_harness::inference::MockInferenceService;
//! use simspec_harness::{generate_report, run_progressive_analysis};
//!
//! let config = Config::defaults();
//! let mut service = MockInferenceService::new(config.inference.clone());
//! run_progressive_analysis(&config.analysis, &mut service).unwrap();
//! generate_report(&config.report).unwrap();
//! ```

pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod inference;
pub mod logging;
pub mod questions;
pub mod report;
pub mod runner;
pub mod sampler;

// Re-export configuration and errors
pub use config::Config;
pub use error::{HarnessError, HarnessResult};

// Re-export the inference seam
pub use inference::{InferenceBackend, LoadResult, MockInferenceService};

// Re-export classification and questions
pub use classifier::classify;
pub use questions::{GeneratedQuestion, generate_question};

// Re-export pipeline stages
pub use report::{ReportStats, generate_report, render};
pub use runner::{AnalysisStep, FrameResult, PROMPTS, RunReport, run_progressive_analysis};
pub use sampler::{FrameSource, SampledFrame, extract_frames, sample_frames};

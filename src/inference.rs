//! Inference backends for progressive frame analysis.
//!
//! The runner talks to a model only through [`InferenceBackend`], so a real
//! on-device model can replace [`MockInferenceService`] without touching the
//! orchestration or reporting code.
//!
//! The mock simulates a fixed load delay and a fixed per-prompt delay, then
//! answers with canned text chosen by keywords in the prompt.

use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::InferenceSettings;

/// Response text returned when `analyze` is called before `initialize`
pub const NOT_INITIALIZED_RESPONSE: &str = "Error: inference backend not initialized";

/// Response text for prompts that match no known aspect
pub const UNKNOWN_ASPECT_RESPONSE: &str = "Unable to analyze this aspect of the component.";

const SYSTEM_RESPONSE: &str = "This image shows a large industrial pipe flange assembly with multiple bolt connections. The system appears to be part of a pressure vessel or piping network with metallic components.";

const COMPONENT_RESPONSE: &str = "The main component is a flanged pipe connection with approximately 8-12 bolts arranged in a circular pattern. The flange appears to be a raised-face type with gasket sealing surface.";

const CONNECTION_RESPONSE: &str = "The connection points consist of high-strength bolts with hex nuts, likely Grade 8 or similar. The bolts appear to be in tension loading configuration with visible thread engagement.";

const CONDITION_RESPONSE: &str = "Surface shows signs of light corrosion and weathering typical of outdoor industrial environments. Some bolt heads show minor rust staining but no significant structural deterioration is visible.";

const SUMMARY_RESPONSE: &str = "This flanged connection appears to be functioning within normal parameters. The slight surface corrosion suggests routine maintenance inspection is recommended, particularly for gasket integrity and bolt torque verification.";

/// Prompt keywords and their canned responses, checked in order
const RESPONSE_TABLE: &[(&[&str], &str)] = &[
    (&["overall", "system"], SYSTEM_RESPONSE),
    (&["component", "mechanical"], COMPONENT_RESPONSE),
    (&["connection", "bolts"], CONNECTION_RESPONSE),
    (&["surface", "condition"], CONDITION_RESPONSE),
    (&["summary", "function"], SUMMARY_RESPONSE),
];

/// Outcome of loading a model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadResult {
    /// Wall time spent loading
    pub elapsed: Duration,
}

impl LoadResult {
    pub fn seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Trait for vision-language inference backends
pub trait InferenceBackend {
    /// Load the model. Must run before `analyze`.
    fn initialize(&mut self) -> LoadResult;

    /// Analyze one image with one prompt, returning the response text and
    /// the elapsed inference time in milliseconds.
    ///
    /// Never fails: an uninitialized backend answers with
    /// [`NOT_INITIALIZED_RESPONSE`] and zero elapsed time.
    fn analyze(&self, image_path: &Path, prompt: &str) -> (String, f64);

    /// Whether `initialize` has completed
    fn is_initialized(&self) -> bool;

    /// Backend identifier for logs
    fn name(&self) -> &str;
}

/// Stand-in for the on-device model with deterministic canned answers
#[derive(Debug, Clone)]
pub struct MockInferenceService {
    settings: InferenceSettings,
    load: Option<LoadResult>,
}

impl MockInferenceService {
    pub fn new(settings: InferenceSettings) -> Self {
        Self {
            settings,
            load: None,
        }
    }

    /// Load result, once initialized
    pub fn load_result(&self) -> Option<LoadResult> {
        self.load
    }
}

impl Default for MockInferenceService {
    fn default() -> Self {
        Self::new(InferenceSettings::defaults())
    }
}

impl InferenceBackend for MockInferenceService {
    fn initialize(&mut self) -> LoadResult {
        info!(backend = self.name(), "loading model");
        let start = Instant::now();
        thread::sleep(Duration::from_millis(self.settings.load_delay_ms));
        let result = LoadResult {
            elapsed: start.elapsed(),
        };
        self.load = Some(result);
        info!("model loaded in {:.2}s", result.seconds());
        result
    }

    fn analyze(&self, image_path: &Path, prompt: &str) -> (String, f64) {
        if !self.is_initialized() {
            warn!("analyze called before initialize");
            return (NOT_INITIALIZED_RESPONSE.to_string(), 0.0);
        }

        let start = Instant::now();
        thread::sleep(Duration::from_millis(self.settings.inference_delay_ms));
        let response = mock_response(prompt);
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        debug!(image = %image_path.display(), elapsed_ms, "mock inference");
        (response.to_string(), elapsed_ms)
    }

    fn is_initialized(&self) -> bool {
        self.load.is_some()
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Canned response for a prompt; first matching keyword group wins
pub fn mock_response(prompt: &str) -> &'static str {
    let prompt = prompt.to_lowercase();
    RESPONSE_TABLE
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| prompt.contains(k)))
        .map(|(_, response)| *response)
        .unwrap_or(UNKNOWN_ASPECT_RESPONSE)
}

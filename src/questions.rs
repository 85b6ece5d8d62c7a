//! Follow-up multiple-choice questions for classified categories.

use serde::{Deserialize, Serialize};

use crate::classifier::{CRACK_PROPAGATION, FATIGUE, FLUID_DYNAMICS, REMAINING_LIFE};

/// A follow-up question with ordered answer options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub question: String,
    pub options: Vec<String>,
}

/// Category, question and options, checked in order
const QUESTION_TABLE: &[(&str, &str, &[&str])] = &[
    (
        FATIGUE,
        "What is the primary loading condition for these fasteners?",
        &["Static Tension", "Cyclic (Vibration)", "Shear", "Unknown"],
    ),
    (
        CRACK_PROPAGATION,
        "What welding process was likely used?",
        &["MIG/GMAW", "TIG/GTAW", "Stick/SMAW", "Unknown"],
    ),
    (
        REMAINING_LIFE,
        "What is the operational environment?",
        &["Dry, Indoor", "Humid, Outdoor", "Marine/Salt-Spray", "Chemical Exposure"],
    ),
    (
        FLUID_DYNAMICS,
        "What is the typical operating pressure?",
        &["Low (< 50 psi)", "Medium (50-500 psi)", "High (> 500 psi)", "Unknown"],
    ),
];

/// Lookup key of a category: the text before its first comma
fn category_key(category: &str) -> &str {
    category.split(',').next().unwrap_or(category).trim()
}

/// Question for a category, or `None` for categories without one
pub fn generate_question(category: &str) -> Option<GeneratedQuestion> {
    QUESTION_TABLE
        .iter()
        .find(|(key, _, _)| category.contains(category_key(key)))
        .map(|(_, question, options)| GeneratedQuestion {
            question: question.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
        })
}

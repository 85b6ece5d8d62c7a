//! Keyword classification of model responses into engineering-analysis
//! categories.

/// Category for bolted and screwed connections
pub const FATIGUE: &str = "Fatigue Analysis, Stress Concentration";

/// Category for welded joints
pub const CRACK_PROPAGATION: &str = "Crack Propagation, Residual Stress Analysis";

/// Category for corroded surfaces
pub const REMAINING_LIFE: &str = "Remaining Life Assessment, Material Degradation Study";

/// Category for piping and flanges
pub const FLUID_DYNAMICS: &str = "Fluid Dynamics, Pressure Drop Analysis";

/// Fallback when no keyword matches
pub const GENERAL_STRUCTURAL: &str = "General Structural Analysis";

/// Keywords and their categories in priority order
const CATEGORY_RULES: &[(&[&str], &str)] = &[
    (&["fastener", "bolt", "screw"], FATIGUE),
    (&["weld"], CRACK_PROPAGATION),
    (&["corrosion", "rust"], REMAINING_LIFE),
    (&["pipe", "flange"], FLUID_DYNAMICS),
];

/// Every category the classifier can return
pub const ALL_CATEGORIES: [&str; 5] = [
    FATIGUE,
    CRACK_PROPAGATION,
    REMAINING_LIFE,
    FLUID_DYNAMICS,
    GENERAL_STRUCTURAL,
];

/// Classify a response. Case-insensitive; the first matching rule wins.
pub fn classify(response: &str) -> &'static str {
    let response = response.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| response.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(GENERAL_STRUCTURAL)
}

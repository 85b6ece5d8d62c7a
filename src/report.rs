//! Performance report over a saved run.
//!
//! [`ReportStats::from_report`] does all the arithmetic; [`render`] turns the
//! result into console text.

use chrono::Local;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::io::{self, Write};

use crate::config::ReportSettings;
use crate::error::{HarnessError, HarnessResult};
use crate::runner::{RunReport, load_run_report};

/// Human-readable names of the progressive steps, aligned with the prompts
pub const STEP_LABELS: [&str; 5] = [
    "Overall System",
    "Main Component",
    "Connection Points",
    "Surface Condition",
    "Function Summary",
];

/// Descriptive statistics over a set of inference times (milliseconds)
#[derive(Debug, Clone, PartialEq)]
pub struct TimingSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation; zero with fewer than two values
    pub std_dev: f64,
}

impl TimingSummary {
    /// Summarize a non-empty set of values
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let median = if count % 2 == 1 {
            sorted[count / 2]
        } else {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        };
        let std_dev = if count < 2 {
            0.0
        } else {
            let variance =
                sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            variance.sqrt()
        };

        Some(Self {
            count,
            mean,
            median,
            min: sorted[0],
            max: sorted[count - 1],
            std_dev,
        })
    }
}

/// Average time of one prompt position across frames
#[derive(Debug, Clone, PartialEq)]
pub struct StepTiming {
    /// 1-based prompt position
    pub step: usize,
    pub label: String,
    pub average_ms: f64,
}

/// Timing of the steps within a single frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameTiming {
    pub frame: String,
    pub timestamp: String,
    pub average_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    /// Spread between slowest and fastest step exceeds the threshold
    pub high_variation: bool,
}

/// Everything the report prints
#[derive(Debug, Clone, PartialEq)]
pub struct ReportStats {
    pub model_load_time_seconds: f64,
    pub total_frames: usize,
    pub prompts_per_frame: usize,
    pub total_analyses: usize,
    pub timing: TimingSummary,
    pub projected_mobile_ms: f64,
    pub throttle_target_ms: f64,
    pub meets_throttle_target: bool,
    /// Category counts in order of first appearance
    pub categories: IndexMap<String, usize>,
    pub steps: Vec<StepTiming>,
    pub questions_generated: usize,
    pub unique_questions: usize,
    pub frames: Vec<FrameTiming>,
}

impl ReportStats {
    /// Compute report statistics. Fails when the run holds no analyses.
    pub fn from_report(report: &RunReport, settings: &ReportSettings) -> HarnessResult<Self> {
        let all_times: Vec<f64> = report
            .results
            .iter()
            .flat_map(|r| r.analyses.iter().map(|a| a.inference_time_ms))
            .collect();

        let timing = TimingSummary::from_values(&all_times).ok_or_else(|| {
            HarnessError::EmptyReport {
                path: settings.results_path.clone(),
            }
        })?;

        let projected_mobile_ms = timing.mean * settings.mobile_multiplier;

        let mut categories: IndexMap<String, usize> = IndexMap::new();
        let mut questions_generated = 0;
        let mut unique = HashSet::new();
        for analysis in report.results.iter().flat_map(|r| &r.analyses) {
            *categories.entry(analysis.category.clone()).or_insert(0) += 1;
            if let Some(q) = &analysis.generated_question {
                questions_generated += 1;
                unique.insert(q.question.as_str());
            }
        }

        let steps = (0..report.prompts_per_frame)
            .filter_map(|i| {
                let times: Vec<f64> = report
                    .results
                    .iter()
                    .filter_map(|r| r.analyses.get(i))
                    .map(|a| a.inference_time_ms)
                    .collect();
                let summary = TimingSummary::from_values(&times)?;
                let label = STEP_LABELS
                    .get(i)
                    .map(|l| l.to_string())
                    .unwrap_or_else(|| format!("Step {}", i + 1));
                Some(StepTiming {
                    step: i + 1,
                    label,
                    average_ms: summary.mean,
                })
            })
            .collect();

        let frames = report
            .results
            .iter()
            .filter_map(|r| {
                let times: Vec<f64> = r.analyses.iter().map(|a| a.inference_time_ms).collect();
                let summary = TimingSummary::from_values(&times)?;
                Some(FrameTiming {
                    frame: r.frame_name.clone(),
                    timestamp: r.timestamp_label.clone(),
                    average_ms: summary.mean,
                    min_ms: summary.min,
                    max_ms: summary.max,
                    high_variation: summary.max - summary.min > settings.variation_threshold_ms,
                })
            })
            .collect();

        Ok(Self {
            model_load_time_seconds: report.model_load_time_seconds,
            total_frames: report.total_frames,
            prompts_per_frame: report.prompts_per_frame,
            total_analyses: all_times.len(),
            timing,
            projected_mobile_ms,
            throttle_target_ms: settings.throttle_target_ms,
            meets_throttle_target: projected_mobile_ms < settings.throttle_target_ms,
            categories,
            steps,
            questions_generated,
            unique_questions: unique.len(),
            frames,
        })
    }

    /// Share of all analyses in a category, as a percentage
    pub fn category_percentage(&self, count: usize) -> f64 {
        count as f64 * 100.0 / self.total_analyses as f64
    }

    /// Share of analyses that produced a question, as a percentage
    pub fn question_rate(&self) -> f64 {
        self.questions_generated as f64 * 100.0 / self.total_analyses as f64
    }
}

fn section<W: Write>(out: &mut W, title: &str, rule: usize) -> io::Result<()> {
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "-".repeat(rule))
}

/// Print the report
pub fn render<W: Write>(stats: &ReportStats, out: &mut W) -> io::Result<()> {
    writeln!(out, "SimSpec Test Results Analysis")?;
    writeln!(out, "{}", "=".repeat(50))?;
    writeln!(out, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out)?;

    section(out, "PERFORMANCE METRICS", 30)?;
    writeln!(out, "Model Load Time: {:.2}s", stats.model_load_time_seconds)?;
    writeln!(out, "Total Frames Analyzed: {}", stats.total_frames)?;
    writeln!(out, "Prompts per Frame: {}", stats.prompts_per_frame)?;
    writeln!(out, "Total AI Analyses: {}", stats.total_analyses)?;
    writeln!(out)?;

    let t = &stats.timing;
    section(out, "INFERENCE PERFORMANCE", 30)?;
    writeln!(out, "Samples: {}", t.count)?;
    writeln!(out, "Average Inference Time: {:.0}ms", t.mean)?;
    writeln!(out, "Median Inference Time: {:.0}ms", t.median)?;
    writeln!(out, "Min Inference Time: {:.0}ms", t.min)?;
    writeln!(out, "Max Inference Time: {:.0}ms", t.max)?;
    writeln!(out, "Standard Deviation: {:.0}ms", t.std_dev)?;
    writeln!(out)?;

    section(out, "MOBILE PERFORMANCE PROJECTION", 30)?;
    writeln!(out, "Projected Mobile Avg: {:.0}ms", stats.projected_mobile_ms)?;
    writeln!(
        out,
        "Meets {:.0}s Throttle Target: {}",
        stats.throttle_target_ms / 1000.0,
        if stats.meets_throttle_target { "YES" } else { "NO" }
    )?;
    writeln!(out)?;

    section(out, "ANALYSIS TYPE DISTRIBUTION", 30)?;
    for (category, count) in &stats.categories {
        writeln!(
            out,
            "{}: {} ({:.1}%)",
            category,
            count,
            stats.category_percentage(*count)
        )?;
    }
    writeln!(out)?;

    section(out, "PROGRESSIVE ANALYSIS WORKFLOW", 30)?;
    for step in &stats.steps {
        writeln!(out, "Step {} ({}): {:.0}ms avg", step.step, step.label, step.average_ms)?;
    }
    writeln!(out)?;

    section(out, "QUESTION GENERATION", 30)?;
    writeln!(
        out,
        "Questions Generated: {}/{}",
        stats.questions_generated, stats.total_analyses
    )?;
    writeln!(out, "Unique Questions: {}", stats.unique_questions)?;
    writeln!(out, "Generation Rate: {:.1}%", stats.question_rate())?;
    writeln!(out)?;

    section(out, "RECOMMENDATIONS FOR MOBILE IMPLEMENTATION", 50)?;
    if stats.meets_throttle_target {
        writeln!(out, "Performance looks good for mobile deployment")?;
    } else {
        writeln!(out, "Performance Optimization Needed:")?;
        writeln!(out, "   - Reduce image resolution below 512x512")?;
        writeln!(out, "   - Consider increasing throttle interval to 4-5 seconds")?;
        writeln!(out, "   - Optimize prompts for faster inference")?;
    }
    writeln!(out)?;
    writeln!(out, "Implementation Notes:")?;
    writeln!(
        out,
        "   - Model load time of {:.1}s is acceptable for app startup",
        stats.model_load_time_seconds
    )?;
    writeln!(out, "   - Progressive analysis workflow is functioning correctly")?;
    writeln!(out, "   - Context interpretation successfully maps to analysis types")?;
    writeln!(out, "   - Question generation provides good engineering context")?;
    writeln!(out)?;

    section(out, "DETAILED FRAME ANALYSIS", 30)?;
    for frame in &stats.frames {
        writeln!(
            out,
            "{} (t={}): {:.0}ms avg",
            frame.frame, frame.timestamp, frame.average_ms
        )?;
        if frame.high_variation {
            writeln!(
                out,
                "  High time variation: {:.0}-{:.0}ms",
                frame.min_ms, frame.max_ms
            )?;
        }
    }
    writeln!(out)?;
    writeln!(out, "Analysis Complete - Ready for Mobile Implementation")?;
    Ok(())
}

/// Load the results file, compute statistics and print the report to stdout
pub fn generate_report(settings: &ReportSettings) -> HarnessResult<ReportStats> {
    let report = load_run_report(&settings.results_path)?;
    let stats = ReportStats::from_report(&report, settings)?;
    let stdout = io::stdout();
    render(&stats, &mut stdout.lock())?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{FATIGUE, GENERAL_STRUCTURAL, REMAINING_LIFE};
    use crate::questions::generate_question;
    use crate::runner::{AnalysisStep, FrameResult};
    use pretty_assertions::assert_eq;

    fn step(index: usize, time_ms: f64, category: &str) -> AnalysisStep {
        AnalysisStep {
            step_index: index,
            prompt: format!("prompt {}", index),
            response_text: "text".to_string(),
            inference_time_ms: time_ms,
            category: category.to_string(),
            generated_question: generate_question(category),
        }
    }

    fn frame(name: &str, times: [f64; 5], categories: [&str; 5]) -> FrameResult {
        FrameResult {
            frame_name: name.to_string(),
            timestamp_label: "0.0s".to_string(),
            analyses: times
                .iter()
                .zip(categories)
                .enumerate()
                .map(|(i, (t, c))| step(i + 1, *t, c))
                .collect(),
        }
    }

    fn sample_report() -> RunReport {
        RunReport {
            model_load_time_seconds: 2.5,
            total_frames: 2,
            prompts_per_frame: 5,
            results: vec![
                frame(
                    "frame_000_t0.0s.jpg",
                    [1000.0, 1100.0, 1200.0, 1300.0, 1400.0],
                    [FATIGUE, FATIGUE, FATIGUE, REMAINING_LIFE, GENERAL_STRUCTURAL],
                ),
                frame(
                    "frame_001_t3.0s.jpg",
                    [1000.0, 1000.0, 1000.0, 1000.0, 1100.0],
                    [FATIGUE, FATIGUE, FATIGUE, FATIGUE, GENERAL_STRUCTURAL],
                ),
            ],
        }
    }

    #[test]
    fn test_timing_summary() {
        let summary = TimingSummary::from_values(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(summary.count, 4);
        assert_eq!(summary.mean, 2.5);
        assert_eq!(summary.median, 2.5);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 4.0);
        assert!((summary.std_dev - 1.2909944).abs() < 1e-6);
    }

    #[test]
    fn test_timing_summary_edge_cases() {
        assert_eq!(TimingSummary::from_values(&[]), None);
        let single = TimingSummary::from_values(&[7.0]).unwrap();
        assert_eq!(single.median, 7.0);
        assert_eq!(single.std_dev, 0.0);
    }

    #[test]
    fn test_stats_pool_every_step() {
        let stats = ReportStats::from_report(&sample_report(), &ReportSettings::defaults()).unwrap();
        assert_eq!(stats.total_analyses, 10);
        assert_eq!(stats.timing.count, 10);
        assert_eq!(stats.timing.mean, 1110.0);
        assert_eq!(stats.timing.median, 1050.0);
    }

    #[test]
    fn test_mobile_projection_verdict() {
        let mut settings = ReportSettings::defaults();
        let stats = ReportStats::from_report(&sample_report(), &settings).unwrap();
        assert_eq!(stats.projected_mobile_ms, 1110.0 * 2.5);
        assert!(stats.meets_throttle_target);

        // Exactly on the target is a fail
        settings.throttle_target_ms = 2775.0;
        let stats = ReportStats::from_report(&sample_report(), &settings).unwrap();
        assert!(!stats.meets_throttle_target);
    }

    #[test]
    fn test_category_distribution_sums_to_100() {
        let stats = ReportStats::from_report(&sample_report(), &ReportSettings::defaults()).unwrap();
        let order: Vec<&str> = stats.categories.keys().map(|k| k.as_str()).collect();
        assert_eq!(order, vec![FATIGUE, REMAINING_LIFE, GENERAL_STRUCTURAL]);
        assert_eq!(stats.categories[FATIGUE], 7);

        let total: f64 = stats
            .categories
            .values()
            .map(|c| stats.category_percentage(*c))
            .sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_step_averages_and_questions() {
        let stats = ReportStats::from_report(&sample_report(), &ReportSettings::defaults()).unwrap();
        assert_eq!(stats.steps.len(), 5);
        assert_eq!(stats.steps[0].label, "Overall System");
        assert_eq!(stats.steps[1].average_ms, 1050.0);
        assert_eq!(stats.steps[4].average_ms, 1250.0);

        assert_eq!(stats.questions_generated, 8);
        assert_eq!(stats.unique_questions, 2);
        assert_eq!(stats.question_rate(), 80.0);
    }

    #[test]
    fn test_frame_variation_flag() {
        let stats = ReportStats::from_report(&sample_report(), &ReportSettings::defaults()).unwrap();
        // 1400 - 1000 > 200, 1100 - 1000 is not
        assert!(stats.frames[0].high_variation);
        assert!(!stats.frames[1].high_variation);
    }

    #[test]
    fn test_empty_report_is_rejected() {
        let report = RunReport {
            model_load_time_seconds: 2.5,
            total_frames: 0,
            prompts_per_frame: 5,
            results: vec![],
        };
        let result = ReportStats::from_report(&report, &ReportSettings::defaults());
        assert!(matches!(result, Err(HarnessError::EmptyReport { .. })));
    }

    #[test]
    fn test_render_sections() {
        let stats = ReportStats::from_report(&sample_report(), &ReportSettings::defaults()).unwrap();
        let mut out = Vec::new();
        render(&stats, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Average Inference Time: 1110ms"));
        assert!(text.contains("Projected Mobile Avg: 2775ms"));
        assert!(text.contains("Meets 3s Throttle Target: YES"));
        assert!(text.contains("Performance looks good for mobile deployment"));
        assert!(text.contains("Step 5 (Function Summary): 1250ms avg"));
        assert!(text.contains("Generation Rate: 80.0%"));
        assert!(text.contains("High time variation: 1000-1400ms"));
    }

    #[test]
    fn test_render_optimization_block_when_target_missed() {
        let mut settings = ReportSettings::defaults();
        settings.throttle_target_ms = 2000.0;
        let stats = ReportStats::from_report(&sample_report(), &settings).unwrap();
        let mut out = Vec::new();
        render(&stats, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Meets 2s Throttle Target: NO"));
        assert!(!text.contains("Performance looks good for mobile deployment"));
        let expected = "Performance Optimization Needed:\n   \
                        - Reduce image resolution below 512x512\n   \
                        - Consider increasing throttle interval to 4-5 seconds\n   \
                        - Optimize prompts for faster inference\n";
        assert!(text.contains(expected));
    }

    #[test]
    fn test_generate_report_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let mut settings = ReportSettings::defaults();
        settings.results_path = tmp.path().join("absent.json");

        let result = generate_report(&settings);
        assert!(matches!(result, Err(HarnessError::MissingInput { .. })));
    }
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use simspec_harness::cli::{analyze_stage, extract_stage, report_stage};
use simspec_harness::config::{Config, InferenceSettings};
use simspec_harness::logging;

/// SimSpec Harness - progressive image analysis prototyping
#[derive(Parser, Debug)]
#[command(
    name = "simspec",
    about = "Desktop harness for progressive on-device image analysis of industrial equipment",
    after_help = "Each stage reads the files the previous one wrote:\n\
        extract  -> extracted_frames/\n\
        analyze  -> simspec_test_results.json\n\
        report   <- simspec_test_results.json"
)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sample frames from the reference video at a fixed interval
    Extract {
        /// Source video file
        #[arg(short, long)]
        video: Option<PathBuf>,

        /// Output directory for sampled frames
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Seconds of source time between samples
        #[arg(short, long)]
        interval: Option<f64>,
    },

    /// Run the progressive prompts over sampled frames
    Analyze {
        /// Directory of sampled frames
        #[arg(short, long)]
        frames: Option<PathBuf>,

        /// Results file to write
        #[arg(short, long)]
        results: Option<PathBuf>,

        /// Skip the simulated model-load and inference delays
        #[arg(long)]
        instant: bool,
    },

    /// Print the performance report for a saved run
    Report {
        /// Results file to read
        #[arg(short, long)]
        results: Option<PathBuf>,

        /// Multiplier from desktop to projected mobile inference time
        #[arg(long)]
        mobile_multiplier: Option<f64>,

        /// Throttle target for the projected mobile average (ms)
        #[arg(long)]
        target_ms: Option<f64>,
    },
}

fn main() -> ExitCode {
    logging::init();
    let args = Args::parse();
    let mut config = Config::defaults();

    match args.command {
        Some(Commands::Extract {
            video,
            output,
            interval,
        }) => {
            if let Some(video) = video {
                config.sampler.video_path = video;
            }
            if let Some(output) = output {
                config.sampler.output_dir = output;
            }
            if let Some(interval) = interval {
                config.sampler.interval_seconds = interval;
            }
            extract_stage(&config.sampler)
        }

        Some(Commands::Analyze {
            frames,
            results,
            instant,
        }) => {
            if let Some(frames) = frames {
                config.analysis.frames_dir = frames;
            }
            if let Some(results) = results {
                config.analysis.results_path = results;
            }
            if instant {
                config.inference = InferenceSettings::instant();
            }
            analyze_stage(&config)
        }

        Some(Commands::Report {
            results,
            mobile_multiplier,
            target_ms,
        }) => {
            if let Some(results) = results {
                config.report.results_path = results;
            }
            if let Some(multiplier) = mobile_multiplier {
                config.report.mobile_multiplier = multiplier;
            }
            if let Some(target) = target_ms {
                config.report.throttle_target_ms = target;
            }
            report_stage(&config.report)
        }

        None => {
            println!("SimSpec Harness - progressive image analysis prototyping");
            println!();
            println!("Usage: simspec <COMMAND>");
            println!();
            println!("Commands:");
            println!("  extract  Sample frames from the reference video");
            println!("  analyze  Run the progressive prompts over sampled frames");
            println!("  report   Print the performance report for a saved run");
            println!();
            println!("Run with --help for more information.");
            ExitCode::SUCCESS
        }
    }
}

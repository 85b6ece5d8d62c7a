use simspec_harness::cli::analyze_stage;
use simspec_harness::config::Config;
use std::process::ExitCode;

fn main() -> ExitCode {
    simspec_harness::logging::init();
    analyze_stage(&Config::defaults())
}

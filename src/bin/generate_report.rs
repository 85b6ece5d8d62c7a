use simspec_harness::cli::report_stage;
use simspec_harness::config::Config;
use std::process::ExitCode;

fn main() -> ExitCode {
    simspec_harness::logging::init();
    report_stage(&Config::defaults().report)
}

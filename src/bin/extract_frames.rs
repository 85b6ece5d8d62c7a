use simspec_harness::cli::extract_stage;
use simspec_harness::config::Config;
use std::process::ExitCode;

fn main() -> ExitCode {
    simspec_harness::logging::init();
    extract_stage(&Config::defaults().sampler)
}

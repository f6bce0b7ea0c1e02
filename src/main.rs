//! Binary entrypoint for the `menutree` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    menutree::logging::init();
    // Recording is handled in commands::dispatch via MENUTREE_RECORD=<dir>.
    match menutree::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

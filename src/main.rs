//! `survey` binary: see [`rates_survey::app::run`].

use std::process::ExitCode;

fn main() -> ExitCode {
    match rates_survey::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

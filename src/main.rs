use std::process::ExitCode;

use githandle::ui::output;

fn main() -> ExitCode {
    match githandle::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

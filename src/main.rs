//! docker-credential-sm-login
//!
//! Entry point. Errors go to stdout because that is where the Docker
//! credential-helper protocol reads failure messages from.

use std::process::ExitCode;

fn main() -> ExitCode {
    match sm_login::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("{}", err);
            ExitCode::FAILURE
        }
    }
}

//! hublink - Tag-driven backlinks for markdown vaults

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = hublink::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

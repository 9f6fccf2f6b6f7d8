//! CrossDocs - documentation projects built from shared input files

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = crossdocs::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

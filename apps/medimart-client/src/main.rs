//! # MediMart Client Entry Point
//!
//! Boots the client: config, logging, stores, then a saved-session check.
//!
//! ```text
//! medimart [CONFIG_PATH]
//! ```
//!
//! Without an argument the platform config path is used, and a missing
//! file means defaults.

use std::path::PathBuf;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);

    match medimart_client::run(config_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("medimart: {}", err);
            ExitCode::FAILURE
        }
    }
}

//! The Beacon command line tool.
//!
//! Beacon replays monitoring events through the same deduplication and sampling pipeline that
//! applications embed. It reads one JSON event per line and writes every event that survives the
//! pipeline to stdout:
//!
//! ```bash
//! $ beacon replay --config ./config events.jsonl > survivors.jsonl
//! ```
//!
//! The effective configuration, including command line overrides, can be inspected with:
//!
//! ```bash
//! $ beacon config show --log-level debug
//! ```

#![warn(missing_docs)]

mod cli;
mod cliapp;
mod setup;

use std::process;

/// Runs the command line application and exits with its status code.
pub fn main() {
    let exit_code = match cli::execute() {
        Ok(()) => 0,
        Err(err) => {
            beacon_log::ensure_error(&*err);
            1
        }
    };

    process::exit(exit_code);
}

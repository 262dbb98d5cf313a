//! statserver entry point
//!
//! Parses arguments and serves via `cli::run`; prints any boot error to
//! stderr and exits non-zero.

use statserver::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

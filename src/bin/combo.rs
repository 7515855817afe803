//! combo CLI binary.

use std::process;

use clap::Parser;
use tracing::Level;

use combo_analysis::cli::args::*;
use combo_analysis::cli::commands::*;

fn main() {
    // Parse command line arguments using clap
    let args = ComboArgs::parse();

    let level = match args.verbosity() {
        0 => Level::ERROR, // Quiet mode
        1 => Level::WARN,  // Default
        2 => Level::INFO,  // Verbose
        _ => Level::DEBUG, // Very verbose (3+)
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    // Execute the command
    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

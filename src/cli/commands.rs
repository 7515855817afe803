//! Command implementations for the combo CLI.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::analysis::analyzer::{Analyzer, AnalyzerRegistry};
use crate::analysis::combo::{ComboAnalyzer, ComboAnalyzerConfig};
use crate::analysis::context::AnalysisContext;
use crate::analysis::producer::{TokenProducer, drain};
use crate::analysis::reader::{CharReader, StringReader};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::{ComboError, Result};

/// Execute a CLI command.
pub fn execute_command(args: ComboArgs) -> Result<()> {
    match &args.command {
        Command::Analyze(analyze_args) => analyze(analyze_args, &args),
        Command::List => list_analyzers(&args),
    }
}

/// Run the input through a combo analyzer and print the merged tokens.
fn analyze(args: &AnalyzeArgs, cli_args: &ComboArgs) -> Result<()> {
    let config = load_config(args)?;
    let registry = AnalyzerRegistry::with_defaults()?;
    let combo = ComboAnalyzer::from_config(&config, &registry);
    debug!(target: "combo::cli", analyzer = ?combo, "combo analyzer built");

    let reader: Box<dyn CharReader> = match &args.text {
        Some(text) => Box::new(StringReader::new(text.as_str())),
        None => Box::new(io::stdin()),
    };

    let start = Instant::now();
    let mut ctx = AnalysisContext::new();
    let mut producer = combo.reusable_token_producer(&mut ctx, &args.field, reader)?;
    let tokens = drain(&mut producer)?;
    producer.close()?;
    let elapsed = start.elapsed();

    info!(
        target: "combo::cli",
        tokens = tokens.len(),
        elapsed_us = elapsed.as_micros() as u64,
        "analysis finished"
    );

    let result = AnalysisResult {
        field: args.field.clone(),
        sub_analyzers: config.sub_analyzers.clone(),
        tokens: tokens.iter().map(TokenRow::from).collect(),
        duration_us: elapsed.as_micros() as u64,
    };
    output_analysis(&result, cli_args)
}

/// List the built-in analyzers.
fn list_analyzers(cli_args: &ComboArgs) -> Result<()> {
    let registry = AnalyzerRegistry::with_defaults()?;
    let analyzers = registry
        .names()
        .into_iter()
        .filter_map(|name| {
            registry.get(name).map(|analyzer| AnalyzerEntry {
                name: name.to_string(),
                kind: analyzer.name().to_string(),
            })
        })
        .collect();

    output_analyzers(&AnalyzerList { analyzers }, cli_args)
}

/// Build the combo configuration from a file or from the `--analyzers` list,
/// then apply the command line switches on top of it.
fn load_config(args: &AnalyzeArgs) -> Result<ComboAnalyzerConfig> {
    let config = match &args.config {
        Some(path) => load_config_from_file(path)?,
        None if args.analyzers.is_empty() => {
            return Err(ComboError::invalid_config(
                "either --config or --analyzers must be given",
            ));
        }
        None => ComboAnalyzerConfig::new(args.analyzers.iter().map(String::as_str)),
    };

    let caching = config.tokenstream_caching || args.caching;
    let deduplication = config.deduplication || args.dedup;
    Ok(config
        .with_caching(caching)
        .with_deduplication(deduplication))
}

fn load_config_from_file(path: &Path) -> Result<ComboAnalyzerConfig> {
    debug!(target: "combo::cli", path = %path.display(), "loading configuration");
    let content = fs::read_to_string(path)?;
    ComboAnalyzerConfig::from_json(&content)
}

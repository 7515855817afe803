//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::analysis::token::Token;
use crate::cli::args::{ComboArgs, OutputFormat};
use crate::error::Result;

/// One merged token as printed by `analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRow {
    pub text: String,
    pub start_offset: usize,
    pub end_offset: usize,
    pub position_increment: usize,
    pub position: usize,
    pub token_type: String,
}

impl From<&Token> for TokenRow {
    fn from(token: &Token) -> Self {
        TokenRow {
            text: token.text.clone(),
            start_offset: token.start_offset,
            end_offset: token.end_offset,
            position_increment: token.position_increment,
            position: token.position,
            token_type: token.token_type.clone(),
        }
    }
}

/// Result of the `analyze` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub field: String,
    pub sub_analyzers: Vec<String>,
    pub tokens: Vec<TokenRow>,
    pub duration_us: u64,
}

/// Result of the `list` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzerList {
    pub analyzers: Vec<AnalyzerEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzerEntry {
    pub name: String,
    pub kind: String,
}

/// Output the analysis result in the requested format.
pub fn output_analysis(result: &AnalysisResult, args: &ComboArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 0 {
                println!("Sub-analyzers: {}", result.sub_analyzers.join(", "));
                println!();
            }
            println!(
                "{:<24} {:>6} {:>6} {:>5} {:>5}  type",
                "text", "start", "end", "inc", "pos"
            );
            for row in &result.tokens {
                println!(
                    "{:<24} {:>6} {:>6} {:>5} {:>5}  {}",
                    format!("{:?}", row.text),
                    row.start_offset,
                    row.end_offset,
                    row.position_increment,
                    row.position,
                    row.token_type
                );
            }
            if args.verbosity() > 1 {
                println!();
                println!(
                    "{} tokens in {}us",
                    result.tokens.len(),
                    result.duration_us
                );
            }
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
        OutputFormat::Csv => {
            println!("text,start_offset,end_offset,position_increment,position,token_type");
            for row in &result.tokens {
                println!(
                    "{},{},{},{},{},{}",
                    format_csv_value(&row.text),
                    row.start_offset,
                    row.end_offset,
                    row.position_increment,
                    row.position,
                    format_csv_value(&row.token_type)
                );
            }
            Ok(())
        }
    }
}

/// Output the analyzer list in the requested format.
pub fn output_analyzers(list: &AnalyzerList, args: &ComboArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Json => output_json(list, args),
        OutputFormat::Human | OutputFormat::Csv => {
            for entry in &list.analyzers {
                if args.output_format == OutputFormat::Csv {
                    println!("{},{}", entry.name, entry.kind);
                } else {
                    println!("{:<12} {}", entry.name, entry.kind);
                }
            }
            Ok(())
        }
    }
}

fn output_json<T: Serialize>(result: &T, args: &ComboArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Quote a CSV field when it contains a separator, quote or newline.
fn format_csv_value(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

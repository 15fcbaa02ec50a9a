mod report;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;
use svg_inspector::{SchemaRegistry, ValidationResult, Validator};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use report::{FileReport, render_text};

/// Validate SVG documents against the SVG element and attribute grammar
#[derive(Parser, Debug)]
#[command(name = "validate-svg")]
#[command(version, about = "Validate SVG documents against the SVG grammar", long_about = None)]
struct Args {
    /// SVG files to validate
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// JSON schema catalogue to use instead of the built-in SVG one
    #[arg(long, value_name = "FILE")]
    schema: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "validate_svg=warn,svg_inspector=warn".into()),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    match run() {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Returns whether every file was valid.
fn run() -> Result<bool> {
    let args = Args::parse();

    let custom = args.schema.as_deref().map(load_schema).transpose()?;
    let validator = match &custom {
        Some(registry) => Validator::with_registry(registry),
        None => Validator::new(),
    };

    let (results, failures) = validate_files(&validator, &args.files);
    for failure in &failures {
        eprintln!("Error: {:#}", failure);
    }
    let all_valid = failures.is_empty() && results.iter().all(|(_, _, r)| r.is_valid());

    match args.format {
        Format::Text => {
            let color = std::io::stdout().is_terminal();
            for (path, source, result) in &results {
                print!("{}", render_text(&path.display().to_string(), source, result, color));
            }
        }
        Format::Json => {
            let json_reports: Vec<FileReport<'_>> = results
                .iter()
                .map(|(path, _, result)| FileReport {
                    file: path.display().to_string(),
                    result,
                })
                .collect();
            let json = serde_json::to_string_pretty(&json_reports)
                .context("Failed to serialise results")?;
            println!("{}", json);
        }
    }

    Ok(all_valid)
}

/// Validate each file in turn. A file that cannot be read is recorded as a
/// failure and the remaining files are still validated.
fn validate_files<'p>(
    validator: &Validator<'_>,
    files: &'p [PathBuf],
) -> (Vec<(&'p Path, String, ValidationResult)>, Vec<anyhow::Error>) {
    let mut results = Vec::new();
    let mut failures = Vec::new();

    for path in files {
        let bytes = match fs::read(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))
        {
            Ok(bytes) => bytes,
            Err(e) => {
                failures.push(e);
                continue;
            }
        };
        let result = validator.validate_bytes(&bytes);
        tracing::debug!(
            file = %path.display(),
            errors = result.errors().len(),
            "Validated file"
        );
        results.push((path.as_path(), String::from_utf8_lossy(&bytes).into_owned(), result));
    }

    (results, failures)
}

fn load_schema(path: &Path) -> Result<SchemaRegistry> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file: {}", path.display()))?;
    SchemaRegistry::from_json(&content)
        .with_context(|| format!("Failed to load schema from {}", path.display()))
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use walkdir::WalkDir;

use framecheck_core::{Config, Frame, Report, Severity};
use framecheck_engine::SchemaValidator;

/// framecheck - schema consistency checks for tabular datasets
#[derive(Parser)]
#[command(name = "framecheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: framecheck.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that every table shares the first table's schema
    Check {
        /// Table descriptor files or directories of descriptors
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Also require identical column order
        #[arg(long)]
        check_order: bool,

        /// Write the report JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write a markdown report
        #[arg(short, long)]
        markdown: Option<PathBuf>,

        /// Print the report JSON instead of the summary
        #[arg(long)]
        json: bool,
    },

    /// Print the normalized schema of one descriptor
    Inspect {
        /// Table descriptor file
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if Path::new("framecheck.toml").exists() {
        Config::from_file(Path::new("framecheck.toml"))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    match cli.command {
        Commands::Check {
            paths,
            check_order,
            output,
            markdown,
            json,
        } => {
            let mut config = config;
            config.check_column_order |= check_order;
            check_command(config, &paths, output.as_deref(), markdown.as_deref(), json, cli.verbose)
        }
        Commands::Inspect { path } => inspect_command(&path),
    }
}

/// Check command - validate a batch of descriptors
fn check_command(
    config: Config,
    paths: &[PathBuf],
    output: Option<&Path>,
    markdown: Option<&Path>,
    json: bool,
    verbose: bool,
) -> Result<()> {
    let files = collect_descriptor_files(paths)?;

    if verbose {
        eprintln!("{} {} descriptor(s)", "Loading".cyan(), files.len());
    }

    let frames = files
        .iter()
        .map(|path| load_frame(path))
        .collect::<Result<Vec<_>>>()?;

    if verbose {
        if let Some(reference) = frames.first() {
            eprintln!("{} {}", "Reference table:".cyan(), reference.name);
        }
        eprintln!("{} {}", "Check column order:".cyan(), config.check_column_order);
    }

    let names: Vec<String> = frames.iter().map(|f| f.name.clone()).collect();
    let report = SchemaValidator::new(config).explain(&frames, &names);

    if let Some(output) = output {
        report
            .save_to_file(output)
            .with_context(|| format!("failed to write report to {}", output.display()))?;
        if verbose {
            eprintln!("{} {}", "Report written to".green(), output.display());
        }
    }

    if let Some(markdown) = markdown {
        std::fs::write(markdown, generate_markdown_report(&report))
            .with_context(|| format!("failed to write markdown report to {}", markdown.display()))?;
        if verbose {
            eprintln!("{} {}", "Markdown report written to".green(), markdown.display());
        }
    }

    if json {
        println!("{}", report.to_json()?);
    } else {
        print_report_summary(&report);
    }

    if !report.passed() {
        std::process::exit(1);
    }

    Ok(())
}

/// Inspect command - show one descriptor's normalized schema
fn inspect_command(path: &Path) -> Result<()> {
    let frame = load_frame(path)?;
    let schema = frame.schema();

    println!("{}", frame.name.bold());
    for column in &schema.columns {
        println!("  {:<24} {}", column.name, column.dtype.to_string().cyan());
    }
    println!();
    println!("Rows:        {}", frame.row_count());
    println!("Fingerprint: {}", schema.fingerprint());

    Ok(())
}

/// Expand directories into their `*.json` descriptors, sorted by path
fn collect_descriptor_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            files.extend(descriptors_in(path)?);
        } else if path.exists() {
            files.push(path.clone());
        } else {
            anyhow::bail!("Descriptor not found: {}", path.display());
        }
    }

    Ok(files)
}

/// Every `*.json` file under `dir`, sorted
///
/// A walk error fails the whole run: skipping an unreadable entry could
/// silently change which table is the reference.
fn descriptors_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = entry.with_context(|| format!("failed to scan {}", dir.display()))?;

        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "json")
        {
            found.push(entry.into_path());
        }
    }

    found.sort();
    Ok(found)
}

/// Read a descriptor, naming it after its file stem when unnamed
fn load_frame(path: &Path) -> Result<Frame> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let mut frame = Frame::from_json(&contents)
        .with_context(|| format!("invalid table descriptor {}", path.display()))?;

    if frame.name.is_empty() {
        frame.name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
    }

    tracing::debug!(table = %frame.name, columns = frame.columns.len(), "loaded descriptor");
    Ok(frame)
}

fn flag(value: bool) -> colored::ColoredString {
    if value {
        "yes".green()
    } else {
        "no".red().bold()
    }
}

/// Print a human-readable summary of the report
fn print_report_summary(report: &Report) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Schema Consistency Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Tables checked: {}", report.summary.tables_checked);
    println!();

    let result = &report.result;
    println!("{}", "Result:".bold());
    println!("  Same column names:  {}", flag(result.same_col_names));
    if let Some(order) = result.same_col_order {
        println!("  Same column order:  {}", flag(order));
    }
    println!("  Same dtypes:        {}", flag(result.same_dtypes));
    if let Some(error) = &result.error {
        println!("  {} {}", "Error:".red().bold(), error);
    }
    println!();

    if report.diagnostics.is_empty() {
        println!("{}", "✓ All tables share the reference schema".green().bold());
    } else {
        println!("{}", "Details:".bold());
        for diag in &report.diagnostics {
            let severity_str = match diag.severity {
                Severity::Error => "ERROR".red().bold(),
                Severity::Warn => "WARN".yellow().bold(),
                Severity::Info => "INFO".cyan(),
            };

            println!("  [{}] {}: {}", severity_str, diag.code, diag.message);

            if let Some(loc) = &diag.location {
                println!("    {} table #{} ({})", "at".dimmed(), loc.table_index, loc.table);
            }
        }
    }

    if report.schema_groups.len() > 1 {
        println!();
        println!("{}", "Schema groups:".bold());
        for group in &report.schema_groups {
            println!("  {} {}", &group.fingerprint[..12], group.tables.join(", "));
        }
    }

    println!();
}

/// Generate a markdown report
fn generate_markdown_report(report: &Report) -> String {
    let mut md = String::new();

    md.push_str("# Schema Consistency Report\n\n");
    md.push_str(&format!("**Version:** {}\n\n", report.version));
    md.push_str(&format!("**Generated:** {}\n\n", report.timestamp));

    md.push_str("## Result\n\n");
    md.push_str("| Check | Passed |\n");
    md.push_str("|-------|--------|\n");
    md.push_str(&format!("| Same column names | {} |\n", report.result.same_col_names));
    if let Some(order) = report.result.same_col_order {
        md.push_str(&format!("| Same column order | {} |\n", order));
    }
    md.push_str(&format!("| Same dtypes | {} |\n\n", report.result.same_dtypes));

    if let Some(error) = &report.result.error {
        md.push_str(&format!("**Error:** {}\n\n", error));
    }

    md.push_str("## Summary\n\n");
    md.push_str(&format!("- Tables checked: {}\n", report.summary.tables_checked));
    md.push_str(&format!("- Errors: {}\n", report.summary.errors));
    md.push_str(&format!("- Warnings: {}\n", report.summary.warnings));
    md.push_str(&format!("- Info: {}\n\n", report.summary.info));

    if !report.diagnostics.is_empty() {
        md.push_str("## Diagnostics\n\n");

        for diag in &report.diagnostics {
            md.push_str(&format!("### {} ({})\n\n", diag.code, diag.severity));
            md.push_str(&format!("{}\n\n", diag.message));

            if let Some(loc) = &diag.location {
                md.push_str(&format!("**Table:** `{}` (#{})", loc.table, loc.table_index));
                if let Some(column) = &loc.column {
                    md.push_str(&format!(", **Column:** `{}`", column));
                }
                md.push_str("\n\n");
            }

            if let (Some(expected), Some(actual)) = (&diag.expected, &diag.actual) {
                md.push_str(&format!("**Expected:** `{}`\n\n", expected));
                md.push_str(&format!("**Actual:** `{}`\n\n", actual));
            }
        }
    }

    md
}

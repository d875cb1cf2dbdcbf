//! ByteForge CLI
//!
//! Command-line interface for inspecting and creating CSV data tables.

use anyhow::{Context, Result, bail};
use byteforge::environment::{CsvTable, Environment};
use byteforge::template::{DEFAULT_ASSET_NAME, create_asset};
use byteforge::{CsvConfiguration, LineEnding};
use clap::{Parser, Subcommand, ValueEnum};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "byteforge")]
#[command(about = "Inspect and create CSV data tables for Unity projects")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the records of a CSV file
    Dump {
        /// Input CSV file path
        #[arg(short, long)]
        input: PathBuf,

        /// Reader configuration (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Treat the first record as data
        #[arg(long)]
        no_header: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },

    /// Create a new CSV asset from the template
    New {
        /// Target directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// File name without extension
        #[arg(short, long, default_value = DEFAULT_ASSET_NAME)]
        name: String,

        /// Line ending (unix, windows, mac)
        #[arg(short, long)]
        line_ending: Option<String>,
    },

    /// Read CSV files completely and report their shape
    Check {
        /// Input CSV file or directory
        #[arg(short, long)]
        input: PathBuf,

        /// Reader configuration (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Yaml,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Dump {
            input,
            config,
            no_header,
            format,
        } => dump_command(input, config, no_header, format),
        Commands::New {
            dir,
            name,
            line_ending,
        } => new_command(dir, name, line_ending),
        Commands::Check { input, config } => check_command(input, config),
    }
}

fn load_config(path: Option<&Path>) -> Result<CsvConfiguration> {
    match path {
        Some(path) => CsvConfiguration::from_yaml_path(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(CsvConfiguration::default()),
    }
}

fn dump_command(
    input: PathBuf,
    config: Option<PathBuf>,
    no_header: bool,
    format: Format,
) -> Result<()> {
    let mut config = load_config(config.as_deref())?;
    if no_header {
        config = config.with_header_record(false);
    }
    debug!(input = %input.display(), ?format, "dumping table");

    let table = CsvTable::load(&input, &config)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let output = match format {
        Format::Table => render_table(&table),
        Format::Yaml => render_yaml(&table)?,
    };
    print!("{}", output);

    Ok(())
}

fn new_command(dir: PathBuf, name: String, line_ending: Option<String>) -> Result<()> {
    let line_ending = match line_ending.as_deref() {
        Some(name) => match LineEnding::from_name(name) {
            Some(line_ending) => line_ending,
            None => bail!("Unknown line ending: {}. Supported: unix, windows, mac", name),
        },
        None => LineEnding::default(),
    };

    let path = create_asset(&dir, &name, line_ending)
        .with_context(|| format!("Failed to create asset in {}", dir.display()))?;
    println!("{}", path.display());

    Ok(())
}

fn check_command(input: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config.as_deref())?;

    if input.is_file() {
        let table = CsvTable::load(&input, &config)
            .with_context(|| format!("Failed to read {}", input.display()))?;
        println!("{}", describe(&input, &table));
        return Ok(());
    }

    let mut env = Environment::with_config(config);
    env.load(&input)
        .with_context(|| format!("Failed to scan {}", input.display()))?;

    for (path, table) in env.tables() {
        println!("{}", describe(path, table));
    }
    for (path, error) in env.failures() {
        println!("{}: {}", path.display(), error);
    }

    if !env.failures().is_empty() {
        bail!(
            "{} of {} files failed to load",
            env.failures().len(),
            env.failures().len() + env.len()
        );
    }

    Ok(())
}

fn describe(path: &Path, table: &CsvTable) -> String {
    let width = match table.width_range() {
        Some((min, max)) if min == max => format!("{} fields", min),
        Some((min, max)) => format!("{}-{} fields", min, max),
        None => "no data".to_string(),
    };
    format!(
        "{}: {} columns, {} records, {}",
        path.display(),
        table.headers.len(),
        table.rows.len(),
        width
    )
}

/// Single-line, column-aligned rendering with the header first
fn render_table(table: &CsvTable) -> String {
    let rows: Vec<Vec<String>> = std::iter::once(&table.headers)
        .filter(|headers| !headers.is_empty())
        .chain(&table.rows)
        .map(|row| row.iter().map(|field| escape(field)).collect())
        .collect();

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0; columns];
    for row in &rows {
        for (i, field) in row.iter().enumerate() {
            widths[i] = widths[i].max(field.chars().count());
        }
    }

    let mut out = String::new();
    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, field)| format!("{:<width$}", field, width = widths[i]))
            .collect();
        out.push_str(line.join(" | ").trim_end());
        out.push('\n');
    }
    out
}

fn escape(field: &str) -> String {
    field.replace('\r', "\\r").replace('\n', "\\n")
}

/// Records as YAML mappings keyed by header, or sequences without one
fn render_yaml(table: &CsvTable) -> Result<String> {
    if table.headers.is_empty() {
        return Ok(serde_yaml::to_string(&table.rows)?);
    }

    let records: Vec<IndexMap<&str, &str>> = table
        .rows
        .iter()
        .map(|row| {
            table
                .headers
                .iter()
                .zip(row)
                .map(|(name, value)| (name.as_str(), value.as_str()))
                .collect()
        })
        .collect();

    Ok(serde_yaml::to_string(&records)?)
}

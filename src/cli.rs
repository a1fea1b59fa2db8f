//! circbuf - fixed-capacity circular buffer toolkit
//!
//! Demonstrates the buffer API and saves/inspects persisted `i64` buffers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{Config, StorageFormat};
use crate::demo::{self, DemoSection};
use crate::telemetry::{init_tracing, init_tracing_verbose};
use crate::RingBuffer;

#[derive(Parser)]
#[command(name = "circbuf")]
#[command(about = "Fixed-capacity circular buffer: demo, save and inspect")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Verbose mode (debug logging to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

/// Output format for `inspect`
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through the buffer operations
    #[command(alias = "d")]
    Demo {
        /// Run a single section instead of all of them
        #[arg(short, long, value_enum)]
        section: Option<DemoSection>,

        /// Capacity for the basic walkthrough (overrides config)
        #[arg(long)]
        capacity: Option<usize>,
    },

    /// Push values into a new buffer and save it
    #[command(alias = "s")]
    Save {
        /// Destination file
        file: PathBuf,

        /// Buffer capacity
        #[arg(short = 'n', long)]
        capacity: usize,

        /// Encoding (defaults to storage.format from config)
        #[arg(short, long, value_enum)]
        format: Option<StorageFormat>,

        /// Values to push, oldest first
        #[arg(allow_negative_numbers = true)]
        values: Vec<i64>,
    },

    /// Load a saved buffer and print its contents
    #[command(alias = "i")]
    Inspect {
        /// File to load
        file: PathBuf,

        /// Encoding (defaults to storage.format from config)
        #[arg(short, long, value_enum)]
        format: Option<StorageFormat>,

        /// Output format for machine consumption
        #[arg(long, value_enum, default_value = "text")]
        output_format: OutputFormat,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        init_tracing_verbose();
    } else {
        init_tracing();
    }
    if cli.no_color {
        colored::control::set_override(false);
    }

    let mut config = Config::load(cli.config.as_deref())?;
    config.verbose = cli.verbose;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Demo { section, capacity } => {
            if let Some(capacity) = capacity {
                config.demo.capacity = capacity;
                config.validate()?;
            }
            demo::run(section, &config, &mut out)?;
        }
        Commands::Save {
            file,
            capacity,
            format,
            values,
        } => {
            let format = format.unwrap_or(config.storage.format);
            let buffer = save(&file, capacity, format, values)?;
            writeln!(
                out,
                "Saved {} of {} elements to {} ({})",
                buffer.len(),
                buffer.capacity(),
                file.display(),
                format
            )?;
        }
        Commands::Inspect {
            file,
            format,
            output_format,
        } => {
            let format = format.unwrap_or(config.storage.format);
            let buffer = load(&file, format)
                .with_context(|| format!("Failed to inspect {}", file.display()))?;
            report(&buffer, output_format, &mut out)?;
        }
    }

    Ok(())
}

fn save(
    path: &Path,
    capacity: usize,
    format: StorageFormat,
    values: Vec<i64>,
) -> Result<RingBuffer<i64>> {
    let mut buffer = RingBuffer::new(capacity)?;
    buffer.extend(values);
    match format {
        StorageFormat::Binary => buffer.save_binary(path)?,
        StorageFormat::Text => buffer.save_text(path)?,
    }
    Ok(buffer)
}

fn load(path: &Path, format: StorageFormat) -> Result<RingBuffer<i64>> {
    let buffer = match format {
        StorageFormat::Binary => RingBuffer::load_binary(path)?,
        StorageFormat::Text => RingBuffer::load_text(path)?,
    };
    Ok(buffer)
}

fn report<W: Write>(buffer: &RingBuffer<i64>, format: OutputFormat, out: &mut W) -> Result<()> {
    match format {
        OutputFormat::Text => {
            let show = |item: crate::Result<&i64>| match item {
                Ok(v) => v.to_string(),
                Err(_) => "-".to_string(),
            };
            writeln!(out, "capacity: {}", buffer.capacity())?;
            writeln!(out, "len: {}", buffer.len())?;
            writeln!(out, "full: {}", buffer.is_full())?;
            writeln!(out, "front: {}", show(buffer.front()))?;
            writeln!(out, "back: {}", show(buffer.back()))?;
            let items: Vec<String> = buffer.iter().map(ToString::to_string).collect();
            writeln!(out, "items: {}", items.join(" "))?;
        }
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "capacity": buffer.capacity(),
                "len": buffer.len(),
                "full": buffer.is_full(),
                "front": buffer.front().ok(),
                "back": buffer.back().ok(),
                "items": buffer.to_vec(),
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
        }
    }
    Ok(())
}

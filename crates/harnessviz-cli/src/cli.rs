//! Command-line interface for the harnessviz utility
//!
//! Reads a harness description (YAML or JSON), builds the harness and writes
//! a summary, the bill of materials or the Graphviz node declarations.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use harnessviz::bom::Bom;
use harnessviz::core::logging::{init_logging, LOG_FORMAT_ENV, LOG_LEVEL_ENV};
use harnessviz::model::{Harness, HarnessDocument};

/// Harnessviz - Validate wiring harness descriptions and derive their documentation
#[derive(Parser)]
#[command(name = "harnessviz")]
#[command(about = "A Rust utility to validate wiring harness descriptions and export BOMs and node markup")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a harness description and summarize it
    Check {
        /// Harness description (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Export the bill of materials
    Bom {
        /// Harness description (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = BomFormat::Tsv)]
        format: BomFormat,
    },

    /// Export Graphviz node declarations for every connector and cable
    Nodes {
        /// Harness description (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// BOM output formats
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum BomFormat {
    /// Tab-separated values with a header row
    #[default]
    Tsv,
    /// JSON array of entries
    Json,
}

/// Per-entity summary printed by `check --json`
#[derive(Serialize)]
struct Summary<'a> {
    title: Option<&'a str>,
    connectors: Vec<EntitySummary<'a>>,
    cables: Vec<EntitySummary<'a>>,
    mates: usize,
    bom_entries: usize,
}

#[derive(Serialize)]
struct EntitySummary<'a> {
    designator: &'a str,
    /// Pins for a connector, wires for a cable
    count: usize,
    /// Populated pins or recorded connections
    connected: usize,
}

/// Main CLI application
#[derive(Default)]
pub struct HarnessvizApp;

impl HarnessvizApp {
    pub fn new() -> Self {
        Self
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        // environment variables take precedence over flags
        let log_level = std::env::var(LOG_LEVEL_ENV)
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| cli.log_level.as_str().to_string());
        let log_format = std::env::var(LOG_FORMAT_ENV)
            .ok()
            .unwrap_or_else(|| cli.log_format.as_str().to_string());

        if let Err(e) = init_logging(Some(&log_level), Some(&log_format)) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Harnessviz v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Check { input, json } => self.check_command(input, json, cli.verbose),
            Commands::Bom {
                input,
                output,
                format,
            } => self.bom_command(input, output, format, cli.verbose),
            Commands::Nodes { input, output } => self.nodes_command(input, output, cli.verbose),
        }
    }

    /// Handle the check command
    fn check_command(&self, input: Option<PathBuf>, json: bool, verbose: bool) -> Result<()> {
        let harness = self.load_harness(input, verbose)?;
        let bom = Bom::from_harness(&harness)?;

        let summary = Summary {
            title: harness.metadata.title(),
            connectors: harness
                .connectors()
                .values()
                .map(|c| EntitySummary {
                    designator: &c.designator,
                    count: c.pincount,
                    connected: c.populated_count(),
                })
                .collect(),
            cables: harness
                .cables()
                .values()
                .map(|c| EntitySummary {
                    designator: &c.designator,
                    count: c.wirecount,
                    connected: c.connections().len(),
                })
                .collect(),
            mates: harness.mates().len(),
            bom_entries: bom.len(),
        };

        if json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            return Ok(());
        }

        match summary.title {
            Some(title) => println!("✓ Valid harness: {}", title),
            None => println!("✓ Valid harness"),
        }
        for connector in &summary.connectors {
            println!(
                "  {:<12} {} pins, {} populated",
                connector.designator, connector.count, connector.connected
            );
        }
        for cable in &summary.cables {
            println!(
                "  {:<12} {} wires, {} connections",
                cable.designator, cable.count, cable.connected
            );
        }
        println!();
        println!(
            "Total: {} connectors, {} cables, {} mates, {} BOM entries",
            summary.connectors.len(),
            summary.cables.len(),
            summary.mates,
            summary.bom_entries
        );
        Ok(())
    }

    /// Handle the bom command
    fn bom_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        format: BomFormat,
        verbose: bool,
    ) -> Result<()> {
        let harness = self.load_harness(input, verbose)?;
        let bom = Bom::from_harness(&harness)?;
        if verbose {
            eprintln!("Collected {} BOM entries", bom.len());
        }

        let content = match format {
            BomFormat::Tsv => bom.to_tsv(),
            BomFormat::Json => serde_json::to_string_pretty(bom.entries())?,
        };
        self.write_output(output, &content)
    }

    /// Handle the nodes command
    fn nodes_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        let harness = self.load_harness(input, verbose)?;
        let nodes = harnessviz::render_nodes(&harness)?;
        self.write_output(output, &nodes)
    }

    fn load_harness(&self, input: Option<PathBuf>, verbose: bool) -> Result<Harness> {
        let json = input
            .as_deref()
            .and_then(Path::extension)
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let document = parse_document(&content, json)?;
        let harness = Harness::from_document(document)?;
        info!(
            connectors = harness.connectors().len(),
            cables = harness.cables().len(),
            "Loaded harness"
        );
        Ok(harness)
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, &stdout_content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
                debug!(path = %path.display(), bytes = stdout_content.len(), "Wrote output");
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

/// Parse a harness document from JSON or YAML
///
/// YAML merge keys (`<<`) are resolved before the document is read, so
/// anchors can serve as templates.
pub fn parse_document(content: &str, json: bool) -> Result<HarnessDocument> {
    if json {
        return serde_json::from_str(content).context("Failed to parse JSON harness description");
    }
    let mut value: serde_yaml::Value =
        serde_yaml::from_str(content).context("Failed to parse YAML harness description")?;
    if value.is_null() {
        return Ok(HarnessDocument::default());
    }
    value
        .apply_merge()
        .context("Failed to resolve YAML merge keys")?;
    serde_yaml::from_value(value).context("Invalid harness description")
}

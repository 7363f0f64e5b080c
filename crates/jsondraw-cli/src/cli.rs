//! Command-line interface for the jsondraw utility
//!
//! Reads a JSON diagram description and writes a draw.io document.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use jsondraw::drawio::{
    BuildReport, DiagramBuilder, DiagramSpec, DocumentConfig, StyleRegistry, FALLBACK_STYLE,
};

/// Input path used when none is given
pub const DEFAULT_INPUT: &str = "data/data.json";

/// Output path used when none is given
pub const DEFAULT_OUTPUT: &str = "architecture_diagram.json_based.drawio";

/// jsondraw - Convert JSON diagram descriptions to draw.io files
#[derive(Parser)]
#[command(name = "jsondraw")]
#[command(about = "Convert JSON diagram descriptions into draw.io documents")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
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
    /// Convert a JSON description to a draw.io file
    Convert {
        /// JSON description to read (use - for stdin)
        #[arg(short, long, default_value = DEFAULT_INPUT)]
        input: PathBuf,

        /// draw.io file to write (use - for stdout)
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        #[command(flatten)]
        document: DocumentArgs,

        /// Fail without writing output if any item would be skipped
        #[arg(long)]
        strict: bool,
    },

    /// Check that every item of a description can be placed
    Validate {
        /// JSON description to read (use - for stdin)
        #[arg(short, long, default_value = DEFAULT_INPUT)]
        input: PathBuf,

        /// Directory that relative image paths are resolved against
        #[arg(long)]
        asset_dir: Option<PathBuf>,
    },

    /// Show the built-in shape styles
    Styles {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Document settings shared by commands that produce a document
#[derive(clap::Args, Debug, Clone, Default, PartialEq)]
pub struct DocumentArgs {
    /// Identifier of the diagram page
    #[arg(long)]
    pub diagram_id: Option<String>,

    /// Name of the diagram page
    #[arg(long)]
    pub page_name: Option<String>,

    /// Page width in pixels
    #[arg(long)]
    pub page_width: Option<u32>,

    /// Page height in pixels
    #[arg(long)]
    pub page_height: Option<u32>,

    /// Directory that relative image paths are resolved against
    #[arg(long)]
    pub asset_dir: Option<PathBuf>,

    /// Set the file's modified timestamp to the current time
    #[arg(long)]
    pub stamp_modified: bool,
}

impl DocumentArgs {
    /// Apply these flags on top of a base configuration
    pub fn apply(&self, mut config: DocumentConfig) -> DocumentConfig {
        if let Some(id) = &self.diagram_id {
            config.diagram_id = id.clone();
        }
        if let Some(name) = &self.page_name {
            config.diagram_name = name.clone();
        }
        if let Some(width) = self.page_width {
            config.graph_model.page_width = width;
        }
        if let Some(height) = self.page_height {
            config.graph_model.page_height = height;
        }
        if self.stamp_modified {
            config.header.stamp_now();
        }
        config
    }
}

#[derive(Serialize)]
struct StyleEntry<'a> {
    shape_type: &'a str,
    style: &'a str,
}

#[derive(Serialize)]
struct StyleListing<'a> {
    styles: Vec<StyleEntry<'a>>,
    fallback: &'a str,
}

/// Main CLI application
pub struct JsondrawApp {
    config: DocumentConfig,
}

impl JsondrawApp {
    /// Create a new application instance with default document settings
    pub fn new() -> Self {
        Self::with_config(DocumentConfig::default())
    }

    /// Create a new application instance with a base document config
    pub fn with_config(config: DocumentConfig) -> Self {
        Self { config }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        if cli.verbose {
            eprintln!("jsondraw v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Convert {
                input,
                output,
                document,
                strict,
            } => self.convert_command(input, output, &document, strict, cli.verbose),
            Commands::Validate { input, asset_dir } => {
                self.validate_command(input, asset_dir, cli.verbose)
            }
            Commands::Styles { json } => self.styles_command(json),
        }
    }

    /// Handle the convert command
    fn convert_command(
        &self,
        input: PathBuf,
        output: PathBuf,
        document: &DocumentArgs,
        strict: bool,
        verbose: bool,
    ) -> Result<()> {
        let spec = self.read_input(&input)?;
        if verbose {
            eprintln!("Read {} items from {}", spec.item_count(), input.display());
        }

        let config = document.apply(self.config.clone());
        let (builder, report) = Self::build(config, document.asset_dir.clone(), &spec);

        Self::print_skipped(&report);
        if strict && !report.is_clean() {
            bail!(
                "{} item(s) could not be placed; no output written",
                report.skipped_count()
            );
        }

        if is_stdio(&output) {
            let xml = builder.finish()?;
            let mut stdout = io::stdout();
            stdout.write_all(xml.as_bytes())?;
            stdout.flush()?;
        } else {
            let saved = builder.save(&output)?;
            info!("{} has been created successfully", saved.path.display());
            if verbose {
                eprintln!(
                    "Wrote {} cells ({} bytes) to {}",
                    saved.cells,
                    saved.bytes,
                    saved.path.display()
                );
            }
        }
        Ok(())
    }

    /// Handle the validate command
    fn validate_command(
        &self,
        input: PathBuf,
        asset_dir: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        let spec = self.read_input(&input)?;
        let (_, report) = Self::build(self.config.clone(), asset_dir, &spec);

        if verbose {
            eprintln!(
                "{} shapes, {} connectors, {} annotations",
                report.shapes.len(),
                report.connectors.len(),
                report.annotations.len()
            );
        }

        if report.is_clean() {
            println!("✓ Valid description: {} elements", report.added_count());
            Ok(())
        } else {
            println!(
                "✗ {} of {} items would be skipped",
                report.skipped_count(),
                spec.item_count()
            );
            for reason in &report.skipped {
                println!("  - {}", reason);
            }
            Err(anyhow!("Description has items that cannot be placed"))
        }
    }

    /// Handle the styles command
    fn styles_command(&self, json: bool) -> Result<()> {
        let registry = StyleRegistry::new();

        if json {
            let listing = StyleListing {
                styles: registry
                    .iter()
                    .map(|(shape_type, style)| StyleEntry { shape_type, style })
                    .collect(),
                fallback: FALLBACK_STYLE,
            };
            println!("{}", serde_json::to_string_pretty(&listing)?);
        } else {
            println!("Built-in shape styles:");
            for (shape_type, style) in registry.iter() {
                println!("  {:<10} {}", shape_type, style);
            }
            println!("  {:<10} {}", "(other)", FALLBACK_STYLE);
            println!("  {:<10} {}", "image", "shape=image;image=<data url>;");
        }
        Ok(())
    }

    fn build(
        config: DocumentConfig,
        asset_dir: Option<PathBuf>,
        spec: &DiagramSpec,
    ) -> (DiagramBuilder, BuildReport) {
        let mut builder = DiagramBuilder::with_config(config);
        if let Some(dir) = asset_dir {
            builder = builder.with_asset_root(dir);
        }
        let report = builder.build(spec);
        (builder, report)
    }

    fn print_skipped(report: &BuildReport) {
        for reason in &report.skipped {
            eprintln!("Skipped {}", reason);
        }
    }

    /// Read a description from a file or stdin
    pub fn read_input(&self, input: &Path) -> Result<DiagramSpec> {
        if is_stdio(input) {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read description from stdin")?;
            Ok(DiagramSpec::from_json_str(&content)?)
        } else {
            Ok(DiagramSpec::from_path(input)?)
        }
    }
}

impl Default for JsondrawApp {
    fn default() -> Self {
        Self::new()
    }
}

fn is_stdio(path: &Path) -> bool {
    path.to_string_lossy() == "-"
}

//! CLI argument parsing for pdfstitch.
//!
//! This module defines the command-line interface structure using `clap`.
//! It handles argument parsing, validation, and help text generation.

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use pdfstitch::config::{
    CompressionLevel, Config, DEFAULT_OUTPUT, OverwriteMode, parse_thumbnail_height,
};
use pdfstitch::error::{Result, StitchError};

/// Select, preview, reorder and merge PDF files.
///
/// pdfstitch keeps an ordered list of PDF files, shows each one with its
/// page count and thumbnail size, lets you reorder or drop entries, and
/// merges the list into a single document.
#[derive(Parser, Debug)]
#[command(name = "pdfstitch")]
#[command(version)]
#[command(about = "Select, preview, reorder and merge PDF files", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input PDF files or glob patterns (in order)
    ///
    /// Files that are not PDFs, or that repeat an already selected
    /// name and size, are skipped.
    ///
    /// Examples:
    ///   pdfstitch a.pdf b.pdf -o book.pdf
    ///   pdfstitch 'chapters/*.pdf' --list
    #[arg(value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Read additional input paths from a file (one per line, '-' for stdin)
    ///
    /// Lines starting with '#' are treated as comments.
    #[arg(short = 'L', long, value_name = "FILE")]
    pub input_list: Option<PathBuf>,

    /// Output PDF file path
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Run a command against the list before merging (repeatable)
    ///
    /// Positions are 1-based.
    ///
    /// Examples:
    ///   -e 'mv 2 1' -e 'rm 3'
    #[arg(short, long = "exec", value_name = "COMMAND")]
    pub exec: Vec<String>,

    /// Read commands from stdin after the initial selection
    ///
    /// Type 'help' in the session for the list of commands.
    #[arg(short, long)]
    pub interactive: bool,

    /// Dry run - show what would be merged without creating output
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the list with page counts and thumbnail sizes
    #[arg(short, long)]
    pub list: bool,

    /// Print the list as JSON
    #[arg(long)]
    pub json: bool,

    /// Write the list as an HTML fragment to this path
    #[arg(long, value_name = "FILE")]
    pub html: Option<PathBuf>,

    /// Skip preview generation when listing
    #[arg(long)]
    pub no_preview: bool,

    /// Thumbnail height in pixels
    #[arg(long, value_name = "PX", default_value = "160", value_parser = parse_thumbnail_height)]
    pub thumbnail_height: f32,

    /// Compression level for output PDF
    ///
    /// - none: No compression
    /// - standard: Compress streams (default)
    /// - maximum: Drop unused objects, then compress
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Force overwrite of existing output file without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite existing output file
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose output - show statistics and debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns an error if the compression level is unknown or the
    /// resulting configuration is inconsistent.
    pub fn to_config(&self) -> Result<Config> {
        let compression = CompressionLevel::from_str(&self.compression)?;

        // Determine overwrite mode
        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let config = Config {
            inputs: self.inputs.clone(),
            input_list: self.input_list.clone(),
            output: self.output.clone(),
            exec: self.exec.clone(),
            interactive: self.interactive,
            dry_run: self.dry_run,
            list: self.list,
            json: self.json,
            html: self.html.clone(),
            no_preview: self.no_preview,
            thumbnail_height: self.thumbnail_height,
            compression,
            overwrite_mode,
            quiet: self.quiet,
            verbose: self.verbose,
        };

        // Validate the configuration
        config.validate().map_err(|e| {
            StitchError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }
}

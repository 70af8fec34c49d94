//! Configuration module for pdfstitch.
//!
//! This module holds the validated, normalized configuration that drives a
//! session. It handles:
//! - Validation of argument combinations
//! - Application of defaults
//! - Parsing of option values

use anyhow::{Context, Result, bail};

use crate::StitchError;
use std::{path::PathBuf, str::FromStr};

/// Default name of the merged document.
pub const DEFAULT_OUTPUT: &str = "merged.pdf";

/// Default preview thumbnail height in pixels.
pub const DEFAULT_THUMBNAIL_HEIGHT: f32 = 160.0;

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// No compression - streams are written as they were read.
    None,
    /// Compress uncompressed streams.
    #[default]
    Standard,
    /// Drop unreferenced objects, then compress.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = StitchError;
    /// Parse compression level from string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string doesn't match a valid compression level.
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(StitchError::InvalidConfig {
                message: format!(
                    "Invalid compression level: {s}. Must be one of: none, standard, maximum"
                ),
            }),
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Parse a thumbnail height in pixels.
///
/// # Errors
///
/// Returns an error unless `s` is a finite number greater than zero.
pub fn parse_thumbnail_height(s: &str) -> Result<f32> {
    let height: f32 = s
        .trim()
        .parse()
        .with_context(|| format!("Invalid thumbnail height: {s}"))?;

    if !height.is_finite() || height <= 0.0 {
        bail!("Thumbnail height must be a positive number, got {s}");
    }
    Ok(height)
}

/// Complete configuration for a session.
///
/// Derived and validated from CLI arguments.
#[derive(Debug, Clone)]
pub struct Config {
    /// Files or glob patterns to select, in order.
    pub inputs: Vec<String>,

    /// File with additional inputs, one per line.
    pub input_list: Option<PathBuf>,

    /// Output PDF file path.
    pub output: PathBuf,

    /// Commands to run against the list before finishing.
    pub exec: Vec<String>,

    /// Read commands from stdin after the initial selection.
    pub interactive: bool,

    /// Dry run mode - show what would be merged without writing.
    pub dry_run: bool,

    /// Print the file list with previews.
    pub list: bool,

    /// Print the file list as JSON.
    pub json: bool,

    /// Write the file list as HTML to this path.
    pub html: Option<PathBuf>,

    /// Skip preview generation.
    pub no_preview: bool,

    /// Preview thumbnail height in pixels.
    pub thumbnail_height: f32,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Verbose output mode.
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            input_list: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
            exec: Vec::new(),
            interactive: false,
            dry_run: false,
            list: false,
            json: false,
            html: None,
            no_preview: false,
            thumbnail_height: DEFAULT_THUMBNAIL_HEIGHT,
            compression: CompressionLevel::default(),
            overwrite_mode: OverwriteMode::default(),
            quiet: false,
            verbose: false,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// Checks for logical inconsistencies and invalid combinations.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Nothing would be selected and no commands would run
    /// - Verbose and quiet modes are both enabled
    /// - The thumbnail height is not positive
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty()
            && self.input_list.is_none()
            && self.exec.is_empty()
            && !self.interactive
        {
            bail!("No input files specified (use --interactive to start with an empty list)");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if !self.thumbnail_height.is_finite() || self.thumbnail_height <= 0.0 {
            bail!(
                "Thumbnail height must be a positive number, got {}",
                self.thumbnail_height
            );
        }

        Ok(())
    }

    /// Whether the list should be rendered at all.
    pub fn wants_listing(&self) -> bool {
        self.list || self.json || self.html.is_some()
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }
}

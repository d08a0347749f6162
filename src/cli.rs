//! Command-line argument parsing
//!
//! Supports:
//! - Replaying a session script
//! - Seeding a single text when no script is given
//! - Soft wrapping and JSON output

use clap::Parser;
use std::path::PathBuf;

/// Replay editing sessions against styled text
#[derive(Parser, Debug)]
#[command(name = "caret", version, about = "Replay editing sessions against styled text")]
pub struct CliArgs {
    /// Session script (YAML) to replay
    #[arg(value_name = "SCRIPT")]
    pub script: Option<PathBuf>,

    /// Text of instance 1 when the script declares no texts
    #[arg(short, long)]
    pub text: Option<String>,

    /// Soft-wrap display lines after N graphemes
    #[arg(long, value_name = "N")]
    pub wrap: Option<usize>,

    /// Print the final state as JSON
    #[arg(long)]
    pub json: bool,

    /// Config file to use instead of the one in the config directory
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub script: Option<PathBuf>,
    pub seed_text: Option<String>,
    /// Wrap width in graphemes, None for no wrapping
    pub wrap: Option<usize>,
    pub output: OutputFormat,
    pub config_path: Option<PathBuf>,
}

impl CliArgs {
    /// Convert parsed CLI args into a run configuration
    pub fn into_config(self) -> Result<RunConfig, String> {
        if self.script.is_none() && self.text.is_none() {
            return Err("Nothing to do: pass a SCRIPT or --text".to_string());
        }
        if self.wrap == Some(0) {
            return Err("--wrap must be at least 1".to_string());
        }

        Ok(RunConfig {
            script: self.script,
            seed_text: self.text,
            wrap: self.wrap,
            output: if self.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            config_path: self.config,
        })
    }
}

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

pub mod commands;
pub mod output;

#[derive(Parser)]
#[command(
    name = "jsurface",
    version,
    about = "Extract the public API surface of Java source files"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (default: text, or `format` from the config file)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Include only files matching this glob
    #[arg(long, global = true)]
    pub include: Vec<String>,

    /// Exclude files matching this glob
    #[arg(long, global = true)]
    pub exclude: Vec<String>,

    /// Source root relative to the project (repeatable; default: src/main/java)
    #[arg(long = "source-root", global = true)]
    pub source_roots: Vec<String>,

    /// Path to config file (default: .jsurface/config.toml or jsurface.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract the types declared in a single Java file
    Extract {
        /// Java source file
        file: PathBuf,
    },

    /// Extract every Java file under the project's source roots
    Scan {
        /// Project path (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Exit with status 1 when any file had parse errors
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Compact,
}

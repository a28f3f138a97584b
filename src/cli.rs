//! CLI definitions for mjbridge.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// mjbridge CLI.
#[derive(Debug, Parser)]
#[command(name = "mjbridge")]
#[command(about = "Generate Midjourney images through a Discord browser session")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/mjbridge.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Send a prompt and save the four images of the resulting grid
    Imagine {
        /// Prompt text passed to /imagine
        prompt: String,

        /// Give up after this many seconds (default: wait until Ctrl-C)
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Directory for the split images (overrides storage.output_dir)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Open the channel and log in, priming the browser profile
    Login,

    /// Split a local grid image into its four quadrants
    Split {
        /// Path to the grid image
        image: PathBuf,

        /// Directory for the split images (overrides storage.output_dir)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

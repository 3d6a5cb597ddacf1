//! Command line argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(name = "keybrame-console")]
#[command(about = "Terminal admin console for the Keybrame overlay server")]
pub struct Cli {
    /// Keybrame server URL (overrides the config file)
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Path to the console configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease logging verbosity (only errors)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone, Debug, PartialEq)]
pub enum Commands {
    /// List keybindings in priority order
    List,
    /// List uploaded images
    Images,
    /// Upload one or more image files
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Delete an uploaded image
    DeleteImage { name: String },
    /// Export the server configuration as JSON
    Export {
        /// Output file (defaults to `export_path` from the config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import a configuration JSON file
    Import { path: PathBuf },
    /// Ask the server to reload its configuration
    Reload,
    /// Show or change server settings
    Settings {
        #[arg(long)]
        port: Option<String>,
        #[arg(long)]
        default_image: Option<String>,
    },
    /// Restart the server
    Restart,
    /// Shut the server down
    Shutdown,
    /// Print the server version
    Version,
    /// Stream real-time events until Ctrl+C
    Watch,
    /// Write the default console configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

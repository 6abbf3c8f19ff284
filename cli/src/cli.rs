use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "stagepost")]
#[command(about = "Stage file attachments for a draft post", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open a draft post and upload files to it
    Upload {
        /// Files to attach
        #[arg(long = "file", short = 'f', required = true)]
        files: Vec<PathBuf>,

        /// Title of the post
        #[arg(long, short = 't')]
        title: Option<String>,

        /// Body text of the post
        #[arg(long, short = 'b')]
        body: Option<String>,

        /// Stage the post belongs to
        #[arg(long, short = 's')]
        stage: Option<String>,

        /// Submit the post once every file is uploaded
        #[arg(long)]
        submit: bool,

        /// Retry, delete or preview files before finishing
        #[arg(long, short = 'I')]
        interactive: bool,

        /// Backend base URL, overriding the config file
        #[arg(long, env = "STAGEPOST_API_URL")]
        api_url: Option<String>,

        /// Bearer token, overriding the config file
        #[arg(long, env = "STAGEPOST_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
    /// Show or change the saved configuration
    Config {
        /// Save the backend base URL
        #[arg(long)]
        api_url: Option<String>,

        /// Save the bearer token
        #[arg(long)]
        token: Option<String>,

        /// Save the per-file size limit in megabytes
        #[arg(long)]
        max_size_mb: Option<u64>,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

//! `stagepost`: stage file attachments for a draft post from the terminal.

mod cli;
mod commands;
mod config;
mod output;
mod timing;

use anyhow::Result;
use clap::Parser as _;

use crate::cli::{Cli, Commands};
use crate::commands::{UploadArgs, generate_completions, run_config, run_upload};
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    timing::init_tracing(cli.verbose, cli.timing);

    match cli.command {
        Commands::Upload {
            files,
            title,
            body,
            stage,
            submit,
            interactive,
            api_url,
            token,
        } => {
            let config = Config::load()?.business_config(api_url, token);
            log::debug!("using backend {}", config.api_url());
            run_upload(
                config,
                UploadArgs {
                    files,
                    title,
                    body,
                    stage,
                    submit,
                    interactive,
                },
            )
            .await
        }
        Commands::Config {
            api_url,
            token,
            max_size_mb,
        } => run_config(api_url, token, max_size_mb),
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
    }
}

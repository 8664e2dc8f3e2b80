use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use strsync_cli::cli::commands::{cache, languages, providers, sync};
use strsync_cli::cli::{Args, Command};
use strsync_cli::{logging, output};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init(args.verbose);
    output::init(output::OutputConfig {
        quiet: args.quiet,
        ..output::OutputConfig::default()
    });

    match args.command {
        Some(Command::Languages { provider }) => {
            languages::print_supported_languages(provider.as_deref())?;
        }
        Some(Command::Providers { provider }) => {
            providers::print_providers(provider.as_deref())?;
        }
        Some(Command::Cache { command }) => {
            cache::run_cache(&command)?;
        }
        None => {
            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    debug!("interrupt received, cancelling");
                    on_interrupt.cancel();
                }
            });

            let options = sync::SyncCommandOptions {
                file: args.file,
                to: args.to,
                from: args.from,
                provider: args.provider,
                overwrite: args.overwrite,
                no_cache: args.no_cache,
            };
            sync::run_sync(options, cancel).await?;
        }
    }

    Ok(())
}

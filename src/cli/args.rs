use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "strsync")]
#[command(about = "Translate Android string resources into other languages")]
#[command(version)]
pub struct Args {
    /// Default resource file to translate (e.g. app/src/main/res/values/strings.xml)
    pub file: Option<PathBuf>,

    /// Target language codes, comma separated (e.g. fr,de,zh-rCN)
    #[arg(short = 't', long = "to", value_delimiter = ',')]
    pub to: Vec<String>,

    /// Source language code
    #[arg(short = 'f', long)]
    pub from: Option<String>,

    /// Translation provider key
    #[arg(short = 'p', long)]
    pub provider: Option<String>,

    /// Retranslate entries that already exist in the target files
    #[arg(short = 'o', long)]
    pub overwrite: bool,

    /// Disable cache
    #[arg(short = 'n', long)]
    pub no_cache: bool,

    /// Only print errors and warnings
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List supported language codes
    Languages {
        /// Only show languages this provider supports
        #[arg(short = 'p', long)]
        provider: Option<String>,
    },
    /// List translation providers and their credential status
    Providers {
        /// Show details for a specific provider
        provider: Option<String>,
    },
    /// Inspect or clear the translation cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Delete all cached translations
    Clear,
    /// Show where the cache lives and how many translations it holds
    Stats,
}

//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments, installs logging and resolves
//! the backend origin before dispatching to the selected command.

pub mod page;
pub mod say;
pub mod settings;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::cli::page::run_page;
use crate::cli::say::run_say;
use crate::cli::settings::{SettingError, SettingRegistry};
use crate::core::config::Config;
use crate::core::constants::BASE_URL_ENV;
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::init_tracing;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

#[derive(Parser)]
#[command(name = "jobi")]
#[command(version = VERSION)]
#[command(about = "A career-guidance chat widget for the terminal and the browser")]
#[command(
    long_about = "Jobi talks to a chat backend over HTTP. It checks that the backend is \
reachable, greets you, and then forwards each message to the backend's /chat endpoint, \
showing a typing placeholder until the reply arrives.\n\n\
Environment Variables:\n\
  JOBI_URL          Backend address (overridden by --url)\n\
  JOBI_LOG          Log filter, e.g. debug or jobi=trace (default: warn)\n\n\
Chat commands:\n\
  /quit             Cancel pending replies and exit\n\
  /close            Minimize the widget and exit"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend address; only its origin is used
    #[arg(short = 'u', long, global = true, value_name = "URL")]
    pub url: Option<String>,

    /// Write diagnostic logs to the specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive chat (default)
    Chat,
    /// Send one message and print the conversation
    Say {
        /// Message to send
        #[arg(trailing_var_arg = true)]
        words: Vec<String>,
        /// Print the widget as an HTML page instead of a transcript
        #[arg(long)]
        html: bool,
    },
    /// Probe the backend and write the widget as an HTML page
    Page {
        /// File to write instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Option<Vec<String>>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(args.log.as_deref())?;

    // Every widget type is single-threaded, so one thread drives everything.
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    match args.command.unwrap_or(Commands::Chat) {
        Commands::Set { key, value } => {
            let registry = SettingRegistry::new();
            match value.filter(|words| !words.is_empty()) {
                Some(words) => report(registry.set(&key, &words)),
                None => {
                    let config = Config::load()?;
                    println!("Current configuration:");
                    for line in registry.format_all(&config) {
                        println!("{line}");
                    }
                    Ok(())
                }
            }
        }
        Commands::Unset { key } => report(SettingRegistry::new().unset(&key)),
        command => {
            let config = Config::load()?;
            let env_url = std::env::var(BASE_URL_ENV).ok();
            let origin = config.resolve_origin(args.url.as_deref(), env_url.as_deref())?;
            debug!(%origin, "resolved backend origin");
            let settings = config.exchange_settings();

            match command {
                Commands::Say { words, html } => run_say(origin, settings, words, html).await,
                Commands::Page { output } => run_page(origin, settings, output).await,
                _ => run_chat(origin, settings).await,
            }
        }
    }
}

fn report(result: Result<String, SettingError>) -> Result<(), Box<dyn Error>> {
    match result {
        Ok(message) => {
            println!("{message}");
            Ok(())
        }
        Err(err) => {
            err.print();
            std::process::exit(err.exit_code());
        }
    }
}

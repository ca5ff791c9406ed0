//! zk-ssg - generate a static site from a zettelkasten

pub mod cli;
pub mod domain;
pub mod infra;
pub mod site;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{
    config::Config,
    handlers::{handle_completions, handle_config, handle_generate},
    Cli, Command,
};

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Command::Generate(args) => {
            let config = Config::load(cli.config.as_deref())?;
            handle_generate(args, config)
        }
        Command::Config(args) => handle_config(args, cli.config.as_deref()),
        Command::Completions(args) => handle_completions(args),
    }
}

/// Log to stderr, level chosen by -v flags unless RUST_LOG overrides it.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

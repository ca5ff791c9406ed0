//! CLI command definitions and handlers

pub mod config;
pub mod handlers;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// zk-ssg - generate a static site from a zettelkasten
#[derive(Parser, Debug)]
#[command(name = "zk-ssg", version, about, long_about = None)]
pub struct Cli {
    /// Config file (overrides the default location)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the site from the published zettels
    Generate(GenerateArgs),

    /// Show the effective configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `generate` command
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Zettelkasten folder (overrides the config file)
    #[arg(short = 'z', long)]
    pub zettelkasten: Option<PathBuf>,

    /// Site folder (overrides the config file)
    #[arg(short = 's', long)]
    pub site: Option<PathBuf>,

    /// Keep stale HTML files without prompting
    #[arg(long)]
    pub keep_stale: bool,

    /// Output format for the run summary
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `config` command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Print the config file path instead of the contents
    #[arg(long)]
    pub path: bool,
}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish)
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for programmatic consumption
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_parses_overrides() {
        let cli = Cli::try_parse_from([
            "zk-ssg",
            "-vv",
            "generate",
            "--zettelkasten",
            "/tmp/zk",
            "--site",
            "/tmp/site",
            "--keep-stale",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.zettelkasten.as_deref(), Some(std::path::Path::new("/tmp/zk")));
                assert!(args.keep_stale);
            }
            _ => panic!("expected the generate command"),
        }
    }
}

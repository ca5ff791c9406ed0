//! Command handlers wiring the CLI arguments to the pipeline.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::Command as ProcessCommand;

use anyhow::{Context, Result};
use clap::CommandFactory;
use tracing::warn;

use crate::cli::config::Config;
use crate::cli::{Cli, CompletionsArgs, ConfigArgs, GenerateArgs, OutputFormat};
use crate::domain::Patterns;
use crate::site::{self, ConfirmStale, GenerateReport, KeepAll, NoHighlight, StaleAction};

/// Asks on stdin what to do with each stale HTML file.
struct CliConfirm;

impl ConfirmStale for CliConfirm {
    fn confirm(&mut self, path: &Path) -> StaleAction {
        let stdin = io::stdin();
        loop {
            println!("stale HTML file: {}", path.display());
            print!("[k]eep, [t]rash, [o]pen: ");
            let _ = io::stdout().flush();

            let mut line = String::new();
            if stdin.lock().read_line(&mut line).is_err() {
                return StaleAction::Keep;
            }
            match line.trim().to_lowercase().as_str() {
                "" | "k" | "keep" => return StaleAction::Keep,
                "t" | "trash" => return StaleAction::Trash,
                "o" | "open" => return StaleAction::Open,
                _ => println!("unrecognized answer"),
            }
        }
    }

    fn open(&mut self, path: &Path) {
        let opener = if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        };
        if let Err(err) = ProcessCommand::new(opener).arg(path).status() {
            warn!("could not open {}: {err}", path.display());
        }
    }
}

/// Handles the `generate` command.
pub fn handle_generate(args: &GenerateArgs, mut config: Config) -> Result<()> {
    if let Some(dir) = &args.zettelkasten {
        config.zettelkasten_dir = dir.clone();
    }
    if let Some(dir) = &args.site {
        config.site_dir = dir.clone();
    }
    let patterns = Patterns::compile(&config.patterns)?;

    let report = if args.keep_stale {
        site::generate(&config, &patterns, &mut KeepAll, &NoHighlight)?
    } else {
        site::generate(&config, &patterns, &mut CliConfirm, &NoHighlight)?
    };

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Human => print_report(&report),
    }
    Ok(())
}

fn print_report(report: &GenerateReport) {
    println!(
        "Successfully generated {} HTML files from {} published zettels.",
        report.html_files, report.published
    );
    println!(
        "Converted {} internal links, copied {} attachments.",
        report.links_converted, report.attachments
    );
    for warning in &report.warnings {
        println!("warning: {warning}");
    }
    for path in &report.trashed {
        println!("moved to trash: {}", path.display());
    }
}

/// Handles the `config` command.
pub fn handle_config(args: &ConfigArgs, config_file: Option<&Path>) -> Result<()> {
    if args.path {
        let path = config_file
            .map(Path::to_path_buf)
            .unwrap_or_else(Config::config_path);
        println!("{}", path.display());
        return Ok(());
    }
    let config = Config::load(config_file)?;
    let rendered = toml::to_string_pretty(&config).context("failed to render configuration")?;
    print!("{rendered}");
    Ok(())
}

/// Handles the `completions` command.
pub fn handle_completions(args: &CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "zk-ssg", &mut io::stdout());
    Ok(())
}

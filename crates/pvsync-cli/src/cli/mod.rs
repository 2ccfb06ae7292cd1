//! CLI for pvsync.

mod commands;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pvsync_core::config::{self, PvsyncConfig, RetryConfig};
use pvsync_core::subdivision;
use std::path::PathBuf;

use commands::{
    run_codes, run_completions, run_fetch, run_normalize, run_pipeline, show_config, RunStatus,
};

/// Top-level CLI for pvsync.
#[derive(Debug, Parser)]
#[command(name = "pvsync")]
#[command(about = "Download scanned result sheets per subdivision and normalize their names", long_about = None)]
pub struct Cli {
    /// Use this config file instead of ~/.config/pvsync/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Overrides for the fetch stage.
#[derive(Debug, Clone, Default, Args)]
pub struct FetchArgs {
    /// Skip the first N subdivisions (resume a partial run).
    #[arg(long, value_name = "N")]
    pub skip: Option<usize>,

    /// Comma-separated subdivision codes to fetch instead of the configured list.
    #[arg(long, value_name = "CODES")]
    pub codes: Option<String>,

    /// Directory that receives one folder per subdivision.
    #[arg(long, value_name = "DIR")]
    pub source_root: Option<PathBuf>,

    /// Portal root URL.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Attempts per document, including the first.
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Pause after each successful download, in milliseconds.
    #[arg(long, value_name = "MS")]
    pub throttle_ms: Option<u64>,
}

/// Overrides for the normalize stage.
#[derive(Debug, Clone, Default, Args)]
pub struct NormalizeArgs {
    /// Tree to scan for downloaded sheets.
    #[arg(long, value_name = "DIR")]
    pub source_root: Option<PathBuf>,

    /// Root of the normalized archive.
    #[arg(long, value_name = "DIR")]
    pub dest_root: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub fetch: FetchArgs,

    /// Root of the normalized archive.
    #[arg(long, value_name = "DIR")]
    pub dest_root: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download scanned sheets for each configured subdivision.
    Fetch(FetchArgs),

    /// Copy downloaded sheets into the archive under canonical names.
    Normalize(NormalizeArgs),

    /// Fetch, then normalize.
    Run(RunArgs),

    /// List the configured subdivision codes with their --skip index.
    Codes,

    /// Show the config file location and the effective configuration.
    Config,

    /// Print shell completions.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },
}

impl FetchArgs {
    pub fn apply(&self, cfg: &mut PvsyncConfig) -> Result<()> {
        if let Some(skip) = self.skip {
            cfg.skip = skip;
        }
        if let Some(codes) = &self.codes {
            let parsed = subdivision::parse_list(codes).context("--codes")?;
            cfg.subdivisions = parsed.iter().map(|c| c.to_string()).collect();
        }
        if let Some(root) = &self.source_root {
            cfg.source_root = root.clone();
        }
        if let Some(url) = &self.base_url {
            cfg.base_url = url.clone();
        }
        if let Some(n) = self.max_attempts {
            let mut retry = cfg.retry.clone().unwrap_or_else(RetryConfig::default);
            retry.max_attempts = n;
            cfg.retry = Some(retry);
        }
        if let Some(ms) = self.throttle_ms {
            cfg.throttle_ms = ms;
        }
        Ok(())
    }
}

impl NormalizeArgs {
    pub fn apply(&self, cfg: &mut PvsyncConfig) {
        if let Some(root) = &self.source_root {
            cfg.source_root = root.clone();
        }
        if let Some(root) = &self.dest_root {
            cfg.dest_root = root.clone();
        }
    }
}

impl RunArgs {
    pub fn apply(&self, cfg: &mut PvsyncConfig) -> Result<()> {
        self.fetch.apply(cfg)?;
        if let Some(root) = &self.dest_root {
            cfg.dest_root = root.clone();
        }
        Ok(())
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<PvsyncConfig> {
    match path {
        Some(p) => config::load_from_path(p),
        None => config::load_or_init(),
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<RunStatus> {
        let cli = Cli::parse();

        if let CliCommand::Completions { shell } = cli.command {
            run_completions(shell);
            return Ok(RunStatus::Clean);
        }

        let mut cfg = load_config(cli.config.as_ref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        let status = match cli.command {
            CliCommand::Fetch(args) => {
                args.apply(&mut cfg)?;
                let report = run_fetch(&cfg).await?;
                RunStatus::from_counts(report.storage_errors, 0)
            }
            CliCommand::Normalize(args) => {
                args.apply(&mut cfg);
                let report = run_normalize(&cfg).await?;
                RunStatus::from_counts(0, report.failed)
            }
            CliCommand::Run(args) => {
                args.apply(&mut cfg)?;
                run_pipeline(&cfg).await?
            }
            CliCommand::Codes => {
                run_codes(&cfg)?;
                RunStatus::Clean
            }
            CliCommand::Config => {
                show_config(cli.config.as_deref(), &cfg)?;
                RunStatus::Clean
            }
            CliCommand::Completions { .. } => RunStatus::Clean,
        };

        Ok(status)
    }
}

#[cfg(test)]
mod tests;

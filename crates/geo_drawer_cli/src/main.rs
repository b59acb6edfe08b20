//! `geo-drawer` entry point.
//!
//! # Responsibility
//! - Load repository configuration and start logging.
//! - Create the container, then its default layers, in that order.
//! - Map any failure to a single stderr report and a non-zero exit status.

use anyhow::{Context, Result};
use clap::Parser;
use geo_drawer_core::{
    default_log_level, init_logging, load_config, ExistingContainerPolicy, RepositoryBootstrapper,
};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "geo-drawer",
    version,
    about = "Create a GeoPackage repository seeded with default layers"
)]
struct Cli {
    /// Repository configuration file.
    #[arg(short, long, default_value = "repository_conf.toml")]
    config: PathBuf,

    /// Replace an existing container instead of failing.
    #[arg(long)]
    overwrite: bool,

    /// Log level, overrides `[logging].level`.
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    let level = cli
        .log_level
        .as_deref()
        .or(config.logging.level.as_deref())
        .unwrap_or_else(|| default_log_level());
    init_logging(level, config.logging.dir.as_deref()).context("failed to start logging")?;

    let on_existing = if cli.overwrite {
        ExistingContainerPolicy::Overwrite
    } else {
        config.container.on_existing
    };

    let mut bootstrapper =
        RepositoryBootstrapper::from_config(config.metadata.name, config.metadata.path)?
            .with_existing_policy(on_existing);
    bootstrapper.create_container()?;
    bootstrapper.add_default_layers()?;

    info!(
        "event=run module=cli status=ok repo={}",
        bootstrapper.metadata().name()
    );
    Ok(())
}

use super::load_search_config;
use crate::cli::output::*;
use crate::core::config::save_config;
use anyhow::bail;
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct ConfigArgs {
    /// Write the configuration to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Print (or write) the effective configuration, defaults when no file is given
pub fn run(args: ConfigArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_search_config(config_path)?;

    match args.output {
        Some(path) => {
            if path.exists() && !args.force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            save_config(&path, &config)?;
            success(&format!("Wrote configuration to {}", path.display()));
        }
        None => print!("{}", toml::to_string_pretty(&config)?),
    }

    Ok(())
}

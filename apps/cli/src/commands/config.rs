//! Config file helpers.

use std::path::PathBuf;

use anyhow::{bail, Context};
use stockroom_client::StockroomConfig;

use crate::cli::ConfigCommand;
use crate::context::AppContext;

pub fn run(ctx: &AppContext, command: ConfigCommand, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    match command {
        ConfigCommand::Init { force } => {
            let path = config_path
                .or_else(StockroomConfig::default_config_path)
                .context("No config directory available; pass --config")?;
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }

            let written = StockroomConfig::default().save(Some(path))?;
            println!("Wrote {}", written.display());
        }

        ConfigCommand::Show => {
            println!("{}", toml::to_string_pretty(&ctx.config)?);
        }
    }
    Ok(())
}

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use console::style;

use aquadash_core::config::DEFAULT_CONFIG_FILE;
use aquadash_core::DashConfig;

/// Write a default configuration file.
#[derive(Parser)]
pub struct InitCommand {
    /// Configuration file path.
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Overwrite an existing file.
    #[arg(short, long)]
    pub force: bool,
}

impl InitCommand {
    /// Execute the init command.
    pub fn execute(self) -> Result<()> {
        write_default_config(Path::new(&self.config), self.force)?;
        println!(
            "{} Created {}",
            style("✅").bold(),
            style(&self.config).cyan()
        );
        Ok(())
    }
}

fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists: {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let content = DashConfig::default().to_toml()?;
    std::fs::write(path, content)?;
    Ok(())
}

mod init;
mod render;
mod run;

pub use init::InitCommand;
pub use render::RenderCommand;
pub use run::RunCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Aquachain proxy stats dashboard
#[derive(Parser)]
#[command(name = "aquadash")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Poll the proxy and serve the dashboard.
    Run(RunCommand),

    /// Write a default configuration file.
    Init(InitCommand),

    /// Render the stats once and print the HTML.
    Render(RenderCommand),
}

impl Cli {
    /// Execute the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Run(cmd) => cmd.execute().await,
            Commands::Init(cmd) => cmd.execute(),
            Commands::Render(cmd) => cmd.execute().await,
        }
    }
}

/// Load the config at `path`, or defaults when the file does not exist.
pub(crate) fn load_config(path: &str) -> Result<aquadash_core::DashConfig> {
    let path = std::path::Path::new(path);
    if !path.exists() {
        tracing::warn!(
            "Configuration file not found: {}, using defaults",
            path.display()
        );
        return Ok(aquadash_core::DashConfig::default());
    }

    tracing::info!("Loading configuration from {}", path.display());
    Ok(aquadash_core::DashConfig::from_file(path)?)
}

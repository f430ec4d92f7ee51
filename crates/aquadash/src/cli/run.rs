use anyhow::Result;
use clap::Parser;
use console::style;
use tracing::info;

use aquadash::Dashboard;
use aquadash_core::config::DEFAULT_CONFIG_FILE;
use aquadash_core::DashConfig;

/// Poll the proxy and serve the dashboard.
#[derive(Parser)]
pub struct RunCommand {
    /// Configuration file path.
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Address to listen on (overrides config).
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Proxy base URL (overrides config).
    #[arg(short, long)]
    pub upstream: Option<String>,

    /// Enable development mode (verbose logging).
    #[arg(long)]
    pub dev: bool,
}

impl RunCommand {
    /// Execute the run command.
    pub async fn execute(self) -> Result<()> {
        let log_level = if self.dev { "debug" } else { "info" };
        tracing_subscriber::fmt()
            .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()))
            .init();

        println!();
        println!(
            "  {}  {} v{}",
            style("⛏").bold(),
            style("AQUADASH").bold().cyan(),
            env!("CARGO_PKG_VERSION")
        );
        println!();

        let mut config = super::load_config(&self.config)?;
        self.apply_overrides(&mut config)?;

        println!(
            "  {} Dashboard at {}",
            style("📊").bold(),
            style(format!("http://{}", config.frontend.listen)).cyan()
        );
        println!(
            "  {} Polling {} every {}ms",
            style("🔄").bold(),
            style(config.upstream.stats_url()).cyan(),
            config.poller.interval_ms
        );
        if self.dev {
            println!("  {} Development mode enabled", style("🔧").bold());
        }
        println!();

        info!(
            overlap = config.poller.overlap.as_str(),
            timeout_ms = config.upstream.request_timeout_ms,
            "Starting dashboard"
        );

        let dashboard = Dashboard::builder().config(config).build()?;
        dashboard.run().await?;

        println!("\n  {} Goodbye!", style("👋").bold());

        Ok(())
    }

    /// Apply command-line overrides and revalidate.
    fn apply_overrides(&self, config: &mut DashConfig) -> Result<()> {
        if let Some(listen) = &self.listen {
            config.frontend.listen = listen.clone();
        }
        if let Some(upstream) = &self.upstream {
            config.upstream.url = upstream.clone();
        }
        config.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(listen: Option<&str>, upstream: Option<&str>) -> RunCommand {
        RunCommand {
            config: DEFAULT_CONFIG_FILE.to_string(),
            listen: listen.map(str::to_string),
            upstream: upstream.map(str::to_string),
            dev: false,
        }
    }

    #[test]
    fn test_run_command_no_overrides() {
        let mut config = DashConfig::default();
        command(None, None).apply_overrides(&mut config).unwrap();
        assert_eq!(config.frontend.listen, "127.0.0.1:8080");
        assert_eq!(config.upstream.url, "http://127.0.0.1:8081");
    }

    #[test]
    fn test_run_command_with_overrides() {
        let mut config = DashConfig::default();
        command(Some("0.0.0.0:3000"), Some("https://pool.example"))
            .apply_overrides(&mut config)
            .unwrap();
        assert_eq!(config.frontend.listen, "0.0.0.0:3000");
        assert_eq!(config.upstream.stats_url(), "https://pool.example/stats");
    }

    #[test]
    fn test_run_command_rejects_bad_override() {
        let mut config = DashConfig::default();
        assert!(command(Some("not-an-address"), None)
            .apply_overrides(&mut config)
            .is_err());
    }
}

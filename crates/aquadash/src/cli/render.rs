use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use aquadash_core::config::DEFAULT_CONFIG_FILE;
use aquadash_core::stats::fetch_and_transform;
use aquadash_core::{DashConfig, DisplayDocument, StatusDocument};
use aquadash_runtime::{load_template, DisplaySurface, HttpStatsSource, Renderer};

/// Render the stats once and print the HTML.
#[derive(Parser)]
pub struct RenderCommand {
    /// Configuration file path.
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Render a saved status document instead of fetching one.
    #[arg(short, long)]
    pub input: Option<String>,
}

impl RenderCommand {
    /// Execute the render command.
    pub async fn execute(self) -> Result<()> {
        tracing_subscriber::fmt()
            .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()))
            .with_writer(std::io::stderr)
            .init();

        let config = super::load_config(&self.config)?;
        let doc = match &self.input {
            Some(input) => read_document(Path::new(input))?,
            None => {
                let source = HttpStatsSource::new(&config.upstream)?;
                fetch_and_transform(&source)
                    .await
                    .with_context(|| format!("Failed to fetch {}", source.url()))?
            }
        };

        println!("{}", render_document(&config, &doc)?);
        Ok(())
    }
}

fn read_document(path: &Path) -> Result<DisplayDocument> {
    let body = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let doc = StatusDocument::decode(&body)
        .with_context(|| format!("Invalid status document in {}", path.display()))?;
    Ok(doc.into_display())
}

fn render_document(config: &DashConfig, doc: &DisplayDocument) -> Result<String> {
    let template = load_template(config.frontend.template_path.as_deref())?;
    let renderer = Renderer::new(template, DisplaySurface::new());
    Ok(renderer.render_html(doc)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let stats = dir.path().join("stats.json");
        std::fs::write(
            &stats,
            r#"{"height": 30000, "now": 1000, "miners": [{"name": "rig2"}, {"name": "rig1"}]}"#,
        )
        .unwrap();
        let template = dir.path().join("t.hbs");
        std::fs::write(&template, "{{nextEpoch}}:{{#each miners}}{{name}},{{/each}}").unwrap();

        let mut config = DashConfig::default();
        config.frontend.template_path = Some(template);

        let doc = read_document(&stats).unwrap();
        let html = render_document(&config, &doc).unwrap();
        assert_eq!(html, "432001000:rig1,rig2,");
    }

    #[test]
    fn test_render_default_template() {
        let doc = StatusDocument::new(1, 0).into_display();
        let html = render_document(&DashConfig::default(), &doc).unwrap();
        assert!(html.contains("Miners (0)"));
    }

    #[test]
    fn test_render_rejects_invalid_document() {
        let dir = tempfile::tempdir().unwrap();
        let stats = dir.path().join("stats.json");
        std::fs::write(&stats, r#"{"now": 1}"#).unwrap();
        assert!(read_document(&stats).is_err());
    }
}

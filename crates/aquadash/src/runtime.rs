use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::broadcast;

use aquadash_core::config::DashConfig;
use aquadash_core::{Result, StatsSource, Template};
use aquadash_runtime::{
    create_dashboard_router, load_template, DashboardState, DisplaySurface, HttpStatsSource,
    Poller, Renderer,
};

/// Stats dashboard: poller, renderer and HTTP surface.
pub struct Dashboard {
    config: DashConfig,
    renderer: Renderer,
    source: Arc<dyn StatsSource>,
    shutdown_tx: broadcast::Sender<()>,
}

/// Requests shutdown of a running dashboard.
#[derive(Clone)]
pub struct ShutdownHandle {
    tx: broadcast::Sender<()>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        let _ = self.tx.send(());
    }
}

impl Dashboard {
    /// Create a new builder.
    pub fn builder() -> DashboardBuilder {
        DashboardBuilder::new()
    }

    pub fn config(&self) -> &DashConfig {
        &self.config
    }

    /// Display surface the poller writes to.
    pub fn surface(&self) -> &DisplaySurface {
        self.renderer.surface()
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Request shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: self.shutdown_tx.clone(),
        }
    }

    /// Bind the configured address and serve until shutdown.
    pub async fn run(self) -> Result<()> {
        let addr = self.config.frontend.listen_addr()?;
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until ctrl-c or `shutdown`.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let addr: SocketAddr = listener.local_addr()?;
        let poller = Poller::new(&self.config.poller)?;

        let state = DashboardState::new(self.renderer.surface().clone())
            .with_title(self.config.frontend.title.clone())
            .with_refresh_interval(poller.interval());
        let router = create_dashboard_router(state);

        let mut server_rx = self.shutdown_tx.subscribe();
        let server = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = server_rx.recv().await;
                })
                .await
        });
        tracing::info!("Dashboard listening on http://{}", addr);

        let renderer = self.renderer.clone();
        let source = self.source.clone();
        let poller = poller.start(move || {
            let renderer = renderer.clone();
            let source = source.clone();
            async move {
                renderer.refresh(source.as_ref()).await;
            }
        });
        tracing::info!(upstream = %self.source.describe(), "Polling upstream");

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received shutdown signal");
            }
            _ = shutdown_rx.recv() => {
                tracing::info!("Received shutdown notification");
            }
        }

        tracing::info!("Starting graceful shutdown...");
        poller.shutdown().await;
        self.shutdown();

        match server.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("Dashboard server error: {}", e),
            Err(e) => tracing::error!("Dashboard server task failed: {}", e),
        }

        tracing::info!("Dashboard stopped");
        Ok(())
    }
}

/// Builder for the dashboard.
pub struct DashboardBuilder {
    config: Option<DashConfig>,
    template: Option<Template>,
    source: Option<Arc<dyn StatsSource>>,
}

impl DashboardBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            template: None,
            source: None,
        }
    }

    /// Set the configuration. Defaults apply when unset.
    pub fn config(mut self, config: DashConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a compiled template instead of loading `frontend.template_path`.
    pub fn template(mut self, template: Template) -> Self {
        self.template = Some(template);
        self
    }

    /// Use a custom stats source instead of HTTP.
    pub fn source<S: StatsSource>(mut self, source: S) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Build the dashboard. Compiles the template and validates the config.
    pub fn build(self) -> Result<Dashboard> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let template = match self.template {
            Some(template) => template,
            None => load_template(config.frontend.template_path.as_deref())?,
        };

        let source: Arc<dyn StatsSource> = match self.source {
            Some(source) => source,
            None => Arc::new(HttpStatsSource::new(&config.upstream)?),
        };

        let (shutdown_tx, _) = broadcast::channel(1);

        Ok(Dashboard {
            renderer: Renderer::new(template, DisplaySurface::new()),
            config,
            source,
            shutdown_tx,
        })
    }
}

impl Default for DashboardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use aquadash_core::config::{OverlapPolicy, PollerConfig};
    use aquadash_core::testing::{MockResponse, MockStatsSource};
    use aquadash_core::DashError;

    #[test]
    fn test_builder_defaults() {
        let dashboard = DashboardBuilder::new().build().unwrap();
        assert_eq!(dashboard.config().poller.interval_ms, 5000);
        assert!(!dashboard.surface().banner_visible());
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let mut config = DashConfig::default();
        config.upstream.url = "ftp://example".to_string();
        assert!(DashboardBuilder::new().config(config).build().is_err());
    }

    #[test]
    fn test_builder_missing_template_file() {
        let mut config = DashConfig::default();
        config.frontend.template_path = Some("/nonexistent/stats.hbs".into());
        let result = DashboardBuilder::new().config(config).build();
        assert!(matches!(result, Err(DashError::Config(_))));
    }

    #[tokio::test]
    async fn test_serve_polls_and_shuts_down() {
        let source = MockStatsSource::builder()
            .then_always(MockResponse::status_doc(30_000, 1000, &["b", "a"]))
            .build();
        let mut config = DashConfig::default();
        config.poller = PollerConfig {
            interval_ms: 20,
            overlap: OverlapPolicy::Skip,
        };

        let dashboard = Dashboard::builder()
            .config(config)
            .template(Template::compile("{{#each miners}}{{name}}{{/each}}").unwrap())
            .source(source.clone())
            .build()
            .unwrap();
        let surface = dashboard.surface().clone();
        let handle = dashboard.shutdown_handle();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let task = tokio::spawn(dashboard.serve(listener));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(surface.region_html(), "ab");
        assert!(source.calls() >= 2);

        handle.shutdown();
        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }
}

mod api;
mod assets;
mod pages;

use std::time::Duration;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::display::DisplaySurface;

/// Default page title.
pub const DEFAULT_TITLE: &str = "Aquachain Proxy";

/// Dashboard state shared across handlers.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub surface: DisplaySurface,

    /// Page title.
    pub title: String,

    /// Meta refresh interval for the full page, in seconds.
    pub refresh_secs: u64,
}

impl DashboardState {
    pub fn new(surface: DisplaySurface) -> Self {
        Self {
            surface,
            title: DEFAULT_TITLE.to_string(),
            refresh_secs: 5,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Refresh the page at the poll interval, rounded up to whole seconds.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        let millis = interval.as_millis() as u64;
        self.refresh_secs = millis.div_ceil(1000).max(1);
        self
    }
}

/// Create the dashboard router.
pub fn create_dashboard_router(state: DashboardState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);

    Router::new()
        .route("/", get(pages::index))
        .route("/fragment", get(pages::fragment))
        .route("/status", get(api::status))
        .route("/health", get(api::health))
        .route("/assets/styles.css", get(assets::styles_css))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

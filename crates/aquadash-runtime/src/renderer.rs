use std::path::Path;
use std::sync::Arc;

use aquadash_core::stats::{fetch_and_transform, StatsSource};
use aquadash_core::{DashError, DisplayDocument, FetchError, Template};

use crate::display::{DisplayState, DisplaySurface};

/// Built-in stats template.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/stats.hbs");

/// Compile the template at `path`, or the built-in one when no path is given.
pub fn load_template(path: Option<&Path>) -> aquadash_core::Result<Template> {
    match path {
        Some(path) => {
            let source = std::fs::read_to_string(path).map_err(|e| {
                DashError::Config(format!(
                    "Failed to read template {}: {}",
                    path.display(),
                    e
                ))
            })?;
            tracing::debug!(path = %path.display(), "Loaded template");
            Template::compile(&source)
        }
        None => Template::compile(DEFAULT_TEMPLATE),
    }
}

/// Applies fetch outcomes to the display surface.
///
/// The template is compiled once and shared by every tick.
#[derive(Debug, Clone)]
pub struct Renderer {
    template: Arc<Template>,
    surface: DisplaySurface,
}

impl Renderer {
    pub fn new(template: Template, surface: DisplaySurface) -> Self {
        Self {
            template: Arc::new(template),
            surface,
        }
    }

    pub fn surface(&self) -> &DisplaySurface {
        &self.surface
    }

    /// Render a document to HTML without touching the surface.
    pub fn render_html(&self, doc: &DisplayDocument) -> aquadash_core::Result<String> {
        let context = doc.to_context()?;
        self.template.render(&context)
    }

    /// Apply one fetch outcome.
    ///
    /// A successful fetch hides the banner, then replaces the region. If the
    /// template fails the region stays stale but the banner stays hidden. A
    /// failed fetch shows the banner and leaves the region as it was.
    pub fn render(&self, outcome: Result<DisplayDocument, FetchError>) -> DisplayState {
        let doc = match outcome {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(error = %e, "Stats fetch failed");
                return self.surface.show_banner(now_ms());
            }
        };
        self.surface.hide_banner();

        match self.render_html(&doc) {
            Ok(html) => {
                tracing::debug!(
                    height = doc.status.height,
                    next_epoch = doc.next_epoch,
                    miners = doc.miner_names().len(),
                    "Stats refreshed"
                );
                self.surface.show_content(html, now_ms())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Stats render failed, keeping previous view");
                DisplayState::Normal
            }
        }
    }

    /// Fetch from `source` and apply the outcome.
    pub async fn refresh<S>(&self, source: &S) -> DisplayState
    where
        S: StatsSource + ?Sized,
    {
        self.render(fetch_and_transform(source).await)
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

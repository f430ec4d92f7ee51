use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;

/// Banner state of the display region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayState {
    /// Banner hidden; region shows the last good render.
    #[default]
    Normal,
    /// Banner shown; region still shows the last good render.
    Error,
}

impl DisplayState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Default)]
struct Surface {
    state: DisplayState,
    region: String,
    generation: u64,
    last_success_ms: Option<i64>,
    last_error_ms: Option<i64>,
}

/// Serializable view of the surface, without the region HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplaySnapshot {
    pub state: DisplayState,
    pub banner_visible: bool,
    /// Number of successful renders so far.
    pub generation: u64,
    pub last_success_ms: Option<i64>,
    pub last_error_ms: Option<i64>,
}

/// The error banner plus the display region.
///
/// Written by the renderer, read by the page handlers. Each update takes the
/// lock once, so readers never see the banner and region out of step.
#[derive(Debug, Clone, Default)]
pub struct DisplaySurface {
    inner: Arc<RwLock<Surface>>,
}

impl DisplaySurface {
    /// An empty region with the banner hidden.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hide the banner and replace the region contents.
    pub fn show_content(&self, html: String, at_ms: i64) -> DisplayState {
        let mut surface = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        surface.state = DisplayState::Normal;
        surface.region = html;
        surface.generation += 1;
        surface.last_success_ms = Some(at_ms);
        surface.state
    }

    /// Hide the banner without touching the region.
    pub fn hide_banner(&self) -> DisplayState {
        let mut surface = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        surface.state = DisplayState::Normal;
        surface.state
    }

    /// Show the banner. The region keeps its last contents.
    pub fn show_banner(&self, at_ms: i64) -> DisplayState {
        let mut surface = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        surface.state = DisplayState::Error;
        surface.last_error_ms = Some(at_ms);
        surface.state
    }

    /// Current banner state.
    pub fn state(&self) -> DisplayState {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .state
    }

    /// Whether the error banner is visible.
    pub fn banner_visible(&self) -> bool {
        self.state() == DisplayState::Error
    }

    /// Current region HTML.
    pub fn region_html(&self) -> String {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .region
            .clone()
    }

    /// Banner state and region HTML read together.
    pub fn read(&self) -> (DisplayState, String) {
        let surface = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        (surface.state, surface.region.clone())
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        let surface = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        DisplaySnapshot {
            state: surface.state,
            banner_visible: surface.state == DisplayState::Error,
            generation: surface.generation,
            last_success_ms: surface.last_success_ms,
            last_error_ms: surface.last_error_ms,
        }
    }
}

pub mod dashboard;
pub mod display;
pub mod poller;
pub mod renderer;
pub mod source;

pub use dashboard::{create_dashboard_router, DashboardState};
pub use display::{DisplaySnapshot, DisplayState, DisplaySurface};
pub use poller::{Poller, PollerHandle, PollerStats};
pub use renderer::{load_template, Renderer, DEFAULT_TEMPLATE};
pub use source::HttpStatsSource;

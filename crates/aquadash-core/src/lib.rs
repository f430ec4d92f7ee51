pub mod config;
pub mod error;
pub mod stats;
pub mod template;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{DashConfig, OverlapPolicy};
pub use error::{DashError, FetchError, Result};
pub use stats::{DisplayDocument, Miner, StatsSource, StatusDocument};
pub use template::Template;

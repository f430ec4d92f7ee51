//! Testing utilities for dashboard components.
//!
//! `MockStatsSource` stands in for the upstream `/stats` endpoint so the
//! poller and renderer can be driven without a network.

pub mod mock_source;

pub use mock_source::{MockResponse, MockStatsSource, MockStatsSourceBuilder};

use std::time::Duration;

/// Default interval used by poller tests.
pub const TEST_INTERVAL: Duration = Duration::from_millis(5000);

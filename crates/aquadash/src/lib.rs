//! Aquadash: a stats dashboard for the Aquachain mining proxy.
//!
//! Polls the proxy's `/stats` endpoint, renders it with a precompiled
//! template and serves the result with an error banner that tracks upstream
//! failures.

mod runtime;

pub use runtime::{Dashboard, DashboardBuilder, ShutdownHandle};

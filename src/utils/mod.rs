//! # Utility Modules
//!
//! Supporting utilities shared by the connection layer and binaries.
//!
//! ## Components
//! - **Logging**: tracing-subscriber bootstrap driven by [`crate::config::LoggingConfig`]
//! - **Metrics**: atomic per-connection traffic counters

pub mod logging;
pub mod metrics;

pub use metrics::{ConnectionMetrics, MetricsSnapshot};

//! # Group-Buy Telemetry
//!
//! Structured logging setup for the group-buy ledger.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use groupbuy_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_logging(&config).expect("Failed to init logging");
//!
//!     // Spans and events from groupbuy-contract are now emitted
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GB_SERVICE_NAME` | `groupbuy` | Service name attached to the root span |
//! | `GB_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `GB_JSON_LOGS` | `false` (true in containers) | JSON formatted logs |
//! | `GB_CONSOLE_OUTPUT` | `true` | Write logs to stdout |

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{init_logging, init_test_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The log filter directive could not be parsed.
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// A global subscriber is already installed.
    #[error("Failed to install subscriber: {0}")]
    SubscriberInit(String),
}

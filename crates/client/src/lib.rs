//! Dashboard API client for Paceboard.
//!
//! Fetches the metrics snapshot from `GET {base_url}/api/dashboard`,
//! enforces the request timeout, and validates the payload shape before
//! handing back a typed [`paceboard_core::DashboardSnapshot`].

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod validate;

pub use client::{DashboardClient, SnapshotSource};
pub use config::{ClientConfig, ConfigError};
pub use error::{ClientError, Result};
pub use validate::{parse_snapshot, validate_snapshot};

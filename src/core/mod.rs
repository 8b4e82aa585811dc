// src/core/mod.rs

/// Form, wire and report data structures shared across the crate.
pub mod models;

/// The scan-option compiler and form presets.
pub mod options;

/// Typed HTTP client for the remote scan service.
pub mod api;

/// `ApiError`, the failure taxonomy for service calls.
pub mod error;

/// Process-wide connectivity flag and active-monitor slot.
pub mod session;

/// Cancellable polling task that follows a running scan.
pub mod monitor;

/// Periodic `/health` check.
pub mod health;

//! Cooperative credit underwriting service.
//!
//! The `underwriting` module holds the engine: eligibility validation,
//! amortization math, deterministic risk scoring, and the application status
//! machine. `config`, `telemetry`, and `error` carry the runtime plumbing for
//! the HTTP binary.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod underwriting;

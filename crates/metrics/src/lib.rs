//! # Keystone Metrics Engine
//!
//! This crate converts a single property record plus deal assumptions into the
//! standard set of buy-to-let financial metrics. It acts as the "unbiased
//! underwriter" of the system.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems. It depends only on `core-types` and `configuration`.
//! - **Stateless Calculation:** The `MetricsEngine` is a stateless calculator.
//!   It takes a validated record as input and produces a `MetricsBundle` as
//!   output, which makes it deterministic and easy to test. Callers may share
//!   one engine across threads; no state is retained between calls.
//!
//! ## Public API
//!
//! - `MetricsEngine`: The main struct that contains the calculation logic.
//! - `MetricsBundle`: The standardized struct that holds all derived metrics.
//! - `MetricsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod bundle;
pub mod engine;
pub mod error;
pub mod projection;
pub mod sensitivity;

// Re-export the key components to create a clean, public-facing API.
pub use bundle::MetricsBundle;
pub use engine::MetricsEngine;
pub use error::MetricsError;
pub use projection::{AppreciationScenario, YearProjection};
pub use sensitivity::{SensitivityPoint, SensitivityVariable};

//! Sequential model loading pipeline.
//!
//! Resolves the viewer manifest, then fetches the main, sensors and kids
//! projections models one after another, attaching each as soon as it
//! arrives.

/// Viewer manifest loading with fallback to the built-in model sources.
pub mod manifest_loader;

/// Per-stage model requests, polling and attachment.
///
/// Failures stop the chain and are reported through logs, RPC and state.
pub mod model_loader;

/// Loading progress tracking resource for state transitions.
///
/// Enforces load order and records the one-shot camera fit.
pub mod progress;

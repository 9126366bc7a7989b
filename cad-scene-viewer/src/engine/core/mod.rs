//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, state transitions,
//! and plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Registers the remote model source, the loading states and every
/// runtime system of the viewer.
pub mod app_setup;

/// Application state machine for the sequential model loading pipeline.
///
/// Moves from manifest bootstrap through one state per model to `Ready`,
/// or stops in `LoadFailed`.
pub mod app_state;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;

//! Runtime overlay systems: load status and frame rate.

/// FPS tracking and notification systems for performance monitoring.
///
/// Sends frame rate updates to the host page via RPC and updates the native overlay.
pub mod fps_tracking;

/// Load progress and failure text shown over the viewport.
pub mod status_overlay;

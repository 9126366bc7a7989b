//! Viewer camera: orbit navigation, one-shot scene framing and viewport
//! resize handling.

/// Framing of the loaded scene once all models have spawned.
pub mod auto_fit;

/// Damped orbit controls around a target point with +Z up.
pub mod orbit_controller;

/// Camera spawning, viewport size tracking and resize handling.
pub mod viewport_camera;

pub use orbit_controller::{OrbitController, orbit_camera_controller};
pub use viewport_camera::{ViewerCamera, ViewportState};

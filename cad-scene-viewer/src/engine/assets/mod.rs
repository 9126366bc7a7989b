//! Asset-side data for the composed CAD scene.
//!
//! Describes the three model slots, where each model is fetched from,
//! and the world-space bounds used to frame them.

/// Spatial bounds of the visible scene geometry in world coordinates.
pub mod bounds;

/// The three models in load order, with their toggle bindings and identifiers.
pub mod model_slot;

/// JSON viewer manifest overriding the built-in model locators.
pub mod viewer_manifest;

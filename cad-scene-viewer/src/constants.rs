/// Shared configuration for the viewer scene, camera and model sources

/// Camera, lighting and interaction tuning values.
pub mod render_settings;

/// Built-in model locators and labels used when no manifest overrides them.
pub mod models;

/// Asset source roots and manifest location.
pub mod path;

use bevy::math::Vec3;

/// CAD exports are authored Z-up, so the whole viewer treats +Z as up.
pub const WORLD_UP: Vec3 = Vec3::Z;

//! Error types for model loading and camera framing

use thiserror::Error;

use crate::engine::assets::model_slot::ModelSlot;

/// A model stage that could not be fetched or parsed.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("failed to load {slot} model from {locator}: {reason}")]
pub struct LoadError {
    pub slot: ModelSlot,
    pub locator: String,
    pub reason: String,
}

/// Reasons the one-shot camera fit could not place the camera.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CameraFitError {
    #[error("scene has no visible geometry to frame")]
    EmptyScene,

    #[error("scene bounds are degenerate (fit distance {0})")]
    DegenerateBounds(f32),
}

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::assets::model_slot::ModelSlot;

/// Locator and display label of one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSource {
    pub locator: String,
    pub label: String,
}

impl ModelSource {
    pub fn builtin(slot: ModelSlot) -> Self {
        Self {
            locator: slot.default_locator().to_string(),
            label: slot.default_label().to_string(),
        }
    }
}

/// Viewer manifest as a Bevy asset. Every field is optional in JSON;
/// anything missing falls back to the built-in model sources.
#[derive(Asset, Debug, Clone, PartialEq, Serialize, Deserialize, TypePath)]
pub struct ViewerManifest {
    #[serde(default = "main_source")]
    pub main: ModelSource,
    #[serde(default = "sensors_source")]
    pub sensors: ModelSource,
    #[serde(default = "kids_projections_source")]
    pub kids_projections: ModelSource,
}

fn main_source() -> ModelSource {
    ModelSource::builtin(ModelSlot::Main)
}

fn sensors_source() -> ModelSource {
    ModelSource::builtin(ModelSlot::Sensors)
}

fn kids_projections_source() -> ModelSource {
    ModelSource::builtin(ModelSlot::KidsProjections)
}

impl Default for ViewerManifest {
    fn default() -> Self {
        Self {
            main: main_source(),
            sensors: sensors_source(),
            kids_projections: kids_projections_source(),
        }
    }
}

/// Resolved model sources the loader reads from once bootstrapping finishes.
#[derive(Resource, Debug, Clone, PartialEq, Default)]
pub struct ModelSources(pub ViewerManifest);

impl ModelSources {
    pub fn get(&self, slot: ModelSlot) -> &ModelSource {
        match slot {
            ModelSlot::Main => &self.0.main,
            ModelSlot::Sensors => &self.0.sensors,
            ModelSlot::KidsProjections => &self.0.kids_projections,
        }
    }
}

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::models::{
    KIDS_PROJECTIONS_MODEL_LABEL, KIDS_PROJECTIONS_MODEL_LOCATOR, MAIN_MODEL_LABEL,
    MAIN_MODEL_LOCATOR, SENSORS_MODEL_LABEL, SENSORS_MODEL_LOCATOR,
};

/// One of the three models composed into the scene, in load order.
/// Also attached as a component to each model's scene root entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSlot {
    Main,
    Sensors,
    KidsProjections,
}

impl ModelSlot {
    /// Load order of the sequential pipeline.
    pub const LOAD_ORDER: [ModelSlot; 3] = [Self::Main, Self::Sensors, Self::KidsProjections];

    /// Slots the user can show and hide.
    pub const TOGGLEABLE: [ModelSlot; 2] = [Self::Sensors, Self::KidsProjections];

    /// Position in the load order.
    pub fn index(self) -> usize {
        match self {
            Self::Main => 0,
            Self::Sensors => 1,
            Self::KidsProjections => 2,
        }
    }

    /// Slot loaded after this one, if any.
    pub fn next(self) -> Option<Self> {
        Self::LOAD_ORDER.get(self.index() + 1).copied()
    }

    pub fn is_toggleable(self) -> bool {
        self != Self::Main
    }

    /// Keyboard character bound to this slot's visibility toggle.
    pub fn toggle_key(self) -> Option<char> {
        match self {
            Self::Main => None,
            Self::Sensors => Some('n'),
            Self::KidsProjections => Some('m'),
        }
    }

    /// Case-insensitive reverse lookup of `toggle_key`.
    pub fn from_toggle_key(key: &str) -> Option<Self> {
        let mut chars = key.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return None;
        };
        Self::TOGGLEABLE
            .into_iter()
            .find(|slot| slot.toggle_key() == Some(c.to_ascii_lowercase()))
    }

    /// Identifier used by the host-page RPC and the manifest.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Sensors => "sensors",
            Self::KidsProjections => "kids_projections",
        }
    }

    /// Parse an RPC identifier; accepts `-` or `_` separators in any case.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "main" => Some(Self::Main),
            "sensors" => Some(Self::Sensors),
            "kids_projections" => Some(Self::KidsProjections),
            _ => None,
        }
    }

    pub fn default_label(self) -> &'static str {
        match self {
            Self::Main => MAIN_MODEL_LABEL,
            Self::Sensors => SENSORS_MODEL_LABEL,
            Self::KidsProjections => KIDS_PROJECTIONS_MODEL_LABEL,
        }
    }

    pub fn default_locator(self) -> &'static str {
        match self {
            Self::Main => MAIN_MODEL_LOCATOR,
            Self::Sensors => SENSORS_MODEL_LOCATOR,
            Self::KidsProjections => KIDS_PROJECTIONS_MODEL_LOCATOR,
        }
    }
}

impl fmt::Display for ModelSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

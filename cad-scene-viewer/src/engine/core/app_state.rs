use bevy::prelude::*;

use crate::engine::assets::model_slot::ModelSlot;
use crate::engine::loading::progress::LoadingProgress;
use crate::rpc::web_rpc::WebRpcInterface;

/// Viewer lifecycle. Interaction systems run in every state; loading
/// systems only in the `Loading*` states.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Bootstrapping,
    LoadingMain,
    LoadingSensors,
    LoadingKids,
    Ready,
    /// A model stage failed; the chain does not advance past it.
    LoadFailed,
}

impl AppState {
    /// State in which `slot` is fetched.
    pub fn loading(slot: ModelSlot) -> Self {
        match slot {
            ModelSlot::Main => Self::LoadingMain,
            ModelSlot::Sensors => Self::LoadingSensors,
            ModelSlot::KidsProjections => Self::LoadingKids,
        }
    }

    /// Model fetched in this state, if it is a loading state.
    pub fn loading_slot(self) -> Option<ModelSlot> {
        match self {
            Self::LoadingMain => Some(ModelSlot::Main),
            Self::LoadingSensors => Some(ModelSlot::Sensors),
            Self::LoadingKids => Some(ModelSlot::KidsProjections),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bootstrapping => "bootstrapping",
            Self::LoadingMain => "loading_main",
            Self::LoadingSensors => "loading_sensors",
            Self::LoadingKids => "loading_kids",
            Self::Ready => "ready",
            Self::LoadFailed => "load_failed",
        }
    }
}

/// Run condition for the model loading systems.
pub fn is_loading_models(state: Res<State<AppState>>) -> bool {
    state.get().loading_slot().is_some()
}

// Report every state change to the log and the host page
pub fn notify_stage_change(
    state: Res<State<AppState>>,
    progress: Res<LoadingProgress>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let stage = *state.get();
    info!("→ Entered {:?} state", stage);

    rpc_interface.send_notification(
        "load_stage_changed",
        serde_json::json!({
            "stage": stage.as_str(),
            "attached": progress.attached().iter().map(|slot| slot.as_str()).collect::<Vec<_>>(),
        }),
    );
}

use bevy::asset::RecursiveDependencyLoadState;
use bevy::gltf::Gltf;
use bevy::prelude::*;

use crate::engine::assets::model_slot::ModelSlot;
use crate::engine::assets::viewer_manifest::{ModelSource, ModelSources};
use crate::engine::core::app_state::AppState;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::models::{ViewerModels, attach_model};
use crate::error::LoadError;
use crate::rpc::web_rpc::WebRpcInterface;

/// The glTF document requested for the stage in flight.
#[derive(Resource, Default)]
pub struct ModelLoader {
    pending: Option<(ModelSlot, Handle<Gltf>)>,
    // Documents of attached models stay alive for the session.
    loaded: Vec<Handle<Gltf>>,
}

/// Request the glTF document for the stage of the state just entered.
pub fn request_stage_model(
    state: Res<State<AppState>>,
    mut loader: ResMut<ModelLoader>,
    mut loading_progress: ResMut<LoadingProgress>,
    sources: Res<ModelSources>,
    asset_server: Res<AssetServer>,
) {
    let Some(slot) = state.get().loading_slot() else {
        return;
    };

    if !loading_progress.begin(slot) {
        warn!("Ignoring out-of-order request for {} model", slot);
        return;
    }

    let source = sources.get(slot);
    info!("Loading {} model from: {}", slot, source.locator);
    let handle = asset_server.load::<Gltf>(source.locator.clone());
    loader.pending = Some((slot, handle));
}

/// Poll the stage in flight; attach on success, stop the chain on failure.
pub fn poll_stage_model(
    mut loader: ResMut<ModelLoader>,
    mut loading_progress: ResMut<LoadingProgress>,
    mut models: ResMut<ViewerModels>,
    mut commands: Commands,
    mut next_state: ResMut<NextState<AppState>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    sources: Res<ModelSources>,
    gltfs: Res<Assets<Gltf>>,
    asset_server: Res<AssetServer>,
) {
    let Some((slot, handle)) = loader.pending.clone() else {
        return;
    };
    let source = sources.get(slot);

    match asset_server.get_recursive_dependency_load_state(&handle) {
        Some(RecursiveDependencyLoadState::Loaded) => {
            loader.pending = None;
            let scene = gltfs
                .get(&handle)
                .and_then(|gltf| primary_scene(gltf.default_scene.as_ref(), &gltf.scenes));
            let Some(scene) = scene else {
                let failed = fail_stage(
                    &mut loading_progress,
                    &mut rpc_interface,
                    slot,
                    source,
                    "glTF document contains no scene".to_string(),
                );
                next_state.set(failed);
                return;
            };
            loader.loaded.push(handle);

            let Some(next) = finish_stage(
                &mut commands,
                &mut loading_progress,
                &mut models,
                slot,
                scene,
                source,
            ) else {
                return;
            };

            rpc_interface.send_notification(
                "model_attached",
                serde_json::json!({
                    "model": slot.as_str(),
                    "label": source.label,
                    "locator": source.locator,
                }),
            );
            info!("→ Transitioning to {:?} state", next);
            next_state.set(next);
        }
        Some(RecursiveDependencyLoadState::Failed(err)) => {
            loader.pending = None;
            let failed = fail_stage(
                &mut loading_progress,
                &mut rpc_interface,
                slot,
                source,
                err.to_string(),
            );
            next_state.set(failed);
        }
        _ => {}
    }
}

/// The scene a model is built from: the document's default scene, else its first.
pub fn primary_scene(
    default_scene: Option<&Handle<Scene>>,
    scenes: &[Handle<Scene>],
) -> Option<Handle<Scene>> {
    default_scene.or_else(|| scenes.first()).cloned()
}

/// Record the failure of `slot`, report it to the host and return the
/// state that ends the pipeline.
pub fn fail_stage(
    loading_progress: &mut LoadingProgress,
    rpc_interface: &mut WebRpcInterface,
    slot: ModelSlot,
    source: &ModelSource,
    reason: String,
) -> AppState {
    let error = LoadError {
        slot,
        locator: source.locator.clone(),
        reason,
    };
    error!("✗ {error}");

    rpc_interface.send_notification(
        "load_failed",
        serde_json::json!({
            "model": slot.as_str(),
            "locator": error.locator,
            "reason": error.reason,
        }),
    );
    loading_progress.fail(error)
}

/// Attach the loaded scene for `slot` and advance the pipeline.
/// Returns the state to enter next, or `None` if `slot` was not in flight.
pub fn finish_stage(
    commands: &mut Commands,
    loading_progress: &mut LoadingProgress,
    models: &mut ViewerModels,
    slot: ModelSlot,
    scene: Handle<Scene>,
    source: &ModelSource,
) -> Option<AppState> {
    if loading_progress.in_flight() != Some(slot) {
        warn!("{} model finished loading but is not the stage in flight", slot);
        return None;
    }

    let entity = attach_model(commands, slot, scene, &source.label);
    models.set(slot, entity);
    info!("✓ {} model attached ({})", source.label, source.locator);

    loading_progress.complete(slot)
}

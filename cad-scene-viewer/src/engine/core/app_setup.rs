use bevy::asset::AssetMetaCheck;
use bevy::asset::io::AssetSourceBuilder;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::constants::WORLD_UP;
use crate::constants::path::{MODEL_SOURCE_ID, MODEL_SOURCE_ROOT};
use crate::constants::render_settings::{
    AMBIENT_LIGHT_BRIGHTNESS, BACKGROUND_COLOUR, DIRECTIONAL_LIGHT_FROM,
    DIRECTIONAL_LIGHT_ILLUMINANCE,
};
// Crate engine modules
use crate::engine::assets::viewer_manifest::{ModelSources, ViewerManifest};
use crate::engine::camera::auto_fit::fit_camera_to_scene;
use crate::engine::camera::viewport_camera::{
    handle_window_resize, init_viewport_state, spawn_viewer_camera,
};
use crate::engine::camera::{OrbitController, ViewportState, orbit_camera_controller};
use crate::engine::core::app_state::{AppState, is_loading_models, notify_stage_change};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::manifest_loader::{
    ManifestLoader, resolve_manifest_system, start_loading,
};
use crate::engine::loading::model_loader::{ModelLoader, poll_stage_model, request_stage_model};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::models::ViewerModels;
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::engine::systems::status_overlay::{spawn_status_overlay, update_status_text};
// Crate tools modules
use crate::tools::toggle_buttons::{spawn_toggle_buttons, toggle_button_feedback};
use crate::tools::visibility_toggle::{
    ToggleModelVisibility, apply_visibility_toggles, handle_toggle_buttons,
    handle_toggle_shortcuts,
};
// Web RPC
use crate::rpc::web_rpc::WebRpcPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::fps_tracking::fps_text_update_system;

pub fn create_app() -> App {
    let mut app = App::new();

    // Model locators use the `cdn://` source; it must exist before AssetPlugin builds.
    app.register_asset_source(
        MODEL_SOURCE_ID,
        AssetSourceBuilder::platform_default(MODEL_SOURCE_ROOT, None),
    );

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers ViewerManifest as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<ViewerManifest>::new(&["json"]))
        .add_plugins(WebRpcPlugin)
        .insert_resource(ClearColor(BACKGROUND_COLOUR))
        .insert_resource(AmbientLight {
            brightness: AMBIENT_LIGHT_BRIGHTNESS,
            ..default()
        });

    // Initialise resources early
    app.init_resource::<LoadingProgress>()
        .init_resource::<ManifestLoader>()
        .init_resource::<ModelLoader>()
        .init_resource::<ModelSources>()
        .init_resource::<ViewerModels>()
        .init_resource::<OrbitController>()
        .init_resource::<ViewportState>()
        .add_event::<ToggleModelVisibility>();

    app.add_systems(Startup, (init_viewport_state, setup, start_loading).chain());

    // Loading pipeline: manifest, then one state per model.
    app.add_systems(
        Update,
        resolve_manifest_system.run_if(in_state(AppState::Bootstrapping)),
    )
    .add_systems(OnEnter(AppState::LoadingMain), request_stage_model)
    .add_systems(OnEnter(AppState::LoadingSensors), request_stage_model)
    .add_systems(OnEnter(AppState::LoadingKids), request_stage_model)
    .add_systems(Update, poll_stage_model.run_if(is_loading_models))
    .add_systems(
        Update,
        fit_camera_to_scene.run_if(in_state(AppState::Ready)),
    );

    // Interaction and overlay systems run in every state.
    app.add_systems(
        Update,
        (
            orbit_camera_controller,
            handle_window_resize,
            (
                handle_toggle_shortcuts,
                handle_toggle_buttons,
                apply_visibility_toggles,
            )
                .chain(),
            toggle_button_feedback,
            notify_stage_change.run_if(state_changed::<AppState>),
            update_status_text,
            fps_notification_system,
        ),
    );

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, fps_text_update_system);
    }

    app
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: DIRECTIONAL_LIGHT_ILLUMINANCE,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_translation(DIRECTIONAL_LIGHT_FROM).looking_at(Vec3::ZERO, WORLD_UP),
    ));
}

// Startup: light, camera and overlays. Models arrive through the loading states.
fn setup(mut commands: Commands, orbit: Res<OrbitController>, viewport: Res<ViewportState>) {
    info!("=== CAD SCENE VIEWER ===");

    spawn_lighting(&mut commands);
    spawn_viewer_camera(&mut commands, &orbit, &viewport);
    spawn_toggle_buttons(&mut commands);
    spawn_status_overlay(&mut commands);
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

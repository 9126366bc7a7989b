use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::constants::path::VIEWER_MANIFEST_PATH;
use crate::engine::assets::viewer_manifest::{ModelSources, ViewerManifest};
use crate::engine::core::app_state::AppState;
use crate::engine::loading::progress::LoadingProgress;

#[derive(Resource, Default)]
pub struct ManifestLoader {
    handle: Option<Handle<ViewerManifest>>,
}

// Start the loading process
pub fn start_loading(mut manifest_loader: ResMut<ManifestLoader>, asset_server: Res<AssetServer>) {
    info!("Loading viewer manifest from: {}", VIEWER_MANIFEST_PATH);
    manifest_loader.handle = Some(asset_server.load(VIEWER_MANIFEST_PATH));
}

/// Resolve the model sources from the manifest, or from the built-in
/// defaults when the manifest is missing or unreadable, then start the
/// first model stage.
pub fn resolve_manifest_system(
    mut loading_progress: ResMut<LoadingProgress>,
    manifest_loader: Res<ManifestLoader>,
    mut commands: Commands,
    mut next_state: ResMut<NextState<AppState>>,
    asset_server: Res<AssetServer>,
    manifests: Res<Assets<ViewerManifest>>,
) {
    if loading_progress.manifest_resolved {
        return;
    }

    let sources = match manifest_loader.handle.as_ref() {
        None => Some(ModelSources::default()),
        Some(handle) => match asset_server.get_load_state(handle) {
            Some(LoadState::Loaded) => manifests.get(handle).map(|manifest| {
                info!("✓ Viewer manifest loaded");
                ModelSources(manifest.clone())
            }),
            Some(LoadState::Failed(err)) => {
                warn!("Viewer manifest unavailable ({err}), using built-in model sources");
                Some(ModelSources::default())
            }
            _ => None,
        },
    };

    let Some(sources) = sources else {
        return;
    };

    commands.insert_resource(sources);
    loading_progress.manifest_resolved = true;
    info!("→ Transitioning to LoadingMain state");
    next_state.set(AppState::LoadingMain);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::state::app::StatesPlugin;
    use bevy_common_assets::json::JsonAssetPlugin;

    use super::*;
    use crate::engine::assets::model_slot::ModelSlot;

    fn manifest_app() -> App {
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            AssetPlugin::default(),
            StatesPlugin,
            JsonAssetPlugin::<ViewerManifest>::new(&["json"]),
        ))
        .init_state::<AppState>()
        .init_resource::<LoadingProgress>()
        .init_resource::<ManifestLoader>()
        .add_systems(
            Update,
            resolve_manifest_system.run_if(in_state(AppState::Bootstrapping)),
        );
        app
    }

    fn load_manifest(app: &mut App, path: &str) {
        let handle = app.world().resource::<AssetServer>().load(path.to_string());
        app.world_mut().resource_mut::<ManifestLoader>().handle = Some(handle);
    }

    fn update_until_resolved(app: &mut App) {
        for _ in 0..1000 {
            app.update();
            if app.world().resource::<LoadingProgress>().manifest_resolved {
                return;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    fn current_state(app: &App) -> AppState {
        *app.world().resource::<State<AppState>>().get()
    }

    #[test]
    fn no_manifest_requested_uses_built_in_sources() {
        let mut app = manifest_app();
        app.update();

        assert!(app.world().resource::<LoadingProgress>().manifest_resolved);
        assert_eq!(
            app.world().resource::<ModelSources>(),
            &ModelSources::default()
        );
        assert!(matches!(
            app.world().resource::<NextState<AppState>>(),
            NextState::Pending(AppState::LoadingMain)
        ));

        app.update();
        assert_eq!(current_state(&app), AppState::LoadingMain);
    }

    #[test]
    fn missing_manifest_falls_back_to_built_in_sources() {
        let mut app = manifest_app();
        load_manifest(&mut app, "does_not_exist.json");
        update_until_resolved(&mut app);

        assert!(app.world().resource::<LoadingProgress>().manifest_resolved);
        assert_eq!(
            app.world().resource::<ModelSources>(),
            &ModelSources::default()
        );
        assert!(matches!(
            app.world().resource::<NextState<AppState>>(),
            NextState::Pending(AppState::LoadingMain)
        ));

        app.update();
        assert_eq!(current_state(&app), AppState::LoadingMain);
    }

    #[test]
    fn shipped_manifest_lists_the_mirrored_exports() {
        let mut app = manifest_app();
        load_manifest(&mut app, VIEWER_MANIFEST_PATH);
        update_until_resolved(&mut app);

        let sources = app.world().resource::<ModelSources>();
        assert_eq!(sources, &ModelSources::default());
        for slot in ModelSlot::LOAD_ORDER {
            let locator = &sources.get(slot).locator;
            assert!(locator.starts_with("cdn://"), "{locator}");
            assert!(locator.ends_with(".glb"), "{locator}");
        }
        app.update();
        assert_eq!(current_state(&app), AppState::LoadingMain);
    }
}

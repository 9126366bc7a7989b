use bevy::prelude::*;

use crate::constants::render_settings::OVERLAY_FONT_SIZE;
use crate::engine::assets::model_slot::ModelSlot;
use crate::engine::assets::viewer_manifest::ModelSources;
use crate::engine::core::app_state::AppState;
use crate::engine::loading::progress::LoadingProgress;
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::fps_tracking::FpsText;

/// Bottom-left line describing load progress or failure.
#[derive(Component)]
pub struct StatusText;

// Root-level text nodes only, so nothing covers the toggle buttons.
pub fn spawn_status_overlay(commands: &mut Commands) {
    commands.spawn((
        StatusText,
        Text::new(status_message(
            AppState::Bootstrapping,
            &LoadingProgress::default(),
            &ModelSources::default(),
        )),
        TextFont {
            font_size: OVERLAY_FONT_SIZE,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(12.0),
            left: Val::Px(12.0),
            ..default()
        },
    ));

    #[cfg(not(target_arch = "wasm32"))]
    commands.spawn((
        Text::new("FPS: "),
        TextFont {
            font_size: OVERLAY_FONT_SIZE,
            ..default()
        },
        TextColor(Color::srgb(1., 0., 0.)),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(12.0),
            right: Val::Px(12.0),
            ..default()
        },
        FpsText,
    ));
}

pub fn status_message(state: AppState, progress: &LoadingProgress, sources: &ModelSources) -> String {
    match state {
        AppState::Bootstrapping => "Loading viewer manifest...".to_string(),
        AppState::Ready => format!("Ready ({} models loaded)", progress.attached().len()),
        AppState::LoadFailed => match progress.failure() {
            Some(error) => format!("Load failed: {error}"),
            None => "Load failed".to_string(),
        },
        loading => match loading.loading_slot() {
            Some(slot) => format!(
                "Loading {} model ({}/{})...",
                sources.get(slot).label,
                slot.index() + 1,
                ModelSlot::LOAD_ORDER.len()
            ),
            None => String::new(),
        },
    }
}

pub fn update_status_text(
    state: Res<State<AppState>>,
    progress: Res<LoadingProgress>,
    sources: Res<ModelSources>,
    mut query: Query<&mut Text, With<StatusText>>,
) {
    if !state.is_changed() && !progress.is_changed() {
        return;
    }
    let message = status_message(*state.get(), &progress, &sources);
    for mut text in &mut query {
        if text.0 != message {
            text.0 = message.clone();
        }
    }
}

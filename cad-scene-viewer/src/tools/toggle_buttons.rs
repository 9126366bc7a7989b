use bevy::prelude::*;

use crate::constants::render_settings::{
    OVERLAY_FONT_SIZE, TOGGLE_BUTTON_LEFT_PX, TOGGLE_BUTTON_SPACING_PX, TOGGLE_BUTTON_TOP_PX,
};
use crate::engine::assets::model_slot::ModelSlot;

/// On-screen button that toggles one model.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleButton(pub ModelSlot);

pub fn toggle_button_label(slot: ModelSlot) -> String {
    format!("Toggle {}", slot.default_label())
}

// Stacked top-left, one row per toggleable model.
pub fn spawn_toggle_buttons(commands: &mut Commands) {
    for (row, slot) in ModelSlot::TOGGLEABLE.into_iter().enumerate() {
        commands
            .spawn((
                ToggleButton(slot),
                Name::new(format!("{}ToggleButton", slot.as_str())),
                Button,
                BackgroundColor(Color::srgb(0.22, 0.24, 0.28)),
                BorderColor(Color::srgba(0.0, 0.0, 0.0, 0.25)),
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(TOGGLE_BUTTON_LEFT_PX),
                    top: Val::Px(TOGGLE_BUTTON_TOP_PX + row as f32 * TOGGLE_BUTTON_SPACING_PX),
                    padding: UiRect::axes(Val::Px(8.0), Val::Px(4.0)),
                    border: UiRect::all(Val::Px(1.0)),
                    align_items: AlignItems::Center,
                    justify_content: JustifyContent::Center,
                    ..default()
                },
            ))
            .with_children(|button| {
                button.spawn((
                    Text::new(toggle_button_label(slot)),
                    TextFont {
                        font_size: OVERLAY_FONT_SIZE,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                ));
            });
    }
}

/// Hover feedback, matching the rest of the overlay.
pub fn toggle_button_feedback(
    mut buttons: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<ToggleButton>)>,
) {
    for (interaction, mut background) in &mut buttons {
        *background = match interaction {
            Interaction::Pressed => BackgroundColor(Color::srgb(0.16, 0.45, 0.75)),
            Interaction::Hovered => BackgroundColor(Color::srgb(0.30, 0.33, 0.38)),
            Interaction::None => BackgroundColor(Color::srgb(0.22, 0.24, 0.28)),
        };
    }
}

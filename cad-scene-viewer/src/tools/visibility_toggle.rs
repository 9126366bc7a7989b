use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::prelude::*;
use bevy::window::RequestRedraw;

use crate::engine::assets::model_slot::ModelSlot;
use crate::engine::scene::models::ViewerModels;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::toggle_buttons::ToggleButton;

/// Where a toggle request came from, for logging and notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleSource {
    Button,
    Keyboard,
    Rpc,
}

impl ToggleSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Keyboard => "keyboard",
            Self::Rpc => "rpc",
        }
    }
}

/// Request to flip the visibility of one model. Every input path ends here.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleModelVisibility {
    pub slot: ModelSlot,
    pub source: ToggleSource,
}

/// Model bound to a key press, if any. Auto-repeat is ignored so holding a
/// key does not make the model flicker.
pub fn shortcut_slot(key: &Key, state: ButtonState, repeat: bool) -> Option<ModelSlot> {
    if state != ButtonState::Pressed || repeat {
        return None;
    }
    match key {
        Key::Character(text) => ModelSlot::from_toggle_key(text.as_str()),
        _ => None,
    }
}

pub fn handle_toggle_shortcuts(
    mut keyboard_events: EventReader<KeyboardInput>,
    mut toggle_events: EventWriter<ToggleModelVisibility>,
) {
    for input in keyboard_events.read() {
        if let Some(slot) = shortcut_slot(&input.logical_key, input.state, input.repeat) {
            toggle_events.write(ToggleModelVisibility {
                slot,
                source: ToggleSource::Keyboard,
            });
        }
    }
}

pub fn handle_toggle_buttons(
    buttons: Query<(&Interaction, &ToggleButton), Changed<Interaction>>,
    mut toggle_events: EventWriter<ToggleModelVisibility>,
) {
    for (interaction, button) in &buttons {
        if *interaction == Interaction::Pressed {
            toggle_events.write(ToggleModelVisibility {
                slot: button.0,
                source: ToggleSource::Button,
            });
        }
    }
}

/// Flip between hidden and inherited. Returns whether the entity is now shown.
pub fn flip_visibility(visibility: &mut Visibility) -> bool {
    let shown = *visibility == Visibility::Hidden;
    *visibility = if shown {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    shown
}

/// Apply toggle requests. Models that have not been attached yet are left
/// alone; the main model has no toggle.
pub fn apply_visibility_toggles(
    mut toggle_events: EventReader<ToggleModelVisibility>,
    models: Res<ViewerModels>,
    mut visibilities: Query<&mut Visibility>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut redraw: EventWriter<RequestRedraw>,
) {
    for event in toggle_events.read() {
        if !event.slot.is_toggleable() {
            warn!("The {} model cannot be hidden", event.slot);
            continue;
        }

        let Some(entity) = models.get(event.slot) else {
            debug!(
                "Ignoring {} toggle from {:?}: model not loaded yet",
                event.slot, event.source
            );
            continue;
        };

        let Ok(mut visibility) = visibilities.get_mut(entity) else {
            continue;
        };

        let shown = flip_visibility(&mut visibility);
        info!(
            "{} model {} via {:?}",
            event.slot,
            if shown { "shown" } else { "hidden" },
            event.source
        );

        rpc_interface.send_notification(
            "visibility_changed",
            serde_json::json!({
                "model": event.slot.as_str(),
                "visible": shown,
                "source": event.source.as_str(),
            }),
        );
        redraw.write(RequestRedraw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toggle_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_event::<ToggleModelVisibility>()
            .add_event::<RequestRedraw>()
            .init_resource::<ViewerModels>()
            .init_resource::<WebRpcInterface>()
            .add_systems(
                Update,
                (handle_toggle_buttons, apply_visibility_toggles).chain(),
            );
        app
    }

    fn attach(app: &mut App, slot: ModelSlot) -> Entity {
        let entity = app.world_mut().spawn((slot, Visibility::Inherited)).id();
        app.world_mut()
            .resource_mut::<ViewerModels>()
            .set(slot, entity);
        entity
    }

    fn request(app: &mut App, slot: ModelSlot, source: ToggleSource) {
        app.world_mut()
            .send_event(ToggleModelVisibility { slot, source });
        app.update();
    }

    fn redraws(app: &App) -> usize {
        app.world().resource::<Events<RequestRedraw>>().len()
    }

    #[test]
    fn toggling_twice_restores_visibility() {
        let mut app = toggle_app();
        let sensors = attach(&mut app, ModelSlot::Sensors);

        request(&mut app, ModelSlot::Sensors, ToggleSource::Keyboard);
        assert_eq!(app.world().get::<Visibility>(sensors), Some(&Visibility::Hidden));

        request(&mut app, ModelSlot::Sensors, ToggleSource::Keyboard);
        assert_eq!(
            app.world().get::<Visibility>(sensors),
            Some(&Visibility::Inherited)
        );
    }

    #[test]
    fn toggles_are_independent() {
        let mut app = toggle_app();
        let sensors = attach(&mut app, ModelSlot::Sensors);
        let kids = attach(&mut app, ModelSlot::KidsProjections);

        request(&mut app, ModelSlot::KidsProjections, ToggleSource::Rpc);

        assert_eq!(app.world().get::<Visibility>(kids), Some(&Visibility::Hidden));
        assert_eq!(
            app.world().get::<Visibility>(sensors),
            Some(&Visibility::Inherited)
        );
    }

    #[test]
    fn toggle_before_load_is_a_no_op() {
        let mut app = toggle_app();
        let sensors = attach(&mut app, ModelSlot::Sensors);

        request(&mut app, ModelSlot::KidsProjections, ToggleSource::Keyboard);

        assert_eq!(app.world().resource::<ViewerModels>().kids_projections, None);
        assert_eq!(
            app.world().get::<Visibility>(sensors),
            Some(&Visibility::Inherited)
        );
        assert_eq!(redraws(&app), 0);
    }

    #[test]
    fn toggle_redraws() {
        let mut app = toggle_app();
        attach(&mut app, ModelSlot::Sensors);
        request(&mut app, ModelSlot::Sensors, ToggleSource::Button);
        assert_eq!(redraws(&app), 1);
    }

    #[test]
    fn main_model_cannot_be_hidden() {
        let mut app = toggle_app();
        let main = attach(&mut app, ModelSlot::Main);
        request(&mut app, ModelSlot::Main, ToggleSource::Rpc);
        assert_eq!(app.world().get::<Visibility>(main), Some(&Visibility::Inherited));
    }

    #[test]
    fn shortcut_keys_ignore_case_release_and_repeat() {
        let n = Key::Character("n".into());
        let upper_m = Key::Character("M".into());
        assert_eq!(
            shortcut_slot(&n, ButtonState::Pressed, false),
            Some(ModelSlot::Sensors)
        );
        assert_eq!(
            shortcut_slot(&upper_m, ButtonState::Pressed, false),
            Some(ModelSlot::KidsProjections)
        );
        assert_eq!(shortcut_slot(&n, ButtonState::Released, false), None);
        assert_eq!(shortcut_slot(&n, ButtonState::Pressed, true), None);
        assert_eq!(shortcut_slot(&Key::Enter, ButtonState::Pressed, false), None);
    }

    #[test]
    fn key_and_button_produce_identical_state() {
        // path one: the `n` key
        let mut keyed = toggle_app();
        let keyed_sensors = attach(&mut keyed, ModelSlot::Sensors);
        let slot = shortcut_slot(&Key::Character("n".into()), ButtonState::Pressed, false)
            .expect("n is bound");
        request(&mut keyed, slot, ToggleSource::Keyboard);

        // path two: pressing the sensors button
        let mut clicked = toggle_app();
        let clicked_sensors = attach(&mut clicked, ModelSlot::Sensors);
        clicked
            .world_mut()
            .spawn((ToggleButton(ModelSlot::Sensors), Interaction::Pressed));
        clicked.update();

        assert_eq!(
            keyed.world().get::<Visibility>(keyed_sensors),
            Some(&Visibility::Hidden)
        );
        assert_eq!(
            keyed.world().get::<Visibility>(keyed_sensors),
            clicked.world().get::<Visibility>(clicked_sensors)
        );
    }

    #[test]
    fn flip_treats_visible_as_shown() {
        let mut visibility = Visibility::Visible;
        assert!(!flip_visibility(&mut visibility));
        assert_eq!(visibility, Visibility::Hidden);
        assert!(flip_visibility(&mut visibility));
        assert_eq!(visibility, Visibility::Inherited);
    }
}

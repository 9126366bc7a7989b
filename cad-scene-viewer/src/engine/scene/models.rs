use bevy::prelude::*;
use bevy::scene::SceneInstanceReady;

use crate::engine::assets::model_slot::ModelSlot;

/// Scene root entities of the loaded models, one named field per slot.
/// A field stays `None` until that model's stage has attached it.
#[derive(Resource, Default, Debug)]
pub struct ViewerModels {
    pub main: Option<Entity>,
    pub sensors: Option<Entity>,
    pub kids_projections: Option<Entity>,
    spawned: [bool; 3],
}

impl ViewerModels {
    pub fn get(&self, slot: ModelSlot) -> Option<Entity> {
        match slot {
            ModelSlot::Main => self.main,
            ModelSlot::Sensors => self.sensors,
            ModelSlot::KidsProjections => self.kids_projections,
        }
    }

    pub fn set(&mut self, slot: ModelSlot, entity: Entity) {
        let field = match slot {
            ModelSlot::Main => &mut self.main,
            ModelSlot::Sensors => &mut self.sensors,
            ModelSlot::KidsProjections => &mut self.kids_projections,
        };
        *field = Some(entity);
    }

    pub fn slot_of(&self, entity: Entity) -> Option<ModelSlot> {
        ModelSlot::LOAD_ORDER
            .into_iter()
            .find(|slot| self.get(*slot) == Some(entity))
    }

    /// Record that the scene instance under `entity` finished spawning.
    pub fn mark_spawned(&mut self, entity: Entity) -> Option<ModelSlot> {
        let slot = self.slot_of(entity)?;
        self.spawned[slot.index()] = true;
        Some(slot)
    }

    pub fn is_spawned(&self, slot: ModelSlot) -> bool {
        self.spawned[slot.index()]
    }

    /// True once every model's meshes exist in the world.
    pub fn all_spawned(&self) -> bool {
        ModelSlot::LOAD_ORDER
            .into_iter()
            .all(|slot| self.is_spawned(slot))
    }
}

/// Attach a loaded model scene to the world as a new top-level entity.
pub fn attach_model(
    commands: &mut Commands,
    slot: ModelSlot,
    scene: Handle<Scene>,
    label: &str,
) -> Entity {
    commands
        .spawn((
            SceneRoot(scene),
            slot,
            Name::new(label.to_string()),
            Transform::default(),
            Visibility::default(),
        ))
        .observe(on_model_instance_ready)
        .id()
}

fn on_model_instance_ready(trigger: Trigger<SceneInstanceReady>, mut models: ResMut<ViewerModels>) {
    if let Some(slot) = models.mark_spawned(trigger.target()) {
        info!("✓ {} model instance spawned", slot);
    }
}

use bevy::prelude::*;
use bevy::render::primitives::Aabb;
use bevy::window::RequestRedraw;

use crate::constants::WORLD_UP;
use crate::constants::render_settings::{
    FIT_DISTANCE_MARGIN, FIT_FAR_PLANE_MULTIPLIER, FIT_VIEW_DIRECTION,
};
use crate::engine::assets::bounds::SceneBounds;
use crate::engine::camera::orbit_controller::OrbitController;
use crate::engine::camera::viewport_camera::ViewerCamera;
use crate::engine::loading::progress::{FitStatus, LoadingProgress};
use crate::engine::scene::models::ViewerModels;
use crate::error::CameraFitError;
use crate::rpc::web_rpc::WebRpcInterface;

/// Camera placement that frames a set of bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFit {
    pub position: Vec3,
    pub target: Vec3,
    /// Distance at which the enclosing sphere exactly fills the vertical FOV.
    pub distance: f32,
    pub far: f32,
}

/// Frame `bounds` with a camera of vertical field of view `fov` (radians).
///
/// The sphere radius is half the largest extent; the camera sits at
/// `margin * radius / sin(fov / 2)` from the center along the fixed
/// oblique view direction, and the far plane is pushed to a multiple of
/// the fit distance.
pub fn compute_camera_fit(bounds: &SceneBounds, fov: f32) -> Result<CameraFit, CameraFitError> {
    let center = bounds.center();
    let radius = bounds.max_extent() * 0.5;
    let distance = (radius / (fov * 0.5).sin()).abs();

    if !distance.is_finite() || distance <= 0.0 {
        return Err(CameraFitError::DegenerateBounds(distance));
    }

    let direction = FIT_VIEW_DIRECTION.normalize();
    Ok(CameraFit {
        position: center + direction * (distance * FIT_DISTANCE_MARGIN),
        target: center,
        distance,
        far: distance * FIT_FAR_PLANE_MULTIPLIER,
    })
}

/// One-shot camera framing once every model instance has spawned.
/// Touches only the camera, its projection and the orbit controller.
pub fn fit_camera_to_scene(
    mut loading_progress: ResMut<LoadingProgress>,
    models: Res<ViewerModels>,
    meshes: Query<(&Aabb, &GlobalTransform, &InheritedVisibility), With<Mesh3d>>,
    mut camera_query: Query<(&mut Transform, &mut Projection), With<ViewerCamera>>,
    mut orbit: ResMut<OrbitController>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut redraw: EventWriter<RequestRedraw>,
) {
    if !loading_progress.fit_pending() || !models.all_spawned() {
        return;
    }

    let Ok((mut camera_transform, mut projection)) = camera_query.single_mut() else {
        return;
    };
    let Projection::Perspective(perspective) = &mut *projection else {
        warn!("Camera fit skipped: viewer camera is not perspective");
        loading_progress.finish_fit(FitStatus::Skipped);
        return;
    };

    let visible_boxes = meshes
        .iter()
        .filter(|(_, _, visibility)| visibility.get())
        .map(|(aabb, transform, _)| (aabb, transform));

    let fit = SceneBounds::from_local_boxes(visible_boxes)
        .ok_or(CameraFitError::EmptyScene)
        .and_then(|bounds| compute_camera_fit(&bounds, perspective.fov));

    match fit {
        Ok(fit) => {
            camera_transform.translation = fit.position;
            camera_transform.look_at(fit.target, WORLD_UP);
            orbit.retarget(fit.position, fit.target);
            perspective.far = fit.far;

            loading_progress.finish_fit(FitStatus::Applied);
            info!(
                "✓ Camera fitted: center {:?}, distance {:.2}, far {:.2}",
                fit.target, fit.distance, fit.far
            );
            rpc_interface.send_notification(
                "camera_fitted",
                serde_json::json!({
                    "center": fit.target.to_array(),
                    "position": fit.position.to_array(),
                    "far": fit.far,
                }),
            );
            redraw.write(RequestRedraw);
        }
        Err(err) => {
            warn!("Camera fit skipped: {err}");
            loading_progress.finish_fit(FitStatus::Skipped);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::model_slot::ModelSlot;
    use crate::engine::camera::viewport_camera::viewer_projection;
    use bevy::ecs::system::RunSystemOnce;

    const FOV: f32 = std::f32::consts::FRAC_PI_3;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-3
    }

    #[test]
    fn fit_places_camera_along_oblique_direction() {
        let bounds = SceneBounds::new(Vec3::new(-2.0, 0.0, 1.0), Vec3::new(6.0, 4.0, 3.0));
        let fit = compute_camera_fit(&bounds, FOV).expect("non-degenerate bounds");

        let center = Vec3::new(2.0, 2.0, 2.0);
        let radius = 8.0 / 2.0;
        let distance = radius / (FOV / 2.0).sin();
        let direction = Vec3::new(1.0, -1.0, 0.5).normalize();

        assert!(approx(fit.target, center));
        assert!((fit.distance - distance).abs() < 1e-3);
        assert!(approx(fit.position, center + direction * 1.5 * distance));
        assert!((fit.far - 4.0 * distance).abs() < 1e-3);
    }

    #[test]
    fn flat_scene_still_fits_on_its_largest_extent() {
        let bounds = SceneBounds::new(Vec3::ZERO, Vec3::new(10.0, 10.0, 0.0));
        let fit = compute_camera_fit(&bounds, FOV).expect("flat bounds have extent");
        assert!((fit.distance - 5.0 / (FOV / 2.0).sin()).abs() < 1e-3);
    }

    #[test]
    fn point_bounds_are_degenerate() {
        let bounds = SceneBounds::new(Vec3::ONE, Vec3::ONE);
        assert!(matches!(
            compute_camera_fit(&bounds, FOV),
            Err(CameraFitError::DegenerateBounds(_))
        ));
    }

    fn fit_world(progress: LoadingProgress) -> (World, Entity) {
        let mut world = World::new();
        world.init_resource::<WebRpcInterface>();
        world.init_resource::<OrbitController>();
        world.init_resource::<Events<RequestRedraw>>();
        world.insert_resource(progress);

        let mut models = ViewerModels::default();
        for slot in ModelSlot::LOAD_ORDER {
            let root = world.spawn(slot).id();
            models.set(slot, root);
            models.mark_spawned(root);
        }
        world.insert_resource(models);

        let camera = world
            .spawn((
                ViewerCamera,
                Transform::from_xyz(0.0, -10.0, 10.0),
                viewer_projection(1.5),
            ))
            .id();
        (world, camera)
    }

    fn ready_progress() -> LoadingProgress {
        let mut progress = LoadingProgress::default();
        for slot in ModelSlot::LOAD_ORDER {
            progress.begin(slot);
            progress.complete(slot);
        }
        progress
    }

    fn spawn_mesh(world: &mut World, min: Vec3, max: Vec3, visible: bool) {
        world.spawn((
            Mesh3d(Handle::default()),
            Aabb::from_min_max(min, max),
            GlobalTransform::IDENTITY,
            if visible {
                InheritedVisibility::VISIBLE
            } else {
                InheritedVisibility::HIDDEN
            },
        ));
    }

    #[test]
    fn fit_system_frames_visible_meshes_once() {
        let (mut world, camera) = fit_world(ready_progress());
        spawn_mesh(&mut world, Vec3::ZERO, Vec3::new(4.0, 2.0, 2.0), true);
        // hidden geometry does not widen the frame
        spawn_mesh(&mut world, Vec3::splat(100.0), Vec3::splat(200.0), false);
        let entities_before = world.entities().len();

        world
            .run_system_once(fit_camera_to_scene)
            .expect("fit system runs");

        let expected = compute_camera_fit(
            &SceneBounds::new(Vec3::ZERO, Vec3::new(4.0, 2.0, 2.0)),
            FOV,
        )
        .expect("fit");

        let transform = *world.get::<Transform>(camera).expect("camera transform");
        assert!(approx(transform.translation, expected.position));
        let forward = transform.forward();
        assert!(forward.dot((expected.target - expected.position).normalize()) > 0.9999);

        let Some(Projection::Perspective(perspective)) = world.get::<Projection>(camera) else {
            panic!("perspective projection");
        };
        assert!((perspective.far - expected.far).abs() < 1e-3);

        let orbit = world.resource::<OrbitController>();
        assert!(approx(orbit.target, expected.target));
        assert!(approx(orbit.position(), expected.position));

        let progress = world.resource::<LoadingProgress>();
        assert_eq!(progress.fit_status(), FitStatus::Applied);
        assert_eq!(world.entities().len(), entities_before);

        // a second pass must not move the camera again
        world
            .get_mut::<Transform>(camera)
            .expect("camera transform")
            .translation = Vec3::new(7.0, 7.0, 7.0);
        world
            .run_system_once(fit_camera_to_scene)
            .expect("fit system runs");
        assert_eq!(
            world.get::<Transform>(camera).map(|t| t.translation),
            Some(Vec3::new(7.0, 7.0, 7.0))
        );
    }

    #[test]
    fn fit_waits_for_all_models() {
        let mut progress = LoadingProgress::default();
        progress.begin(ModelSlot::Main);
        progress.complete(ModelSlot::Main);
        let (mut world, camera) = fit_world(progress);
        spawn_mesh(&mut world, Vec3::ZERO, Vec3::ONE, true);

        world
            .run_system_once(fit_camera_to_scene)
            .expect("fit system runs");

        assert_eq!(
            world.get::<Transform>(camera).map(|t| t.translation),
            Some(Vec3::new(0.0, -10.0, 10.0))
        );
        assert_eq!(
            world.resource::<LoadingProgress>().fit_status(),
            FitStatus::NotRequested
        );
    }

    #[test]
    fn empty_scene_skips_fit() {
        let (mut world, camera) = fit_world(ready_progress());

        world
            .run_system_once(fit_camera_to_scene)
            .expect("fit system runs");

        assert_eq!(
            world.resource::<LoadingProgress>().fit_status(),
            FitStatus::Skipped
        );
        assert_eq!(
            world.get::<Transform>(camera).map(|t| t.translation),
            Some(Vec3::new(0.0, -10.0, 10.0))
        );
    }
}

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, RequestRedraw};
use std::f32::consts::{PI, TAU};

use crate::constants::WORLD_UP;
use crate::constants::render_settings::{
    CAMERA_FOV_DEGREES, CAMERA_START_POSITION, ORBIT_DAMPING_FACTOR, ORBIT_MAX_DISTANCE,
    ORBIT_MIN_DISTANCE, ORBIT_PIXELS_PER_LINE, ORBIT_ZOOM_STEP,
};
use crate::engine::camera::ViewerCamera;

/// Keeps the camera off the poles where `looking_at` loses its up vector.
const POLAR_EPSILON: f32 = 1e-4;
/// Motion below this (squared distance) does not count as a camera change.
const CHANGE_EPSILON: f32 = 1e-6;

/// Orbit camera state: target point, spherical offset around +Z and the
/// pending input that damping bleeds into the camera over several frames.
#[derive(Resource, Debug, Clone)]
pub struct OrbitController {
    pub target: Vec3,
    pub radius: f32,
    /// Angle around +Z measured from +X.
    pub azimuth: f32,
    /// Angle from +Z.
    pub polar: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pending_azimuth: f32,
    pending_polar: f32,
    pending_pan: Vec3,
    zoom_scale: f32,
}

impl OrbitController {
    pub fn looking_from(position: Vec3, target: Vec3) -> Self {
        let mut orbit = Self {
            target,
            radius: 1.0,
            azimuth: 0.0,
            polar: PI * 0.5,
            enable_damping: true,
            damping_factor: ORBIT_DAMPING_FACTOR,
            min_distance: ORBIT_MIN_DISTANCE,
            max_distance: ORBIT_MAX_DISTANCE,
            pending_azimuth: 0.0,
            pending_polar: 0.0,
            pending_pan: Vec3::ZERO,
            zoom_scale: 1.0,
        };
        orbit.retarget(position, target);
        orbit
    }

    /// Re-derive the spherical offset from a camera position and target,
    /// dropping any motion still being damped.
    pub fn retarget(&mut self, position: Vec3, target: Vec3) {
        let offset = position - target;
        self.target = target;
        self.radius = offset.length().max(self.min_distance);
        self.azimuth = offset.y.atan2(offset.x);
        self.polar = (offset.z / self.radius)
            .clamp(-1.0, 1.0)
            .acos()
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        self.pending_azimuth = 0.0;
        self.pending_polar = 0.0;
        self.pending_pan = Vec3::ZERO;
        self.zoom_scale = 1.0;
    }

    /// Queue a rotation; positive values swing the camera left and up.
    pub fn rotate(&mut self, left: f32, up: f32) {
        self.pending_azimuth -= left;
        self.pending_polar -= up;
    }

    /// Queue a rotation from a pointer drag in pixels.
    pub fn rotate_by_pixels(&mut self, delta: Vec2, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        self.rotate(TAU * delta.x / height, TAU * delta.y / height);
    }

    /// Queue a world-space move of the target (and camera with it).
    pub fn pan(&mut self, offset: Vec3) {
        self.pending_pan += offset;
    }

    /// Queue a pan from a pointer drag so the point under the cursor
    /// follows it at the target's depth.
    pub fn pan_by_pixels(
        &mut self,
        delta: Vec2,
        viewport_height: f32,
        fov: f32,
        camera_rotation: Quat,
    ) {
        let height = viewport_height.max(1.0);
        let target_distance = self.radius * (fov * 0.5).tan();
        let right = camera_rotation * Vec3::X;
        let up = camera_rotation * Vec3::Y;

        let left_amount = 2.0 * delta.x * target_distance / height;
        let up_amount = 2.0 * delta.y * target_distance / height;
        self.pan(-right * left_amount + up * up_amount);
    }

    /// Queue a dolly by wheel lines; positive moves toward the target.
    pub fn dolly(&mut self, lines: f32) {
        self.zoom_scale *= ORBIT_ZOOM_STEP.powf(lines);
    }

    /// Advance one frame. Returns true when the camera moved.
    pub fn update(&mut self) -> bool {
        let previous_position = self.position();
        let previous_target = self.target;

        let step = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        self.azimuth += self.pending_azimuth * step;
        self.polar = (self.polar + self.pending_polar * step)
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        self.radius = (self.radius * self.zoom_scale).clamp(self.min_distance, self.max_distance);
        self.target += self.pending_pan * step;

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.pending_azimuth *= decay;
            self.pending_polar *= decay;
            self.pending_pan *= decay;
        } else {
            self.pending_azimuth = 0.0;
            self.pending_polar = 0.0;
            self.pending_pan = Vec3::ZERO;
        }
        self.zoom_scale = 1.0;

        previous_position.distance_squared(self.position()) > CHANGE_EPSILON
            || previous_target.distance_squared(self.target) > CHANGE_EPSILON
    }

    pub fn offset(&self) -> Vec3 {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = self.azimuth.sin_cos();
        Vec3::new(
            sin_polar * cos_azimuth,
            sin_polar * sin_azimuth,
            cos_polar,
        ) * self.radius
    }

    pub fn position(&self) -> Vec3 {
        self.target + self.offset()
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position()).looking_at(self.target, WORLD_UP)
    }
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::looking_from(CAMERA_START_POSITION, Vec3::ZERO)
    }
}

/// Pointer-driven orbit: left drag rotates, right drag pans, wheel dollies.
/// Runs every frame so damped motion keeps going after input stops.
pub fn orbit_camera_controller(
    mut orbit: ResMut<OrbitController>,
    mut camera_query: Query<(&mut Transform, &Projection), With<ViewerCamera>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    windows: Query<&Window, With<PrimaryWindow>>,
    buttons: Query<&Interaction, With<Button>>,
    mut redraw: EventWriter<RequestRedraw>,
) {
    let Ok((mut camera_transform, projection)) = camera_query.single_mut() else {
        return;
    };

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    let scroll_lines: f32 = scroll_events
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y / ORBIT_PIXELS_PER_LINE,
        })
        .sum();

    // Drags that start on a toggle button belong to the button.
    let pointer_on_ui = buttons.iter().any(|interaction| *interaction != Interaction::None);

    if !pointer_on_ui {
        let viewport_height = windows
            .single()
            .map(|window| window.height())
            .unwrap_or(1.0);
        let fov = match projection {
            Projection::Perspective(perspective) => perspective.fov,
            _ => CAMERA_FOV_DEGREES.to_radians(),
        };

        if mouse_delta != Vec2::ZERO {
            if mouse_button.pressed(MouseButton::Left) {
                orbit.rotate_by_pixels(mouse_delta, viewport_height);
            } else if mouse_button.pressed(MouseButton::Right) {
                let rotation = camera_transform.rotation;
                orbit.pan_by_pixels(mouse_delta, viewport_height, fov, rotation);
            }
        }

        if scroll_lines.abs() > f32::EPSILON {
            orbit.dolly(scroll_lines);
        }
    }

    if orbit.update() {
        *camera_transform = orbit.transform();
        redraw.write(RequestRedraw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn looking_from_round_trips_position() {
        let position = Vec3::new(3.0, -4.0, 5.0);
        let target = Vec3::new(1.0, 1.0, 1.0);
        let orbit = OrbitController::looking_from(position, target);
        assert!(orbit.position().distance(position) < 1e-4);
        assert!(approx(orbit.radius, (position - target).length()));
    }

    #[test]
    fn damped_rotation_keeps_moving_after_release() {
        let mut orbit = OrbitController::looking_from(Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO);
        let start = orbit.azimuth;
        orbit.rotate(-1.0, 0.0);

        // first frame only applies the damping factor
        assert!(orbit.update());
        assert!(approx(orbit.azimuth - start, ORBIT_DAMPING_FACTOR));

        // no new input, yet the camera keeps turning with shrinking steps
        let mut last_step = ORBIT_DAMPING_FACTOR;
        for _ in 0..10 {
            let before = orbit.azimuth;
            assert!(orbit.update());
            let step = orbit.azimuth - before;
            assert!(step > 0.0 && step < last_step);
            last_step = step;
        }
    }

    #[test]
    fn damped_rotation_converges_to_full_input() {
        let mut orbit = OrbitController::looking_from(Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO);
        let start = orbit.azimuth;
        orbit.rotate(-0.5, 0.0);
        for _ in 0..600 {
            orbit.update();
        }
        assert!(approx(orbit.azimuth - start, 0.5));
        assert!(!orbit.update());
    }

    #[test]
    fn undamped_rotation_applies_at_once() {
        let mut orbit = OrbitController::looking_from(Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO);
        orbit.enable_damping = false;
        let start = orbit.azimuth;
        orbit.rotate(-0.25, 0.0);
        orbit.update();
        assert!(approx(orbit.azimuth - start, 0.25));
        assert!(!orbit.update());
    }

    #[test]
    fn polar_angle_stays_off_the_poles() {
        let mut orbit = OrbitController::looking_from(Vec3::new(0.0, -10.0, 10.0), Vec3::ZERO);
        orbit.enable_damping = false;
        orbit.rotate(0.0, 10.0);
        orbit.update();
        assert!(orbit.polar >= POLAR_EPSILON);
        orbit.rotate(0.0, -10.0);
        orbit.update();
        assert!(orbit.polar <= PI - POLAR_EPSILON);
    }

    #[test]
    fn dolly_in_shrinks_radius() {
        let mut orbit = OrbitController::looking_from(Vec3::new(0.0, -10.0, 0.0), Vec3::ZERO);
        orbit.dolly(1.0);
        orbit.update();
        assert!(approx(orbit.radius, 10.0 * ORBIT_ZOOM_STEP));
    }

    #[test]
    fn pan_moves_target_and_camera_together() {
        let mut orbit = OrbitController::looking_from(Vec3::new(0.0, -10.0, 0.0), Vec3::ZERO);
        orbit.enable_damping = false;
        let offset_before = orbit.offset();
        orbit.pan(Vec3::new(2.0, 0.0, 1.0));
        orbit.update();
        assert!(orbit.target.distance(Vec3::new(2.0, 0.0, 1.0)) < 1e-4);
        assert!(orbit.offset().distance(offset_before) < 1e-4);
    }

    #[test]
    fn retarget_drops_pending_motion() {
        let mut orbit = OrbitController::default();
        orbit.rotate(1.0, 1.0);
        orbit.pan(Vec3::X);
        orbit.retarget(Vec3::new(5.0, 5.0, 5.0), Vec3::ONE);
        assert!(!orbit.update());
        assert_eq!(orbit.target, Vec3::ONE);
    }

    #[test]
    fn transform_looks_at_target() {
        let orbit = OrbitController::looking_from(Vec3::new(0.0, -10.0, 10.0), Vec3::ZERO);
        let transform = orbit.transform();
        let forward = transform.forward();
        let expected = (Vec3::ZERO - transform.translation).normalize();
        assert!(forward.dot(expected) > 0.9999);
    }
}

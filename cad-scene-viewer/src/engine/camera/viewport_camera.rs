use bevy::prelude::*;
use bevy::window::{PrimaryWindow, RequestRedraw, WindowResized};

use crate::constants::render_settings::{CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR};
use crate::engine::camera::orbit_controller::OrbitController;

/// Marker for the single perspective camera the viewer drives.
#[derive(Component, Debug, Default)]
pub struct ViewerCamera;

/// Render surface size as last reported by the window.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    /// Logical size in pixels.
    pub width: f32,
    pub height: f32,
    pub scale_factor: f32,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            scale_factor: 1.0,
        }
    }
}

impl ViewportState {
    pub fn aspect_ratio(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    pub fn physical_size(&self) -> UVec2 {
        UVec2::new(
            (self.width * self.scale_factor).round() as u32,
            (self.height * self.scale_factor).round() as u32,
        )
    }

    pub fn resize(&mut self, width: f32, height: f32, scale_factor: f32) {
        self.width = width;
        self.height = height;
        self.scale_factor = scale_factor;
    }
}

pub fn viewer_projection(aspect_ratio: f32) -> Projection {
    Projection::Perspective(PerspectiveProjection {
        fov: CAMERA_FOV_DEGREES.to_radians(),
        aspect_ratio,
        near: CAMERA_NEAR,
        far: CAMERA_FAR,
    })
}

/// Spawn the viewer camera at the orbit controller's starting pose.
pub fn spawn_viewer_camera(
    commands: &mut Commands,
    orbit: &OrbitController,
    viewport: &ViewportState,
) -> Entity {
    commands
        .spawn((
            Camera3d::default(),
            viewer_projection(viewport.aspect_ratio()),
            orbit.transform(),
            ViewerCamera,
        ))
        .id()
}

/// Seed the viewport with the primary window's size.
pub fn init_viewport_state(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut viewport: ResMut<ViewportState>,
) {
    if let Ok(window) = windows.single() {
        viewport.resize(window.width(), window.height(), window.scale_factor());
    }
}

/// Apply window resizes to the viewport and camera aspect, then redraw at
/// once instead of waiting for the next frame.
pub fn handle_window_resize(
    mut resize_events: EventReader<WindowResized>,
    windows: Query<&Window>,
    mut viewport: ResMut<ViewportState>,
    mut camera_query: Query<&mut Projection, With<ViewerCamera>>,
    mut redraw: EventWriter<RequestRedraw>,
) {
    // Only the final size of a burst matters.
    let Some(resized) = resize_events.read().last() else {
        return;
    };

    let scale_factor = windows
        .get(resized.window)
        .map(|window| window.scale_factor())
        .unwrap_or(viewport.scale_factor);
    viewport.resize(resized.width, resized.height, scale_factor);

    for mut projection in &mut camera_query {
        if let Projection::Perspective(perspective) = &mut *projection {
            perspective.aspect_ratio = viewport.aspect_ratio();
        }
    }

    debug!(
        "Viewport resized to {}x{} ({:?} physical)",
        viewport.width,
        viewport.height,
        viewport.physical_size()
    );
    redraw.write(RequestRedraw);
}

use bevy::color::Color;
use bevy::math::Vec3;

/// Vertical field of view of the perspective camera, in degrees.
pub const CAMERA_FOV_DEGREES: f32 = 60.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_START_POSITION: Vec3 = Vec3::new(0.0, -10.0, 10.0);

/// Sky blue (#87CEEB).
pub const BACKGROUND_COLOUR: Color = Color::srgb(0.529, 0.808, 0.922);

pub const AMBIENT_LIGHT_BRIGHTNESS: f32 = 500.0;
pub const DIRECTIONAL_LIGHT_ILLUMINANCE: f32 = 8_000.0;
/// Direction the directional light shines from (normalised at spawn).
pub const DIRECTIONAL_LIGHT_FROM: Vec3 = Vec3::new(1.0, 1.0, 1.0);

/// Exponential smoothing applied to orbit motion each frame.
pub const ORBIT_DAMPING_FACTOR: f32 = 0.05;
pub const ORBIT_MIN_DISTANCE: f32 = 0.01;
pub const ORBIT_MAX_DISTANCE: f32 = f32::INFINITY;
/// Dolly scale per wheel line.
pub const ORBIT_ZOOM_STEP: f32 = 0.95;
/// Pixel-unit scroll events are converted to lines with this divisor.
pub const ORBIT_PIXELS_PER_LINE: f32 = 100.0;

/// Auto-fit backs the camera off along this direction (normalised at use).
pub const FIT_VIEW_DIRECTION: Vec3 = Vec3::new(1.0, -1.0, 0.5);
pub const FIT_DISTANCE_MARGIN: f32 = 1.5;
pub const FIT_FAR_PLANE_MULTIPLIER: f32 = 4.0;

pub const TOGGLE_BUTTON_LEFT_PX: f32 = 10.0;
pub const TOGGLE_BUTTON_TOP_PX: f32 = 10.0;
pub const TOGGLE_BUTTON_SPACING_PX: f32 = 30.0;
pub const OVERLAY_FONT_SIZE: f32 = 16.0;

/// Seconds between fps notifications sent to the host page.
pub const FPS_NOTIFY_INTERVAL_SECS: f32 = 0.5;

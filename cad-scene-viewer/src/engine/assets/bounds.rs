use bevy::prelude::*;
use bevy::render::primitives::Aabb;

/// World-space axis-aligned box enclosing the visible scene geometry.
/// Used by the camera fit to derive the framing sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl SceneBounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
        }
    }

    /// Union of mesh boxes, each given in its entity's local space.
    /// Returns `None` when nothing was supplied.
    pub fn from_local_boxes<'a>(
        boxes: impl IntoIterator<Item = (&'a Aabb, &'a GlobalTransform)>,
    ) -> Option<Self> {
        boxes
            .into_iter()
            .map(|(aabb, transform)| Self::from_local_box(aabb, transform))
            .reduce(|acc, next| acc.union(&next))
    }

    /// World-space box around the eight transformed corners of a local `Aabb`.
    pub fn from_local_box(aabb: &Aabb, transform: &GlobalTransform) -> Self {
        let center = Vec3::from(aabb.center);
        let half = Vec3::from(aabb.half_extents);

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for corner in 0..8 {
            let sign = Vec3::new(
                if corner & 1 == 0 { -1.0 } else { 1.0 },
                if corner & 2 == 0 { -1.0 } else { 1.0 },
                if corner & 4 == 0 { -1.0 } else { 1.0 },
            );
            let world = transform.transform_point(center + half * sign);
            min = min.min(world);
            max = max.max(world);
        }

        Self::new(min, max)
    }

    pub fn union(&self, other: &Self) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Calculate center point for camera targeting.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Calculate size dimensions along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Largest of the three extents.
    pub fn max_extent(&self) -> f32 {
        self.size().max_element()
    }
}

//! World collaborators - spawn point, target zone, and wicket surfaces
//!
//! The bowling core reads these once per delivery; everything else about the
//! scene (meshes, materials, batsman) lives outside this crate.

use bevy::prelude::*;

use crate::constants::*;

/// Marker for the ball release transform
#[derive(Component)]
pub struct SpawnPoint;

/// Pitching zone the machine aims into.
///
/// Four world-space corners when authored explicitly; otherwise the entity's
/// `Transform` supplies a center and scale-derived extents.
#[derive(Component, Default)]
pub struct TargetZone {
    pub corners: Option<[Vec3; 4]>,
}

/// Wicket collision volume (axis-aligned box around the stumps)
#[derive(Component)]
pub struct Wicket {
    pub half_extents: Vec3,
}

/// Surface classification for contact routing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    PitchingArea,
    Ground,
    Wicket,
}

/// Axis-aligned rectangle in the horizontal plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneRect {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
    pub ground_y: f32,
}

impl ZoneRect {
    /// Bounding rectangle of four corners. Taking the min/max over all corners
    /// keeps min <= max even when the corners are authored in reverse order.
    pub fn from_corners(corners: &[Vec3; 4]) -> Self {
        let mut min_x = corners[0].x;
        let mut max_x = corners[0].x;
        let mut min_z = corners[0].z;
        let mut max_z = corners[0].z;
        for c in &corners[1..] {
            min_x = min_x.min(c.x);
            max_x = max_x.max(c.x);
            min_z = min_z.min(c.z);
            max_z = max_z.max(c.z);
        }
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
            ground_y: corners[0].y,
        }
    }

    /// Fallback rectangle from a zone center transform and its scale
    pub fn from_center_scale(transform: &Transform) -> Self {
        let center = transform.translation;
        let half_x = (transform.scale.x / 2.0).abs();
        let half_z = (transform.scale.z / 2.0).abs();
        Self {
            min_x: center.x - half_x,
            max_x: center.x + half_x,
            min_z: center.z - half_z,
            max_z: center.z + half_z,
            ground_y: center.y,
        }
    }

    pub fn center(&self) -> Vec3 {
        Vec3::new(
            (self.min_x + self.max_x) / 2.0,
            self.ground_y,
            (self.min_z + self.max_z) / 2.0,
        )
    }

    pub fn contains_xz(&self, x: f32, z: f32) -> bool {
        x >= self.min_x && x <= self.max_x && z >= self.min_z && z <= self.max_z
    }
}

/// Spawn the standard pitch layout: release point behind the bowling crease,
/// a good-length pitching zone in front of the batsman, and the wicket.
pub fn spawn_pitch(mut commands: Commands) {
    commands.spawn((
        SpawnPoint,
        Transform::from_translation(Vec3::new(0.0, RELEASE_HEIGHT, RELEASE_Z)),
    ));

    let half_w = PITCH_WIDTH / 2.0;
    commands.spawn((
        TargetZone {
            corners: Some([
                Vec3::new(-half_w, GROUND_Y, ZONE_NEAR_Z),
                Vec3::new(half_w, GROUND_Y, ZONE_NEAR_Z),
                Vec3::new(half_w, GROUND_Y, ZONE_FAR_Z),
                Vec3::new(-half_w, GROUND_Y, ZONE_FAR_Z),
            ]),
        },
        Transform::from_translation(Vec3::new(
            0.0,
            GROUND_Y,
            (ZONE_NEAR_Z + ZONE_FAR_Z) / 2.0,
        )),
    ));

    commands.spawn((
        Wicket {
            half_extents: WICKET_HALF_EXTENTS,
        },
        Transform::from_translation(WICKET_POS),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_corners() {
        let rect = ZoneRect::from_corners(&[
            Vec3::new(-1.0, 0.0, -7.0),
            Vec3::new(1.0, 0.0, -7.0),
            Vec3::new(1.0, 0.0, -2.0),
            Vec3::new(-1.0, 0.0, -2.0),
        ]);
        assert_eq!(rect.min_x, -1.0);
        assert_eq!(rect.max_x, 1.0);
        assert_eq!(rect.min_z, -7.0);
        assert_eq!(rect.max_z, -2.0);
    }

    #[test]
    fn test_rect_from_reversed_corners() {
        // Corners authored in reverse winding still produce min <= max
        let rect = ZoneRect::from_corners(&[
            Vec3::new(1.0, 0.0, -2.0),
            Vec3::new(-1.0, 0.0, -2.0),
            Vec3::new(-1.0, 0.0, -7.0),
            Vec3::new(1.0, 0.0, -7.0),
        ]);
        assert!(rect.min_x <= rect.max_x);
        assert!(rect.min_z <= rect.max_z);
        assert_eq!(rect.min_z, -7.0);
        assert_eq!(rect.max_z, -2.0);
    }

    #[test]
    fn test_rect_from_center_scale() {
        let transform = Transform {
            translation: Vec3::new(0.0, 0.0, -4.5),
            scale: Vec3::new(3.0, 1.0, 5.0),
            ..Default::default()
        };
        let rect = ZoneRect::from_center_scale(&transform);
        assert_eq!(rect.min_x, -1.5);
        assert_eq!(rect.max_x, 1.5);
        assert_eq!(rect.min_z, -7.0);
        assert_eq!(rect.max_z, -2.0);
    }

    #[test]
    fn test_contains_xz() {
        let rect = ZoneRect {
            min_x: -1.0,
            max_x: 1.0,
            min_z: -7.0,
            max_z: -2.0,
            ground_y: 0.0,
        };
        assert!(rect.contains_xz(0.0, -4.0));
        assert!(!rect.contains_xz(2.0, -4.0));
        assert!(!rect.contains_xz(0.0, 0.0));
    }
}

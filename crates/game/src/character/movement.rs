use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;


/// World-space velocity applied by the move step, in units per second.
#[derive(Component, Reflect, Default, Deref, DerefMut, Clone, Copy, Debug, PartialEq)]
#[reflect(Component)]
pub struct Velocity(pub Vec3);


/// Rectangular play field on the ground plane. Movement is clamped to the
/// rectangle shrunk by `margin` on every side.
#[derive(Resource, Reflect, Clone, Debug, Serialize, Deserialize, PartialEq)]
#[reflect(Resource)]
pub struct PlayArea {
    pub center: Vec3,
    pub half_extents: Vec2, // x, z
    pub margin: f32,
}

impl PlayArea {
    // Half extents after the margin is taken off
    fn inner(&self) -> Vec2 {
        (self.half_extents - Vec2::splat(self.margin)).max(Vec2::ZERO)
    }

    pub fn clamp(&self, position: Vec3) -> Vec3 {
        let inner = self.inner();
        Vec3::new(
            position.x.clamp(self.center.x - inner.x, self.center.x + inner.x),
            position.y,
            position.z.clamp(self.center.z - inner.y, self.center.z + inner.y),
        )
    }

    /// True when `clamp` would leave the position untouched.
    pub fn contains(&self, position: Vec3) -> bool {
        let inner = self.inner();
        (position.x - self.center.x).abs() <= inner.x && (position.z - self.center.z).abs() <= inner.y
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.half_extents.x <= 0.0 || self.half_extents.y <= 0.0 {
            return Err(ConfigError::invalid("play_area.half_extents", "must be positive"));
        }
        if self.margin < 0.0 {
            return Err(ConfigError::invalid("play_area.margin", "must not be negative"));
        }
        Ok(())
    }
}


/// Turns `rotation` toward `direction` by a slerp step of `rotation_speed * dt`.
pub fn face_towards(rotation: Quat, direction: Vec3, rotation_speed: f32, dt: f32) -> Quat {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    if flat.length_squared() < 1e-6 {
        return rotation;
    }
    let target = Transform::IDENTITY.looking_to(flat, Vec3::Y).rotation;
    rotation.slerp(target, (rotation_speed * dt).clamp(0.0, 1.0))
}


#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> PlayArea {
        PlayArea {
            center: Vec3::new(10.0, 0.0, -10.0),
            half_extents: Vec2::new(50.0, 20.0),
            margin: 2.0,
        }
    }

    #[test]
    fn clamp_keeps_inner_points() {
        let p = Vec3::new(15.0, 3.0, -5.0);
        assert_eq!(area().clamp(p), p);
    }

    #[test]
    fn clamp_applies_margin() {
        let clamped = area().clamp(Vec3::new(200.0, 1.0, -200.0));
        assert_eq!(clamped, Vec3::new(58.0, 1.0, -28.0));
    }

    #[test]
    fn oversized_margin_collapses_to_center() {
        let mut a = area();
        a.margin = 100.0;
        assert_eq!(a.clamp(Vec3::new(-3.0, 0.0, 4.0)), Vec3::new(10.0, 0.0, -10.0));
    }

    #[test]
    fn contains_matches_the_clamped_region() {
        let a = area();
        assert!(a.contains(Vec3::new(58.0, 9.0, -28.0)));
        assert!(!a.contains(Vec3::new(59.0, 0.0, -10.0)));
        assert!(!a.contains(Vec3::new(10.0, 0.0, 11.0)));
        for p in [Vec3::new(200.0, 0.0, 3.0), Vec3::new(-90.0, 0.0, -90.0)] {
            assert!(a.contains(a.clamp(p)));
        }
    }

    #[test]
    fn face_towards_full_step_looks_at_direction() {
        let rotation = face_towards(Quat::IDENTITY, Vec3::X, 10.0, 1.0);
        let forward = rotation * Vec3::NEG_Z;
        assert!((forward - Vec3::X).length() < 1e-4);
    }

    #[test]
    fn face_towards_partial_step_is_between() {
        let rotation = face_towards(Quat::IDENTITY, Vec3::X, 0.5, 1.0);
        let forward = rotation * Vec3::NEG_Z;
        assert!(forward.x > 0.1 && forward.z < -0.1);
    }

    #[test]
    fn face_towards_ignores_vertical_direction() {
        let start = Quat::from_rotation_y(0.3);
        assert_eq!(face_towards(start, Vec3::Y, 5.0, 1.0), start);
    }
}

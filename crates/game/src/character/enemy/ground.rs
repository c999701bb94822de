use bevy::prelude::*;


#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundHit {
    pub point: Vec3,
    pub normal: Vec3,
    pub layer: u32,
}

/// Downward ray query against walkable geometry, provided by the host physics.
pub trait GroundProbe: Send + Sync + 'static {
    /// First surface below `origin` within `max_distance`, if any.
    fn cast_down(&self, origin: Vec3, max_distance: f32) -> Option<GroundHit>;
}

#[derive(Resource)]
pub struct Ground(Box<dyn GroundProbe>);

impl Ground {
    pub fn new(probe: impl GroundProbe) -> Self {
        Self(Box::new(probe))
    }

    pub fn probe(&self) -> &dyn GroundProbe {
        self.0.as_ref()
    }
}


/// Infinite horizontal plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatGround {
    pub height: f32,
    pub layer: u32,
}

impl Default for FlatGround {
    fn default() -> Self {
        Self { height: 0.0, layer: 0 }
    }
}

impl GroundProbe for FlatGround {
    fn cast_down(&self, origin: Vec3, max_distance: f32) -> Option<GroundHit> {
        let drop = origin.y - self.height;
        if drop < 0.0 || drop > max_distance {
            return None;
        }
        Some(GroundHit {
            point: Vec3::new(origin.x, self.height, origin.z),
            normal: Vec3::Y,
            layer: self.layer,
        })
    }
}


/// Axis-aligned patch of ground covering `min..=max` on the x/z plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPatch {
    pub min: Vec2,
    pub max: Vec2,
    pub height: f32,
    pub normal: Vec3,
    pub layer: u32,
}

impl GroundPatch {
    pub fn flat(min: Vec2, max: Vec2, height: f32, layer: u32) -> Self {
        Self { min, max, height, normal: Vec3::Y, layer }
    }

    fn covers(&self, x: f32, z: f32) -> bool {
        x >= self.min.x && x <= self.max.x && z >= self.min.y && z <= self.max.y
    }
}

/// A set of patches; outside every patch the probe misses.
/// Where patches overlap the highest one below the origin wins.
#[derive(Debug, Clone, Default)]
pub struct GroundPatches(pub Vec<GroundPatch>);

impl GroundProbe for GroundPatches {
    fn cast_down(&self, origin: Vec3, max_distance: f32) -> Option<GroundHit> {
        self.0
            .iter()
            .filter(|patch| patch.covers(origin.x, origin.z))
            .filter(|patch| {
                let drop = origin.y - patch.height;
                drop >= 0.0 && drop <= max_distance
            })
            .max_by(|a, b| a.height.total_cmp(&b.height))
            .map(|patch| GroundHit {
                point: Vec3::new(origin.x, patch.height, origin.z),
                normal: patch.normal.normalize_or_zero(),
                layer: patch.layer,
            })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_ground_hits_within_range() {
        let ground = FlatGround { height: 2.0, layer: 3 };
        let hit = ground.cast_down(Vec3::new(5.0, 102.0, -1.0), 200.0).unwrap();
        assert_eq!(hit.point, Vec3::new(5.0, 2.0, -1.0));
        assert_eq!(hit.normal, Vec3::Y);
        assert_eq!(hit.layer, 3);
    }

    #[test]
    fn flat_ground_misses_out_of_range_or_above() {
        let ground = FlatGround { height: 0.0, layer: 0 };
        assert!(ground.cast_down(Vec3::new(0.0, 300.0, 0.0), 200.0).is_none());
        assert!(ground.cast_down(Vec3::new(0.0, -1.0, 0.0), 200.0).is_none());
    }

    #[test]
    fn patches_pick_highest_surface_below_origin() {
        let patches = GroundPatches(vec![
            GroundPatch::flat(Vec2::splat(-10.0), Vec2::splat(10.0), 0.0, 0),
            GroundPatch::flat(Vec2::splat(-2.0), Vec2::splat(2.0), 4.0, 1),
            GroundPatch::flat(Vec2::splat(-1.0), Vec2::splat(1.0), 50.0, 2),
        ]);

        let hit = patches.cast_down(Vec3::new(0.0, 20.0, 0.0), 100.0).unwrap();
        assert_eq!(hit.layer, 1);
        assert_eq!(hit.point.y, 4.0);

        let hit = patches.cast_down(Vec3::new(5.0, 20.0, 5.0), 100.0).unwrap();
        assert_eq!(hit.layer, 0);

        assert!(patches.cast_down(Vec3::new(30.0, 20.0, 0.0), 100.0).is_none());
    }
}

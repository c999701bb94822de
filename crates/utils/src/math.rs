use bevy::math::{Vec2, Vec3};


/// Direction from `from` to `to` projected on the ground plane (y ignored).
/// Zero when both points share the same column.
pub fn horizontal_direction(from: Vec3, to: Vec3) -> Vec3 {
    let mut delta = to - from;
    delta.y = 0.0;
    delta.normalize_or_zero()
}

pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

/// Unit vector on the ground plane for an angle in radians, measured from +x toward +z.
pub fn ground_offset(angle: f32, distance: f32) -> Vec3 {
    Vec3::new(angle.cos(), 0.0, angle.sin()) * distance
}

/// Scales a damage amount and rounds half away from zero.
pub fn scale_round(amount: i32, multiplier: f32) -> i32 {
    (amount as f32 * multiplier).round() as i32
}

// UI FUNCTION
pub fn format_clock(seconds: f32) -> String {
    let total = seconds.max(0.0).floor() as u32;
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_direction_ignores_height() {
        let dir = horizontal_direction(Vec3::new(0.0, 0.0, 0.0), Vec3::new(3.0, 50.0, 4.0));
        assert!((dir - Vec3::new(0.6, 0.0, 0.8)).length() < 1e-5);
        assert_eq!(horizontal_direction(Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0)), Vec3::ZERO);
    }

    #[test]
    fn test_horizontal_distance() {
        assert_eq!(horizontal_distance(Vec3::new(1.0, 9.0, 1.0), Vec3::new(4.0, -2.0, 5.0)), 5.0);
    }

    #[test]
    fn test_ground_offset_length() {
        for i in 0..16 {
            let v = ground_offset(i as f32 * 0.4, 12.0);
            assert!((v.length() - 12.0).abs() < 1e-4);
            assert_eq!(v.y, 0.0);
        }
    }

    #[test]
    fn test_scale_round() {
        assert_eq!(scale_round(25, 2.0), 50);
        assert_eq!(scale_round(25, 1.5), 38);
        assert_eq!(scale_round(10, 0.25), 3);
        assert_eq!(scale_round(0, 3.0), 0);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(75.9), "01:15");
        assert_eq!(format_clock(3600.0), "60:00");
        assert_eq!(format_clock(-4.0), "00:00");
    }
}

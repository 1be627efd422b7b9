// ============================================================================
// ANGLE PROJECTION
// ============================================================================

use crate::trig::{TrigLookup, TRIG_MAX_ANGLE, TRIG_MAX_RATIO};

/// Integer pixel position on the presentation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A point on a circle plus the rotation a marker drawn there should take,
/// in `TRIG_MAX_ANGLE` units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    pub point: ScreenPoint,
    pub rotation: i32,
}

/// Converts whole degrees to fixed-point angle units.
///
/// Uses floor division so that `degrees` and `degrees + 360` always land
/// exactly one full turn apart, whatever their signs.
pub fn degrees_to_angle(degrees: i32) -> i32 {
    (i64::from(TRIG_MAX_ANGLE) * i64::from(degrees)).div_euclid(360) as i32
}

/// Places `degrees` (clockwise from 12 o'clock) on a circle of `radius`
/// around `center`.
pub fn project<T: TrigLookup + ?Sized>(
    trig: &T,
    center: ScreenPoint,
    degrees: i32,
    radius: i32,
) -> Projection {
    let angle = degrees_to_angle(degrees);
    let point = ScreenPoint {
        x: center.x + scale_ratio(trig.sin_lookup(angle), radius),
        y: center.y - scale_ratio(trig.cos_lookup(angle), radius),
    };
    Projection {
        point,
        rotation: angle,
    }
}

fn scale_ratio(ratio: i32, radius: i32) -> i32 {
    // |ratio| <= TRIG_MAX_RATIO, so the quotient fits back into an i32.
    div_round(
        i64::from(ratio) * i64::from(radius),
        i64::from(TRIG_MAX_RATIO),
    ) as i32
}

// Rounds half away from zero, so `div_round(-n, d) == -div_round(n, d)`.
fn div_round(numerator: i64, denominator: i64) -> i64 {
    let half = denominator / 2;
    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trig::SineTable;

    const CENTER: ScreenPoint = ScreenPoint::new(72, 84);

    #[test]
    fn test_cardinal_positions() {
        let trig = SineTable::new();
        assert_eq!(project(&trig, CENTER, 0, 55).point, ScreenPoint::new(72, 29));
        assert_eq!(project(&trig, CENTER, 90, 55).point, ScreenPoint::new(127, 84));
        assert_eq!(project(&trig, CENTER, 180, 55).point, ScreenPoint::new(72, 139));
        assert_eq!(project(&trig, CENTER, 270, 55).point, ScreenPoint::new(17, 84));
        assert_eq!(project(&trig, CENTER, -90, 55).point, ScreenPoint::new(17, 84));
    }

    #[test]
    fn test_rotation_is_angle_units() {
        let trig = SineTable::new();
        assert_eq!(project(&trig, CENTER, 90, 55).rotation, TRIG_MAX_ANGLE / 4);
        assert_eq!(project(&trig, CENTER, -90, 55).rotation, -TRIG_MAX_ANGLE / 4);
        assert_eq!(project(&trig, CENTER, 1, 55).rotation, 182);
        assert_eq!(project(&trig, CENTER, -1, 55).rotation, -183);
    }

    #[test]
    fn test_full_turn_periodicity() {
        let trig = SineTable::new();
        for degrees in (-720..720).step_by(7) {
            let a = project(&trig, CENTER, degrees, 55);
            let b = project(&trig, CENTER, degrees + 360, 55);
            assert_eq!(a.point, b.point, "degrees {degrees}");
            assert_eq!(b.rotation - a.rotation, TRIG_MAX_ANGLE);
        }
    }

    #[test]
    fn test_quarter_offsets_are_square() {
        let trig = SineTable::new();
        for base in [-337, -45, -1, 0, 13, 100, 222, 359] {
            let points: Vec<ScreenPoint> = [0, 90, 180, 270]
                .iter()
                .map(|offset| project(&trig, CENTER, base + offset, 55).point)
                .collect();
            let deltas: Vec<(i32, i32)> = points
                .iter()
                .map(|p| (p.x - CENTER.x, p.y - CENTER.y))
                .collect();
            for pair in deltas.windows(2) {
                let (dx, dy) = pair[0];
                // A quarter turn clockwise in y-down screen space.
                assert_eq!(pair[1], (-dy, dx), "base {base}");
            }
            for (dx, dy) in deltas {
                let distance = ((dx * dx + dy * dy) as f64).sqrt();
                assert!((distance - 55.0).abs() <= 1.0, "base {base}: {distance}");
            }
        }
    }

    #[test]
    fn test_large_radius_does_not_overflow() {
        let trig = SineTable::new();
        let origin = ScreenPoint::new(0, 0);
        let radius = 1_000_000;
        assert_eq!(project(&trig, origin, 0, radius).point, ScreenPoint::new(0, -radius));
        assert_eq!(project(&trig, origin, 90, radius).point, ScreenPoint::new(radius, 0));
        assert_eq!(project(&trig, origin, 180, radius).point, ScreenPoint::new(0, radius));
        assert_eq!(project(&trig, origin, -90, radius).point, ScreenPoint::new(-radius, 0));
    }

    #[test]
    fn test_negative_rounding_is_symmetric() {
        assert_eq!(div_round(32767, 65535), 0);
        assert_eq!(div_round(32768, 65535), 1);
        assert_eq!(div_round(-32768, 65535), -1);
        assert_eq!(div_round(-32767, 65535), 0);
    }
}

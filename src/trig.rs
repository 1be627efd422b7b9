// ============================================================================
// FIXED-POINT TRIGONOMETRY
// ============================================================================

/// One full turn in fixed-point angle units.
pub const TRIG_MAX_ANGLE: i32 = 0x10000;

/// The value `sin`/`cos` lookups return for 1.0.
pub const TRIG_MAX_RATIO: i32 = 0xffff;

const QUARTER_TURN: i32 = TRIG_MAX_ANGLE / 4;

/// Integer sine/cosine over the `TRIG_MAX_ANGLE` domain.
///
/// Any `i32` angle is accepted; implementations are periodic in
/// `TRIG_MAX_ANGLE`, so negative angles and multiples of a full turn are fine.
pub trait TrigLookup {
    fn sin_lookup(&self, angle: i32) -> i32;

    fn cos_lookup(&self, angle: i32) -> i32 {
        self.sin_lookup(angle.wrapping_add(QUARTER_TURN))
    }
}

/// Quarter-wave sine table with `TRIG_MAX_ANGLE / 4 + 1` entries.
#[derive(Debug, Clone)]
pub struct SineTable {
    quarter: Vec<i32>,
}

impl SineTable {
    pub fn new() -> Self {
        let quarter = (0..=QUARTER_TURN)
            .map(|i| {
                let radians = i as f64 * std::f64::consts::TAU / TRIG_MAX_ANGLE as f64;
                (radians.sin() * TRIG_MAX_RATIO as f64).round() as i32
            })
            .collect();
        Self { quarter }
    }
}

impl Default for SineTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TrigLookup for SineTable {
    fn sin_lookup(&self, angle: i32) -> i32 {
        // Masking is the periodic reduction, including for negative angles.
        let angle = angle & (TRIG_MAX_ANGLE - 1);
        let quadrant = angle / QUARTER_TURN;
        let offset = (angle % QUARTER_TURN) as usize;
        let span = QUARTER_TURN as usize;
        match quadrant {
            0 => self.quarter[offset],
            1 => self.quarter[span - offset],
            2 => -self.quarter[offset],
            _ => -self.quarter[span - offset],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // sin(degrees) * 0xffff, rounded, for a sample of whole-degree angles.
    const REFERENCE: [(i32, i32); 9] = [
        (0, 0),
        (30, 32768),
        (45, 46340),
        (60, 56755),
        (90, 65535),
        (135, 46340),
        (180, 0),
        (270, -65535),
        (315, -46340),
    ];

    fn units(degrees: i32) -> i32 {
        (TRIG_MAX_ANGLE * degrees).div_euclid(360)
    }

    #[test]
    fn test_matches_reference_table() {
        let table = SineTable::new();
        for (degrees, expected) in REFERENCE {
            let got = table.sin_lookup(units(degrees));
            // Whole degrees do not land exactly on table entries.
            assert!(
                (got - expected).abs() <= 3,
                "sin({degrees}) = {got}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_cardinal_points_exact() {
        let table = SineTable::new();
        assert_eq!(table.sin_lookup(0), 0);
        assert_eq!(table.sin_lookup(QUARTER_TURN), TRIG_MAX_RATIO);
        assert_eq!(table.sin_lookup(2 * QUARTER_TURN), 0);
        assert_eq!(table.sin_lookup(3 * QUARTER_TURN), -TRIG_MAX_RATIO);
        assert_eq!(table.cos_lookup(0), TRIG_MAX_RATIO);
        assert_eq!(table.cos_lookup(2 * QUARTER_TURN), -TRIG_MAX_RATIO);
    }

    #[test]
    fn test_periodic_and_odd() {
        let table = SineTable::new();
        for angle in [1, 182, 5000, 16383, 30000, 49151, 65535] {
            assert_eq!(table.sin_lookup(angle), table.sin_lookup(angle + TRIG_MAX_ANGLE));
            assert_eq!(table.sin_lookup(angle), table.sin_lookup(angle - 3 * TRIG_MAX_ANGLE));
            assert_eq!(table.sin_lookup(-angle), -table.sin_lookup(angle));
            assert_eq!(table.cos_lookup(-angle), table.cos_lookup(angle));
        }
    }
}

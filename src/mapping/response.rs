//! Fixed power-curve response from raw axis readings to pixel displacement.
//!
//! The curve is super-linear: small deflections barely move the pointer while
//! full deflection covers about two dozen pixels per cycle.

use crate::controller::axis_state::AxisSnapshot;

/// Normalizes the +/-32767 range to roughly [0, 3.28]
pub const CURVE_SCALE: f64 = 0.0001;
pub const CURVE_EXPONENT: f64 = 2.7;

/// Pixel displacement for one output cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Motion {
    pub dx: i32,
    pub dy: i32,
}

impl Motion {
    pub fn from_snapshot(snapshot: AxisSnapshot) -> Self {
        Self {
            dx: map_axis(snapshot.horizontal),
            dy: map_axis(snapshot.vertical),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

/// Maps a raw axis value to a signed pixel delta.
///
/// The curve is applied to the magnitude only, since a fractional power of a
/// negative base is undefined; the sign is restored afterwards. The result is
/// truncated toward zero.
pub fn map_axis(raw_value: i32) -> i32 {
    let normalized = f64::from(raw_value.unsigned_abs()) * CURVE_SCALE;
    let magnitude = normalized.powf(CURVE_EXPONENT) as i32;
    if raw_value < 0 {
        -magnitude
    } else {
        magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_maps_to_zero() {
        assert_eq!(map_axis(0), 0);
    }

    #[test]
    fn test_known_points() {
        // 0.5^2.7 ~= 0.154
        assert_eq!(map_axis(5000), 0);
        assert_eq!(map_axis(-10000), -1);
        assert_eq!(map_axis(10000), 1);
        // 2^2.7 ~= 6.50
        assert_eq!(map_axis(20000), 6);
        // 3.2767^2.7 ~= 24.6
        assert_eq!(map_axis(32767), 24);
        assert_eq!(map_axis(-32768), -24);
        assert_eq!(map_axis(i32::MIN), i32::MIN + 1);
    }

    #[test]
    fn test_odd_symmetry() {
        for v in (1..=32767).step_by(97) {
            assert_eq!(map_axis(-v), -map_axis(v), "value {}", v);
        }
    }

    #[test]
    fn test_sign_never_flips() {
        for v in (-32768..=32767).step_by(131) {
            let px = map_axis(v);
            if v >= 0 {
                assert!(px >= 0, "value {} mapped to {}", v, px);
            } else {
                assert!(px <= 0, "value {} mapped to {}", v, px);
            }
        }
    }

    #[test]
    fn test_monotonic_in_magnitude() {
        let mut previous = map_axis(0);
        for v in 1..=32767 {
            let current = map_axis(v);
            assert!(current >= previous, "map({}) = {} < {}", v, current, previous);
            previous = current;
        }
    }

    #[test]
    fn test_motion_from_snapshot() {
        let motion = Motion::from_snapshot(AxisSnapshot {
            horizontal: 5000,
            vertical: -10000,
        });
        assert_eq!(motion, Motion { dx: 0, dy: -1 });
        assert!(!motion.is_zero());
        assert!(Motion::from_snapshot(AxisSnapshot::default()).is_zero());
    }
}

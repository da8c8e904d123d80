//! Small math helpers shared by the controls.
//!
//! Everything here is pure and allocation-free: response curves for analog
//! sticks, dead-zone filtering, linear remapping and the spherical-coordinate
//! conversions the first-person controls use to keep their orientation as a
//! pair of angles.
//!
//! Spherical coordinates follow the usual graphics convention with `+Y` up:
//! `phi` is the polar angle measured from `+Y`, `theta` the azimuth measured
//! from `+Z` towards `+X`.

use glam::{Mat3, Quat, Vec3};

/// Directions shorter than this are treated as zero-length.
pub const DIRECTION_EPSILON: f32 = 1e-6;

// ─── Response curves ───────────────────────────────────────────────────────

/// A cubic Bézier timing curve anchored at `(0, 0)` and `(1, 1)`.
///
/// Works like a CSS `cubic-bezier(x1, y1, x2, y2)` timing function: the input
/// is the *x* coordinate, the output the *y* coordinate of the curve at that
/// x.  Both control point x values must lie in `[0, 1]` for the curve to be a
/// function of x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CubicBezier {
    /// Ease-in/ease-out used for gamepad look axes: slow near the centre of
    /// the stick, full speed at full deflection.
    pub const STICK_RESPONSE: Self = Self::new(0.33, 0.0, 1.0, 0.66);

    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    #[inline]
    fn coefficients(p1: f32, p2: f32) -> (f32, f32, f32) {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        (a, b, c)
    }

    #[inline]
    fn sample(p1: f32, p2: f32, t: f32) -> f32 {
        let (a, b, c) = Self::coefficients(p1, p2);
        ((a * t + b) * t + c) * t
    }

    #[inline]
    fn sample_derivative(p1: f32, p2: f32, t: f32) -> f32 {
        let (a, b, c) = Self::coefficients(p1, p2);
        (3.0 * a * t + 2.0 * b) * t + c
    }

    /// Curve parameter `t` whose x coordinate equals `x`.
    fn solve_t(&self, x: f32) -> f32 {
        // Newton first; it converges in a handful of steps except where the
        // slope flattens out (x2 == 1 makes dx/dt vanish at t = 1).
        let mut t = x;
        for _ in 0..8 {
            let err = Self::sample(self.x1, self.x2, t) - x;
            if err.abs() < 1e-6 {
                return t;
            }
            let d = Self::sample_derivative(self.x1, self.x2, t);
            if d.abs() < 1e-6 {
                break;
            }
            t -= err / d;
        }

        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        t = x;
        for _ in 0..32 {
            let v = Self::sample(self.x1, self.x2, t);
            if (v - x).abs() < 1e-6 {
                break;
            }
            if v < x {
                lo = t;
            } else {
                hi = t;
            }
            t = 0.5 * (lo + hi);
        }
        t
    }

    /// Evaluate the curve at `x`.  Input is clamped to `[0, 1]`.
    pub fn ease(&self, x: f32) -> f32 {
        if !x.is_finite() || x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        Self::sample(self.y1, self.y2, self.solve_t(x))
    }

    /// Evaluate on the magnitude of `v` and restore the sign afterwards, so
    /// `ease_signed(-v) == -ease_signed(v)`.
    pub fn ease_signed(&self, v: f32) -> f32 {
        let eased = self.ease(v.abs());
        if v < 0.0 {
            -eased
        } else {
            eased
        }
    }
}

impl Default for CubicBezier {
    fn default() -> Self {
        Self::STICK_RESPONSE
    }
}

// ─── Scalar helpers ────────────────────────────────────────────────────────

/// Returns exactly `0.0` for readings whose magnitude is below `threshold`
/// (and for NaN/inf readings), the reading itself otherwise.
#[inline]
pub fn apply_dead_zone(value: f32, threshold: f32) -> f32 {
    if !value.is_finite() || value.abs() < threshold {
        0.0
    } else {
        value
    }
}

/// Linear remap of `x` from `[a1, a2]` to `[b1, b2]`.  Not clamped.
#[inline]
pub fn map_linear(x: f32, a1: f32, a2: f32, b1: f32, b2: f32) -> f32 {
    b1 + (x - a1) * (b2 - b1) / (a2 - a1)
}

// ─── Spherical coordinates ─────────────────────────────────────────────────

/// Unit vector for polar angle `phi` and azimuth `theta` (radians).
#[inline]
pub fn direction_from_spherical(phi: f32, theta: f32) -> Vec3 {
    let s = phi.sin();
    Vec3::new(s * theta.sin(), phi.cos(), s * theta.cos())
}

/// Inverse of [`direction_from_spherical`]: `(phi, theta)` for `dir`.
///
/// Returns `None` for (near) zero-length input, where no angle is defined.
pub fn spherical_from_direction(dir: Vec3) -> Option<(f32, f32)> {
    let len = dir.length();
    if !len.is_finite() || len < DIRECTION_EPSILON {
        return None;
    }
    let theta = dir.x.atan2(dir.z);
    let phi = (dir.y / len).clamp(-1.0, 1.0).acos();
    Some((phi, theta))
}

/// Rotation that turns a camera's forward axis (`-Z`) towards `dir`, keeping
/// its local `+Y` as close to `up` as possible.
///
/// When `dir` is parallel to `up` the basis is nudged slightly so the result
/// stays well defined.  Returns `None` for a zero-length direction.
pub fn look_rotation(dir: Vec3, up: Vec3) -> Option<Quat> {
    if !dir.is_finite() || dir.length_squared() < DIRECTION_EPSILON * DIRECTION_EPSILON {
        return None;
    }
    // camera looks down -Z, so its local +Z points away from the target
    let mut back = (-dir).normalize();
    let mut right = up.cross(back);
    if right.length_squared() < DIRECTION_EPSILON * DIRECTION_EPSILON {
        if (up.z.abs() - 1.0).abs() < DIRECTION_EPSILON {
            back.x += 1e-4;
        } else {
            back.z += 1e-4;
        }
        back = back.normalize();
        right = up.cross(back);
    }
    let right = right.normalize();
    let true_up = back.cross(right);
    Some(Quat::from_mat3(&Mat3::from_cols(right, true_up, back)).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn ease_hits_endpoints() {
        let curve = CubicBezier::STICK_RESPONSE;
        assert_eq!(curve.ease(0.0), 0.0);
        assert_eq!(curve.ease(1.0), 1.0);
        assert_eq!(curve.ease(1.5), 1.0);
        assert_eq!(curve.ease(-0.2), 0.0);
    }

    #[test]
    fn ease_is_monotonic_and_soft_near_zero() {
        let curve = CubicBezier::STICK_RESPONSE;
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = curve.ease(i as f32 / 100.0);
            assert!(v + 1e-5 >= prev, "curve decreased at step {i}");
            prev = v;
        }
        // low deflection is damped
        assert!(curve.ease(0.2) < 0.2);
    }

    #[test]
    fn ease_signed_is_odd() {
        let curve = CubicBezier::STICK_RESPONSE;
        for i in 0..=40 {
            let v = i as f32 / 40.0;
            assert_eq!(curve.ease_signed(-v), -curve.ease_signed(v));
        }
    }

    #[test]
    fn linear_curve_is_identity() {
        let linear = CubicBezier::new(0.0, 0.0, 1.0, 1.0);
        for i in 0..=10 {
            let x = i as f32 / 10.0;
            assert!((linear.ease(x) - x).abs() < 1e-4);
        }
    }

    #[test]
    fn dead_zone_zeroes_small_readings() {
        assert_eq!(apply_dead_zone(0.049, 0.05), 0.0);
        assert_eq!(apply_dead_zone(-0.049, 0.05), 0.0);
        assert_eq!(apply_dead_zone(0.05, 0.05), 0.05);
        assert_eq!(apply_dead_zone(-0.8, 0.05), -0.8);
        assert_eq!(apply_dead_zone(f32::NAN, 0.05), 0.0);
    }

    #[test]
    fn map_linear_remaps_range() {
        assert!((map_linear(PI, 0.0, PI, 0.0, FRAC_PI_2) - FRAC_PI_2).abs() < 1e-6);
        assert!((map_linear(0.5, 0.0, 1.0, 10.0, 20.0) - 15.0).abs() < 1e-6);
    }

    #[test]
    fn spherical_roundtrip() {
        let dir = Vec3::new(0.3, -0.4, -0.8).normalize();
        let (phi, theta) = spherical_from_direction(dir).unwrap();
        assert!(direction_from_spherical(phi, theta).abs_diff_eq(dir, 1e-5));
        assert!(spherical_from_direction(Vec3::ZERO).is_none());
    }

    #[test]
    fn look_rotation_points_forward_axis() {
        let dir = Vec3::new(1.0, 0.5, -2.0);
        let q = look_rotation(dir, Vec3::Y).unwrap();
        assert!((q * Vec3::NEG_Z).abs_diff_eq(dir.normalize(), 1e-5));
        // right vector stays horizontal
        assert!((q * Vec3::X).y.abs() < 1e-5);
        assert!(look_rotation(Vec3::ZERO, Vec3::Y).is_none());
    }

    #[test]
    fn look_rotation_straight_up_is_finite() {
        let q = look_rotation(Vec3::Y, Vec3::Y).unwrap();
        assert!(q.is_finite());
        assert!((q * Vec3::NEG_Z).dot(Vec3::Y) > 0.999);
    }
}

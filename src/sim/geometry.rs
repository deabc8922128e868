//! Vector helpers and the circle overlap test
//!
//! All functions are pure. `Vec2` is the playfield vector (y grows downward).

use glam::Vec2;

/// Anything with a circular footprint on the playfield
pub trait GameObject {
    fn position(&self) -> Vec2;
    fn velocity(&self) -> Vec2;
    fn radius(&self) -> f32;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Scale to unit length; the zero vector maps to itself
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    let len = (v.x * v.x + v.y * v.y).sqrt();
    if len == 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(v.x / len, v.y / len)
}

/// Unit vector pointing from `from` toward `to` (zero when they coincide)
#[inline]
pub fn direction(from: Vec2, to: Vec2) -> Vec2 {
    normalize(to - from)
}

/// Clamp `value` into `[min, max]`. Assumes `min <= max`.
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    min.max(value.min(max))
}

/// Strict circle overlap: touching circles do not collide
#[inline]
pub fn collides(a: &impl GameObject, b: &impl GameObject) -> bool {
    distance(a.position(), b.position()) < a.radius() + b.radius()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct Dot {
        pos: Vec2,
        radius: f32,
    }

    impl GameObject for Dot {
        fn position(&self) -> Vec2 {
            self.pos
        }
        fn velocity(&self) -> Vec2 {
            Vec2::ZERO
        }
        fn radius(&self) -> f32 {
            self.radius
        }
    }

    fn dot(x: f32, y: f32, radius: f32) -> Dot {
        Dot {
            pos: Vec2::new(x, y),
            radius,
        }
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(normalize(Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_direction_same_point_is_zero() {
        let p = Vec2::new(12.0, -3.0);
        assert_eq!(direction(p, p), Vec2::ZERO);
    }

    #[test]
    fn test_direction_ignores_magnitude() {
        let near = direction(Vec2::ZERO, Vec2::new(3.0, 4.0));
        let far = direction(Vec2::ZERO, Vec2::new(300.0, 400.0));
        assert!((near - far).length() < 1e-6);
        assert!((near - Vec2::new(0.6, 0.8)).length() < 1e-6);
    }

    #[test]
    fn test_tangent_circles_do_not_collide() {
        let a = dot(0.0, 0.0, 10.0);
        let b = dot(30.0, 0.0, 20.0);
        assert!(!collides(&a, &b));
    }

    #[test]
    fn test_collides_just_inside_and_outside() {
        let a = dot(0.0, 0.0, 10.0);
        assert!(collides(&a, &dot(29.9, 0.0, 20.0)));
        assert!(!collides(&a, &dot(30.1, 0.0, 20.0)));
    }

    #[test]
    fn test_clamp_bounds() {
        assert_eq!(clamp(5.0, 5.0, 10.0), 5.0);
        assert_eq!(clamp(10.0, 5.0, 10.0), 10.0);
        assert_eq!(clamp(-3.0, 5.0, 10.0), 5.0);
        assert_eq!(clamp(42.0, 5.0, 10.0), 10.0);
    }

    fn coord() -> impl Strategy<Value = f32> {
        -1.0e4f32..1.0e4f32
    }

    proptest! {
        #[test]
        fn prop_distance_to_self_is_zero(x in coord(), y in coord()) {
            let p = Vec2::new(x, y);
            prop_assert_eq!(distance(p, p), 0.0);
        }

        #[test]
        fn prop_distance_is_symmetric(ax in coord(), ay in coord(), bx in coord(), by in coord()) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assert_eq!(distance(a, b), distance(b, a));
            prop_assert!(distance(a, b) >= 0.0);
        }

        #[test]
        fn prop_normalize_is_unit_and_parallel(x in coord(), y in coord()) {
            prop_assume!(x.abs() > 1e-3 || y.abs() > 1e-3);
            let v = Vec2::new(x, y);
            let n = normalize(v);
            prop_assert!((n.length() - 1.0).abs() < 1e-4);
            prop_assert!(n.x == 0.0 || n.x.signum() == x.signum());
            prop_assert!(n.y == 0.0 || n.y.signum() == y.signum());
            // parallel: cross product vanishes
            prop_assert!((n.x * v.y - n.y * v.x).abs() <= 1e-3 * v.length());
        }

        #[test]
        fn prop_clamp_stays_in_range(v in coord(), lo in -500.0f32..0.0, span in 0.0f32..500.0) {
            let hi = lo + span;
            let c = clamp(v, lo, hi);
            prop_assert!(c >= lo && c <= hi);
        }
    }
}

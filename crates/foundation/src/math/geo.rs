use super::vec::Vec3;

/// Reference globe radius in scene units.
pub const GLOBE_RADIUS: f64 = 100.0;

/// Angular separation (radians) below which two points are treated as
/// coincident by [`slerp`].
const DEGENERATE_ANGLE: f64 = 1e-7;

const D2R: f64 = std::f64::consts::PI / 180.0;
const R2D: f64 = 180.0 / std::f64::consts::PI;

/// A WGS84-style longitude/latitude pair in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LngLat {
    pub lng_deg: f64,
    pub lat_deg: f64,
}

impl LngLat {
    pub const fn new(lng_deg: f64, lat_deg: f64) -> Self {
        Self { lng_deg, lat_deg }
    }

    /// Unit-sphere Cartesian representation (z toward lng 0, y toward the pole).
    pub fn to_unit(self) -> Vec3 {
        let p = self.lat_deg * D2R;
        let l = self.lng_deg * D2R;
        Vec3::new(p.cos() * l.sin(), p.sin(), p.cos() * l.cos())
    }

    /// The `[0, 0]` sentinel used for unresolved country centroids.
    pub fn is_sentinel(self) -> bool {
        self.lng_deg == 0.0 && self.lat_deg == 0.0
    }
}

/// Spherical linear interpolation between two surface points.
///
/// When the angular separation is below a small epsilon, `a` is returned
/// unchanged instead of dividing by a vanishing `sin`.
pub fn slerp(a: LngLat, b: LngLat, t: f64) -> LngLat {
    let va = a.to_unit();
    let vb = b.to_unit();
    let omega = va.dot(vb).clamp(-1.0, 1.0).acos();
    if omega.abs() < DEGENERATE_ANGLE {
        return a;
    }

    let s = omega.sin();
    let fa = (((1.0 - t) * omega).sin()) / s;
    let fb = ((t * omega).sin()) / s;
    let v = va.scale(fa) + vb.scale(fb);

    LngLat::new(v.x.atan2(v.z) * R2D, v.y.clamp(-1.0, 1.0).asin() * R2D)
}

/// Projects a surface point plus altitude fraction (0 = surface) onto the
/// reference sphere. Latitude is the elevation angle; the axis convention
/// matches the renderer: `x = r cosφ sinλ`, `y = r sinφ`, `z = r cosφ cosλ`.
pub fn to_xyz(lat_deg: f64, lng_deg: f64, altitude_fraction: f64) -> Vec3 {
    LngLat::new(lng_deg, lat_deg)
        .to_unit()
        .scale(GLOBE_RADIUS * (1.0 + altitude_fraction))
}

/// Parabolic arc-altitude profile: `peak · sin(t·π)`.
///
/// Exactly zero at both endpoints and exactly `peak` at the midpoint.
pub fn arc_alt(t: f64, peak: f64) -> f64 {
    if t <= 0.0 || t >= 1.0 {
        return 0.0;
    }
    peak * (t * std::f64::consts::PI).sin()
}

#[cfg(test)]
mod tests {
    use super::{GLOBE_RADIUS, LngLat, arc_alt, slerp, to_xyz};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn arc_alt_exact_at_endpoints_and_midpoint() {
        assert_eq!(arc_alt(0.0, 0.32), 0.0);
        assert_eq!(arc_alt(1.0, 0.32), 0.0);
        assert_eq!(arc_alt(0.5, 0.32), 0.32);
    }

    #[test]
    fn slerp_degenerate_pair_returns_first_point() {
        let a = LngLat::new(13.4, 52.5);
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            assert_eq!(slerp(a, a, t), a);
        }
    }

    #[test]
    fn slerp_endpoints_match_inputs() {
        let a = LngLat::new(-74.0, 40.7);
        let b = LngLat::new(139.7, 35.7);
        let s0 = slerp(a, b, 0.0);
        let s1 = slerp(a, b, 1.0);
        assert_close(s0.lng_deg, a.lng_deg, 1e-9);
        assert_close(s0.lat_deg, a.lat_deg, 1e-9);
        assert_close(s1.lng_deg, b.lng_deg, 1e-9);
        assert_close(s1.lat_deg, b.lat_deg, 1e-9);
    }

    #[test]
    fn slerp_midpoint_of_equatorial_pair_is_on_equator() {
        let a = LngLat::new(0.0, 0.0);
        let b = LngLat::new(90.0, 0.0);
        let mid = slerp(a, b, 0.5);
        assert_close(mid.lng_deg, 45.0, 1e-9);
        assert_close(mid.lat_deg, 0.0, 1e-9);
    }

    #[test]
    fn to_xyz_surface_and_lifted() {
        let surface = to_xyz(0.0, 0.0, 0.0);
        assert_close(surface.x, 0.0, 1e-9);
        assert_close(surface.y, 0.0, 1e-9);
        assert_close(surface.z, GLOBE_RADIUS, 1e-9);

        let lifted = to_xyz(90.0, 0.0, 0.5);
        assert_close(lifted.y, GLOBE_RADIUS * 1.5, 1e-9);
    }

    #[test]
    fn sentinel_detection() {
        assert!(LngLat::new(0.0, 0.0).is_sentinel());
        assert!(!LngLat::new(0.1, 0.0).is_sentinel());
    }
}

use foundation::math::{GLOBE_RADIUS, LngLat, Vec3};

/// A point-of-view over the globe: surface coordinates plus altitude as a
/// fraction of the globe radius (0 = on the surface).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewpoint {
    pub lat_deg: f64,
    pub lng_deg: f64,
    pub altitude: f64,
}

impl Viewpoint {
    pub const fn new(lat_deg: f64, lng_deg: f64, altitude: f64) -> Self {
        Self {
            lat_deg,
            lng_deg,
            altitude,
        }
    }

    pub fn surface(self) -> LngLat {
        LngLat::new(self.lng_deg, self.lat_deg)
    }

    /// Camera eye position in scene coordinates.
    pub fn eye(self) -> Vec3 {
        self.surface()
            .to_unit()
            .scale(GLOBE_RADIUS * (1.0 + self.altitude))
    }
}

/// Damped orbit camera rig.
///
/// Pointer input is ignored while the rig is locked (the sequence director
/// drives the viewpoint directly during the tour); unlocking re-enables
/// free-roam orbiting with exponential damping on the residual velocity.
#[derive(Debug, Clone)]
pub struct CameraRig {
    viewpoint: Viewpoint,
    locked: bool,
    /// Degrees per second of residual orbit velocity.
    velocity: (f64, f64),
    damping: f64,
}

impl CameraRig {
    pub fn new(initial: Viewpoint) -> Self {
        Self {
            viewpoint: initial,
            locked: false,
            velocity: (0.0, 0.0),
            damping: 0.08,
        }
    }

    pub fn viewpoint(&self) -> Viewpoint {
        self.viewpoint
    }

    /// Direct viewpoint control, used by the tour regardless of lock state.
    pub fn set_viewpoint(&mut self, viewpoint: Viewpoint) {
        self.viewpoint = viewpoint;
    }

    pub fn lock(&mut self) {
        self.locked = true;
        self.velocity = (0.0, 0.0);
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Pointer-drag orbit input (degrees). No-op while locked.
    pub fn orbit(&mut self, d_lng_deg: f64, d_lat_deg: f64) {
        if self.locked {
            return;
        }
        self.viewpoint.lng_deg += d_lng_deg;
        self.viewpoint.lat_deg = (self.viewpoint.lat_deg + d_lat_deg).clamp(-89.0, 89.0);
        self.velocity = (d_lng_deg * 10.0, d_lat_deg * 10.0);
    }

    /// Advances damped inertia once per frame.
    pub fn update(&mut self, dt_s: f64) {
        if self.locked {
            return;
        }
        let decay = (1.0 - self.damping).powf(dt_s * 60.0);
        self.viewpoint.lng_deg += self.velocity.0 * dt_s;
        self.viewpoint.lat_deg =
            (self.viewpoint.lat_deg + self.velocity.1 * dt_s).clamp(-89.0, 89.0);
        self.velocity.0 *= decay;
        self.velocity.1 *= decay;
        if self.velocity.0.abs() < 1e-4 && self.velocity.1.abs() < 1e-4 {
            self.velocity = (0.0, 0.0);
        }
    }
}

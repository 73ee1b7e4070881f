use foundation::math::{LngLat, Vec3, arc_alt, ease_in_out, slerp, to_xyz};
use foundation::time::Time;
use runtime::cancel::CancelToken;
use runtime::frame::Frame;
use scene::buffer::PositionBuffer;
use scene::object::{LineStrip, MarkerNode};

/// Duration of one animated leg.
pub const ARC_SECONDS: f64 = 2.6;
/// Peak altitude of the live arc, as a fraction of the globe radius.
pub const ARC_PEAK: f64 = 0.32;
/// Live-line buffer capacity in points.
pub const MAX_ARC_POINTS: usize = 200;
/// Sample segments for the live arc.
pub const LIVE_SEGMENTS: usize = if MAX_ARC_POINTS - 1 < 120 {
    MAX_ARC_POINTS - 1
} else {
    120
};
/// Sample segments for baked trails and flower strands.
pub const TRAIL_SEGMENTS: usize = 80;

/// The animated tip's surface position and altitude fraction, reported every
/// tick so the camera can track it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TrackPoint {
    pub lng_deg: f64,
    pub lat_deg: f64,
    pub altitude: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ArcStatus {
    Running(TrackPoint),
    Complete(TrackPoint),
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Sample {
    surface: LngLat,
    altitude: f64,
    xyz: Vec3,
}

/// Incrementally reveals one geodesic arc over a fixed duration.
///
/// All samples are precomputed at construction; each tick maps eased progress
/// to a sample index and appends any not-yet-revealed points to the line's
/// preallocated buffer. The reveal is append-only, so the visible trail grows
/// monotonically within one animation.
pub struct ArcAnimator {
    samples: Vec<Sample>,
    duration_s: f64,
    started_at: Time,
    token: CancelToken,
    cursor: usize,
    finished: bool,
}

impl ArcAnimator {
    pub fn new(
        from: LngLat,
        to: LngLat,
        segments: usize,
        duration_s: f64,
        peak: f64,
        started_at: Time,
        token: CancelToken,
    ) -> Self {
        let samples = (0..=segments)
            .map(|i| {
                let t = i as f64 / segments as f64;
                let surface = slerp(from, to, t);
                let altitude = arc_alt(t, peak);
                Sample {
                    surface,
                    altitude,
                    xyz: to_xyz(surface.lat_deg, surface.lng_deg, altitude),
                }
            })
            .collect();

        Self {
            samples,
            duration_s,
            started_at,
            token,
            cursor: 0,
            finished: false,
        }
    }

    /// Advances the reveal for this frame, appending newly revealed samples to
    /// the live line's buffer. Completes when eased progress reaches 1, or
    /// immediately once the token is cancelled. Follow up with
    /// [`orient_marker`](Self::orient_marker) to place the tip marker.
    pub fn tick(&mut self, frame: Frame, line: &mut LineStrip) -> ArcStatus {
        let last = self.samples.len() - 1;
        if self.finished || self.token.is_cancelled() {
            self.finished = true;
            return ArcStatus::Complete(self.track_point(self.cursor));
        }

        let raw = (frame.time.since(self.started_at) / self.duration_s).min(1.0);
        let t = ease_in_out(raw);
        let idx = ((t * last as f64).floor() as usize).min(last);
        self.cursor = idx;

        while line.buffer.draw_range() <= idx {
            let next = self.samples[line.buffer.draw_range()].xyz;
            if !line.buffer.push(next) {
                break;
            }
        }

        if raw >= 1.0 {
            self.finished = true;
            ArcStatus::Complete(self.track_point(idx))
        } else {
            ArcStatus::Running(self.track_point(idx))
        }
    }

    /// Moves the directional marker to the current tip and orients it along
    /// the tangent via a right-handed basis (`right = tangent × up`,
    /// `forward = up × right`).
    pub fn orient_marker(&self, marker: &mut MarkerNode) {
        let tip = self.samples[self.cursor];
        let prev = self.samples[self.cursor.max(1) - 1];
        marker.position = tip.xyz;
        marker.visible = true;
        let tangent = (tip.xyz - prev.xyz).normalize();
        if tangent.length() > 0.0 {
            let up = tip.xyz.normalize();
            let right = tangent.cross(up).normalize();
            let forward = up.cross(right);
            marker.basis = [right, up, forward];
        }
    }

    /// The tip as of the last tick.
    pub fn track_point_now(&self) -> TrackPoint {
        self.track_point(self.cursor)
    }

    fn track_point(&self, idx: usize) -> TrackPoint {
        let s = self.samples[idx];
        TrackPoint {
            lng_deg: s.surface.lng_deg,
            lat_deg: s.surface.lat_deg,
            altitude: s.altitude,
        }
    }
}

/// Samples a full arc into a position buffer with every point revealed.
/// Used for baked leg trails and flower strands.
pub fn sampled_arc(from: LngLat, to: LngLat, segments: usize, peak: f64) -> PositionBuffer {
    let mut buf = PositionBuffer::with_capacity(segments + 1);
    for i in 0..=segments {
        let t = i as f64 / segments as f64;
        let p = slerp(from, to, t);
        buf.push(to_xyz(p.lat_deg, p.lng_deg, arc_alt(t, peak)));
    }
    buf
}

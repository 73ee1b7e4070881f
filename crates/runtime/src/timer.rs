use foundation::time::Time;

use crate::frame::Frame;

/// A coarse-grained pause polled once per frame.
///
/// Used for the fixed waits between tour legs; there is no timer thread, only
/// the frame clock.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Delay {
    fire_at: Time,
}

impl Delay {
    pub fn after(now: Time, seconds: f64) -> Self {
        Self {
            fire_at: Time(now.0 + seconds),
        }
    }

    /// True once the frame clock has reached the fire time.
    pub fn is_elapsed(&self, frame: Frame) -> bool {
        frame.time >= self.fire_at
    }
}

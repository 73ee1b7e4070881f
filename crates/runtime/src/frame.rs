use foundation::time::Time;

/// Deterministic frame metadata.
///
/// The engine is single-threaded and cooperatively scheduled: all animation
/// advances inside per-frame ticks driven by the host's display refresh, so
/// the frame is the only timebase the engine ever sees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Fixed delta time (seconds).
    pub dt_s: f64,
    /// Engine time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }
}

/// Produces consecutive [`Frame`]s at a fixed delta.
#[derive(Debug, Clone)]
pub struct FrameClock {
    dt_s: f64,
    next_index: u64,
}

impl FrameClock {
    pub fn new(dt_s: f64) -> Self {
        Self {
            dt_s,
            next_index: 0,
        }
    }

    pub fn tick(&mut self) -> Frame {
        let frame = Frame::new(self.next_index, self.dt_s);
        self.next_index += 1;
        frame
    }
}

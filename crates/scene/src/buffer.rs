use foundation::math::Vec3;

/// Preallocated position buffer for incrementally revealed line geometry.
///
/// The backing storage is sized once at construction and written in place on
/// every tick; there is no per-frame allocation. Reveal is append-only: a
/// point, once pushed, is never rewritten until `reset`, so the visible trail
/// grows monotonically within one animation.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionBuffer {
    data: Vec<f64>,
    revealed: usize,
    capacity: usize,
}

impl PositionBuffer {
    pub fn with_capacity(max_points: usize) -> Self {
        Self {
            data: vec![0.0; max_points * 3],
            revealed: 0,
            capacity: max_points,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of points currently revealed (the draw range).
    pub fn draw_range(&self) -> usize {
        self.revealed
    }

    /// Appends the next point, writing the existing storage in place.
    /// Returns `false` when the buffer is full.
    pub fn push(&mut self, p: Vec3) -> bool {
        if self.revealed >= self.capacity {
            return false;
        }
        let base = self.revealed * 3;
        self.data[base] = p.x;
        self.data[base + 1] = p.y;
        self.data[base + 2] = p.z;
        self.revealed += 1;
        true
    }

    /// Collapses the draw range to zero without touching the storage.
    pub fn reset(&mut self) {
        self.revealed = 0;
    }

    /// Flat xyz positions for the revealed range.
    pub fn positions(&self) -> &[f64] {
        &self.data[..self.revealed * 3]
    }

    pub fn point(&self, index: usize) -> Option<Vec3> {
        if index >= self.revealed {
            return None;
        }
        let base = index * 3;
        Some(Vec3::new(
            self.data[base],
            self.data[base + 1],
            self.data[base + 2],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::PositionBuffer;
    use foundation::math::Vec3;

    #[test]
    fn reveal_grows_monotonically_and_respects_capacity() {
        let mut buf = PositionBuffer::with_capacity(2);
        assert_eq!(buf.draw_range(), 0);
        assert!(buf.push(Vec3::new(1.0, 0.0, 0.0)));
        assert!(buf.push(Vec3::new(2.0, 0.0, 0.0)));
        assert!(!buf.push(Vec3::new(3.0, 0.0, 0.0)), "buffer is full");
        assert_eq!(buf.draw_range(), 2);
        assert_eq!(buf.point(0), Some(Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn reset_reuses_storage_without_reallocating() {
        let mut buf = PositionBuffer::with_capacity(4);
        buf.push(Vec3::new(1.0, 2.0, 3.0));
        buf.reset();
        assert_eq!(buf.draw_range(), 0);
        assert_eq!(buf.capacity(), 4);
        assert!(buf.positions().is_empty());

        buf.push(Vec3::new(9.0, 9.0, 9.0));
        assert_eq!(buf.point(0), Some(Vec3::new(9.0, 9.0, 9.0)));
    }
}

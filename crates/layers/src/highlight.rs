use std::rc::Rc;

use crate::boundary::BoundarySet;

/// Resting cap color for every boundary polygon.
pub const BASE_CAP: [f32; 4] = [1.0, 1.0, 1.0, 0.03];
/// Cap color for a highlighted exporter region (green).
pub const EXPORTER_CAP: [f32; 4] = [0.0, 1.0, 0.47, 0.28];
/// Cap color for a highlighted importer region (blue).
pub const IMPORTER_CAP: [f32; 4] = [0.0, 0.63, 1.0, 0.28];

/// Per-feature cap colors, re-submitted to the polygon render layer after
/// each mutation (the snapshot version lets the renderer skip no-op uploads).
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryCapsSnapshot {
    pub caps: Vec<[f32; 4]>,
    pub version: u64,
}

/// Mutable highlight state over the read-only boundary set.
///
/// Only the sequence director writes here, and only while the engine is in
/// its `Ready` phase.
pub struct BoundaryHighlight {
    boundaries: Rc<BoundarySet>,
    caps: Vec<[f32; 4]>,
    version: u64,
}

impl BoundaryHighlight {
    pub fn new(boundaries: Rc<BoundarySet>) -> Self {
        let caps = vec![BASE_CAP; boundaries.len()];
        Self {
            boundaries,
            caps,
            version: 0,
        }
    }

    /// Highlights the named region with `cap` and resets every other feature
    /// to the base color. Exactly one region is ever highlighted at a time.
    pub fn highlight_only(&mut self, name: &str, cap: [f32; 4]) {
        let key = name.to_lowercase();
        for (feature, slot) in self.boundaries.features().iter().zip(self.caps.iter_mut()) {
            *slot = if feature.name.to_lowercase() == key {
                cap
            } else {
                BASE_CAP
            };
        }
        self.version += 1;
    }

    /// Clears all highlight state back to the base color.
    pub fn clear(&mut self) {
        self.caps.fill(BASE_CAP);
        self.version += 1;
    }

    pub fn snapshot(&self) -> BoundaryCapsSnapshot {
        BoundaryCapsSnapshot {
            caps: self.caps.clone(),
            version: self.version,
        }
    }

    pub fn is_highlighted(&self, name: &str) -> bool {
        let key = name.to_lowercase();
        self.boundaries
            .features()
            .iter()
            .zip(self.caps.iter())
            .any(|(f, cap)| f.name.to_lowercase() == key && *cap != BASE_CAP)
    }
}

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use foundation::math::LngLat;

use crate::boundary::{BoundaryFeature, BoundaryGeometry, BoundarySet, Ring};

/// Resolves country display names to representative `[lng, lat]` centroids.
///
/// Resolution order: exact case-insensitive name match, then substring match
/// in either direction (first hit wins), then the `[0, 0]` sentinel. The
/// sentinel is a valid-but-unlocated placeholder, never an error.
///
/// Resolved centroids are cached for the session; the cache is write-once per
/// key and never invalidated.
pub struct CentroidIndex {
    boundaries: Rc<BoundarySet>,
    cache: RefCell<HashMap<String, LngLat>>,
    resolutions: Cell<u64>,
}

impl CentroidIndex {
    pub fn new(boundaries: Rc<BoundarySet>) -> Self {
        Self {
            boundaries,
            cache: RefCell::new(HashMap::new()),
            resolutions: Cell::new(0),
        }
    }

    pub fn lookup(&self, name: &str) -> LngLat {
        let key = name.trim().to_lowercase();
        if let Some(hit) = self.cache.borrow().get(&key) {
            return *hit;
        }

        self.resolutions.set(self.resolutions.get() + 1);
        let Some(feature) = self.find_feature(&key) else {
            return LngLat::new(0.0, 0.0);
        };
        let centroid = feature_centroid(feature);
        self.cache.borrow_mut().insert(key, centroid);
        centroid
    }

    /// How many lookups actually walked the feature set (cache misses).
    pub fn resolutions(&self) -> u64 {
        self.resolutions.get()
    }

    fn find_feature(&self, key_lower: &str) -> Option<&BoundaryFeature> {
        let features = self.boundaries.features();
        features
            .iter()
            .find(|f| f.name.to_lowercase() == key_lower)
            .or_else(|| {
                features.iter().find(|f| {
                    let n = f.name.to_lowercase();
                    !n.is_empty() && (n.contains(key_lower) || key_lower.contains(&n))
                })
            })
    }
}

/// Arithmetic mean of the representative outer ring's vertices.
///
/// For a multi-polygon the polygon with the longest outer ring stands in for
/// the whole shape.
pub fn feature_centroid(feature: &BoundaryFeature) -> LngLat {
    let ring = match &feature.geometry {
        BoundaryGeometry::Polygon(rings) => rings.first(),
        BoundaryGeometry::MultiPolygon(polys) => polys
            .iter()
            .filter_map(|rings| rings.first())
            .max_by_key(|ring| ring.len()),
    };

    let Some(ring) = ring.filter(|r| !r.is_empty()) else {
        return LngLat::new(0.0, 0.0);
    };
    ring_mean(ring)
}

fn ring_mean(ring: &Ring) -> LngLat {
    let n = ring.len() as f64;
    let lng = ring.iter().map(|p| p.lng_deg).sum::<f64>() / n;
    let lat = ring.iter().map(|p| p.lat_deg).sum::<f64>() / n;
    LngLat::new(lng, lat)
}

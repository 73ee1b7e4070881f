use foundation::math::LngLat;
use serde_json::Value;

/// A closed ring of surface coordinates.
pub type Ring = Vec<LngLat>;

#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryGeometry {
    /// Outer ring first, holes after.
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

/// One named country boundary. Read-only after load.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub name: String,
    pub geometry: BoundaryGeometry,
}

/// The boundary polygon dataset, loaded once per session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundarySet {
    features: Vec<BoundaryFeature>,
}

#[derive(Debug)]
pub enum BoundaryError {
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundaryError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            BoundaryError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for BoundaryError {}

impl BoundarySet {
    pub fn from_geojson_str(payload: &str) -> Result<Self, BoundaryError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| BoundaryError::InvalidFeature {
                index: 0,
                reason: format!("JSON parse error: {e}"),
            })?;
        Self::from_geojson_value(&value)
    }

    pub fn from_geojson_value(value: &Value) -> Result<Self, BoundaryError> {
        let obj = value.as_object().ok_or(BoundaryError::NotAFeatureCollection)?;
        if obj.get("type").and_then(|v| v.as_str()) != Some("FeatureCollection") {
            return Err(BoundaryError::NotAFeatureCollection);
        }
        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(BoundaryError::NotAFeatureCollection)?;

        let mut features = Vec::with_capacity(features_val.len());
        for (index, feat) in features_val.iter().enumerate() {
            let name = feature_name(feat);
            let Some(geometry_val) = feat.get("geometry") else {
                // Features without geometry can still be named; skip them.
                continue;
            };
            match parse_geometry(geometry_val) {
                Ok(Some(geometry)) => features.push(BoundaryFeature { name, geometry }),
                // Non-polygon geometry has no boundary to highlight; skip.
                Ok(None) => continue,
                Err(reason) => return Err(BoundaryError::InvalidFeature { index, reason }),
            }
        }

        Ok(Self { features })
    }

    pub fn features(&self) -> &[BoundaryFeature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Boundary datasets carry the display name as `ADMIN`, with `NAME` as a
/// fallback for other sources.
fn feature_name(feature: &Value) -> String {
    let props = feature.get("properties");
    for key in ["ADMIN", "NAME"] {
        if let Some(name) = props
            .and_then(|p| p.get(key))
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
        {
            return name.to_string();
        }
    }
    String::new()
}

fn parse_geometry(value: &Value) -> Result<Option<BoundaryGeometry>, String> {
    let obj = value.as_object().ok_or("geometry must be an object")?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type")?;
    let coords = obj.get("coordinates").ok_or("geometry missing coordinates")?;

    match ty {
        "Polygon" => Ok(Some(BoundaryGeometry::Polygon(parse_rings(coords)?))),
        "MultiPolygon" => {
            let polys = coords
                .as_array()
                .ok_or("MultiPolygon coordinates must be an array")?
                .iter()
                .map(parse_rings)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(BoundaryGeometry::MultiPolygon(polys)))
        }
        _ => Ok(None),
    }
}

fn parse_rings(value: &Value) -> Result<Vec<Ring>, String> {
    value
        .as_array()
        .ok_or("polygon coordinates must be an array")?
        .iter()
        .map(parse_ring)
        .collect()
}

fn parse_ring(value: &Value) -> Result<Ring, String> {
    value
        .as_array()
        .ok_or("ring must be an array")?
        .iter()
        .map(|pos| {
            let pair = pos.as_array().ok_or("position must be an array")?;
            let lng = pair.first().and_then(|v| v.as_f64()).ok_or("bad longitude")?;
            let lat = pair.get(1).and_then(|v| v.as_f64()).ok_or("bad latitude")?;
            Ok(LngLat::new(lng, lat))
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn demo_boundaries() -> BoundarySet {
    BoundarySet::from_geojson_str(
        r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"ADMIN": "Squareland"},
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[10.0, 10.0], [14.0, 10.0], [14.0, 14.0], [10.0, 14.0]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": {"NAME": "Two Isles"},
                    "geometry": {
                        "type": "MultiPolygon",
                        "coordinates": [
                            [[[0.0, 0.0], [2.0, 0.0], [1.0, 2.0]]],
                            [[[40.0, 40.0], [44.0, 40.0], [44.0, 44.0], [42.0, 46.0], [40.0, 44.0]]]
                        ]
                    }
                }
            ]
        }"#,
    )
    .expect("demo boundaries parse")
}

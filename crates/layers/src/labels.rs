use foundation::math::{GLOBE_RADIUS, LngLat, Vec3};

/// Accent color for exporter labels.
pub const EXPORTER_LABEL: [f32; 4] = [0.0, 0.77, 0.35, 1.0];
/// Accent color for importer labels.
pub const IMPORTER_LABEL: [f32; 4] = [0.0, 0.53, 0.8, 1.0];

/// Label sprites float slightly off the surface and above the anchor point.
const LABEL_ALTITUDE: f64 = 1.035;
const LABEL_LAT_OFFSET_DEG: f64 = 3.0;
/// Sprite height as a fraction of the globe radius.
pub const LABEL_HEIGHT_FRACTION: f64 = 0.055;

/// Everything the host renderer needs to rasterize one billboard label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSpec {
    pub text: String,
    pub position: Vec3,
    pub color: [f32; 4],
    pub height: f64,
}

impl LabelSpec {
    /// Builds a stop label anchored just above the given centroid.
    pub fn at(anchor: LngLat, text: impl Into<String>, color: [f32; 4]) -> Self {
        let lifted = LngLat::new(anchor.lng_deg, anchor.lat_deg + LABEL_LAT_OFFSET_DEG);
        Self {
            text: text.into(),
            position: lifted.to_unit().scale(GLOBE_RADIUS * LABEL_ALTITUDE),
            color,
            height: GLOBE_RADIUS * LABEL_HEIGHT_FRACTION,
        }
    }
}

#[cfg(test)]
mod tests {
    use foundation::math::{GLOBE_RADIUS, LngLat};

    use super::{EXPORTER_LABEL, LabelSpec};

    #[test]
    fn label_sits_above_the_surface() {
        let spec = LabelSpec::at(LngLat::new(10.0, 50.0), "[EXP] Testland", EXPORTER_LABEL);
        let r = spec.position.length();
        assert!(r > GLOBE_RADIUS, "label must be lifted off the surface");
        assert!((r - GLOBE_RADIUS * 1.035).abs() < 1e-9);
        assert_eq!(spec.text, "[EXP] Testland");
    }
}

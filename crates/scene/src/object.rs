use foundation::math::Vec3;

use crate::buffer::PositionBuffer;

/// Material state the host renderer mirrors onto its own material objects.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MaterialParams {
    pub color: [f32; 3],
    pub emissive_intensity: f32,
    pub opacity: f32,
    pub transparent: bool,
    /// Additive blending (glow layers).
    pub additive: bool,
    /// Disabled for overlay geometry the globe must never occlude.
    pub depth_test: bool,
}

impl MaterialParams {
    pub fn solid(color: [f32; 3]) -> Self {
        Self {
            color,
            emissive_intensity: 0.0,
            opacity: 1.0,
            transparent: false,
            additive: false,
            depth_test: true,
        }
    }

    pub fn emissive(color: [f32; 3], emissive_intensity: f32) -> Self {
        Self {
            emissive_intensity,
            ..Self::solid(color)
        }
    }

    pub fn overlay(color: [f32; 3], opacity: f32, additive: bool) -> Self {
        Self {
            color,
            emissive_intensity: 0.0,
            opacity,
            transparent: true,
            additive,
            depth_test: false,
        }
    }
}

/// A pickable sphere node (one per trade stop).
#[derive(Debug, Clone, PartialEq)]
pub struct SphereNode {
    pub center: Vec3,
    pub radius: f64,
    pub scale: f64,
    pub material: MaterialParams,
}

impl SphereNode {
    /// Effective pick radius after scaling.
    pub fn picking_radius(&self) -> f64 {
        self.radius * self.scale
    }
}

/// Line geometry over a position buffer (live arc, baked trails, flower
/// strands).
#[derive(Debug, Clone, PartialEq)]
pub struct LineStrip {
    pub buffer: PositionBuffer,
    pub material: MaterialParams,
    pub visible: bool,
}

/// A billboard label sprite; the host rasterizes `text` into a texture.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteNode {
    pub text: String,
    pub position: Vec3,
    pub color: [f32; 4],
    pub height: f64,
}

/// The directional arrow riding the tip of the live arc.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerNode {
    pub position: Vec3,
    /// Right-handed orientation basis: `[right, up, forward]`.
    pub basis: [Vec3; 3],
    pub scale: f64,
    pub visible: bool,
    pub material: MaterialParams,
}

impl MarkerNode {
    pub fn hidden() -> Self {
        Self {
            position: Vec3::ZERO,
            basis: [
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
            ],
            scale: 1.0,
            visible: false,
            material: MaterialParams::solid([1.0, 0.8, 0.0]),
        }
    }
}

/// Everything the retained scene can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneObject {
    /// The textured globe mesh itself.
    Globe { radius: f64 },
    AmbientLight {
        color: [f32; 3],
        intensity: f32,
    },
    DirectionalLight {
        direction: Vec3,
        color: [f32; 3],
        intensity: f32,
    },
    /// The atmosphere glow billboard behind the globe.
    Halo { scale: f64 },
    Sphere(SphereNode),
    Line(LineStrip),
    Sprite(SpriteNode),
    Marker(MarkerNode),
}

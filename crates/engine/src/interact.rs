use foundation::arena::Handle;
use foundation::math::{GLOBE_RADIUS, LngLat};
use foundation::time::Time;
use layers::centroid::CentroidIndex;
use route::stop::{Role, TradeStop};
use runtime::cancel::{CancelToken, GenerationCounter};
use runtime::frame::Frame;
use scene::object::{LineStrip, MaterialParams, SceneObject, SphereNode};
use scene::world::Scene;
use tracing::debug;

use crate::arc::sampled_arc;

/// Stop node sphere radius in scene units.
pub const NODE_RADIUS: f64 = 2.5;
/// Node centers sit half-embedded in the globe surface.
const NODE_CENTER_DIST: f64 = GLOBE_RADIUS - NODE_RADIUS * 0.5;

const FLOWER_SEGMENTS: usize = 80;
const FLOWER_PEAK: f64 = 0.28;

const EXPORTER_COLOR: [f32; 3] = [0.0, 1.0, 0.47];
const IMPORTER_COLOR: [f32; 3] = [0.0, 0.667, 1.0];
const BASE_EMISSIVE: f32 = 0.45;
const HOVER_SCALE: f64 = 1.5;
const HOVER_EMISSIVE: f32 = 1.0;

const DIM_OPACITY: f32 = 0.12;
const DIM_EMISSIVE: f32 = 0.05;
const FLOWER_EXPORTER_SCALE: f64 = 2.0;
const FLOWER_EXPORTER_EMISSIVE: f32 = 1.4;
const FLOWER_TARGET_SCALE: f64 = 1.5;
const FLOWER_TARGET_EMISSIVE: f32 = 0.9;

const CORE_COLOR: [f32; 3] = [0.0, 1.0, 0.53];
const GLOW_COLOR: [f32; 3] = [0.0, 1.0, 0.27];
const HALO_COLOR: [f32; 3] = [0.0, 1.0, 0.8];

/// One trade stop paired with its resolved centroid and the sphere it owns.
struct StopNode {
    stop: TradeStop,
    anchor: LngLat,
    sphere: Handle,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum StrandLayer {
    Core,
    Glow,
    Halo,
}

/// One of the three stacked glow lines making up a flower arc.
struct Strand {
    line: Handle,
    layer: StrandLayer,
    /// Phase offset as the target's index fraction among all targets.
    seed: f64,
}

struct Flower {
    exporter: usize,
    strands: Vec<Strand>,
    started_at: Time,
    token: CancelToken,
}

/// Hover/click picking over the stop nodes and the flower link diagram.
///
/// Active only once the tour is done; the controller exclusively owns the
/// node spheres and all flower geometry derived from them, and must release
/// everything it created on clear, reset and teardown.
#[derive(Default)]
pub struct InteractionController {
    nodes: Vec<StopNode>,
    hovered: Option<usize>,
    selected: Option<usize>,
    flower: Option<Flower>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// The stop currently selected for the host's detail panel.
    pub fn selected(&self) -> Option<&TradeStop> {
        self.selected.map(|i| &self.nodes[i].stop)
    }

    /// Creates one sphere node per stop. Called when free roam begins.
    pub fn build_nodes(
        &mut self,
        scene: &mut Scene,
        stops: &[TradeStop],
        centroids: &CentroidIndex,
    ) {
        self.teardown(scene);
        for stop in stops {
            let anchor = centroids.lookup(&stop.country);
            let sphere = scene.add(SceneObject::Sphere(SphereNode {
                center: anchor.to_unit().scale(NODE_CENTER_DIST),
                radius: NODE_RADIUS,
                scale: 1.0,
                material: MaterialParams::emissive(role_color(stop.role), BASE_EMISSIVE),
            }));
            self.nodes.push(StopNode {
                stop: stop.clone(),
                anchor,
                sphere,
            });
        }
        debug!(nodes = self.nodes.len(), "stop nodes built");
    }

    /// Hover feedback: scale up and brighten the hit node, restore the rest.
    /// Suppressed while a flower selection is active; selection visuals win.
    pub fn pointer_hover(&mut self, scene: &mut Scene, hit: Option<Handle>) {
        if self.flower.is_some() {
            return;
        }
        let hovered = hit.and_then(|h| self.node_index(h));
        if hovered == self.hovered {
            return;
        }
        self.hovered = hovered;
        for (i, node) in self.nodes.iter().enumerate() {
            let Some(sphere) = scene.sphere_mut(node.sphere) else {
                continue;
            };
            let is_hovered = Some(i) == hovered;
            sphere.scale = if is_hovered { HOVER_SCALE } else { 1.0 };
            sphere.material.emissive_intensity =
                if is_hovered { HOVER_EMISSIVE } else { BASE_EMISSIVE };
        }
    }

    pub fn pointer_click(
        &mut self,
        scene: &mut Scene,
        now: Time,
        generations: &GenerationCounter,
        hit: Option<Handle>,
    ) {
        let Some(idx) = hit.and_then(|h| self.node_index(h)) else {
            // Empty space collapses everything.
            self.clear_flower(scene);
            self.selected = None;
            return;
        };

        match self.nodes[idx].stop.role {
            Role::Exporter => {
                if self.flower.as_ref().is_some_and(|f| f.exporter == idx) {
                    self.clear_flower(scene);
                    self.selected = None;
                } else {
                    self.selected = Some(idx);
                    self.spawn_flower(scene, now, generations, idx);
                }
            }
            Role::Importer => {
                // Detail panel only, no flower; re-click toggles off.
                self.clear_flower(scene);
                self.selected = if self.selected == Some(idx) {
                    None
                } else {
                    Some(idx)
                };
            }
        }
    }

    /// Per-frame pulse oscillators for the active flower.
    pub fn tick(&mut self, scene: &mut Scene, frame: Frame) {
        let Some(flower) = &self.flower else {
            return;
        };
        if flower.token.is_cancelled() {
            self.clear_flower(scene);
            return;
        }

        let elapsed = frame.time.since(flower.started_at);
        for strand in &flower.strands {
            let Some(line) = scene.line_mut(strand.line) else {
                continue;
            };
            let wave = pulse(elapsed, 2.5, strand.seed);
            match strand.layer {
                StrandLayer::Core => {
                    line.material.opacity = (0.5 + 0.5 * wave) as f32;
                    // Green toward bright cyan as the pulse crests.
                    line.material.color =
                        [0.0, (0.8 + 0.2 * wave) as f32, (0.3 + 0.7 * wave) as f32];
                }
                StrandLayer::Glow => {
                    line.material.opacity = (0.3 + 0.5 * wave) as f32;
                }
                StrandLayer::Halo => {
                    // The halo breathes slower.
                    let slow = pulse(elapsed, 1.4, strand.seed);
                    line.material.opacity = (0.15 + 0.35 * slow) as f32;
                }
            }
        }

        let beat = (elapsed * 3.0).sin().abs();
        let exporter = &self.nodes[flower.exporter];
        if let Some(sphere) = scene.sphere_mut(exporter.sphere) {
            sphere.scale = 1.6 + 0.5 * beat;
            sphere.material.emissive_intensity = (0.9 + 0.9 * beat) as f32;
        }
    }

    /// Clears the flower and detail selection, restoring baseline visuals.
    pub fn clear_selection(&mut self, scene: &mut Scene) {
        self.clear_flower(scene);
        self.selected = None;
    }

    /// Releases everything the controller created: strand geometry and the
    /// node spheres.
    pub fn teardown(&mut self, scene: &mut Scene) {
        self.clear_flower(scene);
        for node in self.nodes.drain(..) {
            scene.remove(node.sphere);
        }
        self.hovered = None;
        self.selected = None;
    }

    fn node_index(&self, handle: Handle) -> Option<usize> {
        self.nodes.iter().position(|n| n.sphere == handle)
    }

    fn spawn_flower(
        &mut self,
        scene: &mut Scene,
        now: Time,
        generations: &GenerationCounter,
        exporter: usize,
    ) {
        self.clear_flower(scene);

        let exporter_hs = self.nodes[exporter].stop.hs_code.trim().to_string();
        let importers: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.stop.role == Role::Importer)
            .map(|(i, _)| i)
            .collect();
        let matched: Vec<usize> = importers
            .iter()
            .copied()
            .filter(|&i| self.nodes[i].stop.hs_code.trim() == exporter_hs)
            .collect();
        // No exact hs_code match links every importer, so the flower is never
        // empty while at least one importer exists.
        let targets = if matched.is_empty() { importers } else { matched };
        if targets.is_empty() {
            return;
        }

        let from = self.nodes[exporter].anchor;
        if from.is_sentinel() {
            // An unlocated exporter keeps its detail selection but cannot
            // anchor a flower.
            return;
        }

        for (i, node) in self.nodes.iter().enumerate() {
            let Some(sphere) = scene.sphere_mut(node.sphere) else {
                continue;
            };
            let participates = i == exporter || targets.contains(&i);
            if participates {
                sphere.material.transparent = false;
                sphere.material.opacity = 1.0;
                sphere.material.emissive_intensity = if i == exporter {
                    FLOWER_EXPORTER_EMISSIVE
                } else {
                    FLOWER_TARGET_EMISSIVE
                };
                sphere.scale = if i == exporter {
                    FLOWER_EXPORTER_SCALE
                } else {
                    FLOWER_TARGET_SCALE
                };
            } else {
                sphere.material.transparent = true;
                sphere.material.opacity = DIM_OPACITY;
                sphere.material.emissive_intensity = DIM_EMISSIVE;
            }
        }

        let total = targets.len();
        let mut strands = Vec::with_capacity(total * 3);
        for (k, &target) in targets.iter().enumerate() {
            let to = self.nodes[target].anchor;
            let seed = k as f64 / total as f64;
            let layers = [
                (StrandLayer::Core, CORE_COLOR, 1.0, false),
                (StrandLayer::Glow, GLOW_COLOR, 0.7, true),
                (StrandLayer::Halo, HALO_COLOR, 0.4, true),
            ];
            for (layer, color, opacity, additive) in layers {
                let line = scene.add(SceneObject::Line(LineStrip {
                    buffer: sampled_arc(from, to, FLOWER_SEGMENTS, FLOWER_PEAK),
                    material: MaterialParams::overlay(color, opacity, additive),
                    visible: true,
                }));
                strands.push(Strand { line, layer, seed });
            }
        }

        debug!(
            exporter = %self.nodes[exporter].stop.country,
            targets = total,
            "flower spawned"
        );
        self.flower = Some(Flower {
            exporter,
            strands,
            started_at: now,
            token: generations.token(),
        });
    }

    fn clear_flower(&mut self, scene: &mut Scene) {
        let Some(flower) = self.flower.take() else {
            return;
        };
        for strand in flower.strands {
            scene.remove(strand.line);
        }
        for node in &self.nodes {
            if let Some(sphere) = scene.sphere_mut(node.sphere) {
                sphere.scale = 1.0;
                sphere.material.transparent = false;
                sphere.material.opacity = 1.0;
                sphere.material.emissive_intensity = BASE_EMISSIVE;
            }
        }
        debug!("flower cleared");
    }
}

fn role_color(role: Role) -> [f32; 3] {
    match role {
        Role::Exporter => EXPORTER_COLOR,
        Role::Importer => IMPORTER_COLOR,
    }
}

/// Sine pulse mapped to 0..1, phase-shifted by `seed` turns.
fn pulse(elapsed: f64, frequency: f64, seed: f64) -> f64 {
    ((elapsed * frequency + seed * std::f64::consts::TAU).sin() + 1.0) / 2.0
}

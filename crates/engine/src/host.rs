use std::rc::Rc;

use foundation::math::{GLOBE_RADIUS, Vec3};
use layers::boundary::{BoundaryError, BoundarySet};
use layers::centroid::CentroidIndex;
use layers::highlight::{BoundaryCapsSnapshot, BoundaryHighlight};
use route::normalize::{normalize_route, normalize_route_json};
use route::stop::{RawStop, TradeStop};
use runtime::cancel::GenerationCounter;
use runtime::frame::Frame;
use scene::camera::CameraRig;
use scene::object::SceneObject;
use scene::picking::{PickHit, Ray, pick_screen};
use scene::world::Scene;
use tracing::{debug, warn};

use crate::director::{DEFAULT_VIEWPOINT, Phase, SequenceDirector, Stage};
use crate::interact::InteractionController;

const HALO_SCALE: f64 = 380.0;
const AMBIENT_INTENSITY: f32 = 2.5;
const SUN_INTENSITY: f32 = 1.2;
const FILL_COLOR: [f32; 3] = [0.27, 0.53, 1.0];
const FILL_INTENSITY: f32 = 0.5;

/// The session context: scene, camera, boundary layers, centroid index and
/// generation counter, all owned here and handed to the director and the
/// interaction controller per frame. No module-level mutable state.
pub struct GlobeHost {
    scene: Scene,
    camera: CameraRig,
    generations: GenerationCounter,
    boundaries: Option<Rc<BoundarySet>>,
    centroids: Option<CentroidIndex>,
    highlight: Option<BoundaryHighlight>,
    director: SequenceDirector,
    interaction: InteractionController,
}

impl Default for GlobeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobeHost {
    /// Bootstraps the render surface: globe mesh, atmosphere halo, ambient
    /// plus directional and fill lighting, and the damped orbit camera at the
    /// default viewpoint.
    pub fn new() -> Self {
        let mut scene = Scene::new();
        scene.add(SceneObject::Globe {
            radius: GLOBE_RADIUS,
        });
        scene.add(SceneObject::AmbientLight {
            color: [1.0, 1.0, 1.0],
            intensity: AMBIENT_INTENSITY,
        });
        scene.add(SceneObject::DirectionalLight {
            direction: Vec3::new(200.0, 100.0, 200.0).normalize(),
            color: [1.0, 1.0, 1.0],
            intensity: SUN_INTENSITY,
        });
        scene.add(SceneObject::DirectionalLight {
            direction: Vec3::new(-200.0, -50.0, -200.0).normalize(),
            color: FILL_COLOR,
            intensity: FILL_INTENSITY,
        });
        scene.add(SceneObject::Halo { scale: HALO_SCALE });

        Self {
            scene,
            camera: CameraRig::new(DEFAULT_VIEWPOINT),
            generations: GenerationCounter::new(),
            boundaries: None,
            centroids: None,
            highlight: None,
            director: SequenceDirector::new(),
            interaction: InteractionController::new(),
        }
    }

    /// Loads the boundary dataset, once per session. On failure the engine
    /// stays in `Loading` and the error is surfaced through the status.
    pub fn provide_boundaries(&mut self, geojson: &str) -> Result<(), BoundaryError> {
        match BoundarySet::from_geojson_str(geojson) {
            Ok(set) => {
                let set = Rc::new(set);
                self.centroids = Some(CentroidIndex::new(Rc::clone(&set)));
                self.highlight = Some(BoundaryHighlight::new(Rc::clone(&set)));
                debug!(features = set.len(), "boundary data loaded");
                self.boundaries = Some(set);
                if self.director.phase() == Phase::Loading {
                    self.director.set_status("Ready");
                }
                Ok(())
            }
            Err(e) => {
                self.director
                    .set_status(format!("Error loading boundaries: {e}"));
                Err(e)
            }
        }
    }

    /// Route input contract: a pre-built array of stop-like records.
    /// Normalization failures leave the engine in `Loading` with a
    /// descriptive status, never a crash.
    pub fn provide_route(&mut self, raw: &[RawStop]) {
        match normalize_route(raw) {
            Ok(route) => self.director.set_route(&route),
            Err(e) => {
                warn!(error = %e, "route rejected");
                self.director.set_status(format!("Error loading route: {e}"));
            }
        }
    }

    /// Fallback route contract: a raw JSON document, normalized identically.
    pub fn provide_route_json(&mut self, payload: &str) {
        match normalize_route_json(payload) {
            Ok(route) => self.director.set_route(&route),
            Err(e) => {
                warn!(error = %e, "route document rejected");
                self.director.set_status(format!("Error loading route: {e}"));
            }
        }
    }

    /// Advances the whole engine by one frame.
    pub fn tick(&mut self, frame: Frame) {
        if let (Some(centroids), Some(highlight)) = (&self.centroids, &mut self.highlight) {
            let was_done = self.director.phase() == Phase::Done;
            let mut stage = Stage {
                scene: &mut self.scene,
                camera: &mut self.camera,
                highlight,
            };
            self.director
                .tick(frame, centroids, &self.generations, &mut stage);

            if !was_done && self.director.phase() == Phase::Done {
                self.interaction
                    .build_nodes(&mut self.scene, self.director.stops(), centroids);
            }
        }

        self.interaction.tick(&mut self.scene, frame);
        self.camera.update(frame.dt_s);
    }

    /// Pointer hover: picks against the stop nodes with the caller-supplied
    /// screen→ray mapping.
    pub fn pointer_moved<F>(&mut self, x_px: f64, y_px: f64, make_ray: F)
    where
        F: FnMut(f64, f64) -> Option<Ray>,
    {
        if !self.interaction.is_active() {
            return;
        }
        let hit = self.pick(x_px, y_px, make_ray);
        self.interaction
            .pointer_hover(&mut self.scene, hit.map(|h| h.handle));
    }

    pub fn pointer_clicked<F>(&mut self, frame: Frame, x_px: f64, y_px: f64, make_ray: F)
    where
        F: FnMut(f64, f64) -> Option<Ray>,
    {
        if !self.interaction.is_active() {
            return;
        }
        let hit = self.pick(x_px, y_px, make_ray);
        self.interaction.pointer_click(
            &mut self.scene,
            frame.time,
            &self.generations,
            hit.map(|h| h.handle),
        );
    }

    /// Ray-pick helper against the scene's sphere nodes.
    pub fn pick<F>(&self, x_px: f64, y_px: f64, make_ray: F) -> Option<PickHit>
    where
        F: FnMut(f64, f64) -> Option<Ray>,
    {
        pick_screen(&self.scene, x_px, y_px, make_ray)
    }

    /// Orbit input from the host's pointer drags; ignored during the tour.
    pub fn orbit(&mut self, d_lng_deg: f64, d_lat_deg: f64) {
        self.camera.orbit(d_lng_deg, d_lat_deg);
    }

    /// Increments the generation, invalidating in-flight work, disposes all
    /// run artifacts and restarts the lifecycle from `Loading`.
    pub fn reset(&mut self) {
        self.generations.bump();
        self.interaction.teardown(&mut self.scene);
        self.director
            .reset(&mut self.scene, self.highlight.as_mut());
        self.camera.unlock();
        self.camera.set_viewpoint(DEFAULT_VIEWPOINT);
        debug!(generation = self.generations.current(), "host reset");
    }

    pub fn phase(&self) -> Phase {
        self.director.phase()
    }

    /// Human-readable status line for the host UI.
    pub fn status(&self) -> &str {
        self.director.status()
    }

    /// `(current_index, stop_count)` progress indicator.
    pub fn progress(&self) -> (usize, usize) {
        self.director.progress()
    }

    /// The stop currently selected for the detail panel, if any.
    pub fn selected(&self) -> Option<&TradeStop> {
        self.interaction.selected()
    }

    pub fn clear_selection(&mut self) {
        self.interaction.clear_selection(&mut self.scene);
    }

    /// Per-feature polygon cap colors for the render layer, if boundary data
    /// is loaded. The version lets the renderer skip unchanged uploads.
    pub fn caps_snapshot(&self) -> Option<BoundaryCapsSnapshot> {
        self.highlight.as_ref().map(|h| h.snapshot())
    }

    /// The loaded boundary features, for the host's polygon layer.
    pub fn boundaries(&self) -> Option<&BoundarySet> {
        self.boundaries.as_deref()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }
}

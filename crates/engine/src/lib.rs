//! Animation and interaction engine for the trade-route globe: geodesic arc
//! animation, the tour state machine, hover/click picking with the flower
//! link diagram, and the session-owning host.

pub mod arc;
pub mod director;
pub mod host;
pub mod interact;

pub use arc::{ARC_PEAK, ARC_SECONDS, ArcAnimator, ArcStatus, TrackPoint};
pub use director::{DEFAULT_VIEWPOINT, Phase, SequenceDirector, Stage};
pub use host::GlobeHost;
pub use interact::InteractionController;

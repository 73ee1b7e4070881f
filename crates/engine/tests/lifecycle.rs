//! End-to-end lifecycle: load data, run the full tour, explore the flower
//! diagram in free roam, then reset and run again.

use engine::{GlobeHost, Phase};
use foundation::math::{GLOBE_RADIUS, LngLat, Vec3};
use route::stop::RawStop;
use runtime::frame::{Frame, FrameClock};
use scene::object::SceneObject;
use scene::picking::Ray;

const FIXTURE_GEOJSON: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "properties": {"ADMIN": "Aland"},
            "geometry": {"type": "Polygon", "coordinates":
                [[[10.0, 10.0], [14.0, 10.0], [14.0, 14.0], [10.0, 14.0]]]}
        },
        {
            "type": "Feature",
            "properties": {"ADMIN": "Borland"},
            "geometry": {"type": "Polygon", "coordinates":
                [[[40.0, 40.0], [44.0, 40.0], [44.0, 44.0], [40.0, 44.0]]]}
        },
        {
            "type": "Feature",
            "properties": {"ADMIN": "Corland"},
            "geometry": {"type": "Polygon", "coordinates":
                [[[-30.0, 20.0], [-26.0, 20.0], [-26.0, 24.0], [-30.0, 24.0]]]}
        }
    ]
}"#;

fn route_json() -> String {
    r#"[
        {"country": "Aland", "role": "exporter", "material": "Copper wire", "hs_code": "7408.11"},
        {"country": "Borland", "role": "importer"}
    ]"#
    .to_string()
}

/// A ray from well outside the globe straight through the given surface
/// anchor, as a stand-in for the renderer's screen unprojection.
fn ray_at(anchor: LngLat) -> Ray {
    let center = anchor.to_unit().scale(GLOBE_RADIUS - 1.25);
    Ray::new(center.scale(3.0), Vec3::ZERO - center)
}

fn run_until(host: &mut GlobeHost, clock: &mut FrameClock, phase: Phase) -> Frame {
    for _ in 0..3000 {
        let frame = clock.tick();
        host.tick(frame);
        if host.phase() == phase {
            return frame;
        }
    }
    panic!("engine never reached {phase:?}");
}

fn count_kind(host: &GlobeHost, pred: impl Fn(&SceneObject) -> bool) -> usize {
    host.scene().iter().filter(|(_, o)| pred(o)).count()
}

#[test]
fn full_session_tour_flower_and_reset() {
    let mut host = GlobeHost::new();
    let mut clock = FrameClock::new(1.0 / 60.0);

    // Loading: nothing happens until both inputs are present.
    host.tick(clock.tick());
    assert_eq!(host.phase(), Phase::Loading);

    host.provide_boundaries(FIXTURE_GEOJSON).expect("boundaries");
    assert_eq!(host.status(), "Ready");
    host.provide_route_json(&route_json());

    // The tour takes over the camera.
    run_until(&mut host, &mut clock, Phase::Ready);
    assert_eq!(host.status(), "Flying to Aland…");
    assert!(host.camera().is_locked());

    // Tour completes: camera freed, labels and one baked trail left behind.
    run_until(&mut host, &mut clock, Phase::Done);
    assert_eq!(
        host.status(),
        "All routes mapped — click any node to explore · reset to reload"
    );
    assert_eq!(host.progress(), (1, 2));
    assert!(!host.camera().is_locked());
    assert_eq!(
        count_kind(&host, |o| matches!(o, SceneObject::Sprite(_))),
        2
    );
    assert_eq!(count_kind(&host, |o| matches!(o, SceneObject::Line(_))), 1);
    // One pickable node per stop.
    assert_eq!(
        count_kind(&host, |o| matches!(o, SceneObject::Sphere(_))),
        2
    );
    let caps = host.caps_snapshot().expect("caps");
    assert!(caps.caps.iter().any(|c| c[3] > 0.1), "arrival stays lit");

    // Click the exporter node: flower blooms with three strand lines.
    let exporter_anchor = LngLat::new(12.0, 12.0);
    let frame = clock.tick();
    host.tick(frame);
    host.pointer_clicked(frame, 0.0, 0.0, |_, _| Some(ray_at(exporter_anchor)));
    assert_eq!(host.selected().expect("selection").country, "Aland");
    assert_eq!(count_kind(&host, |o| matches!(o, SceneObject::Line(_))), 4);

    // Pulses advance without growing the scene.
    let objects = host.scene().len();
    for _ in 0..30 {
        host.tick(clock.tick());
    }
    assert_eq!(host.scene().len(), objects);

    // Second click on the same exporter collapses the flower.
    let frame = clock.tick();
    host.tick(frame);
    host.pointer_clicked(frame, 0.0, 0.0, |_, _| Some(ray_at(exporter_anchor)));
    assert!(host.selected().is_none());
    assert_eq!(count_kind(&host, |o| matches!(o, SceneObject::Line(_))), 1);

    // Reset: generation bump, all run artifacts disposed, lifecycle restarts
    // and the kept route drives a fresh tour.
    host.reset();
    assert_eq!(host.phase(), Phase::Loading);
    assert_eq!(
        count_kind(&host, |o| matches!(o, SceneObject::Sprite(_))),
        0
    );
    assert_eq!(count_kind(&host, |o| matches!(o, SceneObject::Line(_))), 0);
    assert_eq!(
        count_kind(&host, |o| matches!(o, SceneObject::Sphere(_))),
        0
    );
    let caps = host.caps_snapshot().expect("caps");
    assert!(caps.caps.iter().all(|c| c[3] <= 0.1), "highlights cleared");

    run_until(&mut host, &mut clock, Phase::Done);
    assert_eq!(host.progress(), (1, 2));
}

#[test]
fn hover_only_reacts_in_free_roam() {
    let mut host = GlobeHost::new();
    let mut clock = FrameClock::new(1.0 / 60.0);
    host.provide_boundaries(FIXTURE_GEOJSON).expect("boundaries");
    host.provide_route_json(&route_json());

    // Mid-tour: no nodes exist yet, hover is a no-op.
    run_until(&mut host, &mut clock, Phase::Ready);
    host.pointer_moved(0.0, 0.0, |_, _| Some(ray_at(LngLat::new(12.0, 12.0))));
    assert_eq!(count_kind(&host, |o| matches!(o, SceneObject::Sphere(_))), 0);

    run_until(&mut host, &mut clock, Phase::Done);
    host.pointer_moved(0.0, 0.0, |_, _| Some(ray_at(LngLat::new(12.0, 12.0))));
    let hovered = host
        .scene()
        .iter()
        .filter_map(|(_, o)| match o {
            SceneObject::Sphere(s) => Some(s.scale),
            _ => None,
        })
        .any(|scale| scale > 1.4);
    assert!(hovered, "hovered node scales up");
}

use foundation::arena::Handle;
use foundation::math::Vec3;

use crate::object::SceneObject;
use crate::world::Scene;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    pub handle: Handle,
    pub distance: f64,
    pub point: Vec3,
}

/// Deterministic ray picking over the scene's sphere nodes.
///
/// Ordering contract:
/// - The closest hit along the (normalized) ray wins.
/// - Equidistant hits tie-break on the lower handle index.
pub fn pick_spheres(scene: &Scene, ray: Ray) -> Option<PickHit> {
    let dir = normalize(ray.dir)?;

    let mut best: Option<(f64, Handle)> = None;
    for (handle, object) in scene.iter() {
        let SceneObject::Sphere(sphere) = object else {
            continue;
        };
        let Some(t) = ray_sphere_hit_t(ray.origin, dir, sphere.center, sphere.picking_radius())
        else {
            continue;
        };

        best = match best {
            None => Some((t, handle)),
            Some((bt, bh)) => {
                let closer = t < bt || (t == bt && handle.index() < bh.index());
                if closer { Some((t, handle)) } else { Some((bt, bh)) }
            }
        };
    }

    let (t, handle) = best?;
    Some(PickHit {
        handle,
        distance: t,
        point: ray.origin + dir.scale(t),
    })
}

/// Screen picking wrapper: the host supplies its own screen→ray mapping
/// (unprojection against its camera), keeping the engine renderer-agnostic.
pub fn pick_screen<F>(scene: &Scene, x_px: f64, y_px: f64, mut make_ray: F) -> Option<PickHit>
where
    F: FnMut(f64, f64) -> Option<Ray>,
{
    let ray = make_ray(x_px, y_px)?;
    pick_spheres(scene, ray)
}

/// Nearest intersection distance of a ray with a sphere, if any lies in front
/// of the origin.
fn ray_sphere_hit_t(origin: Vec3, dir: Vec3, center: Vec3, radius: f64) -> Option<f64> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let t0 = -b - sqrt_disc;
    let t1 = -b + sqrt_disc;
    if t0 >= 0.0 {
        Some(t0)
    } else if t1 >= 0.0 {
        Some(t1)
    } else {
        None
    }
}

fn normalize(v: Vec3) -> Option<Vec3> {
    let l2 = v.dot(v);
    if l2 <= 0.0 {
        return None;
    }
    Some(v.scale(1.0 / l2.sqrt()))
}

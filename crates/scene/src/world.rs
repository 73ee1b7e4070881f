use foundation::arena::{Arena, Handle};

use crate::object::{LineStrip, MarkerNode, SceneObject, SphereNode, SpriteNode};

/// The retained scene graph handed to the host renderer.
///
/// Every dynamically created renderable must be explicitly removed (disposed)
/// on reset, phase change, or teardown; `retired()` exposes the dispose count
/// so lifecycle tests can assert nothing leaks.
#[derive(Default)]
pub struct Scene {
    objects: Arena<SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: SceneObject) -> Handle {
        self.objects.insert(object)
    }

    /// Removes and disposes the object. Stale handles are a no-op.
    pub fn remove(&mut self, handle: Handle) -> bool {
        self.objects.remove(handle).is_some()
    }

    pub fn object(&self, handle: Handle) -> Option<&SceneObject> {
        self.objects.get(handle)
    }

    pub fn object_mut(&mut self, handle: Handle) -> Option<&mut SceneObject> {
        self.objects.get_mut(handle)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Total number of objects disposed over the scene's lifetime.
    pub fn retired(&self) -> u64 {
        self.objects.retired()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle, &SceneObject)> {
        self.objects.iter()
    }

    pub fn sphere(&self, handle: Handle) -> Option<&SphereNode> {
        match self.object(handle)? {
            SceneObject::Sphere(s) => Some(s),
            _ => None,
        }
    }

    pub fn sphere_mut(&mut self, handle: Handle) -> Option<&mut SphereNode> {
        match self.object_mut(handle)? {
            SceneObject::Sphere(s) => Some(s),
            _ => None,
        }
    }

    pub fn line(&self, handle: Handle) -> Option<&LineStrip> {
        match self.object(handle)? {
            SceneObject::Line(l) => Some(l),
            _ => None,
        }
    }

    pub fn line_mut(&mut self, handle: Handle) -> Option<&mut LineStrip> {
        match self.object_mut(handle)? {
            SceneObject::Line(l) => Some(l),
            _ => None,
        }
    }

    pub fn marker_mut(&mut self, handle: Handle) -> Option<&mut MarkerNode> {
        match self.object_mut(handle)? {
            SceneObject::Marker(m) => Some(m),
            _ => None,
        }
    }

    pub fn sprite(&self, handle: Handle) -> Option<&SpriteNode> {
        match self.object(handle)? {
            SceneObject::Sprite(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Scene;
    use crate::object::{MaterialParams, SceneObject, SphereNode};
    use foundation::math::Vec3;

    fn sphere() -> SceneObject {
        SceneObject::Sphere(SphereNode {
            center: Vec3::new(0.0, 0.0, 100.0),
            radius: 2.5,
            scale: 1.0,
            material: MaterialParams::emissive([0.0, 1.0, 0.47], 0.45),
        })
    }

    #[test]
    fn add_remove_tracks_dispose_count() {
        let mut scene = Scene::new();
        let a = scene.add(sphere());
        let b = scene.add(sphere());
        assert_eq!(scene.len(), 2);

        assert!(scene.remove(a));
        assert!(!scene.remove(a), "double dispose is a no-op");
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.retired(), 1);
        assert!(scene.sphere(b).is_some());
    }

    #[test]
    fn typed_accessors_reject_other_kinds() {
        let mut scene = Scene::new();
        let h = scene.add(SceneObject::Globe { radius: 100.0 });
        assert!(scene.sphere(h).is_none());
        assert!(scene.object(h).is_some());
    }
}

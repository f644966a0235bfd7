//! Scene: the editable collection of shapes and the ambient medium.

use std::sync::Arc;

use glam::DVec2;

use crate::material::Material;
use crate::shape::Shape;

/// An ordered collection of shapes surrounded by one ambient medium.
///
/// Insertion order is z-order: later shapes sit on top for containment
/// picking. The scene is mutated by host-side editing between frames and is
/// read-only while a solve pass runs.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Shapes in z-order, bottom first.
    pub shapes: Vec<Shape>,
    /// The medium a ray starts in and returns to after exiting any shape.
    pub env_material: Arc<Material>,
}

impl Scene {
    /// Create an empty scene with the given ambient medium.
    pub fn new(env_material: Arc<Material>) -> Self {
        Self {
            shapes: Vec::new(),
            env_material,
        }
    }

    /// Add a shape on top of the existing ones.
    pub fn add(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Remove the shape at the given index.
    pub fn remove(&mut self, index: usize) -> Shape {
        self.shapes.remove(index)
    }

    /// Remove all shapes.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Replace the ambient medium.
    pub fn set_environment(&mut self, material: Arc<Material>) {
        self.env_material = material;
    }

    /// Index of the topmost shape containing the point, if any.
    ///
    /// Scans back-to-front so the most recently added shape wins, matching
    /// the draw order.
    pub fn shape_at(&self, point: DVec2) -> Option<usize> {
        self.shapes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, shape)| shape.contains(point))
            .map(|(index, _)| index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_at_picks_topmost() {
        let mut scene = Scene::new(Material::air());
        scene.add(Shape::circle(DVec2::new(100.0, 100.0), Material::glass(), 50.0));
        scene.add(Shape::circle(DVec2::new(120.0, 100.0), Material::water(), 50.0));

        // Overlap region belongs to the later shape.
        assert_eq!(scene.shape_at(DVec2::new(110.0, 100.0)), Some(1));
        // Only the first circle covers its far left.
        assert_eq!(scene.shape_at(DVec2::new(60.0, 100.0)), Some(0));
        assert_eq!(scene.shape_at(DVec2::new(500.0, 500.0)), None);
    }

    #[test]
    fn test_environment_swap() {
        let mut scene = Scene::new(Material::air());
        assert_eq!(scene.env_material.name, "Air");
        scene.set_environment(Material::water());
        assert_eq!(scene.env_material.name, "Water");
    }
}

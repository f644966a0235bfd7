//! Refractive bodies and their geometric queries.
//!
//! A shape is a placed piece of geometry (polygon or circular lens) owning
//! a shared material. World-space geometry is recomputed from
//! {position, rotation, scale, local geometry} on every query; no cached
//! world state survives between frames.

use std::sync::Arc;

use glam::DVec2;

use crate::material::Material;
use crate::ray::Ray;

/// Rejection threshold for rays running parallel to a polygon edge.
const PARALLEL_EPSILON: f64 = 1e-6;

/// Minimum accepted ray parameter for circle roots.
const ROOT_EPSILON: f64 = 0.001;

/// Local-space geometry of a shape.
#[derive(Debug, Clone)]
pub enum Geometry {
    /// Closed loop of local-space vertices (at least 3 points).
    ///
    /// Edge normals follow the vertex winding: each edge (p1, p2) gets the
    /// perpendicular (edge.y, -edge.x) normalized, so the winding decides
    /// whether normals face outward.
    Polygon {
        /// Vertex loop in local space, implicitly closed.
        local_vertices: Vec<DVec2>,
    },
    /// Circle of fixed world-space radius centered at the shape position.
    ///
    /// Rotation and scale do not affect the geometry.
    Circle {
        /// Radius in world units.
        radius: f64,
    },
}

/// A refractive body placed in the scene.
#[derive(Debug, Clone)]
pub struct Shape {
    /// World-space position (polygon pivot or circle center).
    pub position: DVec2,
    /// Rotation around the position, in radians.
    pub rotation: f64,
    /// Uniform scale applied to polygon vertices.
    pub scale: f64,
    /// The medium this body is made of, shared by reference.
    pub material: Arc<Material>,
    /// The body's local-space geometry.
    pub geometry: Geometry,
}

impl Shape {
    /// Create a polygon shape from a closed loop of local-space vertices.
    pub fn polygon(position: DVec2, material: Arc<Material>, local_vertices: Vec<DVec2>) -> Self {
        Self {
            position,
            rotation: 0.0,
            scale: 1.0,
            material,
            geometry: Geometry::Polygon { local_vertices },
        }
    }

    /// Create a circular lens of the given radius.
    pub fn circle(position: DVec2, material: Arc<Material>, radius: f64) -> Self {
        Self {
            position,
            rotation: 0.0,
            scale: 1.0,
            material,
            geometry: Geometry::Circle { radius },
        }
    }

    /// Move the shape by a delta.
    pub fn translate(&mut self, delta: DVec2) {
        self.position += delta;
    }

    /// Rotate the shape by an angle in radians.
    pub fn rotate_by(&mut self, angle: f64) {
        self.rotation += angle;
    }

    /// World-space vertices of a polygon shape.
    ///
    /// world = position + rotate(local, rotation) * scale. Returns an empty
    /// list for circles.
    pub fn world_vertices(&self) -> Vec<DVec2> {
        match &self.geometry {
            Geometry::Polygon { local_vertices } => {
                let rotor = DVec2::from_angle(self.rotation);
                local_vertices
                    .iter()
                    .map(|&v| self.position + rotor.rotate(v) * self.scale)
                    .collect()
            }
            Geometry::Circle { .. } => Vec::new(),
        }
    }

    /// Nearest intersection of a ray with this shape.
    ///
    /// Returns the ray parameter and the surface normal at the hit point,
    /// or `None` if the ray misses. Degenerate geometry (zero-length edges,
    /// parallel ray/edge pairs, zero-length directions) yields `None`
    /// rather than a fault.
    pub fn intersect(&self, ray: &Ray) -> Option<(f64, DVec2)> {
        match &self.geometry {
            Geometry::Polygon { .. } => self.intersect_polygon(ray),
            Geometry::Circle { radius } => self.intersect_circle(ray, *radius),
        }
    }

    fn intersect_polygon(&self, ray: &Ray) -> Option<(f64, DVec2)> {
        let verts = self.world_vertices();
        let mut closest_t = f64::INFINITY;
        let mut closest_normal = None;

        let count = verts.len();
        for i in 0..count {
            let p1 = verts[i];
            let p2 = verts[(i + 1) % count];

            let edge = p2 - p1;
            let normal = DVec2::new(edge.y, -edge.x).normalize_or_zero();

            // Degenerate edges produce a zero normal and fail this guard too.
            let denom = normal.dot(ray.direction);
            if denom.abs() < PARALLEL_EPSILON {
                continue;
            }

            let t = (p1 - ray.origin).dot(normal) / denom;
            if t < 0.0 {
                continue;
            }

            // Keep the hit only if it lands within the edge's span.
            let hit_point = ray.at(t);
            let edge_len_sq = edge.length_squared();
            let proj = (hit_point - p1).dot(edge);

            if proj >= 0.0 && proj <= edge_len_sq && t < closest_t {
                closest_t = t;
                closest_normal = Some(normal);
            }
        }

        closest_normal.map(|n| (closest_t, n))
    }

    fn intersect_circle(&self, ray: &Ray, radius: f64) -> Option<(f64, DVec2)> {
        let oc = ray.origin - self.position;
        let a = ray.direction.dot(ray.direction);
        if a < PARALLEL_EPSILON {
            return None;
        }
        let b = 2.0 * oc.dot(ray.direction);
        let c = oc.dot(oc) - radius * radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        // Prefer the near root; fall back to the far root when the origin
        // sits inside the circle.
        let sqrt_d = discriminant.sqrt();
        let t1 = (-b - sqrt_d) / (2.0 * a);
        let t2 = (-b + sqrt_d) / (2.0 * a);

        let t = if t1 > ROOT_EPSILON {
            t1
        } else if t2 > ROOT_EPSILON {
            t2
        } else {
            return None;
        };

        let hit_point = ray.at(t);
        let normal = (hit_point - self.position).normalize_or_zero();
        Some((t, normal))
    }

    /// Whether a world-space point lies inside the shape.
    pub fn contains(&self, point: DVec2) -> bool {
        match &self.geometry {
            Geometry::Polygon { .. } => self.contains_polygon(point),
            Geometry::Circle { radius } => point.distance(self.position) < *radius,
        }
    }

    /// Point-in-polygon via edge-crossing parity.
    fn contains_polygon(&self, point: DVec2) -> bool {
        let verts = self.world_vertices();
        if verts.len() < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = verts.len() - 1;
        for i in 0..verts.len() {
            if ((verts[i].y > point.y) != (verts[j].y > point.y))
                && (point.x
                    < (verts[j].x - verts[i].x) * (point.y - verts[i].y)
                        / (verts[j].y - verts[i].y)
                        + verts[i].x)
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

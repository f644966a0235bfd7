//! The recursive optical solver.
//!
//! Traces seed rays through the scene, splitting at every medium interface
//! into reflected and refracted sub-rays according to Snell's law and the
//! Fresnel equations, with Beer-Lambert attenuation along each leg. The
//! branching tree is bounded by a recursion depth cap and a minimum
//! intensity threshold, so tracing always terminates regardless of scene
//! geometry (parallel mirror setups included).

use std::sync::Arc;

use glam::DVec2;
use log::debug;

use crate::material::Material;
use crate::ray::{Ray, RaySegment, SeedRay};
use crate::scene::Scene;
use crate::spectrum::spectrum_color;

/// Maximum recursion depth for the reflect/refract tree.
pub const MAX_RECURSION: u32 = 12;

/// Rays dimmer than this are not traced further.
pub const MIN_INTENSITY: f64 = 0.005;

/// Length of the terminal segment drawn for rays that leave the field.
pub const RAY_STEP: f64 = 5000.0;

/// Minimum accepted hit distance, and the offset applied to sub-ray
/// origins to avoid immediate self-intersection.
pub const HIT_EPSILON: f64 = 0.001;

/// Branches carrying less than this share of the energy are pruned as
/// visually negligible.
pub const BRANCH_CUTOFF: f64 = 0.05;

/// Rectangular extent of the simulated region, supplied by the host.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    /// Field width in world units.
    pub width: f64,
    /// Field height in world units.
    pub height: f64,
}

impl Bounds {
    /// Create bounds of the given extent.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// What an intersection query hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// A shape, by scene index.
    Shape(usize),
    /// A boundary wall. Walls carry no material and absorb the ray.
    Wall,
}

/// Result of a nearest-intersection query.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// Ray parameter at the hit.
    pub t: f64,
    /// Hit point in world coordinates.
    pub point: DVec2,
    /// Unit surface normal at the hit point.
    pub normal: DVec2,
    /// The shape or wall that was hit.
    pub target: HitTarget,
}

/// The recursive ray solver.
///
/// Holds the field bounds; everything else (shapes, media) is read from the
/// scene passed to [`RayCaster::solve`], which is left untouched.
#[derive(Debug, Clone)]
pub struct RayCaster {
    /// Extent of the simulated region; its edges are absorbing walls.
    pub bounds: Bounds,
}

impl RayCaster {
    /// Create a solver for the given field bounds.
    pub fn new(bounds: Bounds) -> Self {
        Self { bounds }
    }

    /// Trace every seed ray to termination.
    ///
    /// Each seed starts with intensity 1.0 in the scene's ambient medium.
    /// The returned segments are in depth-first emission order: parents
    /// before children, each reflection subtree fully before its sibling
    /// refraction subtree.
    pub fn solve(&self, scene: &Scene, seeds: &[SeedRay]) -> Vec<RaySegment> {
        let mut segments = Vec::new();
        for seed in seeds {
            self.cast_ray(
                scene,
                seed.origin,
                seed.direction,
                seed.wavelength,
                1.0,
                &scene.env_material,
                0,
                &mut segments,
            );
        }
        debug!("solve: {} seed rays -> {} segments", seeds.len(), segments.len());
        segments
    }

    /// Trace one ray leg and recurse into its reflected/refracted children.
    ///
    /// Shapes are assumed to never nest or overlap: a ray exiting any shape
    /// always returns to the ambient medium, never to another shape's.
    #[allow(clippy::too_many_arguments)]
    fn cast_ray(
        &self,
        scene: &Scene,
        origin: DVec2,
        direction: DVec2,
        wavelength: f64,
        intensity: f64,
        medium: &Arc<Material>,
        depth: u32,
        output: &mut Vec<RaySegment>,
    ) {
        if depth > MAX_RECURSION || intensity < MIN_INTENSITY {
            return;
        }

        let ray = Ray::new(origin, direction);
        let hit = match self.find_closest_intersection(scene, &ray) {
            Some(hit) => hit,
            None => {
                // Ray leaves the visible field
                let end_point = origin + direction * RAY_STEP;
                output.push(RaySegment::new(
                    origin,
                    end_point,
                    intensity,
                    wavelength,
                    spectrum_color(wavelength),
                ));
                return;
            }
        };

        // Beer-Lambert absorption over the traveled leg
        let dist = hit.point.distance(origin);
        let transmission_loss = (-medium.opacity * (dist / 100.0)).exp();
        let final_intensity = intensity * transmission_loss;

        output.push(RaySegment::new(
            origin,
            hit.point,
            final_intensity,
            wavelength,
            spectrum_color(wavelength),
        ));

        let shape = match hit.target {
            // Walls absorb; no material transition happens there.
            HitTarget::Wall => return,
            HitTarget::Shape(index) => &scene.shapes[index],
        };

        // The sign of direction . normal tells entry from exit. Exiting
        // always transitions back to the ambient medium.
        let is_entering = direction.dot(hit.normal) < 0.0;
        let (n1, n2, normal) = if is_entering {
            (
                medium.index_of_refraction(wavelength),
                shape.material.index_of_refraction(wavelength),
                hit.normal,
            )
        } else {
            (
                shape.material.index_of_refraction(wavelength),
                scene.env_material.index_of_refraction(wavelength),
                -hit.normal,
            )
        };

        let ratio = n1 / n2;
        let cos_i = -normal.dot(direction);
        let sin_t2 = ratio * ratio * (1.0 - cos_i * cos_i);

        // sin_t2 > 1 means refraction is geometrically impossible: total
        // internal reflection, all energy into the reflected branch.
        let is_tir = sin_t2 > 1.0;
        let reflectivity = if is_tir {
            1.0
        } else {
            fresnel_reflectance(n1, n2, cos_i, (1.0 - sin_t2).sqrt())
        };

        if reflectivity > BRANCH_CUTOFF {
            let reflect_dir = direction.reflect(normal).normalize();
            let reflect_start = hit.point + reflect_dir * HIT_EPSILON;
            self.cast_ray(
                scene,
                reflect_start,
                reflect_dir,
                wavelength,
                final_intensity * reflectivity,
                medium,
                depth + 1,
                output,
            );
        }

        if !is_tir {
            let transmission_ratio = 1.0 - reflectivity;
            if transmission_ratio > BRANCH_CUTOFF {
                let refract_dir = refract_direction(direction, normal, ratio, cos_i);
                let refract_start = hit.point + refract_dir * HIT_EPSILON;
                let new_medium = if is_entering {
                    &shape.material
                } else {
                    &scene.env_material
                };
                self.cast_ray(
                    scene,
                    refract_start,
                    refract_dir,
                    wavelength,
                    final_intensity * transmission_ratio,
                    new_medium,
                    depth + 1,
                    output,
                );
            }
        }
    }

    /// Nearest intersection among all scene shapes and the boundary walls.
    ///
    /// Smallest ray parameter beyond [`HIT_EPSILON`] wins; ties keep the
    /// first candidate encountered. Walls are tested only against the
    /// ray's heading (a ray moving left can only cross the left wall) and
    /// their normals point into the scene.
    pub fn find_closest_intersection(&self, scene: &Scene, ray: &Ray) -> Option<RayHit> {
        let mut closest_t = f64::INFINITY;
        let mut closest_hit = None;

        for (index, shape) in scene.shapes.iter().enumerate() {
            if let Some((t, normal)) = shape.intersect(ray) {
                if t > HIT_EPSILON && t < closest_t {
                    closest_t = t;
                    closest_hit = Some(RayHit {
                        t,
                        point: ray.at(t),
                        normal,
                        target: HitTarget::Shape(index),
                    });
                }
            }
        }

        let o = ray.origin;
        let d = ray.direction;

        if d.y < 0.0 {
            let t = -o.y / d.y;
            if t > HIT_EPSILON && t < closest_t {
                closest_t = t;
                closest_hit = Some(RayHit {
                    t,
                    point: ray.at(t),
                    normal: DVec2::new(0.0, 1.0),
                    target: HitTarget::Wall,
                });
            }
        }

        if d.y > 0.0 {
            let t = (self.bounds.height - o.y) / d.y;
            if t > HIT_EPSILON && t < closest_t {
                closest_t = t;
                closest_hit = Some(RayHit {
                    t,
                    point: ray.at(t),
                    normal: DVec2::new(0.0, -1.0),
                    target: HitTarget::Wall,
                });
            }
        }

        if d.x < 0.0 {
            let t = -o.x / d.x;
            if t > HIT_EPSILON && t < closest_t {
                closest_t = t;
                closest_hit = Some(RayHit {
                    t,
                    point: ray.at(t),
                    normal: DVec2::new(1.0, 0.0),
                    target: HitTarget::Wall,
                });
            }
        }

        if d.x > 0.0 {
            let t = (self.bounds.width - o.x) / d.x;
            if t > HIT_EPSILON && t < closest_t {
                closest_hit = Some(RayHit {
                    t,
                    point: ray.at(t),
                    normal: DVec2::new(-1.0, 0.0),
                    target: HitTarget::Wall,
                });
            }
        }

        closest_hit
    }
}

/// Unpolarized Fresnel reflectance: the average of the squared s- and
/// p-polarization amplitude coefficients.
fn fresnel_reflectance(n1: f64, n2: f64, cos_i: f64, cos_t: f64) -> f64 {
    let r_orth = (n1 * cos_i - n2 * cos_t) / (n1 * cos_i + n2 * cos_t);
    let r_par = (n2 * cos_i - n1 * cos_t) / (n2 * cos_i + n1 * cos_t);
    (r_orth * r_orth + r_par * r_par) / 2.0
}

/// Refract a direction through an interface using the vector form of
/// Snell's law. Caller guarantees no total internal reflection.
fn refract_direction(direction: DVec2, normal: DVec2, ratio: f64, cos_i: f64) -> DVec2 {
    let k = 1.0 - ratio * ratio * (1.0 - cos_i * cos_i);
    (direction * ratio + normal * (ratio * cos_i - k.sqrt())).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;

    fn field() -> RayCaster {
        RayCaster::new(Bounds::new(1400.0, 900.0))
    }

    /// Non-dispersive, non-absorbing glass for clean energy accounting.
    fn clear_glass(ior: f64) -> Arc<Material> {
        Arc::new(Material::new("Test Glass", ior, 0.0, 0.0, [0, 0, 0, 0]))
    }

    /// A 100x160 rectangular block, wound clockwise so edge normals face
    /// outward.
    fn slab(position: DVec2, material: Arc<Material>) -> Shape {
        Shape::polygon(
            position,
            material,
            vec![
                DVec2::new(-50.0, -80.0),
                DVec2::new(50.0, -80.0),
                DVec2::new(50.0, 80.0),
                DVec2::new(-50.0, 80.0),
            ],
        )
    }

    #[test]
    fn test_no_hit_straight_shot() {
        // Empty scene: one terminal segment ending on the right wall,
        // intensity untouched by a vacuum ambient.
        let caster = field();
        let scene = Scene::new(Material::vacuum());
        let seeds = [SeedRay::new(
            DVec2::new(0.0, 450.0),
            DVec2::new(1.0, 0.0),
            550.0,
        )];

        let segments = caster.solve(&scene, &seeds);
        assert_eq!(segments.len(), 1);
        assert!((segments[0].p2 - DVec2::new(1400.0, 450.0)).length() < 1e-9);
        assert_eq!(segments[0].intensity, 1.0);
    }

    #[test]
    fn test_wall_selection_and_inward_normal() {
        let caster = field();
        let scene = Scene::new(Material::vacuum());
        let ray = Ray::new(DVec2::new(100.0, 200.0), DVec2::new(-1.0, -1.0));

        // Left wall (t = 100) beats top wall (t = 200).
        let hit = caster.find_closest_intersection(&scene, &ray).unwrap();
        assert_eq!(hit.target, HitTarget::Wall);
        assert!((hit.point - DVec2::new(0.0, 100.0)).length() < 1e-9);
        assert_eq!(hit.normal, DVec2::new(1.0, 0.0));
    }

    #[test]
    fn test_snell_round_trip() {
        // A beam at 30 degrees incidence onto the left face of a glass
        // slab: n1 sin(i) = n2 sin(t) for the in-glass leg, across the
        // visible range.
        let caster = field();
        for wavelength in [400.0, 550.0, 700.0] {
            let mut scene = Scene::new(Material::vacuum());
            scene.add(slab(DVec2::new(300.0, 300.0), Material::glass()));

            let direction = DVec2::from_angle(30.0_f64.to_radians());
            let seeds = [SeedRay::new(DVec2::new(200.0, 280.0), direction, wavelength)];
            let segments = caster.solve(&scene, &seeds);

            // Reflectivity at 30 degrees is under the branch cutoff, so the
            // refracted leg directly follows the incident one.
            assert!(segments.len() >= 2);
            let refracted = (segments[1].p2 - segments[1].p1).normalize();

            let n1 = 1.0;
            let n2 = Material::glass().index_of_refraction(wavelength);
            let sin_i = direction.y.abs();
            let sin_t = refracted.y.abs();
            assert!((n1 * sin_i - n2 * sin_t).abs() < 1e-9);
        }
    }

    #[test]
    fn test_dispersion_bends_blue_more() {
        let caster = field();
        let mut scene = Scene::new(Material::vacuum());
        scene.add(slab(DVec2::new(300.0, 300.0), Material::flint()));

        let direction = DVec2::from_angle(30.0_f64.to_radians());
        let sin_t_at = |wavelength: f64| {
            let seeds = [SeedRay::new(DVec2::new(200.0, 280.0), direction, wavelength)];
            let segments = caster.solve(&scene, &seeds);
            // Flint reflects above the branch cutoff even head on, so the
            // reflection leg comes second and the in-glass leg third.
            let in_glass = segments[2];
            assert!(in_glass.p1.x > 249.0 && in_glass.p1.x < 251.0);
            (in_glass.p2 - in_glass.p1).normalize().y.abs()
        };

        // Higher index at short wavelengths refracts closer to the normal.
        assert!(sin_t_at(400.0) < sin_t_at(700.0));
    }

    #[test]
    fn test_energy_conservation_split() {
        // At 60 degrees the Fresnel split spawns both branches; with no
        // absorption anywhere their first legs carry the full energy.
        let caster = field();
        let mut scene = Scene::new(Material::vacuum());
        scene.add(slab(DVec2::new(300.0, 300.0), clear_glass(1.52)));

        let direction = DVec2::from_angle(60.0_f64.to_radians());
        let seeds = [SeedRay::new(DVec2::new(200.0, 240.0), direction, 550.0)];
        let segments = caster.solve(&scene, &seeds);

        assert_eq!(segments[0].intensity, 1.0);
        // segments[1] opens the reflection subtree, segments[2] the
        // refraction subtree.
        let reflected = segments[1].intensity;
        let transmitted = segments[2].intensity;
        assert!(reflected > BRANCH_CUTOFF && transmitted > BRANCH_CUTOFF);
        assert!((reflected + transmitted - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fresnel_reflectance_bounds() {
        let n1 = 1.0;
        let n2 = 1.52;
        for i in 1..90 {
            let theta = (i as f64).to_radians();
            let cos_i = theta.cos();
            let sin_t = n1 / n2 * theta.sin();
            let cos_t = (1.0 - sin_t * sin_t).sqrt();
            let r = fresnel_reflectance(n1, n2, cos_i, cos_t);
            assert!((0.0..=1.0).contains(&r), "r = {} at {} deg", r, i);
        }

        // Normal incidence matches ((n1-n2)/(n1+n2))^2.
        let r0 = fresnel_reflectance(n1, n2, 1.0, 1.0);
        let expected = ((n1 - n2) / (n1 + n2)).powi(2);
        assert!((r0 - expected).abs() < 1e-12);
    }

    #[test]
    fn test_total_internal_reflection() {
        // A 45-degree prism used as a retroreflector face: the beam enters
        // the vertical leg head on, meets the hypotenuse at 45 degrees,
        // which is past the critical angle for n = 1.5 (41.8 degrees).
        let caster = field();
        let mut scene = Scene::new(Material::vacuum());
        scene.add(Shape::polygon(
            DVec2::new(700.0, 450.0),
            clear_glass(1.5),
            vec![
                DVec2::new(-50.0, -50.0),
                DVec2::new(50.0, 50.0),
                DVec2::new(-50.0, 50.0),
            ],
        ));

        let seeds = [SeedRay::new(
            DVec2::new(100.0, 430.0),
            DVec2::new(1.0, 0.0),
            550.0,
        )];
        let segments = caster.solve(&scene, &seeds);

        // approach, in-glass leg, TIR leg, exit to the bottom wall
        assert_eq!(segments.len(), 4);

        // All energy reflects at the hypotenuse: the TIR leg keeps the
        // in-glass leg's intensity exactly.
        assert!((segments[2].intensity - segments[1].intensity).abs() < 1e-12);
        // The TIR leg turns straight down.
        let tir_dir = (segments[2].p2 - segments[2].p1).normalize();
        assert!((tir_dir - DVec2::new(0.0, 1.0)).length() < 1e-9);

        // No segment crosses the hypotenuse: nothing was transmitted there.
        for s in &segments {
            assert!(s.p1.x <= 680.1 && s.p2.x <= 680.1);
        }
    }

    #[test]
    fn test_termination_bounded() {
        // A diamond lens traps grazing rays in repeated internal
        // reflections; the depth and intensity caps still bound the tree.
        let caster = field();
        let mut scene = Scene::new(Material::vacuum());
        scene.add(Shape::circle(
            DVec2::new(700.0, 450.0),
            Material::diamond(),
            120.0,
        ));

        let seeds = [SeedRay::new(
            DVec2::new(100.0, 340.0),
            DVec2::new(1.0, 0.05),
            550.0,
        )];
        let segments = caster.solve(&scene, &seeds);

        // A binary tree of depth 13 can never emit more segments than this.
        assert!(!segments.is_empty());
        assert!(segments.len() < (1usize << (MAX_RECURSION + 2)));
    }

    #[test]
    fn test_attenuation_monotonicity() {
        // Fixed travel distance, increasing ambient opacity: strictly
        // dimmer segments, matching the Beer-Lambert closed form.
        let caster = field();
        let seeds = [SeedRay::new(
            DVec2::new(0.0, 450.0),
            DVec2::new(1.0, 0.0),
            550.0,
        )];

        let mut last = f64::INFINITY;
        for opacity in [0.0, 0.05, 0.2, 0.5] {
            let env = Arc::new(Material::new("Murk", 1.0, 0.0, opacity, [0, 0, 0, 0]));
            let scene = Scene::new(env);
            let segments = caster.solve(&scene, &seeds);

            assert_eq!(segments.len(), 1);
            let expected = (-opacity * 14.0).exp();
            assert!((segments[0].intensity - expected).abs() < 1e-12);
            assert!(segments[0].intensity < last);
            last = segments[0].intensity;
        }
    }

    #[test]
    fn test_wavelength_color_attached() {
        let caster = field();
        let scene = Scene::new(Material::vacuum());
        let seeds = [SeedRay::new(
            DVec2::new(0.0, 450.0),
            DVec2::new(1.0, 0.0),
            650.0,
        )];
        let segments = caster.solve(&scene, &seeds);
        assert_eq!(segments[0].color, spectrum_color(650.0));
        assert_eq!(segments[0].wavelength, 650.0);
    }
}

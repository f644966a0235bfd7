//! Ray representation for 2D ray tracing.
//!
//! A ray is defined as r(t) = origin + t * direction, representing a semi-infinite
//! line in the scene plane used for intersection testing.

use glam::DVec2;

/// Ray in the 2D scene plane defined by origin and direction.
///
/// Mathematical representation: r(t) = origin + t * direction
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Starting point of the ray in world coordinates.
    pub origin: DVec2,

    /// Direction vector of the ray.
    ///
    /// Not required to be normalized; the parametric t scales with the
    /// direction magnitude, and all consumers treat it consistently.
    pub direction: DVec2,
}

impl Ray {
    /// Create a new ray with origin and direction.
    pub fn new(origin: DVec2, direction: DVec2) -> Self {
        Self { origin, direction }
    }

    /// Compute a point at parameter t along the ray.
    ///
    /// Returns r(t) = origin + t * direction.
    pub fn at(&self, t: f64) -> DVec2 {
        self.origin + t * self.direction
    }
}

/// Seed ray submitted to the solver for one simulated light source beam.
#[derive(Debug, Clone, Copy)]
pub struct SeedRay {
    /// Emission point in world coordinates.
    pub origin: DVec2,
    /// Emission direction (unit length when produced by a [`crate::source::LaserSource`]).
    pub direction: DVec2,
    /// Wavelength in nanometers.
    pub wavelength: f64,
}

impl SeedRay {
    /// Create a seed ray.
    pub fn new(origin: DVec2, direction: DVec2, wavelength: f64) -> Self {
        Self {
            origin,
            direction,
            wavelength,
        }
    }
}

/// One finite visible leg of a traced ray.
///
/// Produced fresh on every solve and never mutated afterwards. The solver
/// emits segments in depth-first order, parents before children.
#[derive(Debug, Clone, Copy)]
pub struct RaySegment {
    /// Start point of the segment.
    pub p1: DVec2,
    /// End point of the segment.
    pub p2: DVec2,
    /// Light intensity over this leg, in [0, 1].
    pub intensity: f64,
    /// Wavelength in nanometers.
    pub wavelength: f64,
    /// Display color derived from the wavelength.
    pub color: [u8; 3],
}

impl RaySegment {
    /// Create a segment between two points.
    pub fn new(p1: DVec2, p2: DVec2, intensity: f64, wavelength: f64, color: [u8; 3]) -> Self {
        Self {
            p1,
            p2,
            intensity,
            wavelength,
            color,
        }
    }

    /// Length of the segment.
    pub fn length(&self) -> f64 {
        self.p1.distance(self.p2)
    }
}

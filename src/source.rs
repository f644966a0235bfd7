//! Laser light source: turns emitter settings into seed rays.

use glam::DVec2;

use crate::ray::SeedRay;

/// Forward offset from the source position to the emitter nozzle.
const NOZZLE_OFFSET: f64 = 50.0;

/// Perpendicular spacing between parallel beams.
const BEAM_SPACING: f64 = 3.0;

/// Pick-up radius for host-side dragging.
const GRAB_RADIUS: f64 = 40.0;

/// What the laser emits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Emission {
    /// A single wavelength in nanometers.
    Monochrome(f64),
    /// Ten parallel rays sweeping 400-700 nm, dispersing into a rainbow
    /// at the first refractive interface.
    White,
}

/// An adjustable laser emitter producing seed rays for the solver.
#[derive(Debug, Clone)]
pub struct LaserSource {
    /// Mount position in world coordinates.
    pub position: DVec2,
    /// Beam direction angle in radians.
    pub angle: f64,
    /// Whether the laser is firing; an inactive laser emits nothing.
    pub active: bool,
    /// Spectral emission mode.
    pub emission: Emission,
    /// Number of beams in monochrome mode.
    pub beam_count: u32,
    /// Angular fan spread between adjacent beams, in degrees. Zero spreads
    /// the beams as parallel offset lines instead.
    pub spread: f64,
}

impl LaserSource {
    /// Create a laser at the given position, firing a single 650 nm beam
    /// along +x.
    pub fn new(position: DVec2) -> Self {
        Self {
            position,
            angle: 0.0,
            active: true,
            emission: Emission::Monochrome(650.0),
            beam_count: 1,
            spread: 0.0,
        }
    }

    /// Seed rays for the current emitter settings.
    pub fn rays(&self) -> Vec<SeedRay> {
        if !self.active {
            return Vec::new();
        }

        let main_dir = DVec2::from_angle(self.angle);
        let perp = DVec2::new(-main_dir.y, main_dir.x);
        let start = self.position + main_dir * NOZZLE_OFFSET;

        match self.emission {
            Emission::White => {
                // Ten offset rays spanning the visible range; dispersion in
                // the scene separates them into a spectrum.
                (0..10)
                    .map(|i| {
                        let wavelength = 400.0 + (i as f64 / 9.0) * 300.0;
                        let p = start + perp * ((i as f64 - 4.5) * 1.5);
                        SeedRay::new(p, main_dir, wavelength)
                    })
                    .collect()
            }
            Emission::Monochrome(wavelength) => {
                if self.beam_count <= 1 {
                    return vec![SeedRay::new(start, main_dir, wavelength)];
                }

                (0..self.beam_count)
                    .map(|i| {
                        let offset_idx = i as f64 - (self.beam_count - 1) as f64 / 2.0;
                        if self.spread > 0.0 {
                            let angle_offset = (offset_idx * self.spread).to_radians();
                            let d = DVec2::from_angle(angle_offset).rotate(main_dir);
                            SeedRay::new(start, d, wavelength)
                        } else {
                            let p = start + perp * (offset_idx * BEAM_SPACING);
                            SeedRay::new(p, main_dir, wavelength)
                        }
                    })
                    .collect()
            }
        }
    }

    /// Whether a world-space point grabs the laser body.
    pub fn contains(&self, point: DVec2) -> bool {
        self.position.distance(point) < GRAB_RADIUS
    }
}

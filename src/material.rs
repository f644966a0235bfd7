//! Optical material system.
//!
//! A material describes a transparent medium: its base index of refraction,
//! Cauchy dispersion coefficient, absorption opacity and display tint.
//! Materials are immutable and shared by reference; any number of shapes
//! (and the scene's ambient slot) may hold the same `Arc<Material>`.

use std::sync::Arc;

/// Optical properties of a medium.
///
/// Invariants are caller contracts, not validated: `ior_base >= 1.0` and
/// `opacity` in roughly [0, 1].
#[derive(Debug, Clone)]
pub struct Material {
    /// Human-readable name, e.g. "Glass (BK7)".
    pub name: String,
    /// Index of refraction at long wavelengths (the Cauchy A coefficient).
    pub ior_base: f64,
    /// Cauchy B coefficient in um^2; 0.0 for non-dispersive media.
    pub dispersion: f64,
    /// Exponential absorption strength for Beer-Lambert attenuation.
    pub opacity: f64,
    /// Display fill color as RGBA, used by the host renderer.
    pub tint: [u8; 4],
}

impl Material {
    /// Create a material with the given optical properties.
    pub fn new(name: &str, ior_base: f64, dispersion: f64, opacity: f64, tint: [u8; 4]) -> Self {
        Self {
            name: name.to_string(),
            ior_base,
            dispersion,
            opacity,
            tint,
        }
    }

    /// Wavelength-dependent index of refraction via Cauchy's equation:
    /// n(w) = A + B / (w/1000)^2 with w in nanometers.
    ///
    /// Total over all positive wavelengths; values outside the visible
    /// range extrapolate without clamping.
    pub fn index_of_refraction(&self, wavelength_nm: f64) -> f64 {
        let wl_um = wavelength_nm / 1000.0;
        self.ior_base + self.dispersion / (wl_um * wl_um)
    }

    /// Perfect vacuum: n = 1, no absorption.
    pub fn vacuum() -> Arc<Self> {
        Arc::new(Self::new("Vacuum", 1.0, 0.0, 0.0, [0, 0, 0, 0]))
    }

    /// Air at standard conditions.
    pub fn air() -> Arc<Self> {
        Arc::new(Self::new("Air", 1.0003, 0.0, 0.001, [240, 240, 255, 5]))
    }

    /// Water.
    pub fn water() -> Arc<Self> {
        Arc::new(Self::new("Water", 1.333, 0.003, 0.05, [100, 200, 255, 40]))
    }

    /// BK7 crown glass.
    pub fn glass() -> Arc<Self> {
        Arc::new(Self::new("Glass (BK7)", 1.5168, 0.004, 0.1, [200, 255, 250, 60]))
    }

    /// Dense flint glass, strongly dispersive.
    pub fn flint() -> Arc<Self> {
        Arc::new(Self::new("Flint Glass", 1.62, 0.01, 0.2, [220, 220, 255, 70]))
    }

    /// Diamond.
    pub fn diamond() -> Arc<Self> {
        Arc::new(Self::new("Diamond", 2.417, 0.018, 0.0, [200, 255, 255, 90]))
    }

    /// Acrylic (PMMA).
    pub fn acrylic() -> Arc<Self> {
        Arc::new(Self::new("Acrylic", 1.49, 0.002, 0.1, [240, 240, 240, 50]))
    }

    /// Mineral oil.
    pub fn oil() -> Arc<Self> {
        Arc::new(Self::new("Oil", 1.47, 0.005, 0.3, [255, 255, 100, 80]))
    }

    /// Look up a library preset by key (case-insensitive).
    ///
    /// Returns `None` for unknown keys.
    pub fn by_name(key: &str) -> Option<Arc<Self>> {
        match key.to_ascii_lowercase().as_str() {
            "vacuum" => Some(Self::vacuum()),
            "air" => Some(Self::air()),
            "water" => Some(Self::water()),
            "glass" => Some(Self::glass()),
            "flint" => Some(Self::flint()),
            "diamond" => Some(Self::diamond()),
            "acrylic" => Some(Self::acrylic()),
            "oil" => Some(Self::oil()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cauchy_dispersion_value() {
        let glass = Material::glass();
        // n(550) = 1.5168 + 0.004 / 0.55^2
        let expected = 1.5168 + 0.004 / (0.55 * 0.55);
        assert!((glass.index_of_refraction(550.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_dispersion_monotonic() {
        // Shorter wavelengths bend more: n(400) > n(700) for dispersive media.
        let flint = Material::flint();
        assert!(flint.index_of_refraction(400.0) > flint.index_of_refraction(700.0));

        // Non-dispersive media are flat across the spectrum.
        let air = Material::air();
        assert_eq!(
            air.index_of_refraction(400.0),
            air.index_of_refraction(700.0)
        );
    }

    #[test]
    fn test_library_lookup() {
        assert_eq!(Material::by_name("GLASS").unwrap().name, "Glass (BK7)");
        assert_eq!(Material::by_name("water").unwrap().name, "Water");
        assert!(Material::by_name("adamantium").is_none());
    }
}

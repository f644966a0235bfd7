//! Wavelength to display color mapping.

/// Map a wavelength in nanometers to an sRGB display color.
///
/// Piecewise-linear approximation of the visible spectrum over 380-780 nm.
/// Wavelengths outside that range are clamped to the nearest edge, and the
/// edges fade toward black so the spectrum ends do not cut off abruptly.
pub fn spectrum_color(wavelength_nm: f64) -> [u8; 3] {
    let w = wavelength_nm.clamp(380.0, 780.0);

    let (r, g, b) = if w < 440.0 {
        (-(w - 440.0) / (440.0 - 380.0), 0.0, 1.0)
    } else if w < 490.0 {
        (0.0, (w - 440.0) / (490.0 - 440.0), 1.0)
    } else if w < 510.0 {
        (0.0, 1.0, -(w - 510.0) / (510.0 - 490.0))
    } else if w < 580.0 {
        ((w - 510.0) / (580.0 - 510.0), 1.0, 0.0)
    } else if w < 645.0 {
        (1.0, -(w - 645.0) / (645.0 - 580.0), 0.0)
    } else {
        (1.0, 0.0, 0.0)
    };

    // Intensity falloff near the edges of perception
    let factor = if w < 420.0 {
        0.3 + 0.7 * (w - 380.0) / (420.0 - 380.0)
    } else if w >= 700.0 {
        0.3 + 0.7 * (780.0 - w) / (780.0 - 700.0)
    } else {
        1.0
    };

    let gamma = 0.8;
    let channel = |c: f64| ((c * factor).max(0.0).powf(gamma) * 255.0) as u8;
    [channel(r), channel(g), channel(b)]
}

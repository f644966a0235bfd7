//! Frame rasterization and PNG export.
//!
//! Draws one solved frame the way the interactive view composes it: dark
//! background, reference grid, tinted shape fills with outlines, the laser
//! body, and the traced ray segments blended by intensity on top.

use glam::DVec2;
use image::{ImageBuffer, Rgb};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use lightlab::ray::RaySegment;
use lightlab::scene::Scene;
use lightlab::shape::Geometry;
use lightlab::source::{Emission, LaserSource};
use lightlab::spectrum::spectrum_color;

/// Frame buffer type used throughout the renderer.
pub type Frame = ImageBuffer<Rgb<u8>, Vec<u8>>;

const BACKGROUND: [u8; 3] = [12, 18, 28];
const GRID: [u8; 3] = [20, 25, 35];
const GRID_STEP: u32 = 50;
const OUTLINE: [u8; 3] = [100, 120, 140];
const LASER_BODY: [u8; 3] = [60, 70, 80];

/// Rasterize one solved frame.
pub fn render_frame(
    scene: &Scene,
    laser: &LaserSource,
    segments: &[RaySegment],
    width: u32,
    height: u32,
) -> Frame {
    let start = std::time::Instant::now();
    let mut image = Frame::from_pixel(width, height, Rgb(BACKGROUND));

    draw_grid(&mut image);
    draw_shapes(&mut image, scene);
    draw_laser(&mut image, laser);

    info!("Rasterizing {} ray segments...", segments.len());
    let pb = ProgressBar::new(segments.len() as u64);
    pb.set_style(ProgressStyle::default_bar().template("{bar:40} {pos}/{len} ETA: {eta}").unwrap());

    for segment in segments {
        let alpha = segment.intensity.clamp(0.0, 1.0);
        if alpha * 255.0 >= 5.0 {
            let line_width = (segment.intensity * 4.0).max(1.0) as i64;
            draw_line(&mut image, segment.p1, segment.p2, segment.color, alpha, line_width);
            // Bright beams get a white core
            if line_width > 2 {
                draw_line(&mut image, segment.p1, segment.p2, [255, 255, 255], alpha, 1);
            }
        }
        pb.inc(1);
    }
    pb.finish();

    info!("Frame rasterized in {:.2?}", start.elapsed());
    image
}

/// Save the frame as PNG.
pub fn save_image_as_png(image: &Frame, output_path: &str) {
    match image.save(output_path) {
        Ok(_) => info!("Image saved as {}", output_path),
        Err(e) => warn!("Failed to save image: {}", e),
    }
}

fn draw_grid(image: &mut Frame) {
    let (width, height) = image.dimensions();
    for x in (0..width).step_by(GRID_STEP as usize) {
        for y in 0..height {
            image.put_pixel(x, y, Rgb(GRID));
        }
    }
    for y in (0..height).step_by(GRID_STEP as usize) {
        for x in 0..width {
            image.put_pixel(x, y, Rgb(GRID));
        }
    }
}

fn draw_shapes(image: &mut Frame, scene: &Scene) {
    for shape in &scene.shapes {
        let tint = shape.material.tint;
        let fill = [tint[0], tint[1], tint[2]];
        let fill_alpha = tint[3] as f64 / 255.0;

        match &shape.geometry {
            Geometry::Polygon { .. } => {
                let verts = shape.world_vertices();
                if verts.len() < 3 {
                    continue;
                }

                // Fill by containment over the bounding box
                let min_x = verts.iter().fold(f64::INFINITY, |m, v| m.min(v.x));
                let max_x = verts.iter().fold(f64::NEG_INFINITY, |m, v| m.max(v.x));
                let min_y = verts.iter().fold(f64::INFINITY, |m, v| m.min(v.y));
                let max_y = verts.iter().fold(f64::NEG_INFINITY, |m, v| m.max(v.y));

                for y in min_y.floor() as i64..=max_y.ceil() as i64 {
                    for x in min_x.floor() as i64..=max_x.ceil() as i64 {
                        if shape.contains(DVec2::new(x as f64, y as f64)) {
                            blend_pixel(image, x, y, fill, fill_alpha);
                        }
                    }
                }

                for i in 0..verts.len() {
                    let next = verts[(i + 1) % verts.len()];
                    draw_line(image, verts[i], next, OUTLINE, 1.0, 1);
                }
            }
            Geometry::Circle { radius } => {
                let r = *radius;
                let center = shape.position;

                for y in (center.y - r).floor() as i64..=(center.y + r).ceil() as i64 {
                    for x in (center.x - r).floor() as i64..=(center.x + r).ceil() as i64 {
                        if shape.contains(DVec2::new(x as f64, y as f64)) {
                            blend_pixel(image, x, y, fill, fill_alpha);
                        }
                    }
                }

                draw_circle_outline(image, center, r, OUTLINE);
            }
        }
    }
}

fn draw_laser(image: &mut Frame, laser: &LaserSource) {
    let dot = match laser.emission {
        Emission::Monochrome(wavelength) if laser.active => spectrum_color(wavelength),
        Emission::White if laser.active => [255, 255, 255],
        _ => [50, 20, 20],
    };

    fill_disc(image, laser.position, 10.0, LASER_BODY);
    fill_disc(image, laser.position, 4.0, dot);
}

fn fill_disc(image: &mut Frame, center: DVec2, radius: f64, color: [u8; 3]) {
    for y in (center.y - radius).floor() as i64..=(center.y + radius).ceil() as i64 {
        for x in (center.x - radius).floor() as i64..=(center.x + radius).ceil() as i64 {
            if DVec2::new(x as f64, y as f64).distance(center) <= radius {
                blend_pixel(image, x, y, color, 1.0);
            }
        }
    }
}

fn draw_circle_outline(image: &mut Frame, center: DVec2, radius: f64, color: [u8; 3]) {
    // Enough steps that adjacent samples land on neighboring pixels
    let steps = (radius * std::f64::consts::TAU).ceil().max(16.0) as u32;
    for i in 0..steps {
        let theta = i as f64 / steps as f64 * std::f64::consts::TAU;
        let p = center + DVec2::from_angle(theta) * radius;
        blend_pixel(image, p.x.round() as i64, p.y.round() as i64, color, 1.0);
    }
}

/// Draw a line by stepping one pixel at a time, blending a square stamp of
/// the given width at each step.
fn draw_line(image: &mut Frame, p1: DVec2, p2: DVec2, color: [u8; 3], alpha: f64, width: i64) {
    let delta = p2 - p1;
    let steps = delta.x.abs().max(delta.y.abs()).ceil() as i64;
    if steps == 0 {
        stamp(image, p1, color, alpha, width);
        return;
    }

    let step = delta / steps as f64;
    let mut p = p1;
    for _ in 0..=steps {
        stamp(image, p, color, alpha, width);
        p += step;
    }
}

fn stamp(image: &mut Frame, p: DVec2, color: [u8; 3], alpha: f64, width: i64) {
    let half = width / 2;
    let cx = p.x.round() as i64;
    let cy = p.y.round() as i64;
    for dy in -half..=half {
        for dx in -half..=half {
            blend_pixel(image, cx + dx, cy + dy, color, alpha);
        }
    }
}

/// Source-over blend of a single pixel; out-of-bounds coordinates are
/// silently dropped.
fn blend_pixel(image: &mut Frame, x: i64, y: i64, color: [u8; 3], alpha: f64) {
    let (width, height) = image.dimensions();
    if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
        return;
    }

    let pixel = image.get_pixel_mut(x as u32, y as u32);
    for c in 0..3 {
        let src = color[c] as f64;
        let dst = pixel[c] as f64;
        pixel[c] = (src * alpha + dst * (1.0 - alpha)).round() as u8;
    }
}

use clap::Parser;
use glam::DVec2;
use log::info;

mod cli;
mod logger;
mod output;

use cli::Args;
use logger::init_logger;
use output::{render_frame, save_image_as_png};

use lightlab::engine::{Bounds, RayCaster};
use lightlab::material::Material;
use lightlab::scene::Scene;
use lightlab::shape::Shape;
use lightlab::source::{Emission, LaserSource};

/// Populate the default optical bench: a glass prism, a water block and a
/// diamond lens
fn create_scene(scene: &mut Scene) {
    let prism_verts = vec![
        DVec2::new(-60.0, 50.0),
        DVec2::new(60.0, 50.0),
        DVec2::new(0.0, -50.0),
    ];
    scene.add(Shape::polygon(
        DVec2::new(500.0, 450.0),
        Material::glass(),
        prism_verts,
    ));

    let block_verts = vec![
        DVec2::new(-50.0, -80.0),
        DVec2::new(50.0, -80.0),
        DVec2::new(50.0, 80.0),
        DVec2::new(-50.0, 80.0),
    ];
    scene.add(Shape::polygon(
        DVec2::new(800.0, 450.0),
        Material::water(),
        block_verts,
    ));

    scene.add(Shape::circle(
        DVec2::new(650.0, 200.0),
        Material::diamond(),
        60.0,
    ));
}

/// Create the laser from the command line settings, mounted at the left
/// edge of the field
fn create_laser(args: &Args, height: f64) -> LaserSource {
    let mut laser = LaserSource::new(DVec2::new(100.0, height / 2.0));
    laser.angle = args.angle.to_radians();
    laser.beam_count = args.beam_count;
    laser.spread = args.spread;
    laser.emission = if args.white {
        Emission::White
    } else {
        Emission::Monochrome(args.wavelength)
    };
    laser
}

fn main() {
    let args = Args::parse();

    init_logger(args.debug_level.clone().into());

    // Log application startup with version information
    info!("LightLab - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));

    let env_material = match Material::by_name(&args.env) {
        Some(material) => material,
        None => {
            log::error!(
                "Unknown ambient medium '{}'. Presets: vacuum, air, water, glass, flint, diamond, acrylic, oil.",
                args.env
            );
            std::process::exit(1);
        }
    };

    let bounds = Bounds::new(args.width as f64, args.height as f64);
    let mut scene = Scene::new(env_material);
    if !args.empty {
        create_scene(&mut scene);
    }

    let laser = create_laser(&args, bounds.height);
    let seeds = laser.rays();
    info!(
        "Field {}x{}, ambient {}, {} shapes, {} seed rays",
        args.width,
        args.height,
        scene.env_material.name,
        scene.shapes.len(),
        seeds.len()
    );

    let engine = RayCaster::new(bounds);
    let trace_start = std::time::Instant::now();
    let segments = engine.solve(&scene, &seeds);
    info!("Traced {} segments in {:.2?}", segments.len(), trace_start.elapsed());

    let image = render_frame(&scene, &laser, &segments, args.width, args.height);
    save_image_as_png(&image, &args.output);
}

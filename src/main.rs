// Copyright @yucwang 2026

use genoise::core::integrator::Integrator;
use genoise::core::material::{AlphaMode, ShadeMaterial};
use genoise::core::scene::{Scene, SceneObject};
use genoise::emitters::{EnvMap, LightSource, SkyDescriptor, SunLight};
use genoise::integrators::debug::{DebugIntegrator, DebugMode};
use genoise::integrators::path::PathIntegrator;
use genoise::io::exr_utils;
use genoise::math::constants::{Float, Vector3f, Vector4f};
use genoise::renderers::simple::{Renderer, SimpleRenderer};
use genoise::sensors::perspective::RasterCamera;
use genoise::shapes::rectangle::Rectangle;
use genoise::shapes::sphere::Sphere;

use std::env;

struct Settings {
    output_path: String,
    spp: u32,
    max_depth: u32,
    seed: u32,
    width: usize,
    height: usize,
    env_path: Option<String>,
    env_rotation: Float,
    debug_mode: Option<DebugMode>,
}

fn parse_args(args: &[String]) -> Result<Settings, String> {
    if args.len() < 2 {
        return Err(format!(
            "Usage: {} <output.exr> [--spp N] [--max-depth N] [--seed N] \
             [--width N] [--height N] [--env file.exr] [--env-rotation RAD] [--debug MODE]",
            args[0]
        ));
    }

    let mut settings = Settings {
        output_path: args[1].clone(),
        spp: 64,
        max_depth: 8,
        seed: 0,
        width: 800,
        height: 600,
        env_path: None,
        env_rotation: 0.0,
        debug_mode: None,
    };

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--spp" => {
                i += 1;
                settings.spp = args.get(i).and_then(|v| v.parse().ok()).unwrap_or(64);
            }
            "--max-depth" => {
                i += 1;
                settings.max_depth = args.get(i).and_then(|v| v.parse().ok()).unwrap_or(8);
            }
            "--seed" => {
                i += 1;
                settings.seed = args.get(i).and_then(|v| v.parse().ok()).unwrap_or(0);
            }
            "--width" => {
                i += 1;
                settings.width = args.get(i).and_then(|v| v.parse().ok()).unwrap_or(800);
            }
            "--height" => {
                i += 1;
                settings.height = args.get(i).and_then(|v| v.parse().ok()).unwrap_or(600);
            }
            "--env" => {
                i += 1;
                settings.env_path = args.get(i).cloned();
            }
            "--env-rotation" => {
                i += 1;
                settings.env_rotation = args.get(i).and_then(|v| v.parse().ok()).unwrap_or(0.0);
            }
            "--debug" => {
                i += 1;
                let name = args.get(i).cloned().unwrap_or_default();
                settings.debug_mode = Some(DebugMode::from_name(&name)?);
            }
            other => return Err(format!("unknown argument: {}", other)),
        }
        i += 1;
    }
    Ok(settings)
}

fn build_scene(settings: &Settings) -> Result<Scene, String> {
    let mut scene = Scene::new();

    match &settings.env_path {
        Some(path) => {
            let envmap =
                EnvMap::from_file(path, settings.env_rotation, Vector3f::new(1.0, 1.0, 1.0))?;
            scene.set_light(LightSource::Environment(envmap));
        }
        None => {
            let sun_direction = Vector3f::new(0.33, -0.81, 0.48).normalize();
            scene.set_light(LightSource::Sun {
                sun: SunLight::new(sun_direction, Vector3f::new(1.0, 0.96, 0.90), 10.0),
                sky: SkyDescriptor::default(),
            });
        }
    }

    let mut floor = ShadeMaterial::default();
    floor.base_color_factor = Vector4f::new(0.65, 0.65, 0.65, 1.0);
    floor.roughness_factor = 0.9;
    let floor_id = scene.add_material(floor);

    let diffuse_id = scene.add_material(ShadeMaterial::default());

    let mut metal = ShadeMaterial::default();
    metal.base_color_factor = Vector4f::new(0.95, 0.93, 0.88, 1.0);
    metal.metallic_factor = 1.0;
    metal.roughness_factor = 0.15;
    let metal_id = scene.add_material(metal);

    let mut glass = ShadeMaterial::default();
    glass.base_color_factor = Vector4f::new(1.0, 1.0, 1.0, 1.0);
    glass.transmission_factor = 1.0;
    glass.roughness_factor = 0.0;
    glass.thickness_factor = 1.0;
    glass.attenuation_color = Vector3f::new(0.8, 0.9, 0.95);
    glass.attenuation_distance = 2.0;
    let glass_id = scene.add_material(glass);

    let mut leaf = ShadeMaterial::default();
    leaf.base_color_factor = Vector4f::new(0.3, 0.7, 0.25, 0.35);
    leaf.alpha_mode = AlphaMode::Blend;
    let leaf_id = scene.add_material(leaf);

    scene.add_object(SceneObject::new(
        Box::new(Rectangle::new(
            Vector3f::new(-20.0, -1.0, 10.0),
            Vector3f::new(40.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, -40.0),
        )),
        floor_id,
    ));
    // White material with a per-instance tint, the way loaders carry
    // per-primitive colors.
    scene.add_object(
        SceneObject::new(
            Box::new(Sphere::new(Vector3f::new(-2.2, 0.0, -6.0), 1.0)),
            diffuse_id,
        )
        .tinted(Vector4f::new(0.75, 0.25, 0.2, 1.0)),
    );
    scene.add_object(SceneObject::new(
        Box::new(Sphere::new(Vector3f::new(0.0, 0.0, -6.5), 1.0)),
        metal_id,
    ));
    scene.add_object(SceneObject::new(
        Box::new(Sphere::new(Vector3f::new(2.2, 0.0, -6.0), 1.0)),
        glass_id,
    ));
    scene.add_object(SceneObject::new(
        Box::new(Rectangle::new(
            Vector3f::new(-1.0, 0.5, -4.0),
            Vector3f::new(2.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.5, 0.0),
        )),
        leaf_id,
    ));

    Ok(scene)
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();
    let settings = parse_args(&args)?;

    let scene = build_scene(&settings)?;
    let mut camera = RasterCamera::look_at(
        Vector3f::new(0.0, 1.2, 1.0),
        Vector3f::new(0.0, 0.0, -6.0),
        Vector3f::new(0.0, 1.0, 0.0),
        std::f32::consts::FRAC_PI_3,
        settings.width,
        settings.height,
    );

    let integrator: Box<dyn Integrator> = match settings.debug_mode {
        Some(mode) => Box::new(DebugIntegrator::new(mode)),
        None => {
            let mut path = PathIntegrator::new(settings.max_depth, settings.spp);
            path.firefly_clamp = Some(10.0);
            Box::new(path)
        }
    };

    log::info!(
        "Rendering {}x{} at {} spp, max depth {}.",
        settings.width,
        settings.height,
        integrator.samples_per_pixel(),
        settings.max_depth
    );

    let renderer = SimpleRenderer::new(integrator, settings.seed);
    let image = renderer.render(&scene, &mut camera);
    exr_utils::write_exr_to_file(
        &image.raw_copy(),
        image.width(),
        image.height(),
        &settings.output_path,
    )
}

fn main() {
    env::set_var("RUST_LOG", "info");
    env_logger::init();

    if let Err(message) = run() {
        eprintln!("{}", message);
        std::process::exit(1);
    }
}

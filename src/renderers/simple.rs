// Copyright @yucwang 2026

use crate::core::integrator::Integrator;
use crate::core::rng::SampleRng;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::bitmap::Bitmap;
use crate::math::constants::{Float, Vector2f, Vector3f};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

pub use super::renderer::Renderer;

/// Block-parallel renderer. Pixels are seeded from the global seed and
/// their own coordinates, so the output is deterministic regardless of
/// thread count or block scheduling order.
pub struct SimpleRenderer {
    integrator: Box<dyn Integrator>,
    seed: u32,
}

impl Renderer for SimpleRenderer {
    fn render(&self, scene: &Scene, sensor: &mut dyn Sensor) -> Bitmap {
        let (width, height) = {
            let bmp = sensor.bitmap();
            (bmp.width(), bmp.height())
        };
        if width == 0 || height == 0 {
            return Bitmap::new(0, 0);
        }
        let spp = match self.integrator.samples_per_pixel() {
            0 => 1,
            v => v,
        };
        let inv_spp = 1.0 / (spp as Float);

        let block_size = 64usize;
        let blocks_x = (width + block_size - 1) / block_size;
        let blocks_y = (height + block_size - 1) / block_size;
        let total_blocks = blocks_x * blocks_y;
        let sensor_ref: &dyn Sensor = &*sensor;
        let integrator_ref: &dyn Integrator = self.integrator.as_ref();

        let progress = ProgressBar::new(total_blocks as u64);
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} blocks")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let next_block = Arc::new(AtomicUsize::new(0));
        let thread_count = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let (tx, rx) = mpsc::channel::<(usize, usize, usize, usize, Vec<Vector3f>)>();
        let mut output = vec![Vector3f::zeros(); width * height];

        thread::scope(|scope| {
            for _ in 0..thread_count {
                let next_block = Arc::clone(&next_block);
                let tx = tx.clone();
                scope.spawn(move || {
                    loop {
                        let block_index = next_block.fetch_add(1, Ordering::Relaxed);
                        if block_index >= total_blocks {
                            break;
                        }

                        let bx = block_index % blocks_x;
                        let by = block_index / blocks_x;
                        let x0 = bx * block_size;
                        let y0 = by * block_size;
                        let x1 = (x0 + block_size).min(width);
                        let y1 = (y0 + block_size).min(height);

                        let mut block = vec![Vector3f::zeros(); (x1 - x0) * (y1 - y0)];
                        for y in y0..y1 {
                            for x in x0..x1 {
                                let mut color = Vector3f::zeros();
                                let pixel = Vector2f::new(x as Float, y as Float);
                                let mut rng = SampleRng::new(pixel_seed(self.seed, x, y));
                                for _sample in 0..spp {
                                    color += integrator_ref
                                        .trace_ray_forward(scene, sensor_ref, pixel, &mut rng);
                                }
                                let local_x = x - x0;
                                let local_y = y - y0;
                                block[local_x + (x1 - x0) * local_y] = color * inv_spp;
                            }
                        }
                        if tx.send((x0, y0, x1, y1, block)).is_err() {
                            break;
                        }
                    }
                });
            }

            drop(tx);
            for _ in 0..total_blocks {
                if let Ok((x0, y0, x1, y1, block)) = rx.recv() {
                    for y in y0..y1 {
                        for x in x0..x1 {
                            let local_x = x - x0;
                            let local_y = y - y0;
                            output[x + width * y] = block[local_x + (x1 - x0) * local_y];
                        }
                    }
                    progress.inc(1);
                }
            }
        });
        progress.finish_and_clear();

        let bitmap = sensor.bitmap_mut();
        for y in 0..height {
            for x in 0..width {
                bitmap[(x, y)] = output[x + width * y];
            }
        }
        bitmap.clone()
    }
}

/// Mixes the pixel coordinate into the global seed. Adjacent pixels get
/// far-apart states once the generator hash scrambles them.
fn pixel_seed(seed: u32, x: usize, y: usize) -> u32 {
    seed.wrapping_mul(0x9E37_79B9)
        .wrapping_add(((y as u32) & 0xFFFF) << 16 | ((x as u32) & 0xFFFF))
}

impl SimpleRenderer {
    pub fn new(integrator: Box<dyn Integrator>, seed: u32) -> Self {
        Self { integrator, seed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::material::ShadeMaterial;
    use crate::core::scene::SceneObject;
    use crate::emitters::{EnvMap, LightSource};
    use crate::integrators::path::PathIntegrator;
    use crate::math::constants::Vector4f;
    use crate::sensors::perspective::RasterCamera;
    use crate::shapes::sphere::Sphere;
    use crate::textures::image::ImageTexture;

    fn test_scene() -> Scene {
        let mut scene = Scene::new();
        let tex = ImageTexture::from_pixels(
            4,
            2,
            vec![Vector4f::new(0.8, 0.9, 1.0, 1.0); 8],
        )
        .unwrap();
        scene.set_light(LightSource::Environment(EnvMap::from_texture(
            tex,
            0.0,
            Vector3f::new(1.0, 1.0, 1.0),
        )));
        let id = scene.add_material(ShadeMaterial::default());
        scene.add_object(SceneObject::new(
            Box::new(Sphere::new(Vector3f::new(0.0, 0.0, -5.0), 1.0)),
            id,
        ));
        scene
    }

    fn test_camera(width: usize, height: usize) -> RasterCamera {
        RasterCamera::look_at(
            Vector3f::zeros(),
            Vector3f::new(0.0, 0.0, -1.0),
            Vector3f::new(0.0, 1.0, 0.0),
            std::f32::consts::FRAC_PI_3,
            width,
            height,
        )
    }

    #[test]
    fn test_render_produces_finite_image() {
        let scene = test_scene();
        let mut camera = test_camera(12, 8);
        let renderer = SimpleRenderer::new(Box::new(PathIntegrator::new(4, 2)), 7);
        let bitmap = renderer.render(&scene, &mut camera);
        assert_eq!(bitmap.width(), 12);
        assert_eq!(bitmap.height(), 8);
        for y in 0..8 {
            for x in 0..12 {
                let c = bitmap[(x, y)];
                for ch in 0..3 {
                    assert!(c[ch].is_finite());
                    assert!(c[ch] >= 0.0);
                }
            }
        }
    }

    #[test]
    fn test_render_deterministic_for_same_seed() {
        let scene = test_scene();

        let mut cam_a = test_camera(9, 6);
        let a = SimpleRenderer::new(Box::new(PathIntegrator::new(3, 2)), 42)
            .render(&scene, &mut cam_a);

        let mut cam_b = test_camera(9, 6);
        let b = SimpleRenderer::new(Box::new(PathIntegrator::new(3, 2)), 42)
            .render(&scene, &mut cam_b);

        for y in 0..6 {
            for x in 0..9 {
                assert_eq!(a[(x, y)], b[(x, y)]);
            }
        }
    }

    #[test]
    fn test_pixel_seed_varies_per_pixel() {
        let a = pixel_seed(1, 0, 0);
        let b = pixel_seed(1, 1, 0);
        let c = pixel_seed(1, 0, 1);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }
}

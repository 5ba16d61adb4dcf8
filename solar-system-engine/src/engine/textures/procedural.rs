use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use constants::texture::{
    HEATMAP_BLOB_COUNT, SURFACE_SPOT_COUNT, SURFACE_TEXTURE_HEIGHT, SURFACE_TEXTURE_WIDTH,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::catalog::solar_system::SurfaceStyle;

/// Linear RGBA canvas that the recipes paint into before it is baked to an `Image`.
struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
}

impl Canvas {
    fn filled(width: u32, height: u32, colour: [f32; 4]) -> Self {
        Self {
            width,
            height,
            pixels: vec![colour; (width * height) as usize],
        }
    }

    fn blend(&mut self, x: i32, y: i32, colour: [f32; 3], alpha: f32) {
        // Wrap horizontally so spots cross the texture seam on a sphere.
        let x = x.rem_euclid(self.width as i32) as u32;
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let pixel = &mut self.pixels[(y as u32 * self.width + x) as usize];
        for channel in 0..3 {
            pixel[channel] = pixel[channel] * (1.0 - alpha) + colour[channel] * alpha;
        }
        pixel[3] = (pixel[3] + alpha * (1.0 - pixel[3])).min(1.0);
    }

    /// Radial spot with linear falloff from `alpha` at the centre to zero at `radius`.
    fn spot(&mut self, cx: f32, cy: f32, radius: f32, colour: [f32; 3], alpha: f32) {
        let r = radius.ceil() as i32;
        for dy in -r..=r {
            for dx in -r..=r {
                let d = ((dx * dx + dy * dy) as f32).sqrt();
                if d <= radius {
                    let falloff = 1.0 - d / radius;
                    self.blend(cx as i32 + dx, cy as i32 + dy, colour, alpha * falloff);
                }
            }
        }
    }

    fn band(&mut self, y0: u32, y1: u32, colour: [f32; 3], alpha: f32) {
        for y in y0..y1.min(self.height) {
            for x in 0..self.width {
                self.blend(x as i32, y as i32, colour, alpha);
            }
        }
    }

    fn into_image(self) -> Image {
        let data = self
            .pixels
            .iter()
            .flat_map(|p| {
                let srgb = Srgba::from(LinearRgba::new(p[0], p[1], p[2], p[3]));
                [
                    to_byte(srgb.red),
                    to_byte(srgb.green),
                    to_byte(srgb.blue),
                    to_byte(srgb.alpha),
                ]
            })
            .collect::<Vec<u8>>();

        Image::new(
            Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            data,
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::RENDER_WORLD,
        )
    }
}

fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn linear(colour: Color) -> [f32; 3] {
    let c = colour.to_linear();
    [c.red, c.green, c.blue]
}

fn scaled(colour: [f32; 3], factor: f32) -> [f32; 3] {
    [colour[0] * factor, colour[1] * factor, colour[2] * factor]
}

/// Stable seed derived from a body name (FNV-1a).
pub fn seed_for(name: &str) -> u64 {
    name.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ byte as u64).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

/// Bake a surface texture for `style`, tinted from `base`.
///
/// Deterministic for a given seed; also serves as the fallback whenever a
/// photographic texture fails to load.
pub fn generate_surface(style: SurfaceStyle, base: Color, seed: u64) -> Image {
    let mut rng = StdRng::seed_from_u64(seed);
    let base = linear(base);
    let (w, h) = (SURFACE_TEXTURE_WIDTH, SURFACE_TEXTURE_HEIGHT);
    let mut canvas = Canvas::filled(w, h, [base[0], base[1], base[2], 1.0]);

    match style {
        SurfaceStyle::Stellar => {
            for _ in 0..SURFACE_SPOT_COUNT * 2 {
                let hot = [1.0, rng.gen_range(0.55..0.9), 0.1];
                canvas.spot(
                    rng.gen_range(0.0..w as f32),
                    rng.gen_range(0.0..h as f32),
                    rng.gen_range(2.0..9.0),
                    hot,
                    rng.gen_range(0.2..0.6),
                );
            }
        }
        SurfaceStyle::Cratered => {
            for _ in 0..SURFACE_SPOT_COUNT {
                let shade = rng.gen_range(0.3..0.8);
                canvas.spot(
                    rng.gen_range(0.0..w as f32),
                    rng.gen_range(0.0..h as f32),
                    rng.gen_range(1.5..8.0),
                    scaled(base, shade),
                    0.7,
                );
            }
        }
        SurfaceStyle::Dusty => {
            for _ in 0..SURFACE_SPOT_COUNT {
                canvas.spot(
                    rng.gen_range(0.0..w as f32),
                    rng.gen_range(0.0..h as f32),
                    rng.gen_range(3.0..14.0),
                    scaled(base, rng.gen_range(0.5..1.2)),
                    0.5,
                );
            }
            paint_polar_caps(&mut canvas, [0.9, 0.9, 0.95], h / 14);
        }
        SurfaceStyle::Oceanic => {
            let land = [0.06, 0.2, 0.03];
            for _ in 0..SURFACE_SPOT_COUNT {
                canvas.spot(
                    rng.gen_range(0.0..w as f32),
                    rng.gen_range(0.0..h as f32),
                    rng.gen_range(2.0..12.0),
                    land,
                    0.9,
                );
            }
            paint_polar_caps(&mut canvas, [0.95, 0.95, 1.0], h / 12);
        }
        SurfaceStyle::Veiled => {
            let mut y = 0;
            while y < h {
                let thickness = rng.gen_range(2..7);
                canvas.band(y, y + thickness, scaled(base, rng.gen_range(0.85..1.15)), 0.5);
                y += thickness;
            }
        }
        SurfaceStyle::Banded => {
            let mut y = 0;
            while y < h {
                let thickness = rng.gen_range(3..12);
                let shade = if rng.gen_bool(0.15) { 0.45 } else { rng.gen_range(0.75..1.2) };
                canvas.band(y, y + thickness, scaled(base, shade), 0.8);
                y += thickness;
            }
            let storm = [0.55, 0.12, 0.06];
            canvas.spot(w as f32 * 0.6, h as f32 * 0.65, 8.0, storm, 0.8);
        }
        SurfaceStyle::Icy => {
            for _ in 0..SURFACE_SPOT_COUNT / 2 {
                canvas.spot(
                    rng.gen_range(0.0..w as f32),
                    rng.gen_range(0.0..h as f32),
                    rng.gen_range(4.0..16.0),
                    scaled(base, rng.gen_range(0.9..1.3)),
                    0.25,
                );
            }
        }
    }

    canvas.into_image()
}

fn paint_polar_caps(canvas: &mut Canvas, colour: [f32; 3], depth: u32) {
    let height = canvas.height;
    canvas.band(0, depth, colour, 0.85);
    canvas.band(height.saturating_sub(depth), height, colour, 0.85);
}

/// Violet thermal blobs on a transparent background, drawn additively over the surface.
pub fn generate_heatmap(seed: u64) -> Image {
    let mut rng = StdRng::seed_from_u64(seed ^ 0x4845_4154);
    let (w, h) = (SURFACE_TEXTURE_WIDTH, SURFACE_TEXTURE_HEIGHT);
    let mut canvas = Canvas::filled(w, h, [0.0, 0.0, 0.0, 0.0]);

    for _ in 0..HEATMAP_BLOB_COUNT {
        let x = rng.gen_range(0.0..w as f32);
        let y = rng.gen_range(0.0..h as f32);
        let r = rng.gen_range(6.0..18.0);
        canvas.spot(x, y, r, [0.1, 0.01, 0.24], 0.2);
        canvas.spot(x, y, r * 0.5, [0.39, 0.09, 0.93], 0.6);
    }

    canvas.into_image()
}

/// Flat single-colour texture for interior shells.
pub fn generate_solid(colour: Color) -> Image {
    let c = linear(colour);
    Canvas::filled(4, 4, [c[0], c[1], c[2], 1.0]).into_image()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(image: &Image) -> &[u8] {
        image.data.as_deref().unwrap()
    }

    #[test]
    fn test_same_seed_same_texture() {
        let colour = Color::srgb(0.9, 0.5, 0.3);
        let a = generate_surface(SurfaceStyle::Dusty, colour, seed_for("Mars"));
        let b = generate_surface(SurfaceStyle::Dusty, colour, seed_for("Mars"));
        assert_eq!(bytes(&a), bytes(&b));
    }

    #[test]
    fn test_different_bodies_differ() {
        let colour = Color::srgb(0.6, 0.6, 0.6);
        let a = generate_surface(SurfaceStyle::Cratered, colour, seed_for("Mercury"));
        let b = generate_surface(SurfaceStyle::Cratered, colour, seed_for("Pluto"));
        assert_ne!(bytes(&a), bytes(&b));
    }

    #[test]
    fn test_surface_dimensions() {
        let image = generate_surface(SurfaceStyle::Banded, Color::WHITE, 7);
        assert_eq!(image.width(), SURFACE_TEXTURE_WIDTH);
        assert_eq!(image.height(), SURFACE_TEXTURE_HEIGHT);
        assert_eq!(
            bytes(&image).len(),
            (SURFACE_TEXTURE_WIDTH * SURFACE_TEXTURE_HEIGHT * 4) as usize
        );
    }

    #[test]
    fn test_heatmap_background_is_transparent() {
        let image = generate_heatmap(3);
        let alphas = bytes(&image).chunks(4).map(|p| p[3]);
        assert!(alphas.clone().any(|a| a == 0));
        assert!(alphas.clone().any(|a| a > 0));
    }
}

//! Light rays background.
//!
//! An opaque decorative collaborator: the page hands it a [`GodRaysConfig`]
//! and asks for a background color per cell and frame. Nothing else in the
//! crate reads its state.
//!
//! The sampler is procedural and deterministic: the same cell at the same
//! time always yields the same color. Rays fan out from an origin given by
//! `offset_x`/`offset_y` in normalized coordinates (`-1..1`, y down), one
//! banded layer per entry in `colors`, plus a bloom glow around the origin.

use serde::{Deserialize, Serialize};

use crate::tiles::{PX_PER_COLUMN, PX_PER_ROW};
use crate::types::Rgba;

/// Shader parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GodRaysConfig {
    pub color_back: Rgba,
    pub colors: Vec<Rgba>,
    pub color_bloom: Rgba,
    pub offset_x: f32,
    pub offset_y: f32,
    pub intensity: f32,
    pub spotty: f32,
    pub mid_size: f32,
    pub mid_intensity: f32,
    pub density: f32,
    pub bloom: f32,
    pub speed: f32,
    pub scale: f32,
}

impl Default for GodRaysConfig {
    fn default() -> Self {
        Self {
            color_back: Rgba::TRANSPARENT,
            colors: vec![
                Rgba::new(0xa1, 0xa1, 0xaa, 0x40),
                Rgba::new(0xe4, 0xe4, 0xe7, 0x40),
                Rgba::new(0x71, 0x71, 0x7a, 0x40),
                Rgba::new(0x52, 0x52, 0x5b, 0x40),
            ],
            color_bloom: Rgba::ZINC_400,
            offset_x: 0.85,
            offset_y: -1.0,
            intensity: 0.5,
            spotty: 0.45,
            mid_size: 10.0,
            mid_intensity: 0.0,
            density: 0.38,
            bloom: 0.3,
            speed: 0.5,
            scale: 1.6,
        }
    }
}

/// Samples the ray field over a grid of terminal cells.
#[derive(Debug, Clone)]
pub struct LightRays {
    config: GodRaysConfig,
    width: u16,
    height: u16,
}

impl LightRays {
    pub fn new(config: GodRaysConfig, width: u16, height: u16) -> Self {
        Self { config, width, height }
    }

    pub fn config(&self) -> &GodRaysConfig {
        &self.config
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    /// Color of cell (`col`, `row`) at `time` seconds. Alpha carries coverage.
    pub fn sample(&self, col: u16, row: u16, time: f32) -> Rgba {
        let cfg = &self.config;
        if self.width == 0 || self.height == 0 {
            return cfg.color_back;
        }

        // Normalized, aspect-corrected position relative to the origin
        let aspect = (self.width as f32 * PX_PER_COLUMN as f32) / (self.height as f32 * PX_PER_ROW as f32);
        let u = ((col as f32 + 0.5) / self.width as f32 * 2.0 - 1.0) * aspect;
        let v = (row as f32 + 0.5) / self.height as f32 * 2.0 - 1.0;
        let scale = cfg.scale.max(0.01);
        let dx = (u - cfg.offset_x * aspect) / scale;
        let dy = (v - cfg.offset_y) / scale;
        let dist = dx.hypot(dy);
        let angle = dy.atan2(dx);
        let t = time * cfg.speed;

        let density = cfg.density.clamp(0.0, 1.0);
        let spotty = cfg.spotty.clamp(0.0, 1.0);
        let sharpness = 1.0 + 8.0 * (1.0 - density);
        let falloff = (-dist * 0.6).exp();

        let mut out = cfg.color_back;
        for (i, color) in cfg.colors.iter().enumerate() {
            let fi = i as f32 + 1.0;
            let freq = 6.0 + fi * 5.0 * (0.5 + density);
            let band = 0.5 + 0.5 * (angle * freq + t * (0.6 + 0.25 * fi) + fi * 1.7).sin();
            let flicker = 0.5 + 0.5 * (angle * freq * 2.3 - t * 0.9 * fi + dist * 3.0).sin();
            let ray = band.powf(sharpness) * (1.0 - spotty + spotty * flicker);
            let coverage = color.a as f32 / 255.0 * ray * falloff * cfg.intensity * 2.0;
            out = Rgba::blend(with_coverage(*color, coverage), out);
        }

        let glow = cfg.bloom * cfg.intensity * (-dist * dist * 2.0).exp();
        out = Rgba::blend(with_coverage(cfg.color_bloom, glow), out);

        if cfg.mid_intensity > 0.0 {
            let mid = cfg.mid_intensity * (-dist * cfg.mid_size.max(0.0)).exp();
            out = Rgba::blend(with_coverage(cfg.color_bloom, mid), out);
        }

        out
    }
}

fn with_coverage(color: Rgba, coverage: f32) -> Rgba {
    let alpha = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgba { a: alpha as i16, ..color }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters() {
        let cfg = GodRaysConfig::default();
        assert_eq!(cfg.colors.len(), 4);
        assert_eq!(cfg.colors[1], Rgba::from_hex("#e4e4e740").unwrap());
        assert_eq!(cfg.color_bloom, Rgba::from_hex("#a1a1aa").unwrap());
        assert!(cfg.color_back.is_transparent());
        assert_eq!(cfg.offset_y, -1.0);
        assert_eq!(cfg.scale, 1.6);
    }

    #[test]
    fn test_sampling_is_deterministic() {
        let rays = LightRays::new(GodRaysConfig::default(), 80, 24);
        assert_eq!(rays.sample(10, 5, 1.25), rays.sample(10, 5, 1.25));
    }

    #[test]
    fn test_rays_move_over_time() {
        let rays = LightRays::new(GodRaysConfig::default(), 80, 24);
        let changed = (0..80).any(|col| rays.sample(col, 2, 0.0) != rays.sample(col, 2, 3.0));
        assert!(changed);
    }

    #[test]
    fn test_zero_intensity_shows_backdrop() {
        let cfg = GodRaysConfig {
            intensity: 0.0,
            ..Default::default()
        };
        let rays = LightRays::new(cfg, 80, 24);
        for (col, row) in [(0, 0), (40, 12), (79, 23)] {
            assert!(rays.sample(col, row, 2.0).is_transparent());
        }
    }

    #[test]
    fn test_empty_area() {
        let rays = LightRays::new(GodRaysConfig::default(), 0, 0);
        assert!(rays.sample(0, 0, 0.0).is_transparent());
    }

    #[test]
    fn test_parse_from_toml() {
        let cfg: GodRaysConfig = toml::from_str(
            r##"
            color_bloom = "#ffffff"
            speed = 1.0
            "##,
        )
        .unwrap();
        assert_eq!(cfg.color_bloom, Rgba::WHITE);
        assert_eq!(cfg.speed, 1.0);
        assert_eq!(cfg.density, 0.38);
    }
}

use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;

/// Tunables of the particle field. Every field has a default, so a config
/// file only needs to name the values it overrides.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub mobile_breakpoint: u32,
    pub mobile_particle_count: usize,
    pub desktop_particle_count: usize,
    pub connection_distance: f32,
    pub pointer_influence_distance: f32,
    pub click_radius: f32,
    pub click_force_scale: f32,
    pub hover_force_scale: f32,
    pub max_speed: f32,
    pub size_min: f32,
    pub size_max: f32,
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            mobile_breakpoint: 768,
            mobile_particle_count: 50,
            desktop_particle_count: 120,
            connection_distance: 200.0,
            pointer_influence_distance: 300.0,
            click_radius: 400.0,
            click_force_scale: 50.0,
            hover_force_scale: 2.0,
            max_speed: 0.75,
            size_min: 2.0,
            size_max: 5.0,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = tokio::fs::read_to_string(path).await?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // out-of-range literals parse as infinity
        let floats = [
            ("connection_distance", self.connection_distance),
            ("pointer_influence_distance", self.pointer_influence_distance),
            ("click_radius", self.click_radius),
            ("click_force_scale", self.click_force_scale),
            ("hover_force_scale", self.hover_force_scale),
            ("max_speed", self.max_speed),
            ("size_min", self.size_min),
            ("size_max", self.size_max),
        ];
        for &(field, value) in floats.iter() {
            if !value.is_finite() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be finite",
                });
            }
        }

        let positive = [
            ("connection_distance", self.connection_distance),
            ("pointer_influence_distance", self.pointer_influence_distance),
            ("click_radius", self.click_radius),
            ("click_force_scale", self.click_force_scale),
            ("hover_force_scale", self.hover_force_scale),
            ("size_min", self.size_min),
        ];
        for &(field, value) in positive.iter() {
            // also rejects NaN
            if !(value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be greater than zero",
                });
            }
        }
        if !(self.max_speed >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "max_speed",
                reason: "must not be negative",
            });
        }
        if !(self.size_max > self.size_min) {
            return Err(ConfigError::Invalid {
                field: "size_max",
                reason: "must be greater than size_min",
            });
        }
        Ok(())
    }
}

/// Colours and stroke widths used when painting the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub background: Rgba,
    pub class_a: Rgba,
    pub class_b: Rgba,
    pub pair_edge: Rgba,
    pub pair_edge_width: f32,
    pub pair_edge_intensity: f32,
    pub pointer_edge: Rgba,
    pub pointer_edge_width: f32,
    pub pointer_edge_intensity: f32,
    pub glow_blur: f32,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            background: Rgba::from_rgb8(0x09, 0x09, 0x0b),
            class_a: Rgba::from_rgba8(52, 211, 153, 0.8),
            class_b: Rgba::from_rgba8(167, 139, 250, 0.8),
            pair_edge: Rgba::from_rgb8(148, 163, 184),
            pair_edge_width: 1.0,
            pair_edge_intensity: 0.4,
            pointer_edge: Rgba::from_rgb8(52, 211, 153),
            pointer_edge_width: 1.5,
            pointer_edge_intensity: 1.0,
            glow_blur: 15.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba8(r, g, b, 1.0)
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Rgba {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a,
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Rgba { a, ..self }
    }
}

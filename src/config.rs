// All the knobs for a particle field in one bundle. The hosting page builds
// one, pokes the fields it cares about, and hands it to
// `ParticleBackground::create`. The defaults give the stock look: 30
// particles under 768px viewports, 60 otherwise, indigo dots joined by
// lines inside 150 units.

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
#[derive(Copy, Clone)]
pub struct FieldConfig {
    // Population tiers, selected by viewport width against the threshold
    pub particle_count_small: u32,
    pub particle_count_large: u32,
    pub width_threshold: f64,
    // Pairs strictly closer than this get a connecting line
    pub connection_distance: f64,
    // Per-particle radius range, drawn once at spawn
    pub size_min: f64,
    pub size_max: f64,
    // Velocity component range, units per frame
    pub speed_min: f64,
    pub speed_max: f64,
    // RRGGBBAA; the embedded alpha is replaced per particle from the range below
    pub base_color: u32,
    pub alpha_min: f64,
    pub alpha_max: f64,
    pub line_width: f64,
}

#[wasm_bindgen]
impl FieldConfig {
    #[wasm_bindgen(constructor)]
    pub fn new() -> FieldConfig {
        FieldConfig::default()
    }
}

impl Default for FieldConfig {
    fn default() -> FieldConfig {
        FieldConfig {
            particle_count_small: 30,
            particle_count_large: 60,
            width_threshold: 768.0,
            connection_distance: 150.0,
            size_min: 1.0,
            size_max: 4.0,
            speed_min: -0.5,
            speed_max: 0.5,
            base_color: 0x818cf8ff,
            alpha_min: 0.1,
            alpha_max: 0.6,
            line_width: 0.5,
        }
    }
}

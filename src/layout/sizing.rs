use crate::config::TreeConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSize {
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
}

/// Box size for a generation. Pure: the same generation and config always
/// yield the same size, which keeps layout passes deterministic.
pub fn box_size(generation: i32, config: &TreeConfig) -> BoxSize {
    let scale = generation_scale(generation, config);
    BoxSize {
        width: config.box_width * scale,
        height: config.box_height * scale,
        corner_radius: config.corner_radius * scale,
    }
}

/// Font size for text drawn at a generation, shrinking with the boxes.
pub fn font_size(generation: i32, base: f32, config: &TreeConfig) -> f32 {
    base * generation_scale(generation, config)
}

fn generation_scale(generation: i32, config: &TreeConfig) -> f32 {
    if config.uniform_box_size {
        return 1.0;
    }
    config
        .shrink_factor
        .max(0.0)
        .powi(generation.abs())
        .max(config.min_scale.max(0.01))
}

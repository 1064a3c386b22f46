use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    pub box_width: f32,
    pub box_height: f32,
    pub corner_radius: f32,
    /// Same box size for every generation instead of shrinking with distance
    /// from the root.
    pub uniform_box_size: bool,
    /// Geometric shrink per generation away from the root.
    pub shrink_factor: f32,
    /// Floor for the shrink scale so deep generations stay legible.
    pub min_scale: f32,
    pub horiz_padding: f32,
    pub vert_padding: f32,
    pub label_padding: f32,
    pub show_marriages: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            box_width: 180.0,
            box_height: 60.0,
            corner_radius: 6.0,
            uniform_box_size: false,
            shrink_factor: 0.75,
            min_scale: 0.35,
            horiz_padding: 40.0,
            vert_padding: 16.0,
            label_padding: 6.0,
            show_marriages: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanConfig {
    pub diameter: f32,
    /// Ring count; positive rings hold ancestors, negative descendants.
    pub generations: i32,
    pub margin: f32,
    pub show_text: bool,
    /// Polyline resolution when sampling radial diagonal curves.
    pub curve_segments: usize,
}

impl Default for FanConfig {
    fn default() -> Self {
        Self {
            diameter: 680.0,
            generations: 4,
            margin: 24.0,
            show_text: true,
            curve_segments: 16,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub ancestor_generations: i32,
    pub descendant_generations: i32,
    pub label_line_height: f32,
    pub tree: TreeConfig,
    pub fan: FanConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            ancestor_generations: 4,
            descendant_generations: 1,
            label_line_height: 1.3,
            tree: TreeConfig::default(),
            fan: FanConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    male_fill: Option<String>,
    female_fill: Option<String>,
    unknown_fill: Option<String>,
    box_border: Option<String>,
    placeholder_border: Option<String>,
    text_color: Option<String>,
    line_color: Option<String>,
    marriage_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutOverrides {
    ancestor_generations: Option<i32>,
    descendant_generations: Option<i32>,
    uniform_box_size: Option<bool>,
    horiz_padding: Option<f32>,
    vert_padding: Option<f32>,
    show_marriages: Option<bool>,
    diameter: Option<f32>,
    fan_generations: Option<i32>,
    show_text: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutOverrides>,
}

/// Defaults merged with an optional JSON config file.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "modern" {
            config.theme = Theme::modern();
        } else if theme_name == "classic" || theme_name == "default" {
            config.theme = Theme::classic();
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.male_fill {
            config.theme.male_fill = v;
        }
        if let Some(v) = vars.female_fill {
            config.theme.female_fill = v;
        }
        if let Some(v) = vars.unknown_fill {
            config.theme.unknown_fill = v;
        }
        if let Some(v) = vars.box_border {
            config.theme.box_border = v;
        }
        if let Some(v) = vars.placeholder_border {
            config.theme.placeholder_border = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.marriage_color {
            config.theme.marriage_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
            config.render.background = config.theme.background.clone();
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.ancestor_generations {
            config.layout.ancestor_generations = v;
        }
        if let Some(v) = layout.descendant_generations {
            config.layout.descendant_generations = v;
        }
        if let Some(v) = layout.uniform_box_size {
            config.layout.tree.uniform_box_size = v;
        }
        if let Some(v) = layout.horiz_padding {
            config.layout.tree.horiz_padding = v;
        }
        if let Some(v) = layout.vert_padding {
            config.layout.tree.vert_padding = v;
        }
        if let Some(v) = layout.show_marriages {
            config.layout.tree.show_marriages = v;
        }
        if let Some(v) = layout.diameter {
            config.layout.fan.diameter = v;
        }
        if let Some(v) = layout.fan_generations {
            config.layout.fan.generations = v;
        }
        if let Some(v) = layout.show_text {
            config.layout.fan.show_text = v;
        }
    }

    Ok(config)
}

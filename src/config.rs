use crate::ir::Level;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::path::Path;

const BRANCH_PALETTE: [&str; 8] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899", "#14B8A6", "#F97316",
];

const LABEL_PLACEHOLDERS: [&str; 5] = [
    "Untitled Topic",
    "Untitled Branch",
    "Untitled Concept",
    "Untitled Point",
    "Untitled Detail",
];

const DESCRIPTION_PLACEHOLDERS: [&str; 5] = [
    "Central topic of this mind map.",
    "Main branch of the topic.",
    "Key concept within this branch.",
    "Supporting point for this concept.",
    "Specific detail for this point.",
];

fn strings<const N: usize>(values: [&str; N]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NormalizeConfig {
    pub max_branches: usize,
    pub max_concepts: usize,
    pub max_points: usize,
    pub max_details: usize,
    pub label_placeholders: Vec<String>,
    pub description_placeholders: Vec<String>,
    pub fallback_label: String,
}

impl NormalizeConfig {
    /// Cap on the number of children kept under a node of `level`.
    pub fn max_children(&self, level: Level) -> usize {
        match level {
            Level::Center => self.max_branches,
            Level::Branch => self.max_concepts,
            Level::Concept => self.max_points,
            Level::Point => self.max_details,
            Level::Detail => 0,
        }
    }

    pub fn label_placeholder(&self, level: Level) -> String {
        pick_for_level(&self.label_placeholders, level, LABEL_PLACEHOLDERS)
    }

    pub fn description_placeholder(&self, level: Level) -> String {
        pick_for_level(&self.description_placeholders, level, DESCRIPTION_PLACEHOLDERS)
    }
}

/// Blank entries count as missing so a node never ends up with empty text.
fn pick_for_level(values: &[String], level: Level, fallback: [&str; 5]) -> String {
    values
        .get(level.index())
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .unwrap_or(fallback[level.index()])
        .to_string()
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            max_branches: 8,
            max_concepts: 5,
            max_points: 5,
            max_details: 3,
            label_placeholders: strings(LABEL_PLACEHOLDERS),
            description_placeholders: strings(DESCRIPTION_PLACEHOLDERS),
            fallback_label: "Mind Map".to_string(),
        }
    }
}

/// Radial placement formulas and collision-repair bounds. Angles are radians.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub branch_min_radius: f32,
    pub branch_radius_per_sibling: f32,
    pub concept_min_radius: f32,
    pub concept_radius_per_sibling: f32,
    pub concept_fan_step: f32,
    pub point_ring_capacity: usize,
    pub point_min_radius: f32,
    pub point_ring_base: f32,
    pub point_ring_step: f32,
    pub point_max_spread: f32,
    pub point_spread_per_node: f32,
    pub detail_fan_step: f32,
    pub detail_radius: f32,
    pub collision_clearance: f32,
    pub max_repair_attempts: usize,
    pub jitter_angle: f32,
    pub jitter_radius_min: f32,
    pub jitter_radius_max: f32,
    pub seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            branch_min_radius: 450.0,
            branch_radius_per_sibling: 70.0,
            concept_min_radius: 280.0,
            concept_radius_per_sibling: 40.0,
            concept_fan_step: PI / 6.0,
            point_ring_capacity: 4,
            point_min_radius: 180.0,
            point_ring_base: 80.0,
            point_ring_step: 90.0,
            point_max_spread: 0.8 * PI,
            point_spread_per_node: 0.5,
            detail_fan_step: PI / 8.0,
            detail_radius: 120.0,
            collision_clearance: 20.0,
            max_repair_attempts: 50,
            jitter_angle: PI / 4.0,
            jitter_radius_min: 50.0,
            jitter_radius_max: 150.0,
            seed: 0x6d69_6e64,
        }
    }
}

/// Per-level visual tables and the branch palette.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleConfig {
    pub palette: Vec<String>,
    pub node_radii: [f32; 5],
    pub font_sizes: [f32; 5],
    pub max_label_chars: [usize; 5],
    pub fill_alpha: [f32; 5],
    pub stroke_widths: [f32; 5],
    pub edge_widths: [f32; 5],
    pub ellipsis: String,
    pub view_padding: f32,
}

impl StyleConfig {
    pub fn palette_color(&self, index: usize) -> String {
        if self.palette.is_empty() {
            return BRANCH_PALETTE[index % BRANCH_PALETTE.len()].to_string();
        }
        self.palette[index % self.palette.len()].clone()
    }

    pub fn node_radius(&self, level: Level) -> f32 {
        self.node_radii[level.index()]
    }

    pub fn font_size(&self, level: Level) -> f32 {
        self.font_sizes[level.index()]
    }

    pub fn max_label_chars(&self, level: Level) -> usize {
        self.max_label_chars[level.index()]
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            palette: strings(BRANCH_PALETTE),
            node_radii: [50.0, 40.0, 32.0, 24.0, 18.0],
            font_sizes: [11.0, 9.0, 8.0, 7.0, 6.0],
            max_label_chars: [15, 12, 10, 8, 8],
            fill_alpha: [1.0, 1.0, 0.8, 0.6, 0.45],
            stroke_widths: [3.0, 2.5, 2.0, 1.5, 1.0],
            // indexed by the child's level; the center never ends an edge
            edge_widths: [0.0, 3.0, 2.0, 1.5, 1.0],
            ellipsis: "...".to_string(),
            view_padding: 40.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PresentationConfig {
    pub zoom_step: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub click_tolerance: f32,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            zoom_step: 1.2,
            min_scale: 0.1,
            max_scale: 10.0,
            click_tolerance: 4.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub normalize: NormalizeConfig,
    pub layout: LayoutConfig,
    pub style: StyleConfig,
    pub presentation: PresentationConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::classic(),
            normalize: NormalizeConfig::default(),
            layout: LayoutConfig::default(),
            style: StyleConfig::default(),
            presentation: PresentationConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    text_color: Option<String>,
    root_text_color: Option<String>,
    root_fill: Option<String>,
    root_stroke: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    normalize: Option<NormalizeConfig>,
    layout: Option<LayoutConfig>,
    style: Option<StyleConfig>,
    presentation: Option<PresentationConfig>,
    render: Option<RenderConfig>,
    seed: Option<u64>,
}

impl ConfigFile {
    /// Overlays the values present in the file onto `config`.
    pub fn apply(self, config: &mut Config) {
        if let Some(theme_name) = self.theme.as_deref() {
            match Theme::by_name(theme_name) {
                Some(theme) => config.theme = theme,
                None => tracing::warn!(theme = theme_name, "unknown theme, keeping current"),
            }
        }

        if let Some(vars) = self.theme_variables {
            if let Some(v) = vars.font_family {
                config.theme.font_family = v;
            }
            if let Some(v) = vars.text_color {
                config.theme.text_color = v;
            }
            if let Some(v) = vars.root_text_color {
                config.theme.root_text_color = v;
            }
            if let Some(v) = vars.root_fill {
                config.theme.root_fill = v;
            }
            if let Some(v) = vars.root_stroke {
                config.theme.root_stroke = v;
            }
            if let Some(v) = vars.background {
                config.theme.background = v;
            }
        }

        if let Some(normalize) = self.normalize {
            config.normalize = normalize;
        }
        if let Some(layout) = self.layout {
            config.layout = layout;
        }
        if let Some(style) = self.style {
            config.style = style;
        }
        if let Some(presentation) = self.presentation {
            config.presentation = presentation;
        }
        if let Some(render) = self.render {
            config.render = render;
        }
        if let Some(seed) = self.seed {
            config.layout.seed = seed;
        }
    }
}

pub fn load_config_str(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    let mut config = Config::default();
    parsed.apply(&mut config);
    Ok(config)
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    load_config_str(&contents)
}

use crate::config::StyleConfig;
use crate::ir::{Level, MindNode, Point};
use crate::layout::Layout;
use crate::theme::{Theme, with_alpha};
use serde::{Deserialize, Serialize};

/// Renderer-agnostic description of a positioned mind map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub view_box: ViewBox,
    pub lines: Vec<LinePrimitive>,
    pub circles: Vec<CirclePrimitive>,
    pub nodes: Vec<NodeMeta>,
    pub levels: Vec<LevelStyle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewBox {
    pub min_x: f32,
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CirclePrimitive {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub fill_color: String,
    pub stroke_color: String,
    pub stroke_width: f32,
    pub display_label: String,
    pub font_size: f32,
    pub text_color: String,
    pub level: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinePrimitive {
    pub from_id: String,
    pub to_id: String,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub color: String,
    pub width: f32,
}

/// Full, untruncated node data for interactive lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMeta {
    pub id: String,
    pub label: String,
    pub description: String,
    pub level: usize,
    pub child_count: usize,
    pub parent_id: Option<String>,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelStyle {
    pub level: usize,
    pub name: String,
    pub radius: f32,
    pub font_size: f32,
    pub max_label_chars: usize,
    pub fill_alpha: f32,
}

/// Cuts `label` to `max_chars` characters plus `ellipsis` when it is longer;
/// shorter labels pass through unchanged.
pub fn truncate_label(label: &str, max_chars: usize, ellipsis: &str) -> String {
    if label.chars().count() <= max_chars {
        return label.to_string();
    }
    let mut out: String = label.chars().take(max_chars).collect();
    out.push_str(ellipsis);
    out
}

fn node_fill(node: &MindNode, style: &StyleConfig, theme: &Theme) -> String {
    match node.level {
        Level::Center => theme.root_fill.clone(),
        Level::Branch => node.color.clone(),
        level => with_alpha(&node.color, style.fill_alpha[level.index()]),
    }
}

fn node_stroke(node: &MindNode, theme: &Theme) -> String {
    match node.level {
        Level::Center => theme.root_stroke.clone(),
        _ => node.color.clone(),
    }
}

/// Builds the scene for a positioned tree. Pure: the same layout, style and
/// theme always produce an identical scene.
pub fn build_scene(layout: &Layout, style: &StyleConfig, theme: &Theme) -> Scene {
    let tree = &layout.tree;
    let mut circles = Vec::with_capacity(layout.order.len());
    let mut lines = Vec::with_capacity(layout.order.len().saturating_sub(1));
    let mut nodes = Vec::with_capacity(layout.order.len());

    for &idx in &layout.order {
        let node = &tree.nodes[idx];
        let position = node.position.unwrap_or(Point::ORIGIN);
        let level = node.level;

        if let Some(parent) = node.parent {
            let from = tree.nodes[parent].position.unwrap_or(Point::ORIGIN);
            lines.push(LinePrimitive {
                from_id: tree.nodes[parent].id.clone(),
                to_id: node.id.clone(),
                x1: from.x,
                y1: from.y,
                x2: position.x,
                y2: position.y,
                color: node.color.clone(),
                width: style.edge_widths[level.index()],
            });
        }

        circles.push(CirclePrimitive {
            id: node.id.clone(),
            x: position.x,
            y: position.y,
            radius: node.radius,
            fill_color: node_fill(node, style, theme),
            stroke_color: node_stroke(node, theme),
            stroke_width: style.stroke_widths[level.index()],
            display_label: truncate_label(
                &node.label,
                style.max_label_chars(level),
                &style.ellipsis,
            ),
            font_size: style.font_size(level),
            text_color: if level == Level::Center {
                theme.root_text_color.clone()
            } else {
                theme.text_color.clone()
            },
            level: level.index(),
        });

        nodes.push(NodeMeta {
            id: node.id.clone(),
            label: node.label.clone(),
            description: node.description.clone(),
            level: level.index(),
            child_count: node.children.len(),
            parent_id: tree.parent_id(idx).map(str::to_string),
            color: node.color.clone(),
        });
    }

    let levels = Level::ALL
        .iter()
        .map(|&level| LevelStyle {
            level: level.index(),
            name: level.name().to_string(),
            radius: style.node_radius(level),
            font_size: style.font_size(level),
            max_label_chars: style.max_label_chars(level),
            fill_alpha: style.fill_alpha[level.index()],
        })
        .collect();

    let pad = style.view_padding.max(0.0);
    let bounds = layout.bounds;
    let view_box = ViewBox {
        min_x: bounds.min_x - pad,
        min_y: bounds.min_y - pad,
        width: (bounds.width() + pad * 2.0).max(1.0),
        height: (bounds.height() + pad * 2.0).max(1.0),
    };

    Scene {
        view_box,
        lines,
        circles,
        nodes,
        levels,
    }
}

impl Scene {
    pub fn node(&self, id: &str) -> Option<&NodeMeta> {
        self.nodes.iter().find(|meta| meta.id == id)
    }

    pub fn circle(&self, id: &str) -> Option<&CirclePrimitive> {
        self.circles.iter().find(|circle| circle.id == id)
    }

    /// Topmost circle containing the scene point, if any. Later circles are
    /// painted over earlier ones.
    pub fn node_at(&self, x: f32, y: f32) -> Option<&CirclePrimitive> {
        let point = Point::new(x, y);
        self.circles
            .iter()
            .rev()
            .find(|circle| point.distance(Point::new(circle.x, circle.y)) <= circle.radius)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::layout::compute_layout;
    use crate::normalize::normalize_tree;
    use serde_json::json;

    fn scene_of(raw: serde_json::Value) -> Scene {
        let config = Config::default();
        let layout = compute_layout(normalize_tree(&raw, &config), &config.layout);
        build_scene(&layout, &config.style, &config.theme)
    }

    fn sample() -> serde_json::Value {
        json!({
            "center": {"label": "Cellular Respiration", "description": "How cells make ATP"},
            "branches": [
                {"label": "Glycolysis", "concepts": [
                    {"label": "Introduction to Cellular Respiration", "points": [
                        {"label": "Pyruvate", "details": ["2 ATP net"]}
                    ]}
                ]},
                {"label": "Krebs Cycle", "color": "green"}
            ]
        })
    }

    #[test]
    fn truncation_law() {
        assert_eq!(
            truncate_label("Introduction to Cellular Respiration", 10, "..."),
            "Introducti..."
        );
        assert_eq!(truncate_label("Exactly10!", 10, "..."), "Exactly10!");
        assert_eq!(truncate_label("short", 10, "..."), "short");
        assert_eq!(truncate_label("ñandú ñandú", 5, "…"), "ñandú…");
    }

    #[test]
    fn one_circle_per_node_one_line_per_edge() {
        let scene = scene_of(sample());
        assert_eq!(scene.circles.len(), 6);
        assert_eq!(scene.lines.len(), 5);
        assert_eq!(scene.nodes.len(), 6);
        assert_eq!(scene.levels.len(), 5);
    }

    #[test]
    fn labels_truncate_per_level_but_metadata_keeps_full_text() {
        let scene = scene_of(sample());
        let concept = scene.circle("b0-c0").unwrap();
        assert_eq!(concept.display_label, "Introducti...");
        assert_eq!(
            scene.node("b0-c0").unwrap().label,
            "Introduction to Cellular Respiration"
        );
        assert_eq!(scene.circle("center").unwrap().display_label, "Cellular Respir...");
    }

    #[test]
    fn fill_fades_with_depth() {
        let config = Config::default();
        let scene = scene_of(sample());
        let branch_color = config.style.palette_color(0);
        assert_eq!(scene.circle("center").unwrap().fill_color, config.theme.root_fill);
        assert_eq!(scene.circle("b0").unwrap().fill_color, branch_color);
        assert_eq!(
            scene.circle("b0-c0").unwrap().fill_color,
            with_alpha(&branch_color, 0.8)
        );
        assert!(scene.circle("b0-c0-p0").unwrap().fill_color.starts_with("rgba("));
        // non-hex colors pass through
        assert_eq!(scene.circle("b1").unwrap().fill_color, "green");
    }

    #[test]
    fn radii_and_font_sizes_follow_level() {
        let scene = scene_of(sample());
        let expected = [(50.0, 11.0), (40.0, 9.0), (32.0, 8.0), (24.0, 7.0), (18.0, 6.0)];
        for circle in &scene.circles {
            assert_eq!((circle.radius, circle.font_size), expected[circle.level]);
        }
    }

    #[test]
    fn lines_use_child_color_and_positions() {
        let scene = scene_of(sample());
        let line = scene.lines.iter().find(|l| l.to_id == "b1").unwrap();
        assert_eq!(line.from_id, "center");
        assert_eq!(line.color, "green");
        assert_eq!((line.x1, line.y1), (0.0, 0.0));
        let child = scene.circle("b1").unwrap();
        assert_eq!((line.x2, line.y2), (child.x, child.y));
    }

    #[test]
    fn metadata_counts_children() {
        let scene = scene_of(sample());
        let center = scene.node("center").unwrap();
        assert_eq!(center.child_count, 2);
        assert_eq!(center.description, "How cells make ATP");
        assert_eq!(center.parent_id, None);
        assert_eq!(scene.node("b1").unwrap().child_count, 0);
        assert_eq!(scene.node("b0-c0").unwrap().parent_id.as_deref(), Some("b0"));
    }

    #[test]
    fn serialization_is_byte_identical() {
        let config = Config::default();
        let layout = compute_layout(normalize_tree(&sample(), &config), &config.layout);
        let a = build_scene(&layout, &config.style, &config.theme).to_json().unwrap();
        let b = build_scene(&layout, &config.style, &config.theme).to_json().unwrap();
        assert_eq!(a, b);
        assert!(a.contains("\"displayLabel\""));
        assert!(a.contains("\"childCount\""));
        let decoded = Scene::from_json(&a).unwrap();
        assert_eq!(decoded.to_json().unwrap(), a);
    }

    #[test]
    fn view_box_covers_all_circles() {
        let scene = scene_of(sample());
        let vb = scene.view_box;
        for circle in &scene.circles {
            assert!(circle.x - circle.radius >= vb.min_x);
            assert!(circle.y - circle.radius >= vb.min_y);
            assert!(circle.x + circle.radius <= vb.min_x + vb.width);
            assert!(circle.y + circle.radius <= vb.min_y + vb.height);
        }
    }

    #[test]
    fn level_table_uses_configured_radii_for_empty_levels() {
        let scene = scene_of(json!({"center": {"label": "X"}}));
        assert_eq!(scene.circles.len(), 1);
        let radii: Vec<f32> = scene.levels.iter().map(|level| level.radius).collect();
        assert_eq!(radii, vec![50.0, 40.0, 32.0, 24.0, 18.0]);
        assert_eq!(scene.levels[4].name, "detail");
    }

    #[test]
    fn hit_test_finds_circle() {
        let scene = scene_of(sample());
        assert_eq!(scene.node_at(0.0, 0.0).map(|c| c.id.as_str()), Some("center"));
        assert_eq!(scene.node_at(452.0, 3.0).map(|c| c.id.as_str()), Some("b0"));
        assert_eq!(scene.node_at(0.0, 300.0), None);
    }
}

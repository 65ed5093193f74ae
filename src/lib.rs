//! Radial mind-map layout: normalize an untrusted topic tree, place it on
//! concentric fans around the origin, and serialize it as a portable scene.

pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod normalize;
pub mod presentation;
pub mod render;
pub mod scene;
pub mod theme;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, StyleConfig, load_config};
pub use ir::{Level, MindNode, MindTree, Point};
pub use layout::{Layout, compute_layout, compute_layout_with_rng};
pub use normalize::{normalize_tree, parse_raw};
pub use presentation::{NodeDetails, ViewerSession, Viewport};
pub use render::render_svg;
pub use scene::{Scene, build_scene};
pub use theme::Theme;

/// Normalizes, lays out and serializes a raw tree. Always returns a scene.
pub fn generate_scene(raw: &serde_json::Value, config: &Config) -> Scene {
    let tree = normalize_tree(raw, config);
    let layout = compute_layout(tree, &config.layout);
    build_scene(&layout, &config.style, &config.theme)
}

/// [`generate_scene`] over raw model text (fenced JSON, JSON5 or an outline).
pub fn generate_scene_from_str(input: &str, config: &Config) -> Scene {
    generate_scene(&parse_raw(input), config)
}

pub fn render_svg_from_str(input: &str, config: &Config) -> String {
    render_svg(&generate_scene_from_str(input, config), &config.theme)
}

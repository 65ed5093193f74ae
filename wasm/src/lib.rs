use radial_mindmap::{Config, Theme, generate_scene_from_str, render_svg};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MindmapRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    seed: Option<u64>,
    palette: Option<Vec<String>>,
}

fn build_config(options: MindmapRenderOptions) -> Config {
    let mut config = Config::default();
    if let Some(theme) = options.theme.as_deref().and_then(Theme::by_name) {
        config.theme = theme;
    }
    if let Some(font_family) = options.font_family {
        config.theme.font_family = font_family;
    }
    if let Some(seed) = options.seed {
        config.layout.seed = seed;
    }
    if let Some(palette) = options.palette.filter(|p| !p.is_empty()) {
        config.style.palette = palette;
    }
    config
}

fn parse_options(options_json: Option<String>) -> Result<Config, String> {
    let options = match options_json {
        Some(raw) => serde_json::from_str::<MindmapRenderOptions>(&raw)
            .map_err(|error| error.to_string())?,
        None => MindmapRenderOptions::default(),
    };
    Ok(build_config(options))
}

/// Returns the scene description as JSON.
#[wasm_bindgen]
pub fn render_mindmap_scene(raw: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let config = parse_options(options_json).map_err(|error| JsValue::from_str(&error))?;
    generate_scene_from_str(raw, &config)
        .to_json()
        .map_err(|error| JsValue::from_str(&error.to_string()))
}

#[wasm_bindgen]
pub fn render_mindmap_svg(raw: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let config = parse_options(options_json).map_err(|error| JsValue::from_str(&error))?;
    let scene = generate_scene_from_str(raw, &config);
    Ok(render_svg(&scene, &config.theme))
}

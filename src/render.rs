use crate::scene::{CirclePrimitive, Scene};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

pub fn render_svg(scene: &Scene, theme: &Theme) -> String {
    let mut svg = String::new();
    let vb = scene.view_box;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{:.2}\" height=\"{:.2}\" viewBox=\"{:.2} {:.2} {:.2} {:.2}\">",
        vb.width, vb.height, vb.min_x, vb.min_y, vb.width, vb.height
    ));

    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"/>",
        vb.min_x,
        vb.min_y,
        vb.width,
        vb.height,
        escape_xml(&theme.background)
    ));

    svg.push_str("<g class=\"edges\">");
    for line in &scene.lines {
        svg.push_str(&format!(
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\" data-from=\"{}\" data-to=\"{}\"/>",
            line.x1,
            line.y1,
            line.x2,
            line.y2,
            escape_xml(&line.color),
            line.width,
            escape_xml(&line.from_id),
            escape_xml(&line.to_id)
        ));
    }
    svg.push_str("</g>");

    svg.push_str("<g class=\"nodes\">");
    for circle in &scene.circles {
        let full_label = scene
            .node(&circle.id)
            .map(|meta| meta.label.as_str())
            .unwrap_or(circle.display_label.as_str());
        svg.push_str(&format!(
            "<g class=\"node level-{}\" data-id=\"{}\"><title>{}</title>",
            circle.level,
            escape_xml(&circle.id),
            escape_xml(full_label)
        ));
        svg.push_str(&format!(
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            circle.x,
            circle.y,
            circle.radius,
            escape_xml(&circle.fill_color),
            escape_xml(&circle.stroke_color),
            circle.stroke_width
        ));
        svg.push_str(&label_svg(circle, theme));
        svg.push_str("</g>");
    }
    svg.push_str("</g>");

    svg.push_str("</svg>");
    svg
}

fn label_svg(circle: &CirclePrimitive, theme: &Theme) -> String {
    format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        circle.x,
        circle.y,
        escape_xml(&theme.font_family),
        circle.font_size,
        escape_xml(&circle.text_color),
        escape_xml(&circle.display_label)
    )
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(
    svg: &str,
    output: &Path,
    render_cfg: &crate::config::RenderConfig,
    theme: &Theme,
) -> Result<()> {
    let mut opt = usvg::Options {
        font_family: theme
            .font_family
            .split(',')
            .next()
            .map(|family| family.trim().trim_matches('"').to_string())
            .unwrap_or_else(|| "Inter".to_string()),
        ..Default::default()
    };
    opt.fontdb_mut().load_system_fonts();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("Invalid render size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size();
    let scale = (render_cfg.width / size.width())
        .min(render_cfg.height / size.height())
        .max(f32::EPSILON);
    let width = (size.width() * scale).ceil().max(1.0) as u32;
    let height = (size.height() * scale).ceil().max(1.0) as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap_mut,
    );
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::generate_scene;
    use serde_json::json;

    #[test]
    fn render_svg_basic() {
        let config = Config::default();
        let scene = generate_scene(
            &json!({
                "center": {"label": "Alpha & Omega"},
                "branches": [{"label": "Beta <draft>"}]
            }),
            &config,
        );
        let svg = render_svg(&scene, &config.theme);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Alpha &amp; Omega"));
        assert!(svg.contains("Beta &lt;draft&gt;"));
        assert_eq!(svg.matches("<circle").count(), 2);
        assert_eq!(svg.matches("<line").count(), 1);
    }

    #[test]
    fn background_comes_from_theme_variables() {
        let config = crate::config::load_config_str(
            r##"{"themeVariables":{"background":"#000000"},"render":{"width":640}}"##,
        )
        .unwrap();
        assert_eq!(config.render.width, 640.0);
        let svg = crate::render_svg_from_str(r#"{"center":{"label":"Night"}}"#, &config);
        assert!(svg.contains("fill=\"#000000\"/>"));
    }

    #[test]
    fn title_keeps_full_label() {
        let config = Config::default();
        let scene = generate_scene(
            &json!({"center": {"label": "An extremely long central topic"}}),
            &config,
        );
        let svg = render_svg(&scene, &config.theme);
        assert!(svg.contains("<title>An extremely long central topic</title>"));
        assert!(svg.contains(">An extremely lo...</text>"));
    }
}

//! Reference behavior for viewers of a [`Scene`]: pan, zoom and node
//! selection. Nothing here is persisted; a session lives as long as one view.

use crate::config::PresentationConfig;
use crate::scene::Scene;
use serde::Serialize;

/// Maps scene coordinates to screen coordinates: `screen = scene * scale + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

impl Viewport {
    /// Centers the scene in a `width` x `height` screen, scaled to fit.
    pub fn fit(scene: &Scene, width: f32, height: f32, config: &PresentationConfig) -> Self {
        let vb = scene.view_box;
        let scale = (width / vb.width)
            .min(height / vb.height)
            .clamp(config.min_scale, config.max_scale);
        let center_x = vb.min_x + vb.width / 2.0;
        let center_y = vb.min_y + vb.height / 2.0;
        Self {
            x: width / 2.0 - center_x * scale,
            y: height / 2.0 - center_y * scale,
            scale,
        }
    }

    pub fn screen_to_scene(&self, sx: f32, sy: f32) -> (f32, f32) {
        ((sx - self.x) / self.scale, (sy - self.y) / self.scale)
    }

    pub fn scene_to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.scale + self.x, y * self.scale + self.y)
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }

    /// Scales by `factor` around the screen point `(sx, sy)`, which stays over
    /// the same scene point. The resulting scale is clamped.
    pub fn zoom_at(&mut self, sx: f32, sy: f32, factor: f32, config: &PresentationConfig) {
        let new_scale = (self.scale * factor).clamp(config.min_scale, config.max_scale);
        let ratio = new_scale / self.scale;
        self.x = sx - (sx - self.x) * ratio;
        self.y = sy - (sy - self.y) * ratio;
        self.scale = new_scale;
    }

    pub fn zoom_in(&mut self, config: &PresentationConfig) {
        self.scale = (self.scale * config.zoom_step).clamp(config.min_scale, config.max_scale);
    }

    pub fn zoom_out(&mut self, config: &PresentationConfig) {
        self.scale = (self.scale / config.zoom_step).clamp(config.min_scale, config.max_scale);
    }
}

/// What the details view shows for the selected node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDetails {
    pub id: String,
    pub label: String,
    pub description: String,
    pub level: usize,
    pub child_count: usize,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    start: (f32, f32),
    last: (f32, f32),
    dragged: bool,
}

/// One viewer's interaction state over a scene.
#[derive(Debug)]
pub struct ViewerSession<'a> {
    scene: &'a Scene,
    config: PresentationConfig,
    pub viewport: Viewport,
    selected: Option<String>,
    press: Option<Press>,
}

impl<'a> ViewerSession<'a> {
    pub fn new(scene: &'a Scene, config: PresentationConfig) -> Self {
        Self {
            scene,
            config,
            viewport: Viewport::default(),
            selected: None,
            press: None,
        }
    }

    pub fn fitted(scene: &'a Scene, config: PresentationConfig, width: f32, height: f32) -> Self {
        let viewport = Viewport::fit(scene, width, height, &config);
        Self {
            viewport,
            ..Self::new(scene, config)
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn pointer_down(&mut self, sx: f32, sy: f32) {
        self.press = Some(Press {
            start: (sx, sy),
            last: (sx, sy),
            dragged: false,
        });
    }

    /// Drags pan the whole scene once the pointer leaves the click tolerance.
    pub fn pointer_move(&mut self, sx: f32, sy: f32) {
        let tolerance = self.config.click_tolerance;
        let Some(press) = self.press.as_mut() else {
            return;
        };
        if !press.dragged {
            let moved = (sx - press.start.0).hypot(sy - press.start.1);
            if moved <= tolerance {
                return;
            }
            press.dragged = true;
        }
        let (dx, dy) = (sx - press.last.0, sy - press.last.1);
        press.last = (sx, sy);
        self.viewport.pan_by(dx, dy);
    }

    /// Ends a press; a press that never turned into a drag counts as a click.
    pub fn pointer_up(&mut self, sx: f32, sy: f32) {
        let Some(press) = self.press.take() else {
            return;
        };
        if !press.dragged {
            self.click(sx, sy);
        }
    }

    /// Positive `delta_y` zooms out, negative zooms in, around the pointer.
    pub fn wheel(&mut self, sx: f32, sy: f32, delta_y: f32) {
        if delta_y == 0.0 {
            return;
        }
        let factor = if delta_y > 0.0 {
            1.0 / self.config.zoom_step
        } else {
            self.config.zoom_step
        };
        self.viewport.zoom_at(sx, sy, factor, &self.config);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in(&self.config);
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out(&self.config);
    }

    /// Selects the node under the pointer. Clicking the selected node again or
    /// clicking empty space closes the details view.
    pub fn click(&mut self, sx: f32, sy: f32) {
        let (x, y) = self.viewport.screen_to_scene(sx, sy);
        let hit = self.scene.node_at(x, y).map(|circle| circle.id.clone());
        self.selected = match (hit, self.selected.take()) {
            (Some(hit), Some(current)) if hit == current => None,
            (hit, _) => hit,
        };
    }

    pub fn close_details(&mut self) {
        self.selected = None;
    }

    pub fn details(&self) -> Option<NodeDetails> {
        let meta = self.scene.node(self.selected.as_deref()?)?;
        Some(NodeDetails {
            id: meta.id.clone(),
            label: meta.label.clone(),
            description: meta.description.clone(),
            level: meta.level,
            child_count: meta.child_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::generate_scene;
    use serde_json::json;

    fn scene() -> Scene {
        generate_scene(
            &json!({
                "center": {"label": "Photosynthesis", "description": "Light to sugar"},
                "branches": [{"label": "Light Reactions", "concepts": [{"label": "Thylakoid"}]}]
            }),
            &Config::default(),
        )
    }

    #[test]
    fn zoom_is_multiplicative_and_clamped() {
        let config = PresentationConfig::default();
        let mut viewport = Viewport::default();
        viewport.zoom_in(&config);
        assert!((viewport.scale - 1.2).abs() < 1e-6);
        for _ in 0..100 {
            viewport.zoom_in(&config);
        }
        assert_eq!(viewport.scale, 10.0);
        for _ in 0..100 {
            viewport.zoom_out(&config);
        }
        assert_eq!(viewport.scale, 0.1);
    }

    #[test]
    fn zoom_at_keeps_pointer_anchored() {
        let config = PresentationConfig::default();
        let mut viewport = Viewport {
            x: 30.0,
            y: -20.0,
            scale: 1.5,
        };
        let before = viewport.screen_to_scene(200.0, 120.0);
        viewport.zoom_at(200.0, 120.0, 1.2, &config);
        let after = viewport.screen_to_scene(200.0, 120.0);
        assert!((before.0 - after.0).abs() < 1e-3);
        assert!((before.1 - after.1).abs() < 1e-3);
    }

    #[test]
    fn fit_centers_the_scene() {
        let scene = scene();
        let viewport = Viewport::fit(&scene, 800.0, 600.0, &PresentationConfig::default());
        let vb = scene.view_box;
        let (cx, cy) =
            viewport.scene_to_screen(vb.min_x + vb.width / 2.0, vb.min_y + vb.height / 2.0);
        assert!((cx - 400.0).abs() < 1e-2);
        assert!((cy - 300.0).abs() < 1e-2);
    }

    #[test]
    fn drag_pans_without_selecting() {
        let scene = scene();
        let mut session = ViewerSession::new(&scene, PresentationConfig::default());
        session.pointer_down(0.0, 0.0);
        session.pointer_move(50.0, 10.0);
        session.pointer_move(80.0, 40.0);
        session.pointer_up(80.0, 40.0);
        assert_eq!(session.viewport.x, 80.0);
        assert_eq!(session.viewport.y, 40.0);
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn click_toggles_selection() {
        let scene = scene();
        let mut session = ViewerSession::new(&scene, PresentationConfig::default());
        session.pointer_down(1.0, 1.0);
        session.pointer_up(2.0, 1.0);
        let details = session.details().unwrap();
        assert_eq!(details.label, "Photosynthesis");
        assert_eq!(details.description, "Light to sugar");
        assert_eq!(details.level, 0);
        assert_eq!(details.child_count, 1);

        session.click(0.0, 0.0);
        assert_eq!(session.details(), None);
    }

    #[test]
    fn clicking_elsewhere_or_closing_clears_selection() {
        let scene = scene();
        let mut session = ViewerSession::new(&scene, PresentationConfig::default());
        session.click(450.0, 0.0);
        assert_eq!(session.selected(), Some("b0"));
        session.click(0.0, 0.0);
        assert_eq!(session.selected(), Some("center"));
        session.click(-2000.0, -2000.0);
        assert_eq!(session.selected(), None);
        session.click(450.0, 0.0);
        session.close_details();
        assert_eq!(session.details(), None);
    }

    #[test]
    fn wheel_zooms_around_pointer() {
        let scene = scene();
        let mut session = ViewerSession::new(&scene, PresentationConfig::default());
        session.wheel(100.0, 100.0, -1.0);
        assert!((session.viewport.scale - 1.2).abs() < 1e-6);
        session.wheel(100.0, 100.0, 1.0);
        assert!((session.viewport.scale - 1.0).abs() < 1e-5);
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub text_color: String,
    pub root_text_color: String,
    pub root_fill: String,
    pub root_stroke: String,
    pub background: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            text_color: "#FFFFFF".to_string(),
            root_text_color: "#FFFFFF".to_string(),
            root_fill: "#1F2937".to_string(),
            root_stroke: "#111827".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            text_color: "#F8FAFF".to_string(),
            root_text_color: "#F8FAFF".to_string(),
            root_fill: "#1C2430".to_string(),
            root_stroke: "#7A8AA6".to_string(),
            background: "#0F172A".to_string(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "classic" | "default" => Some(Self::classic()),
            "modern" | "dark" => Some(Self::modern()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

/// Parses `#rgb` or `#rrggbb` into its channels.
pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let mut channels = hex.chars().map(|ch| {
                let v = ch.to_digit(16).unwrap_or(0) as u8;
                v * 16 + v
            });
            Some((channels.next()?, channels.next()?, channels.next()?))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some((r, g, b))
        }
        _ => None,
    }
}

/// Fades a color to `alpha`. Hex colors become `rgba(...)`; anything else
/// (named colors, `hsl(...)`) is returned unchanged.
pub fn with_alpha(color: &str, alpha: f32) -> String {
    let alpha = alpha.clamp(0.0, 1.0);
    if alpha >= 1.0 {
        return color.to_string();
    }
    match parse_hex_color(color) {
        Some((r, g, b)) => format!("rgba({r}, {g}, {b}, {})", round_alpha(alpha)),
        None => color.to_string(),
    }
}

fn round_alpha(alpha: f32) -> f32 {
    (alpha * 100.0).round() / 100.0
}

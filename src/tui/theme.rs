use ratatui::style::Color;

use crate::model::UiConfig;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub purple: Color,
    pub selection_bg: Color,
    pub selection_border: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x1A, 0x1B, 0x26),
            text: Color::Rgb(0xC0, 0xCA, 0xF5),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0x7A, 0xA2, 0xF7),
            dim: Color::Rgb(0x56, 0x5F, 0x89),
            red: Color::Rgb(0xF7, 0x76, 0x8E),
            yellow: Color::Rgb(0xE0, 0xAF, 0x68),
            green: Color::Rgb(0x9E, 0xCE, 0x6A),
            cyan: Color::Rgb(0x7D, 0xCF, 0xFF),
            purple: Color::Rgb(0xBB, 0x9A, 0xF7),
            selection_bg: Color::Rgb(0x28, 0x34, 0x57),
            selection_border: Color::Rgb(0x7A, 0xA2, 0xF7),
            search_match_bg: Color::Rgb(0xE0, 0xAF, 0x68),
            search_match_fg: Color::Rgb(0x1A, 0x1B, 0x26),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from the `[ui]` config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(key = %key, value = %value, "ignoring invalid theme color");
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "red" => theme.red = color,
                "yellow" => theme.yellow = color,
                "green" => theme.green = color,
                "cyan" => theme.cyan = color,
                "purple" => theme.purple = color,
                "selection_bg" => theme.selection_bg = color,
                "selection_border" => theme.selection_border = color,
                "search_match_bg" => theme.search_match_bg = color,
                "search_match_fg" => theme.search_match_fg = color,
                other => tracing::warn!(key = other, "unknown theme slot"),
            }
        }

        theme
    }

    /// Color for a tag's stored hex value, falling back to text color
    pub fn tag_color(&self, hex: &str) -> Color {
        parse_hex_color(hex).unwrap_or(self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            parse_hex_color("#FF4444"),
            Some(Color::Rgb(0xFF, 0x44, 0x44))
        );
        assert_eq!(parse_hex_color("#9ece6a"), Some(Color::Rgb(0x9E, 0xCE, 0x6A)));
        assert_eq!(parse_hex_color("FF4444"), None);
        assert_eq!(parse_hex_color("#FFF"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn test_config_overrides() {
        let mut colors = HashMap::new();
        colors.insert("highlight".to_string(), "#FF0000".to_string());
        colors.insert("dim".to_string(), "not-a-color".to_string());
        let theme = Theme::from_config(&UiConfig { colors });
        assert_eq!(theme.highlight, Color::Rgb(0xFF, 0, 0));
        assert_eq!(theme.dim, Theme::default().dim);
    }

    #[test]
    fn test_tag_color_fallback() {
        let theme = Theme::default();
        assert_eq!(theme.tag_color("#9ece6a"), Color::Rgb(0x9E, 0xCE, 0x6A));
        assert_eq!(theme.tag_color("bogus"), theme.text);
    }
}

use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::UiConfig;
use crate::model::task::{Priority, TaskState};

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub orange: Color,
    pub green: Color,
    pub blue: Color,
    pub selection_bg: Color,
    pub selection_border: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
    /// Badge color per task category
    pub category_colors: HashMap<String, Color>,
}

impl Default for Theme {
    fn default() -> Self {
        let mut category_colors = HashMap::new();
        category_colors.insert("User Story".into(), Color::Rgb(0x00, 0x38, 0xFF));
        category_colors.insert("Technical Task".into(), Color::Rgb(0x1F, 0xD7, 0xC1));

        Theme {
            background: Color::Rgb(0x2A, 0x36, 0x47),
            text: Color::Rgb(0xD1, 0xD1, 0xD1),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0x29, 0xAB, 0xE2),
            dim: Color::Rgb(0x8A, 0x94, 0xA3),
            red: Color::Rgb(0xFF, 0x3D, 0x00),
            orange: Color::Rgb(0xFF, 0xA8, 0x00),
            green: Color::Rgb(0x7A, 0xE2, 0x29),
            blue: Color::Rgb(0x00, 0x38, 0xFF),
            selection_bg: Color::Rgb(0x09, 0x19, 0x31),
            selection_border: Color::Rgb(0x29, 0xAB, 0xE2),
            search_match_bg: Color::Rgb(0xFF, 0xC7, 0x01),
            search_match_fg: Color::Rgb(0x2A, 0x36, 0x47),
            category_colors,
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
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => theme.background = color,
                    "text" => theme.text = color,
                    "text_bright" => theme.text_bright = color,
                    "highlight" => theme.highlight = color,
                    "dim" => theme.dim = color,
                    "red" => theme.red = color,
                    "orange" => theme.orange = color,
                    "green" => theme.green = color,
                    "blue" => theme.blue = color,
                    "selection_bg" => theme.selection_bg = color,
                    "selection_border" => theme.selection_border = color,
                    "search_match_bg" => theme.search_match_bg = color,
                    "search_match_fg" => theme.search_match_fg = color,
                    _ => tracing::debug!(%key, "unknown ui color"),
                }
            }
        }

        for (category, value) in &ui.category_colors {
            if let Some(color) = parse_hex_color(value) {
                theme.category_colors.insert(category.clone(), color);
            }
        }

        theme
    }

    /// Badge color for a category, falling back to the accent color
    pub fn category_color(&self, category: &str) -> Color {
        self.category_colors
            .get(category)
            .copied()
            .unwrap_or(self.highlight)
    }

    pub fn priority_color(&self, priority: Priority) -> Color {
        match priority {
            Priority::Urgent => self.red,
            Priority::Medium => self.orange,
            Priority::Low => self.green,
        }
    }

    /// Avatar bubble color from the stored `profilImgColor`
    pub fn avatar_color(&self, hex: &str) -> Color {
        parse_hex_color(hex).unwrap_or(self.dim)
    }

    /// Column heading color
    pub fn state_color(&self, state: TaskState) -> Color {
        match state {
            TaskState::ToDo => self.text,
            TaskState::InProgress => self.highlight,
            TaskState::AwaitFeedback => self.orange,
            TaskState::Done => self.green,
        }
    }
}

/// Glyph shown on cards for a priority
pub fn priority_symbol(priority: Priority) -> &'static str {
    match priority {
        Priority::Urgent => "\u{25B2}",
        Priority::Medium => "=",
        Priority::Low => "\u{25BC}",
    }
}

use ratatui::style::Color;

use crate::models::{Category, Priority};

/// Colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub muted: Color,
    pub accent: Color,
    pub highlight_bg: Color,
    pub completed: Color,
    pub active: Color,
    pub high: Color,
}

pub const LIGHT: Palette = Palette {
    fg: Color::Black,
    bg: Color::White,
    muted: Color::DarkGray,
    accent: Color::Blue,
    highlight_bg: Color::Gray,
    completed: Color::Green,
    active: Color::Blue,
    high: Color::Red,
};

pub const DARK: Palette = Palette {
    fg: Color::White,
    bg: Color::Black,
    muted: Color::Gray,
    accent: Color::Cyan,
    highlight_bg: Color::DarkGray,
    completed: Color::LightGreen,
    active: Color::LightBlue,
    high: Color::LightRed,
};

pub fn palette(dark: bool) -> Palette {
    if dark {
        DARK
    } else {
        LIGHT
    }
}

pub fn priority_color(priority: Priority, dark: bool) -> Color {
    match (priority, dark) {
        (Priority::High, false) => Color::Red,
        (Priority::High, true) => Color::LightRed,
        (Priority::Medium, false) => Color::Yellow,
        (Priority::Medium, true) => Color::LightYellow,
        (Priority::Low, false) => Color::Green,
        (Priority::Low, true) => Color::LightGreen,
    }
}

pub fn category_color(category: Category, dark: bool) -> Color {
    match (category, dark) {
        (Category::Work, false) => Color::Blue,
        (Category::Work, true) => Color::LightBlue,
        (Category::Personal, false) => Color::Magenta,
        (Category::Personal, true) => Color::LightMagenta,
        (Category::Shopping, false) => Color::Rgb(200, 120, 0),
        (Category::Shopping, true) => Color::Rgb(255, 170, 60),
        (Category::Health, false) => Color::Cyan,
        (Category::Health, true) => Color::LightCyan,
    }
}

//! Warm "dog park" palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const HONEY: Color = Color::Rgb(255, 184, 108); // #ffb86c
pub const SKY_BLUE: Color = Color::Rgb(139, 233, 253); // #8be9fd
pub const HEART_RED: Color = Color::Rgb(255, 85, 119); // #ff5577
pub const GRASS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363
pub const AMBER: Color = Color::Rgb(241, 250, 140); // #f1fa8c

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(HONEY).add_modifier(Modifier::BOLD)
}

/// Border for a focused/selected panel.
pub fn border_focused() -> Style {
    Style::default().fg(HONEY)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Primary text on a card.
pub fn card_text() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Breed/age tag text.
pub fn tag_style() -> Style {
    Style::default().fg(SKY_BLUE)
}

/// The favorite heart marker.
pub fn heart_style() -> Style {
    Style::default().fg(HEART_RED)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(HONEY).add_modifier(Modifier::BOLD)
}

/// Form field label, active vs inactive.
pub fn field_label(active: bool) -> Style {
    if active {
        Style::default().fg(HONEY)
    } else {
        Style::default().fg(DIM_WHITE)
    }
}

/// Form field border, active vs inactive.
pub fn field_border(active: bool) -> Style {
    if active {
        Style::default().fg(HONEY)
    } else {
        Style::default().fg(BORDER_GRAY)
    }
}

use ratatui::style::{Color, Modifier, Style};

use pokedex_core::models::StatBand;

// Color palette
pub const PRIMARY: Color = Color::Rgb(220, 64, 64);
pub const ACCENT: Color = Color::Rgb(232, 192, 64);
pub const ERROR: Color = Color::Rgb(192, 64, 64);
pub const MUTED: Color = Color::Rgb(128, 128, 128);
pub const HIGHLIGHT: Color = Color::Rgb(48, 48, 64);

// Styles
pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn search_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn status_bar_style() -> Style {
    Style::default().bg(Color::Rgb(32, 32, 40)).fg(Color::White)
}

pub fn help_key_style() -> Style {
    Style::default()
        .fg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn current_page_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(PRIMARY)
        .add_modifier(Modifier::BOLD)
}

/// Badge color for an elemental type. Unknown types fall back to gray.
pub fn type_color(type_name: &str) -> Color {
    match type_name.to_lowercase().as_str() {
        "normal" => Color::Rgb(156, 163, 175),
        "fire" => Color::Rgb(239, 68, 68),
        "water" => Color::Rgb(59, 130, 246),
        "electric" => Color::Rgb(250, 204, 21),
        "grass" => Color::Rgb(34, 197, 94),
        "ice" => Color::Rgb(34, 211, 238),
        "fighting" => Color::Rgb(194, 65, 12),
        "poison" => Color::Rgb(168, 85, 247),
        "ground" => Color::Rgb(202, 138, 4),
        "flying" => Color::Rgb(129, 140, 248),
        "psychic" => Color::Rgb(236, 72, 153),
        "bug" => Color::Rgb(132, 204, 22),
        "rock" => Color::Rgb(161, 98, 7),
        "ghost" => Color::Rgb(126, 34, 206),
        "dragon" => Color::Rgb(79, 70, 229),
        "dark" => Color::Rgb(55, 65, 81),
        "steel" => Color::Rgb(107, 114, 128),
        "fairy" => Color::Rgb(249, 168, 212),
        _ => Color::Rgb(156, 163, 175),
    }
}

pub fn type_badge_style(type_name: &str) -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(type_color(type_name))
        .add_modifier(Modifier::BOLD)
}

pub fn stat_band_style(band: StatBand) -> Style {
    let color = match band {
        StatBand::Low => Color::Rgb(239, 68, 68),
        StatBand::Average => Color::Rgb(234, 179, 8),
        StatBand::High => Color::Rgb(59, 130, 246),
        StatBand::Exceptional => Color::Rgb(34, 197, 94),
    };
    Style::default().fg(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_color_case_insensitive() {
        assert_eq!(type_color("FIRE"), type_color("fire"));
        assert_ne!(type_color("fire"), type_color("water"));
    }

    #[test]
    fn test_unknown_type_falls_back_to_normal() {
        assert_eq!(type_color("shadow"), type_color("normal"));
    }
}

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use pokedex_core::models::{Pokemon, PokemonId, Stat};

use crate::app::{App, LoadStatus};
use crate::ui::screens::list::render_error;
use crate::ui::styles;

/// Width of a full stat bar in cells.
const STAT_BAR_WIDTH: usize = 30;

pub fn render(frame: &mut Frame, app: &App, id: PokemonId, area: Rect) {
    match &app.detail {
        LoadStatus::Ready(pokemon) => render_pokemon(frame, pokemon, area),
        LoadStatus::Failed(message) => render_error(frame, message, area),
        LoadStatus::Idle | LoadStatus::Loading => {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(styles::border_style(false));
            let paragraph = Paragraph::new(Span::styled(
                format!("Loading #{}...", id.padded()),
                styles::muted_style(),
            ))
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(paragraph, area);
        }
    }
}

fn render_pokemon(frame: &mut Frame, pokemon: &Pokemon, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_profile(frame, pokemon, chunks[0]);
    render_stats(frame, pokemon, chunks[1]);
}

fn render_profile(frame: &mut Frame, pokemon: &Pokemon, area: Rect) {
    let mut type_spans = vec![Span::styled("Types:   ", styles::highlight_style())];
    for type_name in &pokemon.types {
        type_spans.push(Span::styled(format!(" {} ", type_name.to_uppercase()), styles::type_badge_style(type_name)));
        type_spans.push(Span::raw(" "));
    }

    let lines = vec![
        Line::from(Span::styled(format!("#{}", pokemon.id.padded()), styles::muted_style())),
        Line::from(Span::styled(pokemon.display_name(), styles::title_style())),
        Line::from(""),
        Line::from(type_spans),
        Line::from(""),
        Line::from(vec![
            Span::styled("Height:  ", styles::highlight_style()),
            Span::raw(pokemon.height_display()),
        ]),
        Line::from(vec![
            Span::styled("Weight:  ", styles::highlight_style()),
            Span::raw(pokemon.weight_display()),
        ]),
        Line::from(""),
        Line::from(Span::styled("Artwork:", styles::highlight_style())),
        Line::from(Span::styled(
            pokemon.image_url().unwrap_or("(none)").to_string(),
            styles::muted_style(),
        )),
    ];

    let block = Block::default()
        .title(format!(" {} ", pokemon.display_name()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_stats(frame: &mut Frame, pokemon: &Pokemon, area: Rect) {
    let mut lines = vec![Line::from("")];

    for stat in &pokemon.stats {
        lines.push(stat_line(stat));
    }

    if pokemon.stats.is_empty() {
        lines.push(Line::from(Span::styled("  No stats available", styles::muted_style())));
    } else {
        let total: u32 = pokemon.stats.iter().map(|s| s.base_stat).sum();
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<16}", "Total"), styles::highlight_style()),
            Span::raw(format!("{:>3}", total)),
        ]));
    }

    let block = Block::default()
        .title(" Base Stats ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn stat_line(stat: &Stat) -> Line<'static> {
    let filled = stat_bar_cells(stat);
    Line::from(vec![
        Span::styled(format!("  {:<16}", stat.display_name()), styles::list_item_style()),
        Span::raw(format!("{:>3} ", stat.base_stat)),
        Span::styled("█".repeat(filled), styles::stat_band_style(stat.band())),
        Span::styled("░".repeat(STAT_BAR_WIDTH - filled), styles::muted_style()),
    ])
}

/// Filled cells for a stat, scaled to the maximum base stat.
fn stat_bar_cells(stat: &Stat) -> usize {
    let cells = (stat.percentage() / 100.0 * STAT_BAR_WIDTH as f64).round() as usize;
    cells.min(STAT_BAR_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(base_stat: u32) -> Stat {
        Stat {
            name: "attack".to_string(),
            base_stat,
        }
    }

    #[test]
    fn test_stat_bar_cells() {
        assert_eq!(stat_bar_cells(&stat(0)), 0);
        assert_eq!(stat_bar_cells(&stat(255)), STAT_BAR_WIDTH);
        assert_eq!(stat_bar_cells(&stat(300)), STAT_BAR_WIDTH);
        assert_eq!(stat_bar_cells(&stat(128)), 15);
    }
}

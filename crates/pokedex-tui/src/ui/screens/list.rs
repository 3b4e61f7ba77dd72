use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use pokedex_core::orchestrator::{page_numbers, DisplayPage, PageSlot};
use pokedex_core::utils::truncate_string;

use crate::app::{App, AppState, LoadStatus};
use crate::ui::styles;

/// Render the list screen: search bar, results table, pagination strip.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let show_pagination = app.display_page().is_some_and(DisplayPage::show_pagination);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                                // Search bar
            Constraint::Min(5),                                   // Results
            Constraint::Length(if show_pagination { 1 } else { 0 }), // Pagination
        ])
        .split(area);

    render_search_bar(frame, app, chunks[0]);

    match &app.list {
        LoadStatus::Idle | LoadStatus::Loading => render_loading(frame, chunks[1]),
        LoadStatus::Failed(message) => render_error(frame, message, chunks[1]),
        LoadStatus::Ready(page) if page.pokemon.is_empty() => render_empty(frame, page, chunks[1]),
        LoadStatus::Ready(page) => render_table(frame, app, page, chunks[1]),
    }

    if let Some(page) = app.display_page().filter(|p| p.show_pagination()) {
        render_pagination(frame, page, chunks[2]);
    }
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let searching = matches!(app.state, AppState::Searching);
    let buffer = app.search.buffer();

    let mut spans = vec![Span::styled(" 🔍 ", styles::muted_style())];
    if buffer.is_empty() && !searching {
        spans.push(Span::styled("Press / to search Pokémon...", styles::muted_style()));
    } else {
        spans.push(Span::styled(buffer.to_string(), styles::search_style()));
    }
    if searching {
        spans.push(Span::styled("▌", styles::search_style()));
    }
    if app.search.is_pending() {
        spans.push(Span::styled("  …", styles::muted_style()));
    }

    let block = Block::default()
        .title(" Search ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(searching));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_table(frame: &mut Frame, app: &App, page: &DisplayPage, area: Rect) {
    let header = Row::new([Cell::from("#"), Cell::from("Name"), Cell::from("Types")])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = page
        .pokemon
        .iter()
        .enumerate()
        .map(|(i, pokemon)| {
            let style = if i == app.selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            let mut type_spans = Vec::with_capacity(pokemon.types.len() * 2);
            for type_name in &pokemon.types {
                type_spans.push(Span::styled(format!(" {} ", type_name), styles::type_badge_style(type_name)));
                type_spans.push(Span::raw(" "));
            }

            Row::new(vec![
                Cell::from(format!("#{}", pokemon.id.padded())),
                Cell::from(truncate_string(&pokemon.display_name(), 28)),
                Cell::from(Line::from(type_spans)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Length(30),
        Constraint::Fill(1),
    ];

    let title = if page.search_active {
        format!(" Results for \"{}\" ({}) ", page.query.term(), page.pokemon.len())
    } else {
        format!(
            " Pokémon - page {} of {} ({} total) ",
            page.query.page, page.total_pages, page.total_count
        )
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_pagination(frame: &mut Frame, page: &DisplayPage, area: Rect) {
    let current = page.query.page;
    let mut spans = vec![Span::styled(
        "◀ ",
        if current > 1 { styles::highlight_style() } else { styles::muted_style() },
    )];

    for slot in page_numbers(page.total_pages, current) {
        match slot {
            PageSlot::Page(n) if n == current => {
                spans.push(Span::styled(format!(" {} ", n), styles::current_page_style()));
            }
            PageSlot::Page(n) => spans.push(Span::styled(format!(" {} ", n), styles::list_item_style())),
            PageSlot::Ellipsis => spans.push(Span::styled(" ... ", styles::muted_style())),
        }
    }

    spans.push(Span::styled(
        " ▶",
        if current < page.total_pages { styles::highlight_style() } else { styles::muted_style() },
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("Loading Pokémon...", styles::muted_style())),
    ])
    .alignment(Alignment::Center)
    .block(block);
    frame.render_widget(paragraph, area);
}

fn render_empty(frame: &mut Frame, page: &DisplayPage, area: Rect) {
    let message = if page.search_active {
        format!("No Pokémon found for \"{}\"", page.query.term())
    } else {
        format!("Page {} is past the end of the catalog", page.query.page)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message, styles::highlight_style())),
        Line::from(""),
        Line::from(Span::styled("[x] back to the first page", styles::muted_style())),
    ])
    .alignment(Alignment::Center)
    .block(block);
    frame.render_widget(paragraph, area);
}

/// Error panel with the recovery actions available from any failed load.
pub fn render_error(frame: &mut Frame, message: &str, area: Rect) {
    let block = Block::default()
        .title(" Error ")
        .title_style(styles::error_style())
        .borders(Borders::ALL)
        .border_style(styles::error_style());

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Oops! Something went wrong", styles::error_style())),
        Line::from(""),
        Line::from(Span::styled(message.to_string(), styles::list_item_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("[r]", styles::help_key_style()),
            Span::styled(" try again   ", styles::muted_style()),
            Span::styled("[x]", styles::help_key_style()),
            Span::styled(" reset", styles::muted_style()),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(paragraph, area);
}

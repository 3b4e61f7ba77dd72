//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, Route};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    // Any key dismisses a transient status message
    app.status_message = None;

    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return false;
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return false;
    }

    // Handle search mode
    if matches!(app.state, AppState::Searching) {
        handle_search_input(app, key);
        return false;
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char('r') => app.retry(),
        KeyCode::Char('x') => app.reset(),
        _ => match app.route() {
            Route::List => handle_list_input(app, key),
            Route::Detail(_) => handle_detail_input(app, key),
        },
    }

    false
}

fn handle_list_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_page(),
        KeyCode::Right | KeyCode::Char('l') => app.next_page(),
        KeyCode::Home => app.first_page(),
        KeyCode::End => app.last_page(),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Esc => {
            if !app.search.buffer().is_empty() {
                app.clear_search();
            }
        }
        _ => {}
    }
}

fn handle_detail_input(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Backspace | KeyCode::Left) {
        app.go_back();
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    let now = Instant::now();
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.clear_search();
        }
        KeyCode::Enter | KeyCode::Down => {
            // Keep typing focus out of the box; the pending term still commits
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => app.search_backspace(now),
        KeyCode::Char(c) => app.search_input(c, now),
        _ => {}
    }
}

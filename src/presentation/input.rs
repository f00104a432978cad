use crate::application::{App, AppMode};
use crate::domain::FieldId;
use crossterm::event::{KeyCode, KeyModifiers};
use strum::EnumCount;
use tracing::warn;

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Editing => Self::handle_editing_mode(app, key, modifiers),
            AppMode::Help => Self::handle_help_mode(app, key),
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        app.status_message = None;

        if modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('s') = key {
                app.submit();
            }
            return;
        }

        match key {
            KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => app.select_next(),
            KeyCode::PageUp => {
                for _ in 0..5 {
                    app.select_previous();
                }
            }
            KeyCode::PageDown => {
                for _ in 0..5 {
                    app.select_next();
                }
            }
            KeyCode::Home => {
                for _ in 0..FieldId::COUNT {
                    app.select_previous();
                }
            }
            KeyCode::End => {
                for _ in 0..FieldId::COUNT {
                    app.select_next();
                }
            }
            KeyCode::Left | KeyCode::Char('h') => app.cycle_option(false),
            KeyCode::Right | KeyCode::Char('l') => app.cycle_option(true),
            KeyCode::Char(' ') => app.toggle_selected(),
            KeyCode::Enter | KeyCode::F(2) => app.start_editing(),
            KeyCode::Delete | KeyCode::Backspace => app.clear_selected(),
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    fn handle_editing_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('v') => Self::paste_clipboard(app),
                KeyCode::Char('s') => {
                    app.finish_editing();
                    app.submit();
                }
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Enter | KeyCode::Esc => app.finish_editing(),
            KeyCode::Char(c) => app.insert_text(&c.to_string()),
            KeyCode::Backspace => app.delete_char(),
            KeyCode::Left => app.move_cursor_left(),
            KeyCode::Right => app.move_cursor_right(),
            KeyCode::Home => app.cursor_position = 0,
            KeyCode::End => {
                app.cursor_position = app.store.record().text(app.selected).chars().count();
            }
            _ => {}
        }
    }

    fn paste_clipboard(app: &mut App) {
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.get_text()) {
            Ok(text) => app.insert_text(&text),
            Err(err) => {
                warn!(error = %err, "clipboard paste failed");
                app.status_message = Some(format!("Paste failed: {}", err));
            }
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.mode = AppMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }
}

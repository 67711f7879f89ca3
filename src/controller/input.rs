//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::ReleaseScope;
use super::navigation::SelectedItem;
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        // Error toast blocks everything else until dismissed
        if self.model.has_error().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.model.clear_error().await;
            }
            return Ok(());
        }

        if self.model.is_help_popup_open().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::F(1)) {
                self.model.hide_help_popup().await;
            }
            return Ok(());
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') if ctrl => {
                self.model.set_should_quit(true).await;
                return Ok(());
            }
            KeyCode::Char('r') | KeyCode::Char('R') if ctrl => {
                self.retry().await;
                return Ok(());
            }
            KeyCode::F(1) => {
                self.model.toggle_help_popup().await;
                return Ok(());
            }
            KeyCode::Up => {
                self.move_selection(-1).await;
                return Ok(());
            }
            KeyCode::Down => {
                self.move_selection(1).await;
                return Ok(());
            }
            KeyCode::PageUp => {
                self.move_selection(-10).await;
                return Ok(());
            }
            KeyCode::PageDown => {
                self.move_selection(10).await;
                return Ok(());
            }
            KeyCode::Enter => {
                match self.selected_item().await {
                    Some(SelectedItem::Artist(artist)) => self.open_artist(artist).await,
                    Some(SelectedItem::Release(release)) => self.open_release(release).await,
                    None => {}
                }
                return Ok(());
            }
            _ => {}
        }

        // Search screen: printable keys edit the query
        if self.at_search().await {
            match key.code {
                KeyCode::Esc => {
                    self.model.clear_search().await;
                    self.on_query_changed(String::new()).await;
                }
                KeyCode::Backspace => {
                    let query = self.model.backspace_search().await;
                    self.on_query_changed(query).await;
                }
                KeyCode::Char(c) if !ctrl => {
                    let query = self.model.append_to_search(c).await;
                    self.on_query_changed(query).await;
                }
                _ => {}
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Esc | KeyCode::Backspace => {
                self.navigate_back().await;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.model.set_should_quit(true).await;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.retry().await;
            }
            KeyCode::Char('?') => {
                self.model.toggle_help_popup().await;
            }
            KeyCode::Char('l') | KeyCode::Char('L') => {
                self.open_releases(ReleaseScope::All).await;
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                self.open_releases(ReleaseScope::Albums).await;
            }
            KeyCode::Char('t') | KeyCode::Char('T') => {
                self.toggle_release_scope().await;
            }
            _ => {}
        }
        Ok(())
    }
}

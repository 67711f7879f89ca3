//! Application-wide UI state with async accessors

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use super::types::UiState;

/// How long an error toast stays up without being dismissed
pub const ERROR_DISPLAY_TIME: Duration = Duration::from_secs(5);

pub struct AppModel {
    pub ui_state: Arc<Mutex<UiState>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new()
    }
}

impl AppModel {
    pub fn new() -> Self {
        Self {
            ui_state: Arc::new(Mutex::new(UiState::default())),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    // ========================================================================
    // Search input
    // ========================================================================

    pub async fn search_query(&self) -> String {
        self.ui_state.lock().await.search_query.clone()
    }

    /// Returns the query after the edit
    pub async fn append_to_search(&self, c: char) -> String {
        let mut ui_state = self.ui_state.lock().await;
        ui_state.search_query.push(c);
        ui_state.search_query.clone()
    }

    /// Returns the query after the edit
    pub async fn backspace_search(&self) -> String {
        let mut ui_state = self.ui_state.lock().await;
        ui_state.search_query.pop();
        ui_state.search_query.clone()
    }

    pub async fn clear_search(&self) {
        self.ui_state.lock().await.search_query.clear();
    }

    // ========================================================================
    // Errors and popups
    // ========================================================================

    pub async fn set_error(&self, message: String) {
        tracing::warn!(error = %message, "Showing error");
        let mut ui_state = self.ui_state.lock().await;
        ui_state.error_message = Some(message);
        ui_state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut ui_state = self.ui_state.lock().await;
        ui_state.error_message = None;
        ui_state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut ui_state = self.ui_state.lock().await;
        if let Some(shown_at) = ui_state.error_timestamp {
            if shown_at.elapsed() >= ERROR_DISPLAY_TIME {
                ui_state.error_message = None;
                ui_state.error_timestamp = None;
            }
        }
    }

    pub async fn toggle_help_popup(&self) {
        let mut ui_state = self.ui_state.lock().await;
        ui_state.show_help_popup = !ui_state.show_help_popup;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }

    pub async fn set_should_quit(&self, value: bool) {
        *self.should_quit.lock().await = value;
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }
}

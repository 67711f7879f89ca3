//! Layout rendering (top bar, key hints)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{ContentView, UiState};

pub fn render_top_bar(frame: &mut Frame, area: Rect, ui_state: &UiState, view: &ContentView) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50), // Search input
            Constraint::Percentage(50), // Where we are
        ])
        .split(area);

    let searching = matches!(view, ContentView::Search { .. });
    let search_style = if searching {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let search_text = if ui_state.search_query.is_empty() {
        "Type to search..."
    } else {
        &ui_state.search_query
    };

    let search = Paragraph::new(search_text)
        .style(search_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Artist search ")
                .padding(Padding::horizontal(1))
                .border_style(search_style),
        );
    frame.render_widget(search, chunks[0]);

    let breadcrumb = Paragraph::new(view.title())
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Discogs ")
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(breadcrumb, chunks[1]);
}

pub fn render_key_hints(frame: &mut Frame, area: Rect, view: &ContentView) {
    let hints = match view {
        ContentView::Search { .. } => " ↑/↓ select   Enter open   Esc clear   Ctrl+R retry   F1 help   Ctrl+Q quit",
        ContentView::ArtistDetail { .. } => " L releases   A albums   R retry   Esc back   ? help   Q quit",
        ContentView::Releases { .. } => " ↑/↓ select   Enter open   T albums/all   R retry   Esc back   Q quit",
        ContentView::ReleaseDetail { .. } => " ↑/↓ scroll   R retry   Esc back   ? help   Q quit",
    };
    let hints = Paragraph::new(hints).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hints, area);
}

//! Main content area rendering (search results, detail views, release lists)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Paragraph, Wrap},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{
    Artist, ArtistDetail, ContentView, DetailStatus, ListStatus, ListView, Release, ReleaseDetail,
    ReleaseKind,
};
use super::utils::{calculate_num_width, render_scrollable_list, truncate_string, year_label};

const BORDER: Style = Style::new().fg(Color::Green);

pub fn render_main_content(frame: &mut Frame, area: Rect, view: &ContentView) {
    match view {
        ContentView::Search { artists } => {
            render_list(frame, area, " Artists ", artists, artist_items);
        }
        ContentView::ArtistDetail { artist, detail } => {
            render_detail(frame, area, &artist.name, detail, render_artist_detail);
        }
        ContentView::Releases { releases, .. } => {
            render_list(frame, area, &format!(" {} ", view.title()), releases, release_items);
        }
        ContentView::ReleaseDetail {
            title,
            detail,
            scroll,
        } => {
            render_detail(frame, area, title, detail, |frame, area, detail| {
                render_release_detail(frame, area, detail, *scroll)
            });
        }
    }
}

fn message(frame: &mut Frame, area: Rect, title: &str, text: &str, color: Color) {
    let paragraph = Paragraph::new(text.to_string())
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .padding(Padding::horizontal(1))
                .border_style(BORDER),
        );
    frame.render_widget(paragraph, area);
}

fn render_list<T>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    list: &ListView<T>,
    rows: impl Fn(&[T], usize) -> Vec<ListItem<'static>>,
) {
    match &list.status {
        ListStatus::Idle(hint) => return message(frame, area, title, hint, Color::DarkGray),
        ListStatus::Loading if list.items.is_empty() => {
            return message(frame, area, title, "Loading...", Color::Yellow)
        }
        ListStatus::Empty(text) => return message(frame, area, title, text, Color::DarkGray),
        ListStatus::Error(text) => {
            return message(frame, area, title, &format!("{text}\n\nPress R to retry"), Color::Red)
        }
        _ => {}
    }

    let content_width = area.width.saturating_sub(4) as usize;
    let num_width = calculate_num_width(list.items.len());
    let mut items: Vec<ListItem> = rows(&list.items, content_width.saturating_sub(num_width + 2))
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == list.selected {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            item.style(style)
        })
        .collect();

    // Row under the last item; not selectable
    if let Some(footer) = &list.footer {
        items.push(ListItem::new(format!("  {footer}")).style(Style::default().fg(Color::Yellow)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .padding(Padding::horizontal(1))
        .border_style(BORDER);
    render_scrollable_list(frame, area, items, list.selected, block);
}

fn artist_items(artists: &[Artist], width: usize) -> Vec<ListItem<'static>> {
    let num_width = calculate_num_width(artists.len());
    artists
        .iter()
        .enumerate()
        .map(|(i, artist)| {
            ListItem::new(format!(
                "{:>num_width$}  {}",
                i + 1,
                truncate_string(&artist.name, width)
            ))
        })
        .collect()
}

fn release_items(releases: &[Release], width: usize) -> Vec<ListItem<'static>> {
    let num_width = calculate_num_width(releases.len());
    let title_width = width.saturating_sub(4 + 2 + 1 + 2);
    releases
        .iter()
        .enumerate()
        .map(|(i, release)| {
            let marker = match release.kind {
                ReleaseKind::Master => "●",
                ReleaseKind::Release | ReleaseKind::Other => " ",
            };
            ListItem::new(format!(
                "{:>num_width$}  {}  {} {}",
                i + 1,
                year_label(release.release_year),
                marker,
                truncate_string(&release.title, title_width)
            ))
        })
        .collect()
}

fn render_detail<T>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    detail: &DetailStatus<T>,
    render: impl FnOnce(&mut Frame, Rect, &T),
) {
    let title = format!(" {title} ");
    match detail {
        DetailStatus::Loading => message(frame, area, &title, "Loading...", Color::Yellow),
        DetailStatus::Error(text) => {
            message(frame, area, &title, &format!("{text}\n\nPress R to retry"), Color::Red)
        }
        DetailStatus::Ready(detail) => render(frame, area, detail),
    }
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<8}"), Style::default().fg(Color::DarkGray)),
        Span::raw(value),
    ])
}

fn render_artist_detail(frame: &mut Frame, area: Rect, detail: &ArtistDetail) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Profile
            Constraint::Length(2), // Actions
        ])
        .split(area);

    let mut lines = vec![heading(&detail.name), Line::raw("")];
    match &detail.profile {
        Some(profile) => lines.extend(profile.lines().map(|l| Line::raw(l.to_string()))),
        None => lines.push(Line::styled("No profile", Style::default().fg(Color::DarkGray))),
    }
    if !detail.members.is_empty() {
        lines.push(Line::raw(""));
        lines.push(heading("Members"));
        for member in &detail.members {
            let style = if member.active {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            lines.push(Line::styled(format!("  {}", member.name), style));
        }
    }
    if let Some(url) = &detail.image_url {
        lines.push(Line::raw(""));
        lines.push(field("Image", url.clone()));
    }

    let profile = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Artist ")
            .padding(Padding::horizontal(1))
            .border_style(BORDER),
    );
    frame.render_widget(profile, chunks[0]);

    let actions = Paragraph::new("  [L] All releases   [A] Albums only")
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(actions, chunks[1]);
}

fn render_release_detail(frame: &mut Frame, area: Rect, detail: &ReleaseDetail, scroll: usize) {
    let mut lines = vec![heading(&detail.title), Line::raw("")];
    lines.push(field("Artists", detail.artists.join(", ")));
    lines.push(field("Year", year_label(detail.release_year)));
    if !detail.genres.is_empty() {
        lines.push(field("Genres", detail.genres.join(", ")));
    }
    if !detail.styles.is_empty() {
        lines.push(field("Styles", detail.styles.join(", ")));
    }
    if !detail.labels.is_empty() {
        lines.push(field("Labels", detail.labels.join(", ")));
    }

    if !detail.tracklist.is_empty() {
        lines.push(Line::raw(""));
        lines.push(heading("Tracklist"));
        for track in &detail.tracklist {
            lines.push(Line::from(vec![
                Span::styled(format!("{:>4}  ", track.position), Style::default().fg(Color::DarkGray)),
                Span::raw(track.title.clone()),
                Span::styled(
                    track.duration.as_ref().map(|d| format!("  {d}")).unwrap_or_default(),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }
    }

    let max_scroll = lines.len().saturating_sub(1);
    let offset = scroll.min(max_scroll).min(u16::MAX as usize) as u16;
    let paragraph = Paragraph::new(lines)
        .scroll((offset, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Release ")
                .padding(Padding::horizontal(1))
                .border_style(BORDER),
        );
    frame.render_widget(paragraph, area);
}

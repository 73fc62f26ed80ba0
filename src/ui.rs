//! UI rendering for the terminal user interface.
//!
//! The session decides what is visible (selection, scroll window, status);
//! this module only lays it out with `ratatui`.

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{Mode, Pane, Popup, Session, StatusKind, ViewKind, ViewState};
use crate::audio::AudioBackend;
use crate::config::KeyBindings;
use crate::library::duration_label;

mod hints;

pub use hints::{help_text, status_hints};

/// Header, list body, input line, status line, key hints.
fn areas(area: Rect) -> [Rect; 5] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(4),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2], chunks[3], chunks[4]]
}

/// Rows a bordered list gets in a frame of this size.
pub fn list_capacity(area: Rect) -> usize {
    let body = areas(area)[1];
    usize::from(body.height.saturating_sub(2)).max(1)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn header_text<B: AudioBackend>(session: &Session<B>, now: Instant) -> String {
    let views = session.views();
    let count = match views.active {
        ViewKind::Library => session.index().len(),
        ViewKind::Queue => session.queue().len(),
        ViewKind::Albums => session.index().albums().len(),
    };

    let playback = session.playback();
    let clock = &playback.clock;
    let state = if clock.is_playing() {
        "Playing"
    } else if clock.is_paused() {
        "Paused"
    } else {
        "Stopped"
    };

    let mut parts = vec![format!("{} ({count})", views.active.label()), state.to_string()];
    if let Some(name) = session.now_playing() {
        parts.push(format!(
            "{name} [{}/{}]",
            duration_label(Some(session.elapsed(now))),
            duration_label(clock.length())
        ));
    }
    parts.push(format!("Vol {}%", (playback.volume * 100.0).round() as u32));
    parts.push(format!("Shuffle: {}", on_off(playback.shuffle)));
    parts.push(format!("Repeat: {}", on_off(playback.repeat)));
    parts.join(" • ")
}

fn on_off(flag: bool) -> &'static str {
    if flag { "ON" } else { "OFF" }
}

/// Render only the rows inside the scroll window.
fn render_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    names: &[String],
    view: ViewState,
    focused: bool,
    bold_row: Option<usize>,
) {
    let capacity = usize::from(area.height.saturating_sub(2)).max(1);
    let start = view.scroll.min(names.len());
    let end = (start + capacity).min(names.len());

    let items: Vec<ListItem> = names[start..end]
        .iter()
        .enumerate()
        .map(|(offset, name)| {
            let item = ListItem::new(name.as_str());
            if bold_row == Some(start + offset) {
                item.style(Style::default().add_modifier(Modifier::BOLD))
            } else {
                item
            }
        })
        .collect();

    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(format!(" {title} ")),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if view.selected >= start && view.selected < end {
        state.select(Some(view.selected - start));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_body<B: AudioBackend>(frame: &mut Frame, area: Rect, session: &Session<B>) {
    let views = session.views();

    if let Mode::Search(search) = session.mode() {
        let names = session.active_names();
        let results: Vec<String> = search
            .results
            .iter()
            .filter_map(|&i| names.get(i).cloned())
            .collect();
        let capacity = usize::from(area.height.saturating_sub(2)).max(1);
        let view = ViewState {
            selected: search.cursor,
            scroll: (search.cursor + 1).saturating_sub(capacity),
        };
        let title = format!("{} search ({})", views.active.label(), results.len());
        render_list(frame, area, &title, &results, view, true, None);
        return;
    }

    match views.active {
        ViewKind::Library => {
            let playing = session
                .playback()
                .current
                .as_deref()
                .and_then(|p| session.index().position(p));
            let names = session.active_names();
            render_list(frame, area, "library", &names, views.library, true, playing);
        }
        ViewKind::Queue => {
            let names = session.active_names();
            let cursor = session.queue().cursor().checked_sub(1);
            render_list(frame, area, "queue", &names, views.queue, true, cursor);
        }
        ViewKind::Albums => {
            let panes = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(area);
            let album = &views.album;
            let albums = session.active_names();
            let tracks = session.album_track_names();
            render_list(
                frame,
                panes[0],
                "albums",
                &albums,
                album.albums,
                album.pane == Pane::Albums,
                None,
            );
            render_list(
                frame,
                panes[1],
                "tracks",
                &tracks,
                album.tracks,
                album.pane == Pane::Tracks,
                None,
            );
        }
    }
}

fn input_line<B: AudioBackend>(session: &Session<B>) -> String {
    match session.mode() {
        Mode::Normal => String::new(),
        Mode::CommandEntry { buffer } => buffer.clone(),
        Mode::Search(search) => format!("/{}", search.query),
        Mode::QuitConfirm => "Quit? (y/n)".to_string(),
    }
}

fn draw_popup(frame: &mut Frame, area: Rect, title: &str, text: String, width: u16, height: u16) {
    let popup_area = centered_rect_sized(width, height, area);
    frame.render_widget(Clear, popup_area);
    let popup = Paragraph::new(text)
        .block(
            Block::default()
                .padding(Padding {
                    left: 1,
                    right: 1,
                    top: 0,
                    bottom: 0,
                })
                .borders(Borders::ALL)
                .title(format!(" {title} "))
                .title_alignment(Alignment::Center),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(popup, popup_area);
}

/// Render the whole session into `frame`.
pub fn draw<B: AudioBackend>(
    frame: &mut Frame,
    session: &Session<B>,
    keys: &KeyBindings,
    now: Instant,
) {
    let full = frame.area();
    let [header_area, body_area, input_area, status_area, hints_area] = areas(full);

    let header = Paragraph::new(header_text(session, now))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" muse ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, header_area);

    draw_body(frame, body_area, session);

    frame.render_widget(Paragraph::new(input_line(session)), input_area);

    if let Some(status) = session.status() {
        let style = match status.kind {
            StatusKind::Info => Style::default(),
            StatusKind::Error => Style::default().fg(Color::Red),
        };
        frame.render_widget(Paragraph::new(status.text.as_str()).style(style), status_area);
    }

    let footer = Paragraph::new(status_hints(keys))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, hints_area);

    match session.popup() {
        Some(Popup::Help) => {
            let text = help_text(keys);
            let height = text.lines().count() as u16 + 2;
            draw_popup(frame, full, "help (any key closes)", text, 60, height);
        }
        Some(Popup::Version) => {
            let text = format!(
                "Muse v{} - Press any key to continue",
                env!("CARGO_PKG_VERSION")
            );
            draw_popup(frame, full, "version", text, 48, 5);
        }
        None => {}
    }
}

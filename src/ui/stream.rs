//! Streaming playback view
//!
//! Player surface, source list, simulated ad overlay, and the in-player
//! error overlay offering alternate sources.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::app::StreamState;
use crate::player::PlayerState;
use crate::ui::Theme;

pub fn render(frame: &mut Frame, area: Rect, stream: &StreamState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),    // Player surface
            Constraint::Length(8), // Sources
        ])
        .split(area);

    render_player(frame, chunks[0], stream);
    render_sources(frame, chunks[1], stream);

    if stream.player.ad_visible() {
        render_ad_overlay(frame, area);
    }

    if let PlayerState::Error(message) = stream.player.state() {
        render_error_overlay(frame, area, stream, message);
    }
}

fn render_player(frame: &mut Frame, area: Rect, stream: &StreamState) {
    let player = &stream.player;
    let source_label = player
        .current_source()
        .map(|s| format!(" Watch: {} · {} ", stream.item.title, s))
        .unwrap_or_else(|| format!(" Watch: {} ", stream.item.title));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border_focused())
        .title(Span::styled(source_label, Theme::title()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = vec![Line::from("")];

    match player.state() {
        PlayerState::Loading => {
            let name = player
                .current_source()
                .map(|s| s.name.clone())
                .unwrap_or_default();
            lines.push(Line::from(Span::styled(
                format!("⟳ Loading stream from {}...", name),
                Theme::loading(),
            )));
            lines.push(Line::from(Span::styled(
                "Please wait while we connect to the streaming server",
                Theme::dimmed(),
            )));
        }
        PlayerState::Ready => {
            lines.push(Line::from(Span::styled(
                "Ready - press SPACE to play",
                Theme::text(),
            )));
        }
        PlayerState::Playing | PlayerState::Paused => {
            lines.push(Line::from(Span::styled(
                player.state().to_string(),
                if *player.state() == PlayerState::Playing {
                    Theme::success()
                } else {
                    Theme::warning()
                },
            )));
            lines.push(Line::from(""));

            if let Some(native) = &player.native {
                let filled = (native.progress() * 40.0) as usize;
                let empty = 40usize.saturating_sub(filled);
                let pos = native.position.as_secs();
                let dur = native.duration.as_secs();

                lines.push(Line::from(format!(
                    "{}{}",
                    "█".repeat(filled),
                    "░".repeat(empty)
                )));
                lines.push(Line::from(Span::styled(
                    format!(
                        "{:02}:{:02}:{:02} / {:02}:{:02}:{:02}",
                        pos / 3600,
                        (pos % 3600) / 60,
                        pos % 60,
                        dur / 3600,
                        (dur % 3600) / 60,
                        dur % 60
                    ),
                    Theme::dimmed(),
                )));
                lines.push(Line::from(Span::styled(
                    format!("Volume: {:.0}%  Rate: {:.2}x", native.volume * 100.0, native.rate),
                    Theme::dimmed(),
                )));
            } else {
                // Embedded source: the provider runs the transport
                lines.push(Line::from(Span::styled(
                    "Playback delegated to the provider",
                    Theme::dimmed(),
                )));
            }
        }
        PlayerState::Ended => {
            lines.push(Line::from(Span::styled("Playback ended", Theme::dimmed())));
            lines.push(Line::from(Span::styled(
                "Pick another source below to watch again",
                Theme::dimmed(),
            )));
        }
        PlayerState::Error(_) => {
            // The overlay covers this surface
        }
    }

    if player.controls_visible() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(" SPACE ", Theme::keybind()),
            Span::styled(" Play/Pause ", Theme::dimmed()),
            Span::styled(" ←→ ", Theme::keybind()),
            Span::styled(" Seek ", Theme::dimmed()),
            Span::styled(" ↑↓ ", Theme::keybind()),
            Span::styled(" Volume ", Theme::dimmed()),
            Span::styled(" 1-9 ", Theme::keybind()),
            Span::styled(" Source ", Theme::dimmed()),
            Span::styled(" r ", Theme::keybind()),
            Span::styled(" Retry ", Theme::dimmed()),
        ]));
    }

    let para = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(para, inner);
}

fn render_sources(frame: &mut Frame, area: Rect, stream: &StreamState) {
    let player = &stream.player;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(
            format!(" SOURCES ({}) ", player.sources().len()),
            Theme::title(),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if player.sources().is_empty() {
        let empty = Paragraph::new("No streaming sources are available for this title.")
            .style(Theme::dimmed())
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let items: Vec<ListItem> = player
        .sources()
        .iter()
        .enumerate()
        .map(|(i, source)| {
            let is_selected = i == player.selected_index();
            let marker = if is_selected { "▸ " } else { "  " };
            let mode = if source.is_native { "native" } else { "embed" };

            let mut spans = vec![
                Span::styled(
                    format!("{}{}. ", marker, i + 1),
                    if is_selected {
                        Theme::accent()
                    } else {
                        Theme::dimmed()
                    },
                ),
                Span::styled(
                    source.name.clone(),
                    if is_selected {
                        Theme::highlighted()
                    } else {
                        Theme::text()
                    },
                ),
                Span::raw(" "),
                Span::styled(format!("({})", source.quality), Theme::secondary()),
                Span::raw(" "),
                Span::styled(format!("[{}]", mode), Theme::dimmed()),
            ];
            if is_selected {
                spans.push(Span::styled("  Active", Theme::success()));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).style(Theme::text());
    frame.render_widget(list, inner);
}

/// Simulated ad overlay (auto-dismisses; x closes it early)
fn render_ad_overlay(frame: &mut Frame, area: Rect) {
    let popup = centered_popup(area, 50, 7);
    frame.render_widget(Clear, popup);

    let ad = Paragraph::new(vec![
        Line::from(Span::styled("ADVERTISEMENT", Theme::dimmed())),
        Line::from(""),
        Line::from(Span::styled(
            "Enjoy ad-free streaming",
            ratatui::style::Style::default()
                .fg(Theme::PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Upgrade to StreamVibe Premium to remove ads",
            Theme::text(),
        )),
        Line::from(""),
        Line::from(Span::styled("press x to dismiss", Theme::dimmed())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border())
            .style(ratatui::style::Style::default().bg(Theme::PANEL)),
    );

    frame.render_widget(ad, popup);
}

/// In-player failure overlay with the alternate sources as recovery
fn render_error_overlay(frame: &mut Frame, area: Rect, stream: &StreamState, message: &str) {
    let popup = centered_popup(area, 60, 9);
    frame.render_widget(Clear, popup);

    let alternates = stream.player.alternates();
    let mut lines = vec![
        Line::from(Span::styled("Playback Issue", Theme::error())),
        Line::from(Span::styled(message.to_string(), Theme::text())),
        Line::from(""),
    ];

    if alternates.is_empty() {
        lines.push(Line::from(Span::styled(
            "Press r to retry this source",
            Theme::dimmed(),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Try another source:",
            Theme::dimmed(),
        )));
        for (idx, source) in alternates.iter().take(4) {
            lines.push(Line::from(vec![
                Span::styled(format!(" {} ", idx + 1), Theme::keybind()),
                Span::raw(" "),
                Span::styled(source.name.clone(), Theme::text()),
                Span::styled(format!(" ({})", source.quality), Theme::secondary()),
            ]));
        }
    }

    let overlay = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Theme::error())
            .title(Span::styled(" ⚠ ERROR ", Theme::error()))
            .style(ratatui::style::Style::default().bg(Theme::PANEL)),
    );

    frame.render_widget(overlay, popup);
}

fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

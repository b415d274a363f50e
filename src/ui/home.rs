//! Home screen: hero carousel plus catalog rows

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::Theme;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Hero carousel
            Constraint::Min(1),    // Catalog rows
        ])
        .split(area);

    render_hero(frame, chunks[0], app);
    render_rows(frame, chunks[1], app);
}

/// Hero carousel: one trending title at a time, auto-advancing
fn render_hero(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(" FEATURED ", Theme::title()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(item) = app.home.hero_item() else {
        let empty = Paragraph::new("Loading featured titles...")
            .style(Theme::loading())
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    };

    let dots: String = (0..app.home.hero.len())
        .map(|i| if i == app.home.hero_index { "●" } else { "○" })
        .collect::<Vec<_>>()
        .join(" ");

    let overview: String = item.overview.chars().take(160).collect();

    let content = vec![
        Line::from(vec![
            Span::styled(
                item.title.clone(),
                ratatui::style::Style::default()
                    .fg(Theme::PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                item.year().map(|y| format!("  ({})", y)).unwrap_or_default(),
                Theme::dimmed(),
            ),
            Span::raw("  "),
            Span::styled(
                format!("★ {:.1}", item.vote_average),
                Theme::rating(item.vote_average),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(overview, Theme::text())),
        Line::from(""),
        Line::from(Span::styled(dots, Theme::secondary())),
    ];

    let para = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(para, inner);
}

/// Titled catalog rows with a horizontal selection each
fn render_rows(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(" BROWSE ", Theme::title()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.home.loading.is_loading() {
        let loading = Paragraph::new("⟳ Loading catalog...")
            .style(Theme::loading())
            .alignment(Alignment::Center);
        frame.render_widget(loading, inner);
        return;
    }

    if app.home.rows.is_empty() {
        let empty = Paragraph::new("No catalog rows available")
            .style(Theme::dimmed())
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let mut lines = Vec::new();
    for (row_idx, (title, items)) in app.home.rows.iter().enumerate() {
        let row_selected = row_idx == app.home.selected_row;

        lines.push(Line::from(Span::styled(
            title.clone(),
            if row_selected {
                Theme::title()
            } else {
                Theme::dimmed()
            },
        )));

        let mut spans = Vec::new();
        for (col_idx, item) in items.iter().take(8).enumerate() {
            let selected = row_selected && col_idx == app.home.selected_col;
            let label = format!(" {} ", truncate(&item.title, 18));
            spans.push(Span::styled(
                label,
                if selected {
                    Theme::highlighted()
                } else {
                    Theme::text()
                },
            ));
            spans.push(Span::raw(" "));
        }
        if spans.is_empty() {
            spans.push(Span::styled("(empty)", Theme::dimmed()));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled(" ↑↓←→ ", Theme::keybind()),
        Span::styled(" Navigate  ", Theme::dimmed()),
        Span::styled(" ↵ ", Theme::keybind()),
        Span::styled(" Open  ", Theme::dimmed()),
        Span::styled(" / ", Theme::keybind()),
        Span::styled(" Search ", Theme::dimmed()),
    ]));

    let para = Paragraph::new(lines);
    frame.render_widget(para, inner);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

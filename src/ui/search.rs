//! Search results view

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::MediaType;
use crate::ui::Theme;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let results = app.search.filtered();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(
            format!(
                " RESULTS ({}) · {} ",
                results.len(),
                app.search.filter.label()
            ),
            Theme::title(),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.search.loading.is_loading() {
        let loading = Paragraph::new("⟳ Searching...")
            .style(Theme::loading())
            .alignment(Alignment::Center);
        frame.render_widget(loading, inner);
        return;
    }

    if results.is_empty() {
        let empty = Paragraph::new(if app.search.query.is_empty() {
            "Type to search for movies and TV shows..."
        } else {
            "No results found"
        })
        .style(Theme::dimmed())
        .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let items: Vec<ListItem> = results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            let is_selected = i == app.search.list.selected;
            let marker = if is_selected { "▸ " } else { "  " };
            let type_str = match result.media_type {
                MediaType::Movie => "MOVIE",
                MediaType::Tv => "TV",
            };

            let line = Line::from(vec![
                Span::styled(
                    marker,
                    if is_selected {
                        Theme::accent()
                    } else {
                        Theme::dimmed()
                    },
                ),
                Span::styled(
                    result.title.clone(),
                    if is_selected {
                        Theme::highlighted()
                    } else {
                        Theme::text()
                    },
                ),
                Span::styled(
                    result.year().map(|y| format!(" ({})", y)).unwrap_or_default(),
                    Theme::dimmed(),
                ),
                Span::raw(" "),
                Span::styled(format!("[{}]", type_str), Theme::secondary()),
                Span::raw(" "),
                Span::styled(
                    format!("★ {:.1}", result.vote_average),
                    Theme::rating(result.vote_average),
                ),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).style(Theme::text());
    frame.render_widget(list, inner);
}

//! Detail view for a movie or TV show

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::DetailState;
use crate::models::MediaType;
use crate::ui::Theme;

pub fn render(frame: &mut Frame, area: Rect, detail: &DetailState) {
    let item = &detail.item;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(format!(" {} ", item.title), Theme::title()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(inner);

    render_main(frame, chunks[0], detail);
    render_similar(frame, chunks[1], detail);
}

fn render_main(frame: &mut Frame, area: Rect, detail: &DetailState) {
    let item = &detail.item;

    let genres = item
        .genres
        .iter()
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let heart = if detail.in_watchlist {
        Span::styled("♥ In My List", Theme::accent())
    } else {
        Span::styled("♡ Add to My List (w)", Theme::dimmed())
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                item.year().map(|y| y.to_string()).unwrap_or_default(),
                Theme::dimmed(),
            ),
            Span::raw("  "),
            Span::styled(
                format!("★ {:.1}", item.vote_average),
                Theme::rating(item.vote_average),
            ),
            Span::raw("  "),
            Span::styled(item.format_runtime(), Theme::dimmed()),
            Span::raw("  "),
            Span::styled(format!("[{}]", item.media_type), Theme::secondary()),
        ]),
        Line::from(Span::styled(genres, Theme::secondary())),
        Line::from(""),
    ];

    if let Some(tagline) = &item.tagline {
        lines.push(Line::from(Span::styled(
            format!("\"{}\"", tagline),
            Theme::dimmed(),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(item.overview.clone(), Theme::text())));
    lines.push(Line::from(""));
    lines.push(Line::from(heart));
    lines.push(Line::from(""));

    if let Some(trailer) = item.trailers().first() {
        lines.push(Line::from(vec![
            Span::styled("Trailer: ", Theme::dimmed()),
            Span::styled(trailer.name.clone(), Theme::text()),
        ]));
    }

    if let Some(credits) = &item.credits {
        let cast = credits
            .cast
            .iter()
            .take(5)
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        if !cast.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("Cast: ", Theme::dimmed()),
                Span::styled(cast, Theme::text()),
            ]));
        }
    }

    if !item.reviews.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Reviews", Theme::title())));
        for review in item.reviews.iter().take(2) {
            let excerpt: String = review.content.chars().take(120).collect();
            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", review.author), Theme::secondary()),
                Span::styled(excerpt, Theme::dimmed()),
            ]));
        }
    }

    lines.push(Line::from(""));
    if item.media_type == MediaType::Movie {
        lines.push(Line::from(vec![
            Span::styled(" ↵ ", Theme::keybind()),
            Span::styled(" Watch now  ", Theme::dimmed()),
            Span::styled(" w ", Theme::keybind()),
            Span::styled(" My List  ", Theme::dimmed()),
            Span::styled(" ESC ", Theme::keybind()),
            Span::styled(" Back ", Theme::dimmed()),
        ]));
    } else {
        lines.push(Line::from(vec![
            Span::styled(" w ", Theme::keybind()),
            Span::styled(" My List  ", Theme::dimmed()),
            Span::styled(" ESC ", Theme::keybind()),
            Span::styled(" Back ", Theme::dimmed()),
        ]));
    }

    let para = Paragraph::new(lines).wrap(Wrap { trim: true });
    frame.render_widget(para, area);
}

fn render_similar(frame: &mut Frame, area: Rect, detail: &DetailState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(" SIMILAR ", Theme::title()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if detail.similar.is_empty() {
        let empty = Paragraph::new("No similar titles")
            .style(Theme::dimmed())
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let lines: Vec<Line> = detail
        .similar
        .iter()
        .take(inner.height as usize)
        .enumerate()
        .map(|(i, item)| {
            let is_selected = i == detail.similar_list.selected;
            let marker = if is_selected { "▸ " } else { "  " };
            Line::from(vec![
                Span::styled(
                    marker,
                    if is_selected {
                        Theme::accent()
                    } else {
                        Theme::dimmed()
                    },
                ),
                Span::styled(
                    item.title.clone(),
                    if is_selected {
                        Theme::highlighted()
                    } else {
                        Theme::text()
                    },
                ),
                Span::styled(
                    item.year().map(|y| format!(" ({})", y)).unwrap_or_default(),
                    Theme::dimmed(),
                ),
            ])
        })
        .collect();

    let para = Paragraph::new(lines);
    frame.render_widget(para, inner);
}

//! Movie/TV browse grid with genre filter

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::BrowseState;
use crate::ui::Theme;

pub fn render(frame: &mut Frame, area: Rect, browse: &BrowseState) {
    let filter_label = browse
        .genre_name()
        .map(|g| format!(" {} · {} ", browse.media, g))
        .unwrap_or_else(|| format!(" {} · Popular ", browse.media));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(filter_label.to_uppercase(), Theme::title()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if browse.loading.is_loading() {
        let loading = Paragraph::new("⟳ Loading...")
            .style(Theme::loading())
            .alignment(Alignment::Center);
        frame.render_widget(loading, inner);
        return;
    }

    if browse.items.is_empty() {
        let empty = Paragraph::new("Nothing here yet")
            .style(Theme::dimmed())
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let visible = inner.height as usize;
    let mut list_state = browse.list.clone();
    list_state.scroll_into_view(visible);

    let items: Vec<ListItem> = browse
        .items
        .iter()
        .enumerate()
        .skip(list_state.offset)
        .take(visible)
        .map(|(i, item)| {
            let is_selected = i == browse.list.selected;
            let marker = if is_selected { "▸ " } else { "  " };

            let genres = item
                .genres
                .iter()
                .take(3)
                .map(|g| g.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");

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
                Span::raw(" "),
                Span::styled(
                    format!("★ {:.1}", item.vote_average),
                    Theme::rating(item.vote_average),
                ),
                Span::raw("  "),
                Span::styled(genres, Theme::dimmed()),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).style(Theme::text());
    frame.render_widget(list, inner);
}

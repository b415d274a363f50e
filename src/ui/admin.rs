//! Admin dashboard: tabbed mock tables behind the role gate

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{AdminTab, App, ADMIN_MOCK_TITLES, ADMIN_MOCK_USERS};
use crate::ui::Theme;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(" ADMIN DASHBOARD ", Theme::title()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Tabs + identity
            Constraint::Min(1),    // Tab content
        ])
        .split(inner);

    render_tabs(frame, chunks[0], app);
    render_tab_content(frame, chunks[1], app);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();
    for tab in AdminTab::ALL {
        let label = format!(" {} ", tab.label());
        spans.push(if tab == app.admin.tab {
            Span::styled(label, Theme::highlighted())
        } else {
            Span::styled(label, Theme::dimmed())
        });
        spans.push(Span::raw(" "));
    }

    let identity = app
        .session
        .as_ref()
        .map(|s| format!("{} <{}>", s.name, s.email))
        .unwrap_or_default();

    let lines = vec![
        Line::from(spans),
        Line::from(Span::styled(identity, Theme::dimmed())),
    ];

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_tab_content(frame: &mut Frame, area: Rect, app: &App) {
    match app.admin.tab {
        AdminTab::Dashboard => render_dashboard(frame, area),
        AdminTab::Movies | AdminTab::TvShows => render_titles_table(frame, area, app),
        AdminTab::Users => render_users_table(frame, area, app),
        AdminTab::Settings => render_settings(frame, area),
    }
}

fn render_dashboard(frame: &mut Frame, area: Rect) {
    let published = ADMIN_MOCK_TITLES
        .iter()
        .filter(|(_, status, _, _)| *status == "Published")
        .count();
    let total_views: u32 = ADMIN_MOCK_TITLES.iter().map(|(_, _, views, _)| views).sum();

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Titles: ", Theme::dimmed()),
            Span::styled(ADMIN_MOCK_TITLES.len().to_string(), Theme::text()),
            Span::styled("   Published: ", Theme::dimmed()),
            Span::styled(published.to_string(), Theme::success()),
            Span::styled("   Subscribers: ", Theme::dimmed()),
            Span::styled(ADMIN_MOCK_USERS.len().to_string(), Theme::text()),
            Span::styled("   Total views: ", Theme::dimmed()),
            Span::styled(total_views.to_string(), Theme::text()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Demo data only; no live metrics are wired up.",
            Theme::dimmed(),
        )),
    ];

    let para = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(para, area);
}

fn render_titles_table(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = ADMIN_MOCK_TITLES
        .iter()
        .enumerate()
        .map(|(i, (title, status, views, rating))| {
            let is_selected = i == app.admin.list.selected;
            let marker = if is_selected { "▸ " } else { "  " };

            let status_style = if *status == "Published" {
                Theme::success()
            } else {
                Theme::warning()
            };

            ListItem::new(Line::from(vec![
                Span::styled(
                    marker,
                    if is_selected {
                        Theme::accent()
                    } else {
                        Theme::dimmed()
                    },
                ),
                Span::styled(
                    format!("{:24}", title),
                    if is_selected {
                        Theme::highlighted()
                    } else {
                        Theme::text()
                    },
                ),
                Span::styled(format!("{:10}", status), status_style),
                Span::styled(format!("{:>8} views  ", views), Theme::dimmed()),
                Span::styled(format!("{:.1}", rating), Theme::secondary()),
            ]))
        })
        .collect();

    let list = List::new(items).style(Theme::text());
    frame.render_widget(list, area);
}

fn render_users_table(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = ADMIN_MOCK_USERS
        .iter()
        .enumerate()
        .map(|(i, (name, email, plan, joined))| {
            let is_selected = i == app.admin.list.selected;
            let marker = if is_selected { "▸ " } else { "  " };

            ListItem::new(Line::from(vec![
                Span::styled(
                    marker,
                    if is_selected {
                        Theme::accent()
                    } else {
                        Theme::dimmed()
                    },
                ),
                Span::styled(
                    format!("{:16}", name),
                    if is_selected {
                        Theme::highlighted()
                    } else {
                        Theme::text()
                    },
                ),
                Span::styled(format!("{:24}", email), Theme::dimmed()),
                Span::styled(format!("{:8}", plan), Theme::secondary()),
                Span::styled(format!("joined {}", joined), Theme::dimmed()),
            ]))
        })
        .collect();

    let list = List::new(items).style(Theme::text());
    frame.render_widget(list, area);
}

fn render_settings(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Settings are managed in ~/.config/streamvibe/config.toml",
            Theme::dimmed(),
        )),
    ];
    let para = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(para, area);
}

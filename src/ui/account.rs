//! Account screens: sign-in form, my-list, and the auth error page

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, SignInField};
use crate::auth::AuthError;
use crate::ui::Theme;

// =============================================================================
// Sign-In
// =============================================================================

pub fn render_sign_in(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border_focused())
        .title(Span::styled(" SIGN IN ", Theme::title()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let form = &app.sign_in;
    let email_focused = form.focus == SignInField::Email;

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("Welcome back to StreamVibe", Theme::text())),
        Line::from(""),
    ];

    if let Some(callback) = &form.callback {
        lines.push(Line::from(Span::styled(
            format!("Sign in to continue to {}", callback),
            Theme::dimmed(),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled(
            if email_focused { "▸ Email    " } else { "  Email    " },
            if email_focused {
                Theme::accent()
            } else {
                Theme::dimmed()
            },
        ),
        Span::styled(
            if form.email.is_empty() && !email_focused {
                "you@example.com".to_string()
            } else if email_focused {
                format!("{}│", form.email)
            } else {
                form.email.clone()
            },
            if email_focused {
                Theme::input().fg(Theme::PRIMARY)
            } else {
                Theme::input()
            },
        ),
    ]));

    let masked = "•".repeat(form.password.chars().count());
    lines.push(Line::from(vec![
        Span::styled(
            if email_focused { "  Password " } else { "▸ Password " },
            if email_focused {
                Theme::dimmed()
            } else {
                Theme::accent()
            },
        ),
        Span::styled(
            if email_focused {
                masked
            } else {
                format!("{}│", masked)
            },
            Theme::input(),
        ),
    ]));

    lines.push(Line::from(""));

    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(error.clone(), Theme::error())));
        lines.push(Line::from(Span::styled(
            "Tip: demo credentials are user@example.com / password123",
            Theme::dimmed(),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled(" TAB ", Theme::keybind()),
        Span::styled(" Switch field  ", Theme::dimmed()),
        Span::styled(" ↵ ", Theme::keybind()),
        Span::styled(" Sign in  ", Theme::dimmed()),
        Span::styled(" ESC ", Theme::keybind()),
        Span::styled(" Cancel ", Theme::dimmed()),
    ]));

    let para = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(para, inner);
}

// =============================================================================
// My List
// =============================================================================

pub fn render_my_list(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(
            format!(" MY LIST ({}) ", app.my_list.entries.len()),
            Theme::title(),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.my_list.entries.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("Your list is empty", Theme::text())),
            Line::from(Span::styled(
                "Start adding movies and TV shows to your list",
                Theme::dimmed(),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let items: Vec<ListItem> = app
        .my_list
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let is_selected = i == app.my_list.list.selected;
            let marker = if is_selected { "▸ " } else { "  " };

            let line = Line::from(vec![
                Span::styled(
                    marker,
                    if is_selected {
                        Theme::accent()
                    } else {
                        Theme::dimmed()
                    },
                ),
                Span::styled("♥ ", Theme::accent()),
                Span::styled(
                    entry.title.clone(),
                    if is_selected {
                        Theme::highlighted()
                    } else {
                        Theme::text()
                    },
                ),
                Span::raw(" "),
                Span::styled(format!("[{}]", entry.media_type), Theme::secondary()),
                Span::raw(" "),
                Span::styled(
                    format!("added {}", entry.added_at.format("%Y-%m-%d")),
                    Theme::dimmed(),
                ),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).style(Theme::text());
    frame.render_widget(list, inner);
}

// =============================================================================
// Auth Error
// =============================================================================

pub fn render_auth_error(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Theme::error())
        .title(Span::styled(" AUTHENTICATION ERROR ", Theme::error()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let code = app.auth_error.code.as_deref().unwrap_or("unknown");
    let message = AuthError::message_for_code(code);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(message, Theme::text())),
        Line::from(""),
    ];

    if code == "CredentialsSignin" {
        lines.push(Line::from(Span::styled(
            "Tip: demo credentials are user@example.com / password123",
            Theme::dimmed(),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled(" ↵ ", Theme::keybind()),
        Span::styled(" Back to sign in  ", Theme::dimmed()),
        Span::styled(" h ", Theme::keybind()),
        Span::styled(" Home ", Theme::dimmed()),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Error code: {}", code),
        Theme::dimmed(),
    )));

    let para = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(para, inner);
}

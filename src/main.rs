//! StreamVibe - terminal front-end for the StreamVibe movie & TV catalog
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! streamvibe
//!
//! # CLI mode (for automation)
//! streamvibe search "blade runner"
//! streamvibe sources 550 --quality hd
//! streamvibe list add 550
//! ```

use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use streamvibe::api::{MetadataClient, SourceProvider, SyntheticSourceProvider};
use streamvibe::app::{App, AppState, Effect, InputMode};
use streamvibe::auth::{AuthError, Authenticator};
use streamvibe::cli::{Cli, Command, ExitCode, Output};
use streamvibe::commands;
use streamvibe::config::Config;
use streamvibe::models::{MediaType, SourceQuality};
use streamvibe::routes::Route;
use streamvibe::store::LocalStore;
use streamvibe::ui::{self, Theme};

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    if cli.is_cli_mode() {
        init_cli_logging();
        let exit_code = run_cli(cli, &config).await;
        std::process::exit(exit_code.into());
    } else {
        // TUI mode: route logs to a file so the alternate screen stays clean
        init_tui_logging();
        run_tui(&config).await
    }
}

/// Stderr logging for CLI mode
fn init_cli_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("streamvibe=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

/// File logging for TUI mode (<data_dir>/streamvibe/streamvibe.log)
fn init_tui_logging() {
    let Some(dir) = dirs::data_dir().map(|p| p.join("streamvibe")) else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }

    let appender = RollingFileAppender::new(Rotation::NEVER, dir, "streamvibe.log");
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("streamvibe=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(appender),
        )
        .init();
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli, config: &Config) -> ExitCode {
    let output = Output::new(&cli);

    match cli.command {
        Some(Command::Search(cmd)) => commands::search_cmd(cmd, config, &output).await,
        Some(Command::Trending(cmd)) => commands::trending_cmd(cmd, config, &output).await,
        Some(Command::Popular(cmd)) => commands::popular_cmd(cmd, config, &output).await,
        Some(Command::Info(cmd)) => commands::info_cmd(cmd, config, &output).await,
        Some(Command::Sources(cmd)) => commands::sources_cmd(cmd, config, &output),
        Some(Command::List(cmd)) => commands::list_cmd(cmd, config, &output).await,
        Some(Command::Login(cmd)) => commands::login_cmd(cmd, config, &output),
        Some(Command::Logout(cmd)) => commands::logout_cmd(cmd, &output),
        Some(Command::Whoami(cmd)) => commands::whoami_cmd(cmd, config, &output),
        None => ExitCode::Success,
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui(config: &Config) -> Result<()> {
    let client = MetadataClient::new(config.tmdb_api_key());
    let sources = SyntheticSourceProvider::new();
    let auth = Authenticator::new(config.auth_secret());
    let preferred = config.preferred_source_quality();

    let mut app = App::new();
    app.store = LocalStore::open();

    // Restore the persisted session; expired or tampered tokens read as
    // signed out
    if let Some(store) = &app.store {
        if let Some(token) = store.load_session_token() {
            match auth.validate(&token, Utc::now()) {
                Ok(session) => app.session = Some(session),
                Err(_) => {
                    let _ = store.clear_session();
                }
            }
        }
    }

    app.navigate_route(Route::Home, Utc::now());

    let mut terminal = init_terminal()?;
    let result = run_event_loop(&mut terminal, &mut app, &client, &sources, &auth, preferred).await;
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop - handles input, updates state, renders UI
async fn run_event_loop(
    terminal: &mut Tui,
    app: &mut App,
    client: &MetadataClient,
    sources: &SyntheticSourceProvider,
    auth: &Authenticator,
    preferred: Option<SourceQuality>,
) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    while app.running {
        terminal.draw(|frame| render_ui(frame, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key, Instant::now(), Utc::now());
                }
            }
        }

        app.tick(Instant::now());

        for effect in app.take_effects() {
            run_effect(effect, app, client, sources, auth, preferred).await;
        }
    }

    Ok(())
}

/// Execute one queued async effect and feed the result back into the app
async fn run_effect(
    effect: Effect,
    app: &mut App,
    client: &MetadataClient,
    sources: &SyntheticSourceProvider,
    auth: &Authenticator,
    preferred: Option<SourceQuality>,
) {
    match effect {
        Effect::LoadHome => {
            let trending = client.trending(MediaType::Movie).await;
            let popular = client.popular(MediaType::Movie).await;
            let action = client.by_genre(MediaType::Movie, 28).await;
            app.set_home(trending, popular, action);
        }
        Effect::LoadBrowse(media, genre) => {
            let items = match genre {
                Some(genre_id) => client.by_genre(media, genre_id).await,
                None => client.popular(media).await,
            };
            app.set_browse(media, items);
        }
        Effect::RunSearch(query) => {
            // Both catalogs, merged and ranked by rating. A superseded
            // response can still land here and overwrite newer results.
            let mut results = client.search(MediaType::Movie, &query).await;
            results.extend(client.search(MediaType::Tv, &query).await);
            results.sort_by(|a, b| {
                b.vote_average
                    .partial_cmp(&a.vote_average)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            app.set_search_results(results);
        }
        Effect::LoadDetail(media, id) => {
            let item = client.details(media, id).await;
            let similar = client.similar(media, id).await;
            app.open_detail(item, similar);
        }
        Effect::LoadStream(id) => {
            let item = client.details(MediaType::Movie, id).await;
            let mut resolved = sources.sources_for(id);
            // Preferred-quality sources float to the front; the player
            // starts on the first one
            if let Some(pref) = preferred {
                resolved.sort_by_key(|s| s.quality != pref);
            }
            app.open_stream(item, resolved, Instant::now());

            // The demo transport connects instantly; a real player would
            // signal readiness from its media callbacks
            if let Some(stream) = &mut app.stream {
                let runtime = stream.item.runtime.unwrap_or(120);
                stream.player.ready(
                    Some(Duration::from_secs(u64::from(runtime) * 60)),
                    Instant::now(),
                );
            }
        }
        Effect::SignInCredentials { email, password } => {
            match auth.sign_in(&email, &password, Utc::now()) {
                Ok(issued) => app.sign_in_succeeded(issued.session, &issued.token, Utc::now()),
                Err(e @ AuthError::InvalidCredentials) => app.sign_in_failed(e.to_string()),
                Err(e) => {
                    app.navigate_route(
                        Route::AuthError {
                            code: Some(e.code().to_string()),
                        },
                        Utc::now(),
                    );
                }
            }
        }
    }
}

// =============================================================================
// UI Rendering
// =============================================================================

/// Main render function - dispatches to view-specific renderers
fn render_ui(frame: &mut Frame, app: &App) {
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(ratatui::style::Style::default().bg(Theme::BACKGROUND)),
        area,
    );

    // Main layout: header, content, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, chunks[0], app);
    render_content(frame, chunks[1], app);
    render_status_bar(frame, chunks[2], app);

    if let Some(ref error) = app.error {
        render_error_popup(frame, area, error);
    }
}

/// Render the header with brand mark and search box
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(20), // Brand
            Constraint::Min(1),     // Search box
        ])
        .split(area);

    let brand = Paragraph::new(Line::from(vec![
        Span::styled(
            "STREAM",
            ratatui::style::Style::default()
                .fg(Theme::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "VIBE",
            ratatui::style::Style::default()
                .fg(Theme::SECONDARY)
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(brand, header_chunks[0]);

    let editing_search = app.input_mode == InputMode::Editing && app.state == AppState::Search;
    let search_style = if editing_search {
        Theme::border_focused()
    } else {
        Theme::border()
    };

    let search_text = if editing_search {
        let query = &app.search.query;
        let cursor = app.search.cursor.min(query.len());
        let (before, after) = query.split_at(cursor);
        format!("⌕ {}│{}", before, after)
    } else if app.search.query.is_empty() {
        "⌕ Press / to search...".to_string()
    } else {
        format!("⌕ {}", app.search.query)
    };

    let search_box = Paragraph::new(search_text)
        .style(if editing_search {
            Theme::input().fg(Theme::PRIMARY)
        } else {
            Theme::input()
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(search_style)
                .title(Span::styled(" SEARCH ", Theme::title())),
        );
    frame.render_widget(search_box, header_chunks[1]);
}

/// Render the main content area based on current state
fn render_content(frame: &mut Frame, area: Rect, app: &App) {
    match app.state {
        AppState::Home => ui::home::render(frame, area, app),
        AppState::Movies => ui::browse::render(frame, area, &app.movies),
        AppState::TvShows => ui::browse::render(frame, area, &app.tv_shows),
        AppState::Search => ui::search::render(frame, area, app),
        AppState::Detail => {
            if let Some(detail) = &app.detail {
                ui::detail::render(frame, area, detail);
            } else {
                render_loading_panel(frame, area, "Loading details...");
            }
        }
        AppState::Stream => {
            if let Some(stream) = &app.stream {
                ui::stream::render(frame, area, stream);
            } else {
                render_loading_panel(frame, area, "Loading stream...");
            }
        }
        AppState::MyList => ui::account::render_my_list(frame, area, app),
        AppState::SignIn => ui::account::render_sign_in(frame, area, app),
        AppState::AuthError => ui::account::render_auth_error(frame, area, app),
        AppState::Admin => ui::admin::render(frame, area, app),
    }
}

fn render_loading_panel(frame: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let loading = Paragraph::new(format!("⟳ {}", message))
        .style(Theme::loading())
        .alignment(Alignment::Center);
    frame.render_widget(loading, inner);
}

/// Render status bar at bottom
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mode_indicator = match app.input_mode {
        InputMode::Normal => Span::styled(
            " NORMAL ",
            ratatui::style::Style::default()
                .fg(Theme::BACKGROUND)
                .bg(Theme::PRIMARY),
        ),
        InputMode::Editing => Span::styled(
            " INSERT ",
            ratatui::style::Style::default()
                .fg(Theme::BACKGROUND)
                .bg(Theme::ACCENT),
        ),
    };

    let state_indicator = Span::styled(
        format!(" {} ", format!("{:?}", app.state).to_uppercase()),
        ratatui::style::Style::default().fg(Theme::DIM),
    );

    let session_indicator = if let Some(session) = &app.session {
        Span::styled(format!(" ⊙ {} ", session.name), Theme::secondary())
    } else {
        Span::styled(" Signed out ", Theme::dimmed())
    };

    let help = Span::styled(
        " q:quit  /:search  M:movies  T:tv  L:my-list  ESC:back ",
        Theme::dimmed(),
    );

    let status_line = Line::from(vec![
        mode_indicator,
        state_indicator,
        Span::raw(" "),
        session_indicator,
        Span::raw(" │ "),
        help,
    ]);

    let status = Paragraph::new(status_line).style(Theme::status_bar());
    frame.render_widget(status, area);
}

/// Render error popup overlay
fn render_error_popup(frame: &mut Frame, area: Rect, error: &str) {
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 5;

    let popup_area = Rect {
        x: area.x + (area.width.saturating_sub(popup_width)) / 2,
        y: area.y + (area.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    };

    frame.render_widget(Clear, popup_area);

    let error_block = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(error, Theme::error())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Theme::error())
            .title(Span::styled(" ✗ ERROR ", Theme::error()))
            .style(ratatui::style::Style::default().bg(Theme::BACKGROUND)),
    );

    frame.render_widget(error_block, popup_area);
}

//! App state and core application logic
//!
//! Manages the screen state machine, navigation stack, and route guard
//! integration, and coordinates between the UI and backend services.
//! Async work is requested through the `Effect` queue: key handlers push
//! effects, the main loop drains them, awaits the clients, and feeds the
//! results back through the setters.

use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

use crate::auth::Session;
use crate::models::{CatalogItem, MediaType, StreamingSource, WatchlistEntry, GENRES};
use crate::player::PlayerSession;
use crate::routes::{guard, Route, RouteDecision};
use crate::store::LocalStore;

/// Quiet period before a typed search query fires
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);
/// Hero carousel auto-advance interval
pub const HERO_ADVANCE_EVERY: Duration = Duration::from_secs(10);

// =============================================================================
// App State Enum
// =============================================================================

/// Application state enum representing the current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// Home screen with hero carousel and catalog rows
    #[default]
    Home,
    /// Movie browse grid
    Movies,
    /// TV show browse grid
    TvShows,
    /// Search results view
    Search,
    /// Detail view for a movie or TV show
    Detail,
    /// Streaming playback view
    Stream,
    /// Saved-items list
    MyList,
    /// Sign-in form
    SignIn,
    /// Authentication error page
    AuthError,
    /// Admin dashboard (role gated)
    Admin,
}

// =============================================================================
// Input Mode
// =============================================================================

/// Current input mode for keyboard handling
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode (search box or sign-in form focused)
    Editing,
}

// =============================================================================
// Loading State
// =============================================================================

/// Loading state for async operations
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadingState {
    /// Idle - no loading in progress
    #[default]
    Idle,
    /// Loading with optional message
    Loading(Option<String>),
    /// Error with message
    Error(String),
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadingState::Error(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            LoadingState::Loading(Some(msg)) => Some(msg),
            LoadingState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

// =============================================================================
// Selection State (per-view)
// =============================================================================

/// Selection state for list views
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Scroll offset for viewport
    pub offset: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self {
            selected: 0,
            offset: 0,
            len,
        }
    }

    /// Move selection up
    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.offset {
                self.offset = self.selected;
            }
        }
    }

    /// Move selection down
    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    /// Jump to first item
    pub fn first(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    /// Jump to last item
    pub fn last(&mut self) {
        if self.len > 0 {
            self.selected = self.len - 1;
        }
    }

    /// Update offset to keep the selected item visible
    pub fn scroll_into_view(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + visible_height {
            self.offset = self.selected - visible_height + 1;
        }
    }

    /// Reset selection
    pub fn reset(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    /// Update length (e.g., when new results come in)
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

// =============================================================================
// Effects (async work requested by key handlers)
// =============================================================================

/// Async work requested by the state machine, drained by the main loop
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadHome,
    LoadBrowse(MediaType, Option<u64>),
    RunSearch(String),
    LoadDetail(MediaType, u64),
    LoadStream(u64),
    SignInCredentials { email: String, password: String },
}

// =============================================================================
// View-Specific State
// =============================================================================

/// Home view state: hero carousel plus catalog rows
#[derive(Debug, Default)]
pub struct HomeState {
    /// Hero carousel items (trending)
    pub hero: Vec<CatalogItem>,
    pub hero_index: usize,
    pub last_advance: Option<Instant>,
    /// Titled catalog rows below the hero
    pub rows: Vec<(String, Vec<CatalogItem>)>,
    pub selected_row: usize,
    pub selected_col: usize,
    pub loading: LoadingState,
}

impl HomeState {
    pub fn is_empty(&self) -> bool {
        self.hero.is_empty() && self.rows.is_empty()
    }

    /// Advance the hero carousel when its interval has elapsed
    pub fn tick(&mut self, now: Instant) {
        if self.hero.is_empty() {
            return;
        }
        match self.last_advance {
            None => self.last_advance = Some(now),
            Some(last) if now.duration_since(last) >= HERO_ADVANCE_EVERY => {
                self.hero_index = (self.hero_index + 1) % self.hero.len();
                self.last_advance = Some(now);
            }
            _ => {}
        }
    }

    pub fn hero_item(&self) -> Option<&CatalogItem> {
        self.hero.get(self.hero_index)
    }

    pub fn selected_item(&self) -> Option<&CatalogItem> {
        self.rows
            .get(self.selected_row)
            .and_then(|(_, items)| items.get(self.selected_col))
    }

    fn clamp_col(&mut self) {
        let len = self
            .rows
            .get(self.selected_row)
            .map(|(_, items)| items.len())
            .unwrap_or(0);
        if len == 0 {
            self.selected_col = 0;
        } else if self.selected_col >= len {
            self.selected_col = len - 1;
        }
    }

    pub fn row_up(&mut self) {
        if self.selected_row > 0 {
            self.selected_row -= 1;
            self.clamp_col();
        }
    }

    pub fn row_down(&mut self) {
        if !self.rows.is_empty() && self.selected_row < self.rows.len() - 1 {
            self.selected_row += 1;
            self.clamp_col();
        }
    }

    pub fn col_left(&mut self) {
        self.selected_col = self.selected_col.saturating_sub(1);
    }

    pub fn col_right(&mut self) {
        let len = self
            .rows
            .get(self.selected_row)
            .map(|(_, items)| items.len())
            .unwrap_or(0);
        if len > 0 && self.selected_col < len - 1 {
            self.selected_col += 1;
        }
    }
}

/// Movie/TV browse view state
#[derive(Debug)]
pub struct BrowseState {
    pub media: MediaType,
    pub items: Vec<CatalogItem>,
    pub list: ListState,
    /// Index into GENRES, None = popular
    pub genre: Option<usize>,
    pub loading: LoadingState,
}

impl BrowseState {
    pub fn new(media: MediaType) -> Self {
        Self {
            media,
            items: Vec::new(),
            list: ListState::default(),
            genre: None,
            loading: LoadingState::default(),
        }
    }

    pub fn set_items(&mut self, items: Vec<CatalogItem>) {
        self.list.set_len(items.len());
        self.items = items;
        self.loading = LoadingState::Idle;
    }

    pub fn selected_item(&self) -> Option<&CatalogItem> {
        self.items.get(self.list.selected)
    }

    /// Cycle the genre filter: popular -> each genre -> popular
    pub fn cycle_genre(&mut self) -> Option<u64> {
        self.genre = match self.genre {
            None => Some(0),
            Some(i) if i + 1 < GENRES.len() => Some(i + 1),
            Some(_) => None,
        };
        self.genre_id()
    }

    pub fn genre_id(&self) -> Option<u64> {
        self.genre.map(|i| GENRES[i].0)
    }

    pub fn genre_name(&self) -> Option<&'static str> {
        self.genre.map(|i| GENRES[i].1)
    }
}

/// Search result filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchFilter {
    #[default]
    All,
    Movies,
    TvShows,
}

impl SearchFilter {
    pub fn next(self) -> Self {
        match self {
            SearchFilter::All => SearchFilter::Movies,
            SearchFilter::Movies => SearchFilter::TvShows,
            SearchFilter::TvShows => SearchFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SearchFilter::All => "All",
            SearchFilter::Movies => "Movies",
            SearchFilter::TvShows => "TV Shows",
        }
    }

    pub fn matches(&self, media: MediaType) -> bool {
        match self {
            SearchFilter::All => true,
            SearchFilter::Movies => media == MediaType::Movie,
            SearchFilter::TvShows => media == MediaType::Tv,
        }
    }
}

/// Search view state with debounced input
#[derive(Debug, Default)]
pub struct SearchState {
    /// Search query
    pub query: String,
    /// Cursor position in query
    pub cursor: usize,
    /// Combined search results (movies + TV)
    pub results: Vec<CatalogItem>,
    pub list: ListState,
    pub loading: LoadingState,
    pub filter: SearchFilter,
    /// Set on every edit; the query fires after the quiet period
    pending_since: Option<Instant>,
}

impl SearchState {
    /// Insert character at cursor
    pub fn insert(&mut self, c: char, now: Instant) {
        self.query.insert(self.cursor, c);
        self.cursor += 1;
        self.pending_since = Some(now);
    }

    /// Delete character before cursor
    pub fn backspace(&mut self, now: Instant) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.query.remove(self.cursor);
            self.pending_since = Some(now);
        }
    }

    /// Delete character at cursor
    pub fn delete(&mut self, now: Instant) {
        if self.cursor < self.query.len() {
            self.query.remove(self.cursor);
            self.pending_since = Some(now);
        }
    }

    pub fn cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.query.len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.query.len();
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.cursor = 0;
        self.pending_since = None;
    }

    /// Return the query when the debounce quiet period has elapsed.
    /// A response from a superseded call can still land and overwrite
    /// newer results; that race is accepted, not guarded.
    pub fn take_due_query(&mut self, now: Instant) -> Option<String> {
        match self.pending_since {
            Some(since) if now.duration_since(since) >= SEARCH_DEBOUNCE => {
                self.pending_since = None;
                Some(self.query.clone())
            }
            _ => None,
        }
    }

    /// Force the pending query to fire now (Enter key)
    pub fn take_query_now(&mut self) -> Option<String> {
        self.pending_since = None;
        if self.query.trim().is_empty() {
            None
        } else {
            Some(self.query.clone())
        }
    }

    /// Set results and update list state
    pub fn set_results(&mut self, results: Vec<CatalogItem>) {
        self.list.set_len(results.len());
        self.results = results;
        self.loading = LoadingState::Idle;
    }

    /// Results with the media-type filter applied
    pub fn filtered(&self) -> Vec<&CatalogItem> {
        self.results
            .iter()
            .filter(|r| self.filter.matches(r.media_type))
            .collect()
    }

    pub fn selected_result(&self) -> Option<&CatalogItem> {
        self.filtered().get(self.list.selected).copied()
    }
}

/// Detail view state
#[derive(Debug)]
pub struct DetailState {
    pub item: CatalogItem,
    pub similar: Vec<CatalogItem>,
    pub similar_list: ListState,
    pub in_watchlist: bool,
    pub loading: LoadingState,
}

/// Streaming playback view state
#[derive(Debug)]
pub struct StreamState {
    pub item: CatalogItem,
    pub player: PlayerSession,
}

/// My-list view state
#[derive(Debug, Default)]
pub struct MyListState {
    pub entries: Vec<WatchlistEntry>,
    pub list: ListState,
}

impl MyListState {
    pub fn set_entries(&mut self, entries: Vec<WatchlistEntry>) {
        self.list.set_len(entries.len());
        self.entries = entries;
    }

    pub fn selected_entry(&self) -> Option<&WatchlistEntry> {
        self.entries.get(self.list.selected)
    }
}

/// Focused field on the sign-in form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignInField {
    #[default]
    Email,
    Password,
}

/// Sign-in view state
#[derive(Debug, Default)]
pub struct SignInState {
    pub email: String,
    pub password: String,
    pub focus: SignInField,
    /// Inline failure message (full failures route to the error screen)
    pub error: Option<String>,
    /// Path to resume after a successful sign-in
    pub callback: Option<String>,
}

impl SignInState {
    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            SignInField::Email => &mut self.email,
            SignInField::Password => &mut self.password,
        }
    }

    pub fn insert(&mut self, c: char) {
        self.field_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.field_mut().pop();
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            SignInField::Email => SignInField::Password,
            SignInField::Password => SignInField::Email,
        };
    }

    pub fn reset(&mut self) {
        self.email.clear();
        self.password.clear();
        self.focus = SignInField::Email;
        self.error = None;
    }
}

/// Auth error view state
#[derive(Debug, Default)]
pub struct AuthErrorState {
    pub code: Option<String>,
}

/// Admin dashboard tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminTab {
    #[default]
    Dashboard,
    Movies,
    TvShows,
    Users,
    Settings,
}

impl AdminTab {
    pub const ALL: [AdminTab; 5] = [
        AdminTab::Dashboard,
        AdminTab::Movies,
        AdminTab::TvShows,
        AdminTab::Users,
        AdminTab::Settings,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AdminTab::Dashboard => "Dashboard",
            AdminTab::Movies => "Movies",
            AdminTab::TvShows => "TV Shows",
            AdminTab::Users => "Users",
            AdminTab::Settings => "Settings",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Mock catalog rows shown on the admin content tabs
pub const ADMIN_MOCK_TITLES: &[(&str, &str, u32, f32)] = &[
    ("The Matrix", "Published", 12453, 4.8),
    ("Inception", "Published", 9876, 4.7),
    ("Interstellar", "Published", 8765, 4.9),
    ("The Dark Knight", "Draft", 0, 0.0),
    ("Pulp Fiction", "Published", 7654, 4.6),
];

/// Mock subscriber rows shown on the admin users tab
pub const ADMIN_MOCK_USERS: &[(&str, &str, &str, &str)] = &[
    ("John Doe", "john@example.com", "Premium", "2023-01-15"),
    ("Jane Smith", "jane@example.com", "Basic", "2023-02-20"),
    ("Bob Johnson", "bob@example.com", "Premium", "2023-03-10"),
];

/// Admin dashboard view state
#[derive(Debug, Default)]
pub struct AdminState {
    pub tab: AdminTab,
    pub list: ListState,
    pub loading: LoadingState,
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Current state/screen
    pub state: AppState,
    /// Navigation history stack
    pub nav_stack: Vec<AppState>,
    /// Whether the app is running
    pub running: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Global error message
    pub error: Option<String>,

    /// Validated session, None when anonymous or expired
    pub session: Option<Session>,
    /// Local store; None until initialized (treated as empty)
    pub store: Option<LocalStore>,

    // View-specific states
    pub home: HomeState,
    pub movies: BrowseState,
    pub tv_shows: BrowseState,
    pub search: SearchState,
    pub detail: Option<DetailState>,
    pub stream: Option<StreamState>,
    pub my_list: MyListState,
    pub sign_in: SignInState,
    pub auth_error: AuthErrorState,
    pub admin: AdminState,

    /// Pending async work for the main loop
    effects: Vec<Effect>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            state: AppState::Home,
            nav_stack: Vec::new(),
            running: true,
            input_mode: InputMode::Normal,
            error: None,

            session: None,
            store: None,

            home: HomeState::default(),
            movies: BrowseState::new(MediaType::Movie),
            tv_shows: BrowseState::new(MediaType::Tv),
            search: SearchState::default(),
            detail: None,
            stream: None,
            my_list: MyListState::default(),
            sign_in: SignInState::default(),
            auth_error: AuthErrorState::default(),
            admin: AdminState::default(),

            effects: Vec::new(),
        }
    }
}

impl App {
    /// Create a new App instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the pending async work queue
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    fn push_effect(&mut self, effect: Effect) {
        if !self.effects.contains(&effect) {
            self.effects.push(effect);
        }
    }

    /// Move to a new screen, pushing the current one to the nav stack
    fn enter(&mut self, state: AppState) {
        if self.state != state {
            self.nav_stack.push(self.state);
            self.state = state;
        }
        self.input_mode = InputMode::Normal;
    }

    /// Go back to the previous screen
    pub fn back(&mut self) -> bool {
        if self.input_mode == InputMode::Editing {
            self.input_mode = InputMode::Normal;
            return true;
        }

        if let Some(prev) = self.nav_stack.pop() {
            self.state = prev;
            true
        } else {
            false
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error = Some(msg.into());
    }

    // -------------------------------------------------------------------------
    // Route Navigation (guard runs here, ahead of every screen change)
    // -------------------------------------------------------------------------

    /// Navigate to a route. The guard consults the current session (with
    /// expired sessions dropped first); privileged routes redirect to the
    /// sign-in screen with the original path preserved as callback.
    pub fn navigate_route(&mut self, route: Route, now: DateTime<Utc>) {
        // An expired session authorizes like no session at all
        if self
            .session
            .as_ref()
            .map(|s| s.expires_at <= now)
            .unwrap_or(false)
        {
            self.session = None;
        }

        match guard(&route, self.session.as_ref()) {
            RouteDecision::Allow => self.enter_route(&route),
            RouteDecision::Redirect(Route::SignIn { callback }) => {
                self.sign_in.reset();
                self.sign_in.callback = callback;
                self.enter(AppState::SignIn);
                self.input_mode = InputMode::Editing;
            }
            RouteDecision::Redirect(other) => self.enter_route(&other),
        }
    }

    /// Enter the screen for an allowed route, scheduling data loads
    fn enter_route(&mut self, route: &Route) {
        match route {
            Route::Home => {
                if self.home.is_empty() {
                    self.home.loading = LoadingState::Loading(None);
                    self.push_effect(Effect::LoadHome);
                }
                self.enter(AppState::Home);
            }
            Route::Movies => {
                if self.movies.items.is_empty() {
                    self.movies.loading = LoadingState::Loading(None);
                    self.push_effect(Effect::LoadBrowse(MediaType::Movie, None));
                }
                self.enter(AppState::Movies);
            }
            Route::TvShows => {
                if self.tv_shows.items.is_empty() {
                    self.tv_shows.loading = LoadingState::Loading(None);
                    self.push_effect(Effect::LoadBrowse(MediaType::Tv, None));
                }
                self.enter(AppState::TvShows);
            }
            Route::MovieDetail(id) => {
                self.push_effect(Effect::LoadDetail(MediaType::Movie, *id));
                self.enter(AppState::Detail);
            }
            Route::TvDetail(id) => {
                self.push_effect(Effect::LoadDetail(MediaType::Tv, *id));
                self.enter(AppState::Detail);
            }
            Route::Stream(id) => {
                self.push_effect(Effect::LoadStream(*id));
                self.enter(AppState::Stream);
            }
            Route::Search => {
                self.enter(AppState::Search);
                self.input_mode = InputMode::Editing;
            }
            Route::MyList => {
                self.refresh_my_list();
                self.enter(AppState::MyList);
            }
            Route::Admin => self.enter(AppState::Admin),
            Route::SignIn { callback } => {
                self.sign_in.reset();
                self.sign_in.callback = callback.clone();
                self.enter(AppState::SignIn);
                self.input_mode = InputMode::Editing;
            }
            Route::AuthError { code } => {
                self.auth_error.code = code.clone();
                self.enter(AppState::AuthError);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Data Completion Setters (called by the main loop)
    // -------------------------------------------------------------------------

    /// Home rows arrived
    pub fn set_home(
        &mut self,
        trending: Vec<CatalogItem>,
        popular: Vec<CatalogItem>,
        action: Vec<CatalogItem>,
    ) {
        self.home.hero = trending.iter().take(5).cloned().collect();
        self.home.hero_index = 0;
        self.home.rows = vec![
            ("Trending Now".to_string(), trending),
            ("Popular".to_string(), popular),
            ("Action".to_string(), action),
        ];
        self.home.selected_row = 0;
        self.home.selected_col = 0;
        self.home.loading = LoadingState::Idle;
    }

    /// Browse grid items arrived
    pub fn set_browse(&mut self, media: MediaType, items: Vec<CatalogItem>) {
        match media {
            MediaType::Movie => self.movies.set_items(items),
            MediaType::Tv => self.tv_shows.set_items(items),
        }
    }

    /// Search results arrived (may be stale; last writer wins)
    pub fn set_search_results(&mut self, results: Vec<CatalogItem>) {
        self.search.set_results(results);
    }

    /// Detail record and its similar rail arrived
    pub fn open_detail(&mut self, item: CatalogItem, similar: Vec<CatalogItem>) {
        let in_watchlist = self
            .store
            .as_ref()
            .map(|s| s.watchlist_contains(item.id))
            .unwrap_or(false);

        self.detail = Some(DetailState {
            item,
            similar_list: ListState::new(similar.len()),
            similar,
            in_watchlist,
            loading: LoadingState::Idle,
        });
    }

    /// Stream detail and sources arrived; playback starts loading
    pub fn open_stream(&mut self, item: CatalogItem, sources: Vec<StreamingSource>, now: Instant) {
        let player = PlayerSession::new(item.title.clone(), sources, now);
        self.stream = Some(StreamState { item, player });
    }

    /// Re-read the watchlist from the store
    pub fn refresh_my_list(&mut self) {
        let entries = self
            .store
            .as_ref()
            .map(|s| s.watchlist())
            .unwrap_or_default();
        self.my_list.set_entries(entries);
    }

    /// Credentials sign-in succeeded: persist the token, store the
    /// session, and resume the callback route
    pub fn sign_in_succeeded(&mut self, session: Session, token: &str, now: DateTime<Utc>) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save_session_token(token) {
                tracing::warn!(error = %e, "failed to persist session token");
            }
        }
        self.session = Some(session);

        let callback = self
            .sign_in
            .callback
            .take()
            .and_then(|path| Route::parse(&path));
        self.sign_in.reset();
        self.navigate_route(callback.unwrap_or(Route::Home), now);
    }

    /// Credentials sign-in failed: inline message, stay on the form
    pub fn sign_in_failed(&mut self, message: impl Into<String>) {
        self.sign_in.error = Some(message.into());
        self.sign_in.password.clear();
    }

    /// Sign out: clear the persisted token and the in-memory session
    pub fn sign_out(&mut self, now: DateTime<Utc>) {
        if let Some(store) = &self.store {
            if let Err(e) = store.clear_session() {
                tracing::warn!(error = %e, "failed to clear session record");
            }
        }
        self.session = None;
        self.navigate_route(Route::Home, now);
    }

    /// Toggle the current detail item on the watchlist. Anonymous users
    /// are redirected to sign-in, like any privileged action.
    pub fn toggle_watchlist(&mut self, now: DateTime<Utc>) {
        let Some(detail) = &self.detail else {
            return;
        };

        if self.session.is_none() {
            let callback = match detail.item.media_type {
                MediaType::Movie => Route::MovieDetail(detail.item.id),
                MediaType::Tv => Route::TvDetail(detail.item.id),
            };
            self.navigate_route(
                Route::SignIn {
                    callback: Some(callback.path()),
                },
                now,
            );
            return;
        }

        let Some(store) = &self.store else {
            return;
        };

        let result = if detail.in_watchlist {
            store.watchlist_remove(detail.item.id)
        } else {
            store.watchlist_add(WatchlistEntry::from_item(&detail.item, now))
        };

        match result {
            Ok(()) => {
                if let Some(detail) = &mut self.detail {
                    detail.in_watchlist = !detail.in_watchlist;
                }
            }
            Err(e) => self.set_error(format!("Watchlist update failed: {}", e)),
        }
    }

    // -------------------------------------------------------------------------
    // Timers
    // -------------------------------------------------------------------------

    /// Advance cooperative timers: carousel, search debounce, player
    pub fn tick(&mut self, now: Instant) {
        if self.state == AppState::Home && self.input_mode == InputMode::Normal {
            self.home.tick(now);
        }

        if let Some(query) = self.search.take_due_query(now) {
            if query.trim().is_empty() {
                self.search.set_results(Vec::new());
            } else {
                self.search.loading = LoadingState::Loading(None);
                self.push_effect(Effect::RunSearch(query));
            }
        }

        if let Some(stream) = &mut self.stream {
            stream.player.tick(now);
        }
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if the event was consumed
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant, now_utc: DateTime<Utc>) -> bool {
        // Clear transient error on any keypress
        self.error = None;

        // Global quit shortcut
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }

        if self.input_mode == InputMode::Editing {
            self.handle_editing_key(key, now, now_utc)
        } else {
            self.handle_normal_key(key, now, now_utc)
        }
    }

    /// Handle keys in editing (text input) mode
    fn handle_editing_key(&mut self, key: KeyEvent, now: Instant, now_utc: DateTime<Utc>) -> bool {
        if self.state == AppState::SignIn {
            return self.handle_sign_in_key(key, now_utc);
        }

        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                true
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                if let Some(query) = self.search.take_query_now() {
                    self.search.loading = LoadingState::Loading(None);
                    self.push_effect(Effect::RunSearch(query));
                }
                true
            }
            KeyCode::Char(c) => {
                self.search.insert(c, now);
                true
            }
            KeyCode::Backspace => {
                self.search.backspace(now);
                true
            }
            KeyCode::Delete => {
                self.search.delete(now);
                true
            }
            KeyCode::Left => {
                self.search.cursor_left();
                true
            }
            KeyCode::Right => {
                self.search.cursor_right();
                true
            }
            KeyCode::Home => {
                self.search.cursor_home();
                true
            }
            KeyCode::End => {
                self.search.cursor_end();
                true
            }
            _ => false,
        }
    }

    /// Sign-in form input
    fn handle_sign_in_key(&mut self, key: KeyEvent, _now_utc: DateTime<Utc>) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.back();
                true
            }
            KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
                self.sign_in.toggle_focus();
                true
            }
            KeyCode::Enter => {
                if self.sign_in.focus == SignInField::Email {
                    self.sign_in.focus = SignInField::Password;
                } else {
                    self.push_effect(Effect::SignInCredentials {
                        email: self.sign_in.email.clone(),
                        password: self.sign_in.password.clone(),
                    });
                }
                true
            }
            KeyCode::Char(c) => {
                self.sign_in.insert(c);
                true
            }
            KeyCode::Backspace => {
                self.sign_in.backspace();
                true
            }
            _ => false,
        }
    }

    /// Handle keys in normal navigation mode
    fn handle_normal_key(&mut self, key: KeyEvent, now: Instant, now_utc: DateTime<Utc>) -> bool {
        // Global shortcuts
        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return true;
            }
            KeyCode::Char('/') => {
                self.navigate_route(Route::Search, now_utc);
                return true;
            }
            KeyCode::Esc => {
                return self.back();
            }
            KeyCode::Char('H') => {
                self.navigate_route(Route::Home, now_utc);
                return true;
            }
            KeyCode::Char('M') => {
                self.navigate_route(Route::Movies, now_utc);
                return true;
            }
            KeyCode::Char('T') => {
                self.navigate_route(Route::TvShows, now_utc);
                return true;
            }
            KeyCode::Char('L') => {
                self.navigate_route(Route::MyList, now_utc);
                return true;
            }
            KeyCode::Char('A') => {
                self.navigate_route(Route::Admin, now_utc);
                return true;
            }
            _ => {}
        }

        match self.state {
            AppState::Home => self.handle_home_key(key, now_utc),
            AppState::Movies | AppState::TvShows => self.handle_browse_key(key, now_utc),
            AppState::Search => self.handle_search_key(key, now_utc),
            AppState::Detail => self.handle_detail_key(key, now_utc),
            AppState::Stream => self.handle_stream_key(key, now),
            AppState::MyList => self.handle_my_list_key(key, now_utc),
            AppState::SignIn => {
                // Any key returns the form to editing
                self.input_mode = InputMode::Editing;
                true
            }
            AppState::AuthError => self.handle_auth_error_key(key, now_utc),
            AppState::Admin => self.handle_admin_key(key),
        }
    }

    fn open_item(&mut self, item: &CatalogItem, now_utc: DateTime<Utc>) {
        let route = match item.media_type {
            MediaType::Movie => Route::MovieDetail(item.id),
            MediaType::Tv => Route::TvDetail(item.id),
        };
        self.navigate_route(route, now_utc);
    }

    fn handle_home_key(&mut self, key: KeyEvent, now_utc: DateTime<Utc>) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.home.row_up();
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.home.row_down();
                true
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.home.col_left();
                true
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.home.col_right();
                true
            }
            KeyCode::Enter => {
                if let Some(item) = self.home.selected_item().cloned() {
                    self.open_item(&item, now_utc);
                }
                true
            }
            _ => false,
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent, now_utc: DateTime<Utc>) -> bool {
        let media = if self.state == AppState::Movies {
            MediaType::Movie
        } else {
            MediaType::Tv
        };

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.browse_mut(media).list.up();
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.browse_mut(media).list.down();
                true
            }
            KeyCode::Home => {
                self.browse_mut(media).list.first();
                true
            }
            KeyCode::End => {
                self.browse_mut(media).list.last();
                true
            }
            KeyCode::Char('g') => {
                let browse = self.browse_mut(media);
                let genre = browse.cycle_genre();
                browse.loading = LoadingState::Loading(None);
                self.push_effect(Effect::LoadBrowse(media, genre));
                true
            }
            KeyCode::Enter => {
                if let Some(item) = self.browse_mut(media).selected_item().cloned() {
                    self.open_item(&item, now_utc);
                }
                true
            }
            _ => false,
        }
    }

    fn browse_mut(&mut self, media: MediaType) -> &mut BrowseState {
        match media {
            MediaType::Movie => &mut self.movies,
            MediaType::Tv => &mut self.tv_shows,
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent, now_utc: DateTime<Utc>) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.search.list.up();
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.search.list.down();
                true
            }
            KeyCode::Tab => {
                self.search.filter = self.search.filter.next();
                let len = self.search.filtered().len();
                self.search.list.set_len(len);
                true
            }
            KeyCode::Char('i') => {
                self.input_mode = InputMode::Editing;
                true
            }
            KeyCode::Enter => {
                if let Some(item) = self.search.selected_result().cloned() {
                    self.open_item(&item, now_utc);
                }
                true
            }
            _ => false,
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent, now_utc: DateTime<Utc>) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(detail) = &mut self.detail {
                    detail.similar_list.up();
                }
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(detail) = &mut self.detail {
                    detail.similar_list.down();
                }
                true
            }
            KeyCode::Enter | KeyCode::Char('p') => {
                // Movies stream; TV playback is per-episode and out of scope
                if let Some(detail) = &self.detail {
                    if detail.item.media_type == MediaType::Movie {
                        let id = detail.item.id;
                        self.navigate_route(Route::Stream(id), now_utc);
                    }
                }
                true
            }
            KeyCode::Char('w') => {
                self.toggle_watchlist(now_utc);
                true
            }
            KeyCode::Char('s') => {
                if let Some(detail) = &self.detail {
                    if let Some(item) = detail.similar.get(detail.similar_list.selected).cloned() {
                        self.open_item(&item, now_utc);
                    }
                }
                true
            }
            _ => false,
        }
    }

    fn handle_stream_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        let Some(stream) = &mut self.stream else {
            return false;
        };

        // Any handled key counts as activity for controls auto-hide
        let consumed = match key.code {
            KeyCode::Char(' ') => {
                stream.player.toggle(now);
                true
            }
            KeyCode::Left => {
                stream.player.seek_by(-10, now);
                true
            }
            KeyCode::Right => {
                stream.player.seek_by(10, now);
                true
            }
            KeyCode::Up => {
                stream.player.adjust_volume(0.1, now);
                true
            }
            KeyCode::Down => {
                stream.player.adjust_volume(-0.1, now);
                true
            }
            KeyCode::Char('>') => {
                stream.player.adjust_rate(0.25, now);
                true
            }
            KeyCode::Char('<') => {
                stream.player.adjust_rate(-0.25, now);
                true
            }
            KeyCode::Char('r') => {
                stream.player.retry(now);
                true
            }
            KeyCode::Char('x') => {
                stream.player.dismiss_ad();
                true
            }
            KeyCode::Char(c @ '1'..='9') => {
                let idx = (c as usize) - ('1' as usize);
                stream.player.select_source(idx, now);
                true
            }
            _ => false,
        };

        if consumed {
            stream.player.activity(now);
        }
        consumed
    }

    fn handle_my_list_key(&mut self, key: KeyEvent, now_utc: DateTime<Utc>) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.my_list.list.up();
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.my_list.list.down();
                true
            }
            KeyCode::Enter => {
                if let Some(entry) = self.my_list.selected_entry() {
                    let route = match entry.media_type {
                        MediaType::Movie => Route::MovieDetail(entry.id),
                        MediaType::Tv => Route::TvDetail(entry.id),
                    };
                    self.navigate_route(route, now_utc);
                }
                true
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(entry) = self.my_list.selected_entry() {
                    let id = entry.id;
                    if let Some(store) = &self.store {
                        if let Err(e) = store.watchlist_remove(id) {
                            self.set_error(format!("Remove failed: {}", e));
                        }
                    }
                    self.refresh_my_list();
                }
                true
            }
            _ => false,
        }
    }

    fn handle_auth_error_key(&mut self, key: KeyEvent, now_utc: DateTime<Utc>) -> bool {
        match key.code {
            KeyCode::Enter => {
                self.navigate_route(Route::SignIn { callback: None }, now_utc);
                true
            }
            KeyCode::Char('h') => {
                self.navigate_route(Route::Home, now_utc);
                true
            }
            _ => false,
        }
    }

    fn handle_admin_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Tab | KeyCode::Right => {
                self.admin.tab = self.admin.tab.next();
                self.admin.list.reset();
                true
            }
            KeyCode::BackTab | KeyCode::Left => {
                self.admin.tab = self.admin.tab.prev();
                self.admin.list.reset();
                true
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.admin.list.up();
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.admin.list.down();
                true
            }
            _ => false,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Authenticator;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(key(code), Instant::now(), Utc::now());
    }

    fn signed_in_app(email: &str, password: &str) -> App {
        let mut app = App::new();
        let issued = Authenticator::new("test-secret")
            .sign_in(email, password, Utc::now())
            .unwrap();
        app.session = Some(issued.session);
        app
    }

    // -------------------------------------------------------------------------
    // ListState Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_list_state_navigation() {
        let mut list = ListState::new(5);
        assert_eq!(list.selected, 0);

        list.down();
        assert_eq!(list.selected, 1);

        list.down();
        list.down();
        list.down();
        assert_eq!(list.selected, 4);

        // Can't go past end
        list.down();
        assert_eq!(list.selected, 4);

        list.up();
        assert_eq!(list.selected, 3);

        list.first();
        assert_eq!(list.selected, 0);

        list.last();
        assert_eq!(list.selected, 4);
    }

    #[test]
    fn test_list_state_set_len_clamps() {
        let mut list = ListState::new(10);
        list.selected = 8;

        list.set_len(5);
        assert_eq!(list.selected, 4);

        list.set_len(10);
        assert_eq!(list.selected, 4);

        list.set_len(0);
        assert_eq!(list.selected, 0);
    }

    #[test]
    fn test_loading_state_helpers() {
        let idle = LoadingState::Idle;
        assert!(!idle.is_loading());
        assert!(!idle.is_error());
        assert!(idle.message().is_none());

        let loading = LoadingState::Loading(Some("Fetching".to_string()));
        assert!(loading.is_loading());
        assert_eq!(loading.message(), Some("Fetching"));

        let error = LoadingState::Error("request failed".to_string());
        assert!(error.is_error());
        assert_eq!(error.message(), Some("request failed"));
    }

    #[test]
    fn test_search_state_clear() {
        let mut search = SearchState::default();
        let now = Instant::now();

        search.insert('t', now);
        search.insert('v', now);
        assert_eq!(search.query, "tv");

        search.clear();
        assert_eq!(search.query, "");
        assert_eq!(search.cursor, 0);
        // A cleared edit never fires a debounced query
        assert!(search.take_due_query(now + SEARCH_DEBOUNCE).is_none());
    }

    // -------------------------------------------------------------------------
    // Navigation + Guard Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_navigation_stack() {
        let mut app = App::new();
        assert_eq!(app.state, AppState::Home);

        app.navigate_route(Route::Movies, Utc::now());
        assert_eq!(app.state, AppState::Movies);

        app.navigate_route(Route::Search, Utc::now());
        assert_eq!(app.state, AppState::Search);

        app.input_mode = InputMode::Normal;
        assert!(app.back());
        assert_eq!(app.state, AppState::Movies);

        assert!(app.back());
        assert_eq!(app.state, AppState::Home);
        assert!(!app.back());
    }

    #[test]
    fn test_admin_route_redirects_anonymous_to_sign_in() {
        let mut app = App::new();
        app.navigate_route(Route::Admin, Utc::now());

        assert_eq!(app.state, AppState::SignIn);
        assert_eq!(app.sign_in.callback.as_deref(), Some("/admin"));
    }

    #[test]
    fn test_admin_route_rejects_plain_user() {
        let mut app = signed_in_app("user@example.com", "password123");
        app.navigate_route(Route::Admin, Utc::now());

        assert_eq!(app.state, AppState::SignIn);
        assert_eq!(app.sign_in.callback.as_deref(), Some("/admin"));
    }

    #[test]
    fn test_admin_route_allows_admin() {
        let mut app = signed_in_app("admin@example.com", "admin123");
        app.navigate_route(Route::Admin, Utc::now());
        assert_eq!(app.state, AppState::Admin);
    }

    #[test]
    fn test_expired_session_treated_as_anonymous() {
        let mut app = signed_in_app("admin@example.com", "admin123");
        let expiry = app.session.as_ref().unwrap().expires_at;

        app.navigate_route(Route::Admin, expiry + chrono::Duration::seconds(1));
        assert_eq!(app.state, AppState::SignIn);
        assert!(app.session.is_none());
    }

    #[test]
    fn test_my_list_requires_session() {
        let mut app = App::new();
        app.navigate_route(Route::MyList, Utc::now());
        assert_eq!(app.state, AppState::SignIn);
        assert_eq!(app.sign_in.callback.as_deref(), Some("/my-list"));

        let mut app = signed_in_app("user@example.com", "password123");
        app.navigate_route(Route::MyList, Utc::now());
        assert_eq!(app.state, AppState::MyList);
    }

    #[test]
    fn test_sign_in_success_resumes_callback() {
        let mut app = App::new();
        app.navigate_route(Route::MyList, Utc::now());
        assert_eq!(app.state, AppState::SignIn);

        let issued = Authenticator::new("test-secret")
            .sign_in("user@example.com", "password123", Utc::now())
            .unwrap();
        app.sign_in_succeeded(issued.session, &issued.token, Utc::now());

        assert_eq!(app.state, AppState::MyList);
        assert!(app.session.is_some());
    }

    #[test]
    fn test_sign_in_success_without_callback_goes_home() {
        let mut app = App::new();
        app.navigate_route(Route::SignIn { callback: None }, Utc::now());

        let issued = Authenticator::new("test-secret")
            .sign_in("user@example.com", "password123", Utc::now())
            .unwrap();
        app.sign_in_succeeded(issued.session, &issued.token, Utc::now());

        assert_eq!(app.state, AppState::Home);
    }

    #[test]
    fn test_home_route_schedules_load_once() {
        let mut app = App::new();
        app.navigate_route(Route::Home, Utc::now());
        assert_eq!(app.take_effects(), vec![Effect::LoadHome]);

        app.set_home(Vec::new(), Vec::new(), Vec::new());
        app.home.rows = vec![("Trending Now".into(), Vec::new())];
        app.navigate_route(Route::Home, Utc::now());
        assert!(app.take_effects().is_empty());
    }

    #[test]
    fn test_stream_route_schedules_load() {
        let mut app = App::new();
        app.navigate_route(Route::Stream(550), Utc::now());
        assert_eq!(app.state, AppState::Stream);
        assert_eq!(app.take_effects(), vec![Effect::LoadStream(550)]);
    }

    // -------------------------------------------------------------------------
    // Key Handling Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_quit_keys() {
        let mut app = App::new();
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);

        let mut app = App::new();
        app.handle_key(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Instant::now(),
            Utc::now(),
        );
        assert!(!app.running);
    }

    #[test]
    fn test_slash_opens_search_in_editing_mode() {
        let mut app = App::new();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.state, AppState::Search);
        assert_eq!(app.input_mode, InputMode::Editing);
    }

    #[test]
    fn test_admin_shortcut_guarded() {
        let mut app = App::new();
        press(&mut app, KeyCode::Char('A'));
        assert_eq!(app.state, AppState::SignIn);
    }

    #[test]
    fn test_search_editing_keys() {
        let mut app = App::new();
        press(&mut app, KeyCode::Char('/'));

        for c in "test".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.search.query, "test");

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.search.query, "tes");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_search_filter_cycles() {
        let mut app = App::new();
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.search.filter, SearchFilter::All);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.search.filter, SearchFilter::Movies);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.search.filter, SearchFilter::TvShows);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.search.filter, SearchFilter::All);
    }

    #[test]
    fn test_sign_in_form_flow() {
        let mut app = App::new();
        app.navigate_route(Route::SignIn { callback: None }, Utc::now());
        assert_eq!(app.input_mode, InputMode::Editing);

        for c in "user@example.com".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter); // advance to password
        assert_eq!(app.sign_in.focus, SignInField::Password);

        for c in "password123".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter); // submit

        let effects = app.take_effects();
        assert_eq!(
            effects,
            vec![Effect::SignInCredentials {
                email: "user@example.com".to_string(),
                password: "password123".to_string(),
            }]
        );
    }

    #[test]
    fn test_sign_in_failed_keeps_email_clears_password() {
        let mut app = App::new();
        app.navigate_route(Route::SignIn { callback: None }, Utc::now());
        app.sign_in.email = "user@example.com".to_string();
        app.sign_in.password = "wrong".to_string();

        app.sign_in_failed("Invalid email or password.");
        assert_eq!(app.sign_in.email, "user@example.com");
        assert!(app.sign_in.password.is_empty());
        assert!(app.sign_in.error.is_some());
    }

    // -------------------------------------------------------------------------
    // Debounce Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_search_debounce_fires_after_quiet_period() {
        let mut app = App::new();
        let start = Instant::now();

        app.search.insert('b', start);
        app.search.insert('a', start + Duration::from_millis(100));

        // Not yet quiet long enough
        app.tick(start + Duration::from_millis(200));
        assert!(app.take_effects().is_empty());

        // Quiet period elapsed since the last edit
        app.tick(start + Duration::from_millis(100) + SEARCH_DEBOUNCE);
        assert_eq!(
            app.take_effects(),
            vec![Effect::RunSearch("ba".to_string())]
        );
    }

    #[test]
    fn test_search_debounce_resets_on_each_edit() {
        let mut app = App::new();
        let start = Instant::now();

        app.search.insert('a', start);
        let almost = start + SEARCH_DEBOUNCE - Duration::from_millis(10);
        app.search.insert('b', almost);

        app.tick(start + SEARCH_DEBOUNCE);
        assert!(app.take_effects().is_empty());

        app.tick(almost + SEARCH_DEBOUNCE);
        assert_eq!(
            app.take_effects(),
            vec![Effect::RunSearch("ab".to_string())]
        );
    }

    #[test]
    fn test_cleared_query_resets_results_without_request() {
        let mut app = App::new();
        let start = Instant::now();

        app.search.insert('a', start);
        app.search.backspace(start + Duration::from_millis(50));

        app.tick(start + Duration::from_millis(50) + SEARCH_DEBOUNCE);
        assert!(app.take_effects().is_empty());
        assert!(app.search.results.is_empty());
    }

    // -------------------------------------------------------------------------
    // Carousel Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_hero_carousel_advances_on_interval() {
        let mut app = App::new();
        let start = Instant::now();

        let items: Vec<CatalogItem> = (0..3)
            .map(|i| {
                let mut item = CatalogItem::placeholder(MediaType::Movie);
                item.id = i;
                item
            })
            .collect();
        app.set_home(items, Vec::new(), Vec::new());
        app.home.last_advance = Some(start);

        app.tick(start + Duration::from_secs(1));
        assert_eq!(app.home.hero_index, 0);

        app.tick(start + HERO_ADVANCE_EVERY);
        assert_eq!(app.home.hero_index, 1);

        // Wraps around
        app.tick(start + HERO_ADVANCE_EVERY * 2);
        app.tick(start + HERO_ADVANCE_EVERY * 3);
        assert_eq!(app.home.hero_index, 0);
    }

    // -------------------------------------------------------------------------
    // Watchlist Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_watchlist_toggle_requires_session() {
        let mut app = App::new();
        let mut item = CatalogItem::placeholder(MediaType::Movie);
        item.id = 550;
        app.open_detail(item, Vec::new());
        app.state = AppState::Detail;

        app.toggle_watchlist(Utc::now());
        assert_eq!(app.state, AppState::SignIn);
        assert_eq!(app.sign_in.callback.as_deref(), Some("/movies/550"));
    }

    #[test]
    fn test_watchlist_toggle_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut app = signed_in_app("user@example.com", "password123");
        app.store = Some(LocalStore::with_root(dir.path()));

        let mut item = CatalogItem::placeholder(MediaType::Movie);
        item.id = 550;
        app.open_detail(item, Vec::new());
        assert!(!app.detail.as_ref().unwrap().in_watchlist);

        app.toggle_watchlist(Utc::now());
        assert!(app.detail.as_ref().unwrap().in_watchlist);
        assert!(app.store.as_ref().unwrap().watchlist_contains(550));

        app.toggle_watchlist(Utc::now());
        assert!(!app.detail.as_ref().unwrap().in_watchlist);
        assert!(!app.store.as_ref().unwrap().watchlist_contains(550));
    }

    #[test]
    fn test_my_list_remove_key() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut app = signed_in_app("user@example.com", "password123");
        app.store = Some(LocalStore::with_root(dir.path()));

        let mut item = CatalogItem::placeholder(MediaType::Movie);
        item.id = 550;
        app.store
            .as_ref()
            .unwrap()
            .watchlist_add(WatchlistEntry::from_item(&item, Utc::now()))
            .unwrap();

        app.navigate_route(Route::MyList, Utc::now());
        assert_eq!(app.my_list.entries.len(), 1);

        press(&mut app, KeyCode::Char('d'));
        assert!(app.my_list.entries.is_empty());
        assert!(!app.store.as_ref().unwrap().watchlist_contains(550));
    }

    // -------------------------------------------------------------------------
    // Admin Tab Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_admin_tab_cycle() {
        let mut app = signed_in_app("admin@example.com", "admin123");
        app.navigate_route(Route::Admin, Utc::now());

        assert_eq!(app.admin.tab, AdminTab::Dashboard);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.admin.tab, AdminTab::Movies);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.admin.tab, AdminTab::Dashboard);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.admin.tab, AdminTab::Settings);
    }
}

//! StreamVibe - terminal front-end for a movie & TV streaming catalog
//!
//! Browse, search, and stream the catalog from your terminal, with a
//! local watchlist and a role-gated admin dashboard.
//!
//! # Modules
//!
//! - `models` - Catalog, watchlist, and streaming source data structures
//! - `api` - External clients (TMDB metadata, streaming sources)
//! - `auth` - Session tokens, demo allow-list, provider sign-in
//! - `routes` - Routing surface and the access guard
//! - `store` - Local JSON persistence (session + watchlist)
//! - `player` - Playback state machine
//! - `app` - Application state and navigation
//! - `ui` - TUI screen renderers
//! - `cli` / `commands` - Scriptable automation surface
//! - `config` - TOML config with env overrides

pub mod api;
pub mod app;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod player;
pub mod routes;
pub mod store;
pub mod ui;

// Re-export commonly used types
pub use api::{MetadataClient, SourceProvider, SyntheticSourceProvider};
pub use app::{App, AppState};
pub use auth::{AuthError, Authenticator, Role, Session};
pub use models::{
    CatalogItem, ImageSize, MediaType, SourceQuality, StreamingSource, WatchlistEntry,
};
pub use player::{PlayerSession, PlayerState};
pub use routes::{guard, Route, RouteDecision};
pub use store::LocalStore;

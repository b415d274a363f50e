//! CLI Command Handlers
//!
//! Implements all CLI commands by calling the appropriate backend services.
//! Each handler takes CLI args, config, and Output, and returns an ExitCode.

use chrono::Utc;

use crate::api::{MetadataClient, SourceProvider, SyntheticSourceProvider};
use crate::auth::{Authenticator, Session};
use crate::cli::{
    ExitCode, InfoCmd, ListAction, ListCmd, LoginCmd, LogoutCmd, Output, PopularCmd, SearchCmd,
    SessionInfo, SourcesCmd, StatusOk, TrendingCmd, WhoamiCmd,
};
use crate::config::Config;
use crate::models::{CatalogItem, MediaType, WatchlistEntry};
use crate::store::LocalStore;

fn metadata_client(config: &Config) -> MetadataClient {
    MetadataClient::new(config.tmdb_api_key())
}

fn session_info(session: &Session) -> SessionInfo {
    SessionInfo {
        user_id: session.user_id.clone(),
        name: session.name.clone(),
        email: session.email.clone(),
        role: session.role.to_string(),
        expires_at: session.expires_at.to_rfc3339(),
    }
}

/// Load and validate the stored session, if any. Expired or tampered
/// tokens read as signed out.
fn current_session(store: &LocalStore, config: &Config) -> Option<Session> {
    let token = store.load_session_token()?;
    let auth = Authenticator::new(config.auth_secret());
    auth.validate(&token, Utc::now()).ok()
}

fn open_store(output: &Output) -> Result<LocalStore, ExitCode> {
    LocalStore::open()
        .ok_or_else(|| output.error("Could not determine data directory", ExitCode::Error))
}

// =============================================================================
// Catalog Commands
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, config: &Config, output: &Output) -> ExitCode {
    let client = metadata_client(config);

    output.info(format!("Searching for: {}", cmd.query));

    let mut results: Vec<CatalogItem> = match cmd.media_type {
        Some(filter) => client.search(filter.into(), &cmd.query).await,
        None => {
            // Both catalogs, merged and ranked by rating
            let mut combined = client.search(MediaType::Movie, &cmd.query).await;
            combined.extend(client.search(MediaType::Tv, &cmd.query).await);
            combined
        }
    };

    results.sort_by(|a, b| {
        b.vote_average
            .partial_cmp(&a.vote_average)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results.truncate(cmd.limit);

    if let Err(e) = output.print(&results) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

pub async fn trending_cmd(cmd: TrendingCmd, config: &Config, output: &Output) -> ExitCode {
    let client = metadata_client(config);

    output.info("Fetching trending...");

    let mut results: Vec<CatalogItem> = match cmd.media_type {
        Some(filter) => client.trending(filter.into()).await,
        None => {
            let mut combined = client.trending(MediaType::Movie).await;
            combined.extend(client.trending(MediaType::Tv).await);
            combined
        }
    };

    results.truncate(cmd.limit);

    if let Err(e) = output.print(&results) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

pub async fn popular_cmd(cmd: PopularCmd, config: &Config, output: &Output) -> ExitCode {
    let client = metadata_client(config);

    output.info("Fetching popular...");

    let fetch = |media: MediaType| {
        let client = &client;
        let genre = cmd.genre;
        async move {
            match genre {
                Some(genre_id) => client.by_genre(media, genre_id).await,
                None => client.popular(media).await,
            }
        }
    };

    let mut results: Vec<CatalogItem> = match cmd.media_type {
        Some(filter) => fetch(filter.into()).await,
        None => {
            let mut combined = fetch(MediaType::Movie).await;
            combined.extend(fetch(MediaType::Tv).await);
            combined
        }
    };

    results.truncate(cmd.limit);

    if let Err(e) = output.print(&results) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

pub async fn info_cmd(cmd: InfoCmd, config: &Config, output: &Output) -> ExitCode {
    let client = metadata_client(config);

    output.info(format!("Getting info for: {}", cmd.id));

    let detail = client.details(cmd.media_type.into(), cmd.id).await;
    if let Err(e) = output.print(&detail) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

pub fn sources_cmd(cmd: SourcesCmd, config: &Config, output: &Output) -> ExitCode {
    let provider = SyntheticSourceProvider::new();
    let mut sources = provider.sources_for(cmd.id);

    if let Some(filter) = cmd.quality {
        let min = crate::models::SourceQuality::from(filter);
        sources.retain(|s| s.quality.rank() >= min.rank());
    } else if let Some(pref) = config.preferred_source_quality() {
        // No explicit filter: the configured preference leads the listing
        sources.sort_by_key(|s| s.quality != pref);
    }

    if sources.is_empty() {
        return output.error("No sources at the requested quality", ExitCode::NotFound);
    }

    if let Err(e) = output.print(&sources) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Session Commands
// =============================================================================

pub fn login_cmd(cmd: LoginCmd, config: &Config, output: &Output) -> ExitCode {
    let store = match open_store(output) {
        Ok(store) => store,
        Err(code) => return code,
    };

    let auth = Authenticator::new(config.auth_secret());
    match auth.sign_in(&cmd.email, &cmd.password, Utc::now()) {
        Ok(issued) => {
            if let Err(e) = store.save_session_token(&issued.token) {
                return output.error(format!("Failed to persist session: {}", e), ExitCode::Error);
            }
            output.info(format!("Signed in as {}", issued.session.name));
            if let Err(e) = output.print(session_info(&issued.session)) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(e.to_string(), ExitCode::Unauthorized),
    }
}

pub fn logout_cmd(_cmd: LogoutCmd, output: &Output) -> ExitCode {
    let store = match open_store(output) {
        Ok(store) => store,
        Err(code) => return code,
    };

    if let Err(e) = store.clear_session() {
        return output.error(format!("Failed to clear session: {}", e), ExitCode::Error);
    }

    output.info("Signed out");
    if let Err(e) = output.print(StatusOk::default()) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

pub fn whoami_cmd(_cmd: WhoamiCmd, config: &Config, output: &Output) -> ExitCode {
    let store = match open_store(output) {
        Ok(store) => store,
        Err(code) => return code,
    };

    match current_session(&store, config) {
        Some(session) => {
            if let Err(e) = output.print(session_info(&session)) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        None => output.error("Not signed in", ExitCode::Unauthorized),
    }
}

// =============================================================================
// Watchlist Commands
// =============================================================================

pub async fn list_cmd(cmd: ListCmd, config: &Config, output: &Output) -> ExitCode {
    let store = match open_store(output) {
        Ok(store) => store,
        Err(code) => return code,
    };

    // Watchlist mutation carries the same guard as the my-list screen
    if current_session(&store, config).is_none() {
        return output.error(
            "Sign in required (streamvibe login --help)",
            ExitCode::Unauthorized,
        );
    }

    match cmd.action {
        ListAction::Add { id, media_type } => {
            let client = metadata_client(config);
            let item = client.details(media_type.into(), id).await;
            let entry = WatchlistEntry::from_item(&item, Utc::now());

            if let Err(e) = store.watchlist_add(entry) {
                return output.error(format!("Failed to update watchlist: {}", e), ExitCode::Error);
            }

            output.info(format!("Added {} to your list", item.title));
            if let Err(e) = output.print(StatusOk::default()) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        ListAction::Remove { id } => {
            if !store.watchlist_contains(id) {
                return output.error(format!("{} is not on your list", id), ExitCode::NotFound);
            }

            if let Err(e) = store.watchlist_remove(id) {
                return output.error(format!("Failed to update watchlist: {}", e), ExitCode::Error);
            }

            output.info(format!("Removed {} from your list", id));
            if let Err(e) = output.print(StatusOk::default()) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        ListAction::Show => {
            let entries = store.watchlist();
            if let Err(e) = output.print(&entries) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
    }
}

//! TMDB (The Movie Database) API client
//!
//! Provides search, discovery, and metadata for movies and TV shows.
//! API docs: https://developer.themoviedb.org/docs
//!
//! Read paths never surface a transport error: any network, non-2xx, or
//! parse failure is logged and degrades to the designated placeholder data.
//! There is no retry, no backoff, and no caching: every call is a fresh
//! request/response against a read-only provider.

use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use crate::models::{CatalogItem, Credits, Genre, MediaType, Review, Video, GENRES};

/// Request timeout for all catalog calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Metadata provider error types. Internal taxonomy only: the public read
/// API substitutes fallback data instead of returning these.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Resource not found (404)")]
    NotFound,

    #[error("Upstream error: HTTP {0}")]
    Upstream(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// TMDB API client
pub struct MetadataClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl MetadataClient {
    /// Create a new client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, "https://api.themoviedb.org/3")
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Make an authenticated GET request. The API key rides as a query
    /// parameter alongside the fixed language setting.
    async fn get<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<T, MetadataError> {
        let sep = if endpoint.contains('?') { '&' } else { '?' };
        let url = format!(
            "{}{}{}api_key={}&language=en-US",
            self.base_url, endpoint, sep, self.api_key
        );

        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                serde_json::from_str(&body)
                    .map_err(|e| MetadataError::InvalidResponse(format!("JSON parse error: {}", e)))
            }
            StatusCode::NOT_FOUND => Err(MetadataError::NotFound),
            status => Err(MetadataError::Upstream(status.as_u16())),
        }
    }

    /// Fetch a result list, normalizing each entry to a catalog item
    async fn fetch_list(
        &self,
        endpoint: &str,
        media: MediaType,
    ) -> Result<Vec<CatalogItem>, MetadataError> {
        let response: ListResponse = self.get(endpoint).await?;
        Ok(response
            .results
            .into_iter()
            .map(|raw| raw.into_item(media))
            .collect())
    }

    // -------------------------------------------------------------------------
    // Public read API (degrades to fallback, never errors)
    // -------------------------------------------------------------------------

    /// Trending content for the week
    pub async fn trending(&self, media: MediaType) -> Vec<CatalogItem> {
        let endpoint = format!("/trending/{}/week", media_segment(media));
        self.list_or_fallback(&endpoint, media).await
    }

    /// Popular content
    pub async fn popular(&self, media: MediaType) -> Vec<CatalogItem> {
        let endpoint = format!("/{}/popular", media_segment(media));
        self.list_or_fallback(&endpoint, media).await
    }

    /// Movies currently in theaters
    pub async fn now_playing(&self) -> Vec<CatalogItem> {
        self.list_or_fallback("/movie/now_playing", MediaType::Movie)
            .await
    }

    /// Search by title. An empty query short-circuits to an empty list
    /// without touching the network.
    pub async fn search(&self, media: MediaType, query: &str) -> Vec<CatalogItem> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let endpoint = match media {
            MediaType::Movie => format!(
                "/search/movie?query={}&include_adult=false",
                urlencoding::encode(query)
            ),
            MediaType::Tv => format!("/search/tv?query={}", urlencoding::encode(query)),
        };
        self.list_or_fallback(&endpoint, media).await
    }

    /// Discover content by genre id
    pub async fn by_genre(&self, media: MediaType, genre_id: u64) -> Vec<CatalogItem> {
        let endpoint = format!(
            "/discover/{}?with_genres={}",
            media_segment(media),
            genre_id
        );
        self.list_or_fallback(&endpoint, media).await
    }

    /// Titles similar to the given item
    pub async fn similar(&self, media: MediaType, id: u64) -> Vec<CatalogItem> {
        let endpoint = format!("/{}/{}/similar", media_segment(media), id);
        self.list_or_fallback(&endpoint, media).await
    }

    /// Full detail record with videos, credits, and reviews appended.
    /// Falls back to the placeholder item when the provider is unreachable.
    pub async fn details(&self, media: MediaType, id: u64) -> CatalogItem {
        let endpoint = format!(
            "/{}/{}?append_to_response=videos,credits,reviews",
            media_segment(media),
            id
        );

        match self.get::<ItemRaw>(&endpoint).await {
            Ok(raw) => raw.into_item(media),
            Err(e) => {
                warn!(endpoint = %endpoint, error = %e, "detail fetch failed, using placeholder");
                CatalogItem::placeholder(media)
            }
        }
    }

    async fn list_or_fallback(&self, endpoint: &str, media: MediaType) -> Vec<CatalogItem> {
        match self.fetch_list(endpoint, media).await {
            Ok(items) => items,
            Err(e) => {
                warn!(endpoint = %endpoint, error = %e, "catalog fetch failed, using fallback");
                vec![CatalogItem::placeholder(media)]
            }
        }
    }
}

fn media_segment(media: MediaType) -> &'static str {
    match media {
        MediaType::Movie => "movie",
        MediaType::Tv => "tv",
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct ListResponse {
    results: Vec<ItemRaw>,
}

#[derive(Debug, Deserialize)]
struct VideoList {
    results: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct ReviewList {
    results: Vec<Review>,
}

#[derive(Debug, Deserialize)]
struct ItemRaw {
    id: u64,
    // Movies use "title", TV uses "name"
    title: Option<String>,
    name: Option<String>,
    // Movies use "release_date", TV uses "first_air_date"
    release_date: Option<String>,
    first_air_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    vote_average: Option<f32>,
    vote_count: Option<u32>,
    popularity: Option<f32>,
    // List endpoints carry genre ids, detail endpoints full genre objects
    genre_ids: Option<Vec<u64>>,
    genres: Option<Vec<Genre>>,
    runtime: Option<u32>,
    tagline: Option<String>,
    status: Option<String>,
    videos: Option<VideoList>,
    credits: Option<Credits>,
    reviews: Option<ReviewList>,
}

impl ItemRaw {
    fn into_item(self, media: MediaType) -> CatalogItem {
        let title = self.title.or(self.name).unwrap_or_default();
        let release_date = self
            .release_date
            .or(self.first_air_date)
            .filter(|d| !d.is_empty());

        let genres = match self.genres {
            Some(genres) => genres,
            None => self
                .genre_ids
                .unwrap_or_default()
                .into_iter()
                .filter_map(|id| {
                    GENRES.iter().find(|(gid, _)| *gid == id).map(|(gid, name)| Genre {
                        id: *gid,
                        name: (*name).to_string(),
                    })
                })
                .collect(),
        };

        CatalogItem {
            id: self.id,
            media_type: media,
            title,
            overview: self.overview.unwrap_or_default(),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            release_date,
            vote_average: self.vote_average.unwrap_or(0.0),
            vote_count: self.vote_count.unwrap_or(0),
            popularity: self.popularity.unwrap_or(0.0),
            genres,
            runtime: self.runtime,
            tagline: self.tagline.filter(|t| !t.is_empty()),
            status: self.status,
            videos: self.videos.map(|v| v.results).unwrap_or_default(),
            credits: self.credits,
            reviews: self.reviews.map(|r| r.results).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_segment() {
        assert_eq!(media_segment(MediaType::Movie), "movie");
        assert_eq!(media_segment(MediaType::Tv), "tv");
    }

    #[test]
    fn test_item_raw_merges_tv_fields() {
        let raw = ItemRaw {
            id: 1396,
            title: None,
            name: Some("Breaking Bad".to_string()),
            release_date: None,
            first_air_date: Some("2008-01-20".to_string()),
            overview: Some("A chemistry teacher".to_string()),
            poster_path: None,
            backdrop_path: None,
            vote_average: Some(9.5),
            vote_count: Some(12000),
            popularity: Some(300.0),
            genre_ids: Some(vec![18, 80]),
            genres: None,
            runtime: None,
            tagline: None,
            status: None,
            videos: None,
            credits: None,
            reviews: None,
        };

        let item = raw.into_item(MediaType::Tv);
        assert_eq!(item.title, "Breaking Bad");
        assert_eq!(item.release_date.as_deref(), Some("2008-01-20"));
        assert_eq!(item.year(), Some(2008));
        assert_eq!(item.genres.len(), 2);
        assert_eq!(item.genres[0].name, "Drama");
        assert_eq!(item.genres[1].name, "Crime");
    }

    #[test]
    fn test_item_raw_unknown_genre_ids_skipped() {
        let raw = ItemRaw {
            id: 1,
            title: Some("Test".to_string()),
            name: None,
            release_date: None,
            first_air_date: None,
            overview: None,
            poster_path: None,
            backdrop_path: None,
            vote_average: None,
            vote_count: None,
            popularity: None,
            genre_ids: Some(vec![28, 99999]),
            genres: None,
            runtime: None,
            tagline: None,
            status: None,
            videos: None,
            credits: None,
            reviews: None,
        };

        let item = raw.into_item(MediaType::Movie);
        assert_eq!(item.genres.len(), 1);
        assert_eq!(item.genres[0].name, "Action");
    }

    #[test]
    fn test_item_raw_empty_date_becomes_none() {
        let raw = ItemRaw {
            id: 1,
            title: Some("Test".to_string()),
            name: None,
            release_date: Some("".to_string()),
            first_air_date: None,
            overview: None,
            poster_path: None,
            backdrop_path: None,
            vote_average: None,
            vote_count: None,
            popularity: None,
            genre_ids: None,
            genres: None,
            runtime: None,
            tagline: None,
            status: None,
            videos: None,
            credits: None,
            reviews: None,
        };

        let item = raw.into_item(MediaType::Movie);
        assert_eq!(item.release_date, None);
        assert_eq!(item.year(), None);
    }
}

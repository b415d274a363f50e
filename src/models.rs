//! Data structures and types for StreamVibe
//!
//! Contains all shared models used across the application organized by domain:
//! - **Catalog**: normalized movie/TV records from the metadata provider
//! - **Images**: poster/backdrop URL construction
//! - **Watchlist**: locally persisted saved-items entries
//! - **Sources**: streaming source tuples (provider, url, quality)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base URL for provider-hosted images
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

// =============================================================================
// Catalog Models
// =============================================================================

/// Media type discriminator for catalog items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Movie => write!(f, "Movie"),
            MediaType::Tv => write!(f, "TV Show"),
        }
    }
}

/// Genre tag attached to a catalog item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Fixed genre table used for browse filters
pub const GENRES: &[(u64, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (18, "Drama"),
    (27, "Horror"),
    (878, "Science Fiction"),
    (53, "Thriller"),
];

/// Trailer or clip attached to a catalog item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(default)]
    pub size: u32,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Video {
    /// Thumbnail URL for the video. Only YouTube exposes predictable
    /// thumbnails; everything else gets the bundled placeholder.
    pub fn thumbnail_url(&self) -> String {
        if self.site == "YouTube" {
            format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", self.key)
        } else {
            "/images/placeholder-video.jpg".to_string()
        }
    }

    /// Watch URL for the video (YouTube only, empty otherwise)
    pub fn watch_url(&self) -> String {
        if self.site == "YouTube" {
            format!("https://www.youtube.com/watch?v={}", self.key)
        } else {
            String::new()
        }
    }
}

/// Cast credit on a catalog item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: String,
    pub profile_path: Option<String>,
    #[serde(default)]
    pub order: u32,
}

/// Crew credit on a catalog item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub job: String,
    pub profile_path: Option<String>,
}

/// Cast and crew credits
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

/// User review attached to a catalog item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub author: String,
    pub content: String,
}

/// Normalized movie or TV show record from the metadata provider.
///
/// Sourced read-only; never mutated locally. Lives for one request/response
/// cycle; nothing here is cached beyond screen state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: f32,
    pub vote_count: u32,
    pub popularity: f32,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub runtime: Option<u32>,
    pub tagline: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub videos: Vec<Video>,
    pub credits: Option<Credits>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl CatalogItem {
    /// The designated fallback record substituted when the provider is
    /// unreachable or returns garbage. Pure function of the media type, so
    /// degraded responses stay deterministic.
    pub fn placeholder(media_type: MediaType) -> Self {
        let (title, overview) = match media_type {
            MediaType::Movie => ("Sample Movie", "This is a sample movie description."),
            MediaType::Tv => ("Sample Show", "This is a sample show description."),
        };

        Self {
            id: 1,
            media_type,
            title: title.to_string(),
            overview: overview.to_string(),
            poster_path: Some("/placeholder.jpg".to_string()),
            backdrop_path: Some("/placeholder-backdrop.jpg".to_string()),
            release_date: Some("2023-01-01".to_string()),
            vote_average: 8.5,
            vote_count: 100,
            popularity: 500.5,
            genres: Vec::new(),
            runtime: None,
            tagline: None,
            status: None,
            videos: Vec::new(),
            credits: None,
            reviews: Vec::new(),
        }
    }

    /// Release year extracted from the date string
    pub fn year(&self) -> Option<u16> {
        self.release_date.as_deref().and_then(extract_year)
    }

    /// Format runtime as "2h 56m", or "N/A" when unknown
    pub fn format_runtime(&self) -> String {
        match self.runtime {
            Some(mins) if mins > 0 => format!("{}h {}m", mins / 60, mins % 60),
            _ => "N/A".to_string(),
        }
    }

    /// Trailers only, YouTube first (the only site the player can embed)
    pub fn trailers(&self) -> Vec<&Video> {
        let mut vids: Vec<&Video> = self
            .videos
            .iter()
            .filter(|v| v.kind == "Trailer" || v.kind.is_empty())
            .collect();
        vids.sort_by_key(|v| v.site != "YouTube");
        vids
    }
}

impl fmt::Display for CatalogItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year().map(|y| format!(" ({})", y)).unwrap_or_default();
        write!(
            f,
            "{}{} [{}] ★ {:.1}",
            self.title, year_str, self.media_type, self.vote_average
        )
    }
}

/// Extract year from a date string like "2022-03-04"
pub fn extract_year(date: &str) -> Option<u16> {
    if date.len() >= 4 {
        date[..4].parse().ok()
    } else {
        None
    }
}

// =============================================================================
// Image URLs
// =============================================================================

/// Requested image size for poster/backdrop URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    W500,
    Original,
}

impl ImageSize {
    fn segment(&self) -> &'static str {
        match self {
            ImageSize::W500 => "w500",
            ImageSize::Original => "original",
        }
    }
}

/// Build a full image URL from a provider path fragment.
///
/// An empty or missing path yields an empty string, never a broken request.
pub fn image_url(path: Option<&str>, size: ImageSize) -> String {
    match path {
        Some(p) if !p.is_empty() => format!("{}/{}{}", IMAGE_BASE_URL, size.segment(), p),
        _ => String::new(),
    }
}

// =============================================================================
// Watchlist Models
// =============================================================================

/// Saved-items entry, owned entirely by the local store.
///
/// The id must correspond to a catalog item the user viewed; there is no
/// server copy and no cross-device sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    pub poster_path: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl WatchlistEntry {
    /// Create an entry from a catalog item at the given instant
    pub fn from_item(item: &CatalogItem, now: DateTime<Utc>) -> Self {
        Self {
            id: item.id,
            media_type: item.media_type,
            title: item.title.clone(),
            poster_path: item.poster_path.clone(),
            added_at: now,
        }
    }
}

impl fmt::Display for WatchlistEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] added {}",
            self.title,
            self.media_type,
            self.added_at.format("%Y-%m-%d")
        )
    }
}

// =============================================================================
// Streaming Source Models
// =============================================================================

/// Video quality tier of a streaming source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SourceQuality {
    Uhd4k,
    Hd,
    #[default]
    Sd,
}

impl SourceQuality {
    /// Quality ranking for sorting (higher = better)
    pub fn rank(&self) -> u8 {
        match self {
            SourceQuality::Uhd4k => 2,
            SourceQuality::Hd => 1,
            SourceQuality::Sd => 0,
        }
    }

    /// Parse a user-facing quality label ("4K", "HD", "SD")
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "4k" | "uhd" => Some(SourceQuality::Uhd4k),
            "hd" => Some(SourceQuality::Hd),
            "sd" => Some(SourceQuality::Sd),
            _ => None,
        }
    }
}

impl fmt::Display for SourceQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceQuality::Uhd4k => write!(f, "4K"),
            SourceQuality::Hd => write!(f, "HD"),
            SourceQuality::Sd => write!(f, "SD"),
        }
    }
}

impl Ord for SourceQuality {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for SourceQuality {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// A place content can be played: provider + URL + quality.
///
/// Not an entitlement record. Embedded sources delegate playback to the
/// provider; native sources are driven by our own player surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingSource {
    /// Stable provider id ("tubi", "pluto", ...)
    pub provider: String,
    /// Human-readable provider name
    pub name: String,
    /// Playback URL on the provider
    pub url: String,
    pub quality: SourceQuality,
    /// Whether our native player drives playback (false = embedded)
    pub is_native: bool,
}

impl fmt::Display for StreamingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if self.is_native { "native" } else { "embed" };
        write!(f, "{} ({}) [{}]", self.name, self.quality, mode)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // MediaType Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_media_type_display() {
        assert_eq!(MediaType::Movie.to_string(), "Movie");
        assert_eq!(MediaType::Tv.to_string(), "TV Show");
    }

    #[test]
    fn test_media_type_serde() {
        let json = serde_json::to_string(&MediaType::Movie).unwrap();
        assert_eq!(json, "\"movie\"");

        let parsed: MediaType = serde_json::from_str("\"tv\"").unwrap();
        assert_eq!(parsed, MediaType::Tv);
    }

    // -------------------------------------------------------------------------
    // CatalogItem Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_catalog_item_year() {
        let mut item = CatalogItem::placeholder(MediaType::Movie);
        item.release_date = Some("2022-03-01".to_string());
        assert_eq!(item.year(), Some(2022));

        item.release_date = Some("".to_string());
        assert_eq!(item.year(), None);

        item.release_date = None;
        assert_eq!(item.year(), None);
    }

    #[test]
    fn test_format_runtime() {
        let mut item = CatalogItem::placeholder(MediaType::Movie);
        item.runtime = Some(176);
        assert_eq!(item.format_runtime(), "2h 56m");

        item.runtime = Some(45);
        assert_eq!(item.format_runtime(), "0h 45m");

        item.runtime = None;
        assert_eq!(item.format_runtime(), "N/A");
    }

    #[test]
    fn test_placeholder_is_deterministic() {
        let a = CatalogItem::placeholder(MediaType::Movie);
        let b = CatalogItem::placeholder(MediaType::Movie);
        assert_eq!(a.id, b.id);
        assert_eq!(a.title, b.title);
        assert_eq!(a.overview, b.overview);
        assert_eq!(a.title, "Sample Movie");
        assert_eq!(a.poster_path.as_deref(), Some("/placeholder.jpg"));
    }

    #[test]
    fn test_catalog_item_display() {
        let mut item = CatalogItem::placeholder(MediaType::Movie);
        item.title = "The Batman".to_string();
        item.release_date = Some("2022-03-01".to_string());
        item.vote_average = 7.8;
        assert_eq!(item.to_string(), "The Batman (2022) [Movie] ★ 7.8");
    }

    #[test]
    fn test_trailers_youtube_first() {
        let mut item = CatalogItem::placeholder(MediaType::Movie);
        item.videos = vec![
            Video {
                id: "1".into(),
                key: "vim1".into(),
                name: "Vimeo Trailer".into(),
                site: "Vimeo".into(),
                size: 1080,
                kind: "Trailer".into(),
            },
            Video {
                id: "2".into(),
                key: "yt1".into(),
                name: "Official Trailer".into(),
                site: "YouTube".into(),
                size: 1080,
                kind: "Trailer".into(),
            },
            Video {
                id: "3".into(),
                key: "yt2".into(),
                name: "Featurette".into(),
                site: "YouTube".into(),
                size: 1080,
                kind: "Featurette".into(),
            },
        ];

        let trailers = item.trailers();
        assert_eq!(trailers.len(), 2);
        assert_eq!(trailers[0].site, "YouTube");
        assert_eq!(trailers[1].site, "Vimeo");
    }

    // -------------------------------------------------------------------------
    // Video Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_video_thumbnail_youtube() {
        let video = Video {
            id: "1".into(),
            key: "dQw4w9WgXcQ".into(),
            name: "Trailer".into(),
            site: "YouTube".into(),
            size: 1080,
            kind: "Trailer".into(),
        };
        assert_eq!(
            video.thumbnail_url(),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg"
        );
        assert_eq!(
            video.watch_url(),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_video_thumbnail_other_site() {
        let video = Video {
            id: "1".into(),
            key: "12345".into(),
            name: "Trailer".into(),
            site: "Vimeo".into(),
            size: 1080,
            kind: "Trailer".into(),
        };
        assert_eq!(video.thumbnail_url(), "/images/placeholder-video.jpg");
        assert_eq!(video.watch_url(), "");
    }

    // -------------------------------------------------------------------------
    // Image URL Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_image_url_w500() {
        assert_eq!(
            image_url(Some("/abc.jpg"), ImageSize::W500),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
    }

    #[test]
    fn test_image_url_original() {
        assert_eq!(
            image_url(Some("/abc.jpg"), ImageSize::Original),
            "https://image.tmdb.org/t/p/original/abc.jpg"
        );
    }

    #[test]
    fn test_image_url_missing_path() {
        assert_eq!(image_url(None, ImageSize::W500), "");
        assert_eq!(image_url(Some(""), ImageSize::Original), "");
    }

    // -------------------------------------------------------------------------
    // WatchlistEntry Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_watchlist_entry_from_item() {
        let mut item = CatalogItem::placeholder(MediaType::Movie);
        item.id = 550;
        item.title = "Fight Club".to_string();

        let now = Utc::now();
        let entry = WatchlistEntry::from_item(&item, now);

        assert_eq!(entry.id, 550);
        assert_eq!(entry.title, "Fight Club");
        assert_eq!(entry.added_at, now);
    }

    // -------------------------------------------------------------------------
    // SourceQuality Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_quality_ordering() {
        assert!(SourceQuality::Uhd4k > SourceQuality::Hd);
        assert!(SourceQuality::Hd > SourceQuality::Sd);
    }

    #[test]
    fn test_quality_display() {
        assert_eq!(SourceQuality::Uhd4k.to_string(), "4K");
        assert_eq!(SourceQuality::Hd.to_string(), "HD");
        assert_eq!(SourceQuality::Sd.to_string(), "SD");
    }

    #[test]
    fn test_quality_parse() {
        assert_eq!(SourceQuality::parse("4K"), Some(SourceQuality::Uhd4k));
        assert_eq!(SourceQuality::parse("uhd"), Some(SourceQuality::Uhd4k));
        assert_eq!(SourceQuality::parse(" hd "), Some(SourceQuality::Hd));
        assert_eq!(SourceQuality::parse("SD"), Some(SourceQuality::Sd));
        assert_eq!(SourceQuality::parse("1080p"), None);
        assert_eq!(SourceQuality::parse(""), None);
    }

    #[test]
    fn test_streaming_source_display() {
        let source = StreamingSource {
            provider: "tubi".into(),
            name: "Tubi".into(),
            url: "https://tubitv.com/movies/tubi-550-1234".into(),
            quality: SourceQuality::Hd,
            is_native: true,
        };
        assert_eq!(source.to_string(), "Tubi (HD) [native]");
    }

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year("2022-03-04"), Some(2022));
        assert_eq!(extract_year("2019-11-12"), Some(2019));
        assert_eq!(extract_year(""), None);
        assert_eq!(extract_year("abc"), None);
    }
}

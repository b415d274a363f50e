//! Clients for external catalog and streaming services
//!
//! - TMDB: movie/TV metadata, search, and discovery
//! - Sources: streaming source resolution (synthetic for now)

pub mod sources;
pub mod tmdb;

pub use sources::{SourceProvider, SyntheticSourceProvider};
pub use tmdb::MetadataClient;

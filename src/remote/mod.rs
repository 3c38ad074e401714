//! # Remote Integration Module
//!
//! This module provides the interface to the Spotify Web API used by the
//! synchronisation engine. All HTTP communication, authentication, and rate
//! limit handling lives here, behind the [`RemoteApi`] trait so the search,
//! check, and reconciliation engines can be driven against a mock in tests.
//!
//! ## Architecture
//!
//! ```text
//! Matching / Checking / Reconciliation
//!          ↓
//! RemoteApi trait (this module)
//!     ├── SpotifyClient (reqwest + TokenManager)
//!     └── PlaylistReconciler (diff + sync strategies)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Error Handling
//!
//! Every call returns [`ApiError`] once the client's own retry policy is
//! exhausted. Rate limit responses (429) are retried automatically when the
//! `Retry-After` delay is reasonable; 502 Bad Gateway responses are retried
//! after a fixed delay. Remaining 4xx/5xx statuses surface to the caller:
//! search paths treat them as "no match found", destructive playlist paths
//! propagate them so a partially-modified playlist is never silently
//! forgotten.
//!
//! ## API Coverage
//!
//! - `GET /search` - Track and album queries
//! - `GET /albums/{id}` - Full album detail with track listing
//! - `GET /tracks` - Batch track lookup by id
//! - `GET /me/playlists` - The user's playlists
//! - `GET /playlists/{id}/tracks` - Playlist contents with pagination
//! - `POST /users/{user_id}/playlists` - Create playlists
//! - `POST /playlists/{id}/tracks` - Add tracks
//! - `DELETE /playlists/{id}/tracks` - Remove tracks
//! - `DELETE /playlists/{id}/followers` - Unfollow (delete) playlists

pub mod auth;
mod client;
mod reconciler;

pub use client::SpotifyClient;
pub use reconciler::PlaylistReconciler;
pub use reconciler::SyncKind;
pub use reconciler::SyncResult;

use async_trait::async_trait;

use crate::types::{AlbumDetail, RemoteAlbum, RemoteTrack, UserPlaylist};

#[derive(Debug)]
pub enum ApiError {
    Http(reqwest::Error),
    Status { code: u16, url: String },
    SerdeError(serde_json::Error),
    TokenError(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Http(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::SerdeError(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Http(e) => write!(f, "http error: {}", e),
            ApiError::Status { code, url } => write!(f, "status {} for {}", code, url),
            ApiError::SerdeError(e) => write!(f, "decode error: {}", e),
            ApiError::TokenError(e) => write!(f, "token error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}

/// High-level verbs the sync engine needs from the remote service.
///
/// Implementations guarantee eventual success or a typed [`ApiError`] after
/// exhausting their own retry policy. No implementation may mutate remote
/// state through the read-only verbs.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<RemoteTrack>, ApiError>;

    async fn search_albums(&self, query: &str, limit: u32) -> Result<Vec<RemoteAlbum>, ApiError>;

    /// Full album detail (including its track listing) for a search result.
    async fn album_tracks(&self, album: &RemoteAlbum) -> Result<AlbumDetail, ApiError>;

    /// All tracks currently in the playlist at `url`, in playlist order.
    async fn playlist_items(&self, url: &str) -> Result<Vec<RemoteTrack>, ApiError>;

    /// Batch track lookup by URI, URL, or bare id.
    async fn get_tracks(&self, ids: &[String]) -> Result<Vec<RemoteTrack>, ApiError>;

    async fn user_playlists(&self) -> Result<Vec<UserPlaylist>, ApiError>;

    /// Creates a playlist and returns its API URL.
    async fn create_playlist(
        &self,
        name: &str,
        public: bool,
        collaborative: bool,
    ) -> Result<String, ApiError>;

    /// Adds tracks and returns the number actually added (the service may
    /// drop duplicates when `skip_dupes` is set).
    async fn add_to_playlist(
        &self,
        url: &str,
        uris: &[String],
        skip_dupes: bool,
    ) -> Result<usize, ApiError>;

    /// Removes the given tracks, or every track when `uris` is `None`.
    /// Returns the number removed.
    async fn clear_from_playlist(
        &self,
        url: &str,
        uris: Option<&[String]>,
    ) -> Result<usize, ApiError>;

    async fn delete_playlist(&self, url: &str) -> Result<(), ApiError>;
}

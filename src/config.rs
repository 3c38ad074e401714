//! Configuration management for the Spotify library synchroniser.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. It provides a centralized way to
//! manage application configuration including Spotify API credentials, local
//! library paths, and the matching algorithm settings.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use dotenv;
use std::{env, path::PathBuf};

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `splisync/.env`. This allows users to store
/// configuration securely without hardcoding sensitive values.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/splisync/.env`
/// - macOS: `~/Library/Application Support/splisync/.env`
/// - Windows: `%LOCALAPPDATA%/splisync/.env`
///
/// # Returns
///
/// Returns `Ok(())` if the environment file is successfully loaded, or an
/// error string if directory creation or file loading fails.
///
/// # Example
///
/// ```
/// use splisync::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("splisync/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    dotenv::from_path(path).map_err(|e| e.to_string())?;
    Ok(())
}

/// Returns the Spotify user ID for API operations.
///
/// Retrieves the `SPOTIFY_USER_ID` environment variable which identifies
/// the Spotify user account for playlist creation and other user-specific
/// operations.
///
/// # Panics
///
/// Panics if the `SPOTIFY_USER_ID` environment variable is not set.
pub fn spotify_user() -> String {
    env::var("SPOTIFY_USER_ID").expect("SPOTIFY_USER_ID must be set")
}

/// Returns the Spotify API client ID for authentication.
///
/// Retrieves the `SPOTIFY_API_AUTH_CLIENT_ID` environment variable which
/// contains the client ID obtained when registering the application with
/// Spotify's developer platform.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_CLIENT_ID` environment variable is not set.
pub fn spotify_client_id() -> String {
    env::var("SPOTIFY_API_AUTH_CLIENT_ID").expect("SPOTIFY_API_AUTH_CLIENT_ID must be set")
}

/// Returns the Spotify OAuth redirect URI.
///
/// Retrieves the `SPOTIFY_API_REDIRECT_URI` environment variable which
/// specifies the callback URL that Spotify should redirect to after user
/// authorization. This must match the redirect URI registered in the Spotify
/// application settings.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_REDIRECT_URI` environment variable is not set.
pub fn spotify_redirect_uri() -> String {
    env::var("SPOTIFY_API_REDIRECT_URI").expect("SPOTIFY_API_REDIRECT_URI must be set")
}

/// Returns the Spotify API scope permissions.
///
/// Retrieves the `SPOTIFY_API_AUTH_SCOPE` environment variable which defines
/// the scope of permissions requested during OAuth authentication.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_SCOPE` environment variable is not set.
pub fn spotify_scope() -> String {
    env::var("SPOTIFY_API_AUTH_SCOPE").expect("SPOTIFY_API_AUTH_SCOPE must be set")
}

/// Returns the Spotify OAuth authorization URL.
///
/// Retrieves the `SPOTIFY_API_AUTH_URL` environment variable which contains
/// the base URL for Spotify's OAuth authorization endpoint.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_URL` environment variable is not set.
pub fn spotify_apiauth_url() -> String {
    env::var("SPOTIFY_API_AUTH_URL").expect("SPOTIFY_API_AUTH_URL must be set")
}

/// Returns the Spotify Web API base URL.
///
/// Retrieves the `SPOTIFY_API_URL` environment variable which contains the
/// base URL for Spotify's Web API endpoints. This is used for all API
/// operations after authentication.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_URL` environment variable is not set.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").expect("SPOTIFY_API_URL must be set")
}

/// Returns the Spotify OAuth token exchange URL.
///
/// Retrieves the `SPOTIFY_API_TOKEN_URL` environment variable which contains
/// the URL for exchanging authorization codes for access tokens during the
/// OAuth flow.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_TOKEN_URL` environment variable is not set.
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL").expect("SPOTIFY_API_TOKEN_URL must be set")
}

/// Read-only application configuration.
///
/// Built once from the environment at process start and passed by reference
/// into each component. Components never read the environment themselves;
/// everything tunable lives here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory of the local music library.
    pub music_dir: PathBuf,
    /// Directory containing `.m3u` playlists, if any.
    pub playlist_dir: Option<PathBuf>,
    /// Signed algorithm id for per-track matching. See `matching::tiers`.
    pub algorithm_track: i32,
    /// Algorithm depth for album matching.
    pub algorithm_album: i32,
    /// Number of temporary playlists to create per interactive check batch.
    pub check_interval: usize,
    /// Number of results to request per search query.
    pub search_limit: u32,
}

impl Config {
    /// Builds the configuration from the environment.
    ///
    /// `SPLISYNC_MUSIC_DIR` is required. `SPLISYNC_PLAYLIST_DIR`,
    /// `SPLISYNC_TRACK_ALGORITHM` (default 4), `SPLISYNC_ALBUM_ALGORITHM`
    /// (default 2), `SPLISYNC_CHECK_INTERVAL` (default 10) and
    /// `SPLISYNC_SEARCH_LIMIT` (default 10) are optional.
    ///
    /// # Panics
    ///
    /// Panics if `SPLISYNC_MUSIC_DIR` is not set.
    pub fn from_env() -> Self {
        let music_dir = env::var("SPLISYNC_MUSIC_DIR").expect("SPLISYNC_MUSIC_DIR must be set");
        let playlist_dir = env::var("SPLISYNC_PLAYLIST_DIR").ok().map(PathBuf::from);

        Config {
            music_dir: PathBuf::from(music_dir),
            playlist_dir,
            algorithm_track: env_or("SPLISYNC_TRACK_ALGORITHM", 4),
            algorithm_album: env_or("SPLISYNC_ALBUM_ALGORITHM", 2),
            check_interval: env_or("SPLISYNC_CHECK_INTERVAL", 10),
            search_limit: env_or("SPLISYNC_SEARCH_LIMIT", 10),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::{
    config,
    management::TokenManager,
    remote::{ApiError, RemoteApi},
    types::{
        AddTracksRequest, AddTracksResponse, AlbumDetail, AlbumSearchResponse,
        CreatePlaylistRequest, CreatePlaylistResponse, PlaylistItemsResponse, RemoteAlbum,
        RemoteTrack, RemoveTracksRequest, TrackSearchResponse, TrackUriObject, UserPlaylist,
        UserPlaylistsResponse,
    },
    utils, warning,
};

/// Spotify imposes a limit of 100 track URIs per playlist mutation request.
const PLAYLIST_CHUNK: usize = 100;

#[derive(Debug, Clone, serde::Deserialize)]
struct SeveralTracksResponse {
    tracks: Vec<Option<RemoteTrack>>,
}

/// Spotify Web API implementation of [`RemoteApi`].
///
/// Wraps a reqwest client and the stored OAuth token. Every request refreshes
/// the token when necessary, honours `Retry-After` on 429 responses (up to
/// 120 seconds), and retries 502 Bad Gateway responses after a 10 second
/// delay. All other error statuses are returned as [`ApiError::Status`].
pub struct SpotifyClient {
    client: Client,
    api_url: String,
    token: Mutex<TokenManager>,
}

impl SpotifyClient {
    /// Creates a client from the stored token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::TokenError`] if no token has been stored yet, in
    /// which case the user needs to run `splisync auth` first.
    pub async fn new() -> Result<Self, ApiError> {
        let manager = TokenManager::load()
            .await
            .map_err(|e| ApiError::TokenError(format!("{} - run splisync auth", e)))?;

        Ok(SpotifyClient {
            client: Client::new(),
            api_url: config::spotify_apiurl(),
            token: Mutex::new(manager),
        })
    }

    /// Sends one authenticated request and decodes the JSON response.
    ///
    /// Retries internally on rate limiting and bad gateway responses; every
    /// other non-success status is surfaced to the caller.
    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        loop {
            let token = self.token.lock().await.get_valid_token().await;
            let mut request = self
                .client
                .request(method.clone(), url)
                .bearer_auth(token)
                .query(query);
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(0);
                if retry_after <= 120 {
                    sleep(Duration::from_secs(retry_after)).await;
                    continue;
                }
                warning!(
                    "Retry after has reached an abnormal high of {} seconds. Try again tomorrow.",
                    retry_after
                );
                return Err(ApiError::Status {
                    code: status.as_u16(),
                    url: url.to_string(),
                });
            }

            if status == StatusCode::BAD_GATEWAY {
                sleep(Duration::from_secs(10)).await;
                continue;
            }

            if !status.is_success() {
                return Err(ApiError::Status {
                    code: status.as_u16(),
                    url: url.to_string(),
                });
            }

            return Ok(response.json::<T>().await?);
        }
    }

    /// Like `request_json` for endpoints whose response body does not matter.
    async fn request_empty(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<(), ApiError> {
        loop {
            let token = self.token.lock().await.get_valid_token().await;
            let mut request = self.client.request(method.clone(), url).bearer_auth(token);
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(0);
                if retry_after <= 120 {
                    sleep(Duration::from_secs(retry_after)).await;
                    continue;
                }
            }

            if status == StatusCode::BAD_GATEWAY {
                sleep(Duration::from_secs(10)).await;
                continue;
            }

            if !status.is_success() {
                return Err(ApiError::Status {
                    code: status.as_u16(),
                    url: url.to_string(),
                });
            }

            return Ok(());
        }
    }

    /// Collects every page of a playlist-items listing.
    async fn playlist_pages(&self, url: &str) -> Result<Vec<RemoteTrack>, ApiError> {
        let mut tracks = Vec::new();
        let mut next = Some(format!("{}/tracks", url.trim_end_matches('/')));

        while let Some(page_url) = next {
            let page: PlaylistItemsResponse = self
                .request_json(Method::GET, &page_url, &[], None)
                .await?;
            tracks.extend(page.items.into_iter().filter_map(|i| i.track));
            next = page.next;
        }

        Ok(tracks)
    }
}

#[async_trait::async_trait]
impl RemoteApi for SpotifyClient {
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<RemoteTrack>, ApiError> {
        let url = format!("{}/search", self.api_url);
        let response: TrackSearchResponse = self
            .request_json(
                Method::GET,
                &url,
                &[
                    ("q", query.to_string()),
                    ("type", "track".to_string()),
                    ("limit", limit.to_string()),
                ],
                None,
            )
            .await?;
        Ok(response.tracks.items)
    }

    async fn search_albums(&self, query: &str, limit: u32) -> Result<Vec<RemoteAlbum>, ApiError> {
        let url = format!("{}/search", self.api_url);
        let response: AlbumSearchResponse = self
            .request_json(
                Method::GET,
                &url,
                &[
                    ("q", query.to_string()),
                    ("type", "album".to_string()),
                    ("limit", limit.to_string()),
                ],
                None,
            )
            .await?;
        Ok(response.albums.items)
    }

    async fn album_tracks(&self, album: &RemoteAlbum) -> Result<AlbumDetail, ApiError> {
        self.request_json(Method::GET, &album.href, &[], None).await
    }

    async fn playlist_items(&self, url: &str) -> Result<Vec<RemoteTrack>, ApiError> {
        self.playlist_pages(url).await
    }

    async fn get_tracks(&self, ids: &[String]) -> Result<Vec<RemoteTrack>, ApiError> {
        let ids: Vec<String> = ids.iter().filter_map(|v| utils::spotify_id(v)).collect();
        let mut tracks = Vec::new();

        for chunk in ids.chunks(50) {
            let url = format!("{}/tracks", self.api_url);
            let response: SeveralTracksResponse = self
                .request_json(Method::GET, &url, &[("ids", chunk.join(","))], None)
                .await?;
            tracks.extend(response.tracks.into_iter().flatten());
        }

        Ok(tracks)
    }

    async fn user_playlists(&self) -> Result<Vec<UserPlaylist>, ApiError> {
        let mut playlists = Vec::new();
        let mut next = Some(format!("{}/me/playlists", self.api_url));

        while let Some(page_url) = next {
            let page: UserPlaylistsResponse = self
                .request_json(Method::GET, &page_url, &[("limit", "50".to_string())], None)
                .await?;
            playlists.extend(page.items);
            next = page.next;
        }

        Ok(playlists)
    }

    async fn create_playlist(
        &self,
        name: &str,
        public: bool,
        collaborative: bool,
    ) -> Result<String, ApiError> {
        let url = format!("{}/users/{}/playlists", self.api_url, config::spotify_user());
        let body = serde_json::to_value(CreatePlaylistRequest {
            name: name.to_string(),
            description: String::new(),
            public,
            collaborative,
        })?;

        let response: CreatePlaylistResponse = self
            .request_json(Method::POST, &url, &[], Some(&body))
            .await?;
        Ok(response.href)
    }

    async fn add_to_playlist(
        &self,
        url: &str,
        uris: &[String],
        skip_dupes: bool,
    ) -> Result<usize, ApiError> {
        let mut uris: Vec<String> = uris.to_vec();
        if skip_dupes {
            let current = self.playlist_items(url).await?;
            uris.retain(|uri| !current.iter().any(|t| &t.uri == uri));
        }

        let endpoint = format!("{}/tracks", url.trim_end_matches('/'));
        let mut added = 0;
        for chunk in uris.chunks(PLAYLIST_CHUNK) {
            let body = serde_json::to_value(AddTracksRequest {
                uris: chunk.to_vec(),
            })?;
            let _: AddTracksResponse = self
                .request_json(Method::POST, &endpoint, &[], Some(&body))
                .await?;
            added += chunk.len();
        }

        Ok(added)
    }

    async fn clear_from_playlist(
        &self,
        url: &str,
        uris: Option<&[String]>,
    ) -> Result<usize, ApiError> {
        let to_remove: Vec<String> = match uris {
            Some(uris) => uris.to_vec(),
            None => self
                .playlist_items(url)
                .await?
                .into_iter()
                .map(|t| t.uri)
                .collect(),
        };

        let endpoint = format!("{}/tracks", url.trim_end_matches('/'));
        let mut removed = 0;
        for chunk in to_remove.chunks(PLAYLIST_CHUNK) {
            let body = serde_json::to_value(RemoveTracksRequest {
                tracks: chunk
                    .iter()
                    .map(|uri| TrackUriObject { uri: uri.clone() })
                    .collect(),
            })?;
            self.request_empty(Method::DELETE, &endpoint, Some(&body))
                .await?;
            removed += chunk.len();
        }

        Ok(removed)
    }

    async fn delete_playlist(&self, url: &str) -> Result<(), ApiError> {
        let endpoint = format!("{}/followers", url.trim_end_matches('/'));
        self.request_empty(Method::DELETE, &endpoint, None).await
    }
}

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use splisync::check::UserInput;
use splisync::library::{LocalTrack, Uri};
use splisync::remote::{ApiError, RemoteApi};
use splisync::types::{
    AlbumDetail, AlbumTracks, ArtistRef, RemoteAlbum, RemoteTrack, UserPlaylist,
};

// Helper to create a local track with the given tags
pub fn local(title: &str, artist: &str, album: &str, length: f64) -> LocalTrack {
    let mut track = LocalTrack::new(PathBuf::from(format!(
        "/music/{}/{}.mp3",
        album.replace(' ', "_"),
        title.replace(' ', "_")
    )));
    track.title = title.to_string();
    track.artist = artist.to_string();
    track.album = album.to_string();
    track.album_artist = artist.to_string();
    track.length = length;
    track
}

pub fn local_with_uri(title: &str, artist: &str, album: &str, length: f64, uri: &str) -> LocalTrack {
    let mut track = local(title, artist, album, length);
    track.uri = Uri::Resolved(uri.to_string());
    track
}

// Helper to create a remote track candidate
pub fn remote_track(name: &str, uri: &str, duration_ms: u64) -> RemoteTrack {
    RemoteTrack {
        name: name.to_string(),
        uri: uri.to_string(),
        duration_ms,
        artists: vec![ArtistRef {
            name: "Someone".to_string(),
        }],
        album: None,
    }
}

pub fn remote_track_full(
    name: &str,
    uri: &str,
    duration_ms: u64,
    artist: &str,
    album: &str,
    release_date: &str,
) -> RemoteTrack {
    RemoteTrack {
        name: name.to_string(),
        uri: uri.to_string(),
        duration_ms,
        artists: vec![ArtistRef {
            name: artist.to_string(),
        }],
        album: Some(splisync::types::AlbumRef {
            name: album.to_string(),
            release_date: release_date.to_string(),
            artists: vec![ArtistRef {
                name: artist.to_string(),
            }],
        }),
    }
}

pub fn remote_album(name: &str, id: &str, artist: &str, total_tracks: u32) -> RemoteAlbum {
    RemoteAlbum {
        id: id.to_string(),
        name: name.to_string(),
        uri: format!("spotify:album:{}", id),
        href: format!("mock://albums/{}", id),
        total_tracks,
        release_date: "2020-01-01".to_string(),
        artists: vec![ArtistRef {
            name: artist.to_string(),
        }],
    }
}

pub fn album_detail(album: &RemoteAlbum, tracks: Vec<RemoteTrack>) -> AlbumDetail {
    AlbumDetail {
        name: album.name.clone(),
        uri: album.uri.clone(),
        artists: album.artists.clone(),
        tracks: AlbumTracks { items: tracks },
    }
}

/// Scripted stand-in for stdin. Returns `None` (end of input) once the
/// script runs out.
pub struct ScriptedInput {
    lines: Vec<String>,
}

impl ScriptedInput {
    pub fn new(lines: &[&str]) -> Self {
        ScriptedInput {
            lines: lines.iter().rev().map(|s| s.to_string()).collect(),
        }
    }
}

impl UserInput for ScriptedInput {
    fn read_line(&mut self, _prompt: &str) -> Option<String> {
        self.lines.pop()
    }
}

/// In-memory RemoteApi double that records every mutating call.
#[derive(Default)]
pub struct MockApi {
    pub tracks_by_query: Mutex<HashMap<String, Vec<RemoteTrack>>>,
    pub albums_by_query: Mutex<HashMap<String, Vec<RemoteAlbum>>>,
    pub album_details: Mutex<HashMap<String, AlbumDetail>>,
    /// url -> current playlist contents
    pub playlists: Mutex<HashMap<String, Vec<RemoteTrack>>>,
    /// name of the collection each temp playlist was created for
    pub playlist_names: Mutex<HashMap<String, String>>,
    /// playlist contents presented instead of the stored ones, keyed by the
    /// name the playlist was created with (simulates user edits)
    pub edits_by_name: Mutex<HashMap<String, Vec<RemoteTrack>>>,
    /// urls for which playlist_items fails with a server error
    pub fail_items: Mutex<HashSet<String>>,
    pub user_playlists: Mutex<Vec<UserPlaylist>>,
    pub track_catalog: Mutex<HashMap<String, RemoteTrack>>,

    pub queries: Mutex<Vec<String>>,
    pub created: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<String>>,
    pub add_calls: Mutex<Vec<(String, Vec<String>, bool)>>,
    pub clear_calls: Mutex<Vec<(String, Option<Vec<String>>)>>,
    next_id: AtomicUsize,
}

impl MockApi {
    pub fn new() -> Self {
        MockApi::default()
    }

    pub fn with_tracks(query: &str, tracks: Vec<RemoteTrack>) -> Self {
        let api = MockApi::new();
        api.stub_tracks(query, tracks);
        api
    }

    pub fn stub_tracks(&self, query: &str, tracks: Vec<RemoteTrack>) {
        self.tracks_by_query
            .lock()
            .unwrap()
            .insert(query.to_string(), tracks);
    }

    pub fn stub_albums(&self, query: &str, albums: Vec<RemoteAlbum>) {
        self.albums_by_query
            .lock()
            .unwrap()
            .insert(query.to_string(), albums);
    }

    pub fn stub_album_detail(&self, album: &RemoteAlbum, detail: AlbumDetail) {
        self.album_details
            .lock()
            .unwrap()
            .insert(album.href.clone(), detail);
    }

    pub fn stub_playlist(&self, url: &str, tracks: Vec<RemoteTrack>) {
        self.playlists
            .lock()
            .unwrap()
            .insert(url.to_string(), tracks);
    }

    pub fn stub_edit(&self, name: &str, tracks: Vec<RemoteTrack>) {
        self.edits_by_name
            .lock()
            .unwrap()
            .insert(name.to_string(), tracks);
    }

    pub fn fail_items_for(&self, url: &str) {
        self.fail_items.lock().unwrap().insert(url.to_string());
    }

    pub fn deleted_urls(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn created_urls(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteApi for MockApi {
    async fn search_tracks(&self, query: &str, _limit: u32) -> Result<Vec<RemoteTrack>, ApiError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self
            .tracks_by_query
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }

    async fn search_albums(&self, query: &str, _limit: u32) -> Result<Vec<RemoteAlbum>, ApiError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self
            .albums_by_query
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }

    async fn album_tracks(&self, album: &RemoteAlbum) -> Result<AlbumDetail, ApiError> {
        self.album_details
            .lock()
            .unwrap()
            .get(&album.href)
            .cloned()
            .ok_or(ApiError::Status {
                code: 404,
                url: album.href.clone(),
            })
    }

    async fn playlist_items(&self, url: &str) -> Result<Vec<RemoteTrack>, ApiError> {
        if self.fail_items.lock().unwrap().contains(url) {
            return Err(ApiError::Status {
                code: 500,
                url: url.to_string(),
            });
        }

        if let Some(name) = self.playlist_names.lock().unwrap().get(url) {
            if let Some(edit) = self.edits_by_name.lock().unwrap().get(name) {
                return Ok(edit.clone());
            }
        }

        Ok(self
            .playlists
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_tracks(&self, ids: &[String]) -> Result<Vec<RemoteTrack>, ApiError> {
        let catalog = self.track_catalog.lock().unwrap();
        Ok(ids.iter().filter_map(|id| catalog.get(id).cloned()).collect())
    }

    async fn user_playlists(&self) -> Result<Vec<UserPlaylist>, ApiError> {
        Ok(self.user_playlists.lock().unwrap().clone())
    }

    async fn create_playlist(
        &self,
        name: &str,
        _public: bool,
        _collaborative: bool,
    ) -> Result<String, ApiError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let url = format!("mock://playlists/{}", id);
        self.created.lock().unwrap().push(url.clone());
        self.playlists
            .lock()
            .unwrap()
            .insert(url.clone(), Vec::new());
        self.playlist_names
            .lock()
            .unwrap()
            .insert(url.clone(), name.to_string());
        Ok(url)
    }

    async fn add_to_playlist(
        &self,
        url: &str,
        uris: &[String],
        skip_dupes: bool,
    ) -> Result<usize, ApiError> {
        self.add_calls
            .lock()
            .unwrap()
            .push((url.to_string(), uris.to_vec(), skip_dupes));

        let mut playlists = self.playlists.lock().unwrap();
        let tracks = playlists.entry(url.to_string()).or_default();

        let mut added = 0;
        for uri in uris {
            if skip_dupes && tracks.iter().any(|t| &t.uri == uri) {
                continue;
            }
            tracks.push(remote_track(uri, uri, 0));
            added += 1;
        }
        Ok(added)
    }

    async fn clear_from_playlist(
        &self,
        url: &str,
        uris: Option<&[String]>,
    ) -> Result<usize, ApiError> {
        self.clear_calls
            .lock()
            .unwrap()
            .push((url.to_string(), uris.map(|u| u.to_vec())));

        let mut playlists = self.playlists.lock().unwrap();
        let tracks = playlists.entry(url.to_string()).or_default();

        match uris {
            Some(uris) => {
                let before = tracks.len();
                tracks.retain(|t| !uris.contains(&t.uri));
                Ok(before - tracks.len())
            }
            None => {
                let removed = tracks.len();
                tracks.clear();
                Ok(removed)
            }
        }
    }

    async fn delete_playlist(&self, url: &str) -> Result<(), ApiError> {
        self.deleted.lock().unwrap().push(url.to_string());
        self.playlists.lock().unwrap().remove(url);
        Ok(())
    }
}

/// Config pointing at nothing in particular, for components that only read
/// the algorithm settings.
pub fn test_config() -> splisync::config::Config {
    splisync::config::Config {
        music_dir: PathBuf::from("/nonexistent"),
        playlist_dir: None,
        algorithm_track: 4,
        algorithm_album: 2,
        check_interval: 10,
        search_limit: 10,
    }
}

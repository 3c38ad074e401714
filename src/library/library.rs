use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;
use crate::library::{FileTagProvider, LocalTrack, TagProvider, Uri};
use crate::warning;

/// A named, ordered group of local tracks: one album folder or one playlist.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TrackCollection {
    pub name: String,
    pub tracks: Vec<LocalTrack>,
}

impl TrackCollection {
    /// True when the collection should be matched track-by-track rather than
    /// as one album: every track carries the compilation flag, or the tracks
    /// disagree on album artist.
    pub fn is_compilation(&self) -> bool {
        if self.tracks.is_empty() {
            return false;
        }
        if self.tracks.iter().all(|t| t.compilation) {
            return true;
        }
        let first = &self.tracks[0].album_artist;
        self.tracks.iter().any(|t| &t.album_artist != first)
    }

    pub fn resolved_uris(&self) -> Vec<String> {
        self.tracks
            .iter()
            .filter_map(|t| t.uri.as_str().map(|s| s.to_string()))
            .collect()
    }
}

/// The scanned local library: album folders, playlists, and scan failures.
///
/// Scanning never aborts on a single unreadable file; failed paths are
/// collected into `errors` and excluded from further processing.
#[derive(Debug, Default)]
pub struct LocalLibrary {
    pub folders: Vec<TrackCollection>,
    pub playlists: Vec<TrackCollection>,
    pub errors: Vec<PathBuf>,
}

impl LocalLibrary {
    /// Walks the configured music directory, reading tags from every
    /// supported audio file, and groups tracks by their parent folder.
    /// Loads `.m3u` playlists from the playlist directory when configured.
    pub fn load(config: &Config, provider: &impl TagProvider) -> Self {
        let mut by_folder: BTreeMap<String, Vec<LocalTrack>> = BTreeMap::new();
        let mut errors = Vec::new();

        for entry in WalkDir::new(&config.music_dir)
            .into_iter()
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if !path.is_file() || !FileTagProvider::supports(path) {
                continue;
            }

            match provider.read(path) {
                Ok(track) => {
                    let folder = path
                        .parent()
                        .and_then(|p| p.file_name())
                        .and_then(|n| n.to_str())
                        .unwrap_or("")
                        .to_string();
                    by_folder.entry(folder).or_default().push(track);
                }
                Err(e) => {
                    warning!("Cannot read {}: {:?}", path.display(), e);
                    errors.push(path.to_path_buf());
                }
            }
        }

        let mut folders: Vec<TrackCollection> = by_folder
            .into_iter()
            .map(|(name, mut tracks)| {
                tracks.sort_by(|a, b| {
                    (a.disc_number, a.track_number).cmp(&(b.disc_number, b.track_number))
                });
                TrackCollection { name, tracks }
            })
            .collect();
        folders.retain(|c| !c.tracks.is_empty());

        let mut library = LocalLibrary {
            folders,
            playlists: Vec::new(),
            errors,
        };

        if let Some(dir) = &config.playlist_dir {
            library.load_playlists(dir);
        }

        library
    }

    /// Loads every `.m3u` file in `dir` as an ordered playlist, resolving
    /// each line against the scanned tracks. Lines naming files outside the
    /// library are dropped with a warning.
    fn load_playlists(&mut self, dir: &Path) {
        let by_path: BTreeMap<PathBuf, LocalTrack> = self
            .tracks()
            .map(|t| (t.path.clone(), t.clone()))
            .collect();

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warning!("Cannot read playlist dir {}: {}", dir.display(), e);
                return;
            }
        };

        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("m3u") {
                continue;
            }
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("")
                .to_string();

            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    warning!("Cannot read playlist {}: {}", path.display(), e);
                    self.errors.push(path);
                    continue;
                }
            };

            let mut tracks = Vec::new();
            for line in content.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                let mut track_path = PathBuf::from(line);
                if track_path.is_relative() {
                    track_path = dir.join(track_path);
                }
                match by_path.get(&track_path) {
                    Some(track) => tracks.push(track.clone()),
                    None => warning!("{} | Track not in library: {}", name, line),
                }
            }

            self.playlists.push(TrackCollection { name, tracks });
        }

        self.playlists.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// All tracks across all folders.
    pub fn tracks(&self) -> impl Iterator<Item = &LocalTrack> {
        self.folders.iter().flat_map(|c| c.tracks.iter())
    }

    /// Overlays a `path -> uri` backup onto the library: records whose path
    /// appears in the map get only their `uri` replaced, everything else is
    /// untouched.
    pub fn restore_uris(&mut self, backup: &BTreeMap<PathBuf, Uri>) -> usize {
        let mut restored = 0;
        for collection in self.folders.iter_mut().chain(self.playlists.iter_mut()) {
            for track in collection.tracks.iter_mut() {
                if let Some(uri) = backup.get(&track.path) {
                    track.uri = uri.clone();
                    restored += 1;
                }
            }
        }
        restored
    }
}

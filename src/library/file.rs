use std::io::Error;
use std::path::Path;

use lofty::config::WriteOptions;
use lofty::error::LoftyError;
use lofty::prelude::*;
use lofty::tag::{ItemKey, Tag};

use crate::library::{LocalTrack, Uri};

pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["flac", "mp3", "m4a", "wma"];

#[derive(Debug)]
pub enum LoadError {
    IoError(Error),
    TagError(LoftyError),
    Unsupported(String),
}

impl From<Error> for LoadError {
    fn from(err: Error) -> Self {
        LoadError::IoError(err)
    }
}

impl From<LoftyError> for LoadError {
    fn from(err: LoftyError) -> Self {
        LoadError::TagError(err)
    }
}

#[derive(Debug, Clone)]
pub struct WriteResult {
    pub saved: bool,
    pub updated: Vec<String>,
}

/// Seam between the sync engine and on-disk tag formats.
///
/// The matching and checking engines only ever see [`LocalTrack`] values;
/// everything container-specific stays behind this trait.
pub trait TagProvider {
    fn read(&self, path: &Path) -> Result<LocalTrack, LoadError>;

    /// Persists tag fields of `track` back to the file at `path`.
    ///
    /// When `replace` is false only the URI comment tag is written; when true
    /// the full tag set is rewritten from the record. No file is touched when
    /// `dry_run` is set; the result reports what would have been updated.
    fn write(
        &self,
        path: &Path,
        track: &LocalTrack,
        replace: bool,
        dry_run: bool,
    ) -> Result<WriteResult, LoadError>;
}

/// Reads and writes tags for flac/mp3/m4a/wma files via lofty.
#[derive(Debug, Default, Clone)]
pub struct FileTagProvider;

impl FileTagProvider {
    pub fn supports(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                SUPPORTED_EXTENSIONS.iter().any(|s| *s == ext)
            })
            .unwrap_or(false)
    }
}

impl TagProvider for FileTagProvider {
    fn read(&self, path: &Path) -> Result<LocalTrack, LoadError> {
        if !Self::supports(path) {
            return Err(LoadError::Unsupported(path.display().to_string()));
        }

        let tagged = lofty::read_from_path(path)?;
        let mut track = LocalTrack::new(path.to_path_buf());
        track.length = tagged.properties().duration().as_secs_f64();

        // fall back to the file stem when no title tag is present
        track.title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            if let Some(v) = tag.title() {
                if !v.trim().is_empty() {
                    track.title = v.to_string();
                }
            }
            if let Some(v) = tag.artist() {
                track.artist = v.to_string();
            }
            if let Some(v) = tag.album() {
                track.album = v.to_string();
            }
            if let Some(v) = tag.get_string(&ItemKey::AlbumArtist) {
                track.album_artist = v.to_string();
            }
            track.track_number = tag.track();
            track.disc_number = tag.disk();
            track.year = tag.year();
            track.genres = tag
                .get_strings(&ItemKey::Genre)
                .map(|g| g.to_string())
                .collect();
            track.bpm = tag.get_string(&ItemKey::Bpm).and_then(|v| v.parse().ok());
            track.key = tag.get_string(&ItemKey::InitialKey).map(|v| v.to_string());
            track.compilation = tag
                .get_string(&ItemKey::FlagCompilation)
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false);
            track.uri = Uri::from_tag_value(tag.get_string(&ItemKey::Comment));
        }

        Ok(track)
    }

    fn write(
        &self,
        path: &Path,
        track: &LocalTrack,
        replace: bool,
        dry_run: bool,
    ) -> Result<WriteResult, LoadError> {
        if !Self::supports(path) {
            return Err(LoadError::Unsupported(path.display().to_string()));
        }

        let mut tagged = lofty::read_from_path(path)?;
        let tag_type = tagged.primary_tag_type();
        if tagged.primary_tag().is_none() {
            tagged.insert_tag(Tag::new(tag_type));
        }
        let tag = match tagged.primary_tag_mut() {
            Some(tag) => tag,
            None => return Err(LoadError::Unsupported(path.display().to_string())),
        };

        let mut updated = Vec::new();

        let uri_value = track.uri.tag_value();
        if tag.get_string(&ItemKey::Comment) != uri_value.as_deref() {
            match &uri_value {
                Some(value) => {
                    tag.insert_text(ItemKey::Comment, value.clone());
                }
                None => {
                    tag.remove_key(&ItemKey::Comment);
                }
            }
            updated.push("uri".to_string());
        }

        if replace {
            tag.set_title(track.title.clone());
            tag.set_artist(track.artist.clone());
            tag.set_album(track.album.clone());
            if let Some(n) = track.track_number {
                tag.set_track(n);
            }
            if let Some(n) = track.disc_number {
                tag.set_disk(n);
            }
            if let Some(y) = track.year {
                tag.set_year(y);
            }
            if let Some(genre) = track.genres.first() {
                tag.set_genre(genre.clone());
            }
            updated.extend(
                ["title", "artist", "album", "track", "disc", "year", "genre"]
                    .iter()
                    .map(|s| s.to_string()),
            );
        }

        if dry_run || updated.is_empty() {
            return Ok(WriteResult {
                saved: false,
                updated,
            });
        }

        tag.save_to_path(path, WriteOptions::default())?;
        Ok(WriteResult {
            saved: true,
            updated,
        })
    }
}

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Kind of remote object a user-supplied URI, URL, or ID refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotifyKind {
    Track,
    Album,
    Playlist,
    Artist,
}

impl SpotifyKind {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "track" | "tracks" => Some(SpotifyKind::Track),
            "album" | "albums" => Some(SpotifyKind::Album),
            "playlist" | "playlists" => Some(SpotifyKind::Playlist),
            "artist" | "artists" => Some(SpotifyKind::Artist),
            _ => None,
        }
    }
}

fn is_spotify_id(value: &str) -> bool {
    value.len() == 22 && value.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Splits a URI/URL/ID string into its kind and bare id.
///
/// Recognises `spotify:<kind>:<id>` URIs, `open.spotify.com/<kind>/<id>` and
/// `api.spotify.com/v1/<kind>s/<id>` URLs, and bare 22-character ids (which
/// are assumed to be tracks). Returns `None` for anything else.
pub fn parse_spotify(value: &str) -> Option<(SpotifyKind, String)> {
    let value = value.trim().trim_end_matches('/');

    if let Some(rest) = value.strip_prefix("spotify:") {
        let mut parts = rest.split(':');
        let kind = SpotifyKind::from_name(parts.next()?)?;
        let id = parts.next()?;
        if parts.next().is_none() && is_spotify_id(id) {
            return Some((kind, id.to_string()));
        }
        return None;
    }

    if value.contains("spotify.com") {
        let path: Vec<&str> = value
            .split('/')
            .skip_while(|s| !s.contains("spotify.com"))
            .skip(1)
            .filter(|s| !s.is_empty() && *s != "v1")
            .collect();
        if path.len() >= 2 {
            let kind = SpotifyKind::from_name(path[0])?;
            let id = path[1].split('?').next()?;
            if is_spotify_id(id) {
                return Some((kind, id.to_string()));
            }
        }
        return None;
    }

    if is_spotify_id(value) {
        return Some((SpotifyKind::Track, value.to_string()));
    }

    None
}

/// Kind of a user-supplied remote reference, if it is one at all.
pub fn spotify_kind(value: &str) -> Option<SpotifyKind> {
    parse_spotify(value).map(|(kind, _)| kind)
}

/// Bare id of a user-supplied remote reference.
pub fn spotify_id(value: &str) -> Option<String> {
    parse_spotify(value).map(|(_, id)| id)
}

/// Normalises a user-supplied track reference to a `spotify:track:` URI.
/// Returns `None` when the input does not denote a track.
pub fn validate_track_uri(value: &str) -> Option<String> {
    match parse_spotify(value) {
        Some((SpotifyKind::Track, id)) => Some(format!("spotify:track:{}", id)),
        _ => None,
    }
}

/// Truncates `text` to `width` (with a `...` marker) and left-aligns it.
pub fn truncate_align(text: &str, width: usize) -> String {
    if text.len() <= width {
        format!("{:<width$}", text, width = width)
    } else {
        let cut: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", cut), width = width)
    }
}

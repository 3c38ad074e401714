use crate::library::LocalTrack;

/// Cleaned copies of a track's searchable tags.
///
/// Cleaning exists purely to improve query and comparison quality; the
/// original tag values are never overwritten by anything in this module.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanTags {
    pub title: String,
    pub artist: String,
    pub album: String,
}

impl CleanTags {
    pub fn from_track(track: &LocalTrack) -> Self {
        CleanTags {
            title: clean_title(&track.title),
            artist: clean_artist(&track.artist),
            album: clean_album(&track.album),
        }
    }

    pub fn title_words(&self) -> Vec<&str> {
        self.title.split_whitespace().collect()
    }

    pub fn artist_words(&self) -> Vec<&str> {
        self.artist.split_whitespace().collect()
    }

    pub fn album_words(&self) -> Vec<&str> {
        self.album.split_whitespace().collect()
    }
}

/// Cleans a track title for matching.
///
/// Removes bracketed text, drops everything from a "feat."/"ft." marker or a
/// " / " separator onward, drops the words "part" and "the", lowercases, and
/// keeps only alphanumerics and apostrophes.
pub fn clean_title(title: &str) -> String {
    let mut text = strip_brackets(title).to_lowercase();
    for marker in ["feat.", "ft."] {
        if let Some(i) = text.find(marker) {
            text.truncate(i);
        }
    }
    if let Some(i) = text.find(" / ") {
        text.truncate(i);
    }

    word_filter(&text)
        .split_whitespace()
        .filter(|w| *w != "part" && *w != "the")
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cleans an artist name for matching.
///
/// Removes bracketed text, drops everything from a collaborator marker
/// (" feat.", " ft.", "&", " and ", " vs") onward, removes a leading "the",
/// lowercases, and keeps only alphanumerics and apostrophes.
pub fn clean_artist(artist: &str) -> String {
    let mut text = strip_brackets(artist).to_lowercase();
    for marker in [" feat.", " ft.", "&", " and ", " vs"] {
        if let Some(i) = text.find(marker) {
            text.truncate(i);
        }
    }

    let filtered = word_filter(&text);
    let mut words: Vec<&str> = filtered.split_whitespace().collect();
    if words.first() == Some(&"the") {
        words.remove(0);
    }
    words.join(" ")
}

/// Cleans an album title for matching.
///
/// Drops everything after a "-", removes bracketed text, removes the word
/// "ep" and a leading "the", lowercases, and keeps only alphanumerics and
/// apostrophes.
pub fn clean_album(album: &str) -> String {
    let text = album.split('-').next().unwrap_or_default().to_lowercase();
    let text = strip_brackets(&text);

    let filtered = word_filter(&text);
    let mut words: Vec<&str> = filtered
        .split_whitespace()
        .filter(|w| *w != "ep")
        .collect();
    if words.first() == Some(&"the") {
        words.remove(0);
    }
    words.join(" ")
}

/// Removes `(...)` and `[...]` substrings, including the brackets.
fn strip_brackets(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Maps everything outside `[A-Za-z0-9']` to a space.
fn word_filter(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '\'' {
                c
            } else {
                ' '
            }
        })
        .collect()
}

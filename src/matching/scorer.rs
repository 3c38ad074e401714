use crate::library::LocalTrack;
use crate::matching::clean::{self, CleanTags};
use crate::types::{RemoteAlbum, RemoteTrack};

/// A result whose album (or name) contains all of these words is a karaoke
/// rendition and never an acceptable match.
pub const KARAOKE_TAGS: [&str; 3] = ["karaoke", "backing", "instrumental"];

/// Deep match never accepts a candidate whose length differs by this many
/// seconds or more.
pub const DEEP_LENGTH_CEILING: f64 = 600.0;

/// One comparison strategy with its threshold parameters.
///
/// Each tier is a hard pass/fail gate; tiers do not produce a continuous
/// confidence score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tier {
    /// Accept the first candidate unconditionally. Terminal fallback.
    Simple,
    /// Word-overlap on the candidate's (uncleaned, lowercased) name.
    Title { min_diff: f64 },
    /// Accept when any of length, album words, or release year agree.
    Quick {
        len_diff: f64,
        min_diff: f64,
        /// Re-query with the title alone for a cleaner comparison set.
        title_requery: bool,
    },
    /// Loosest gate: title or artist words must overlap, and of all
    /// acceptable candidates the one closest in length wins.
    Deep { min_diff: f64 },
}

/// Tier parameters per signed search depth.
///
/// Positive depths are visited in increasing order, negative depths in
/// decreasing order (see [`tier_walk`]). Depth 0 only applies when the
/// algorithm id itself is 0.
pub fn settings(depth: i32) -> Option<Tier> {
    match depth {
        0 => Some(Tier::Simple),
        1 => Some(Tier::Quick {
            len_diff: 15.0,
            min_diff: 0.8,
            title_requery: false,
        }),
        2 => Some(Tier::Quick {
            len_diff: 30.0,
            min_diff: 0.66,
            title_requery: true,
        }),
        3 => Some(Tier::Deep { min_diff: 0.66 }),
        4 => Some(Tier::Simple),
        -1 => Some(Tier::Deep { min_diff: 0.8 }),
        -2 => Some(Tier::Simple),
        _ => None,
    }
}

/// Expands a signed algorithm id into the tier visitation sequence.
///
/// Walks depths from 0 outward in the direction of the sign, skipping depth
/// 0 whenever the algorithm id is not exactly 0, and stopping once the
/// magnitude of the id is exceeded.
pub fn tier_walk(algorithm: i32) -> Vec<Tier> {
    let step = if algorithm < 0 { -1 } else { 1 };
    let mut tiers = Vec::new();
    let mut depth: i32 = 0;

    while depth.abs() <= algorithm.abs() {
        if depth == 0 && algorithm != 0 {
            depth += step;
            continue;
        }
        if let Some(tier) = settings(depth) {
            tiers.push(tier);
        }
        depth += step;
    }

    tiers
}

fn contains_all_karaoke(target: &str) -> bool {
    KARAOKE_TAGS.iter().all(|word| target.contains(word))
}

/// Karaoke test for a track search result.
///
/// The test is conjunctive: the album name (or the track name when no album
/// is attached) must contain all three karaoke words, or every one of the
/// artist names must, once cleaned.
pub fn is_karaoke_track(result: &RemoteTrack) -> bool {
    let name = result.album_name().unwrap_or(&result.name).to_lowercase();
    if contains_all_karaoke(&name) {
        return true;
    }
    !result.artists.is_empty()
        && result
            .artists
            .iter()
            .all(|a| contains_all_karaoke(&clean::clean_artist(&a.name)))
}

/// Karaoke test for an album search result.
pub fn is_karaoke_album(result: &RemoteAlbum) -> bool {
    if contains_all_karaoke(&result.name.to_lowercase()) {
        return true;
    }
    !result.artists.is_empty()
        && result
            .artists
            .iter()
            .all(|a| contains_all_karaoke(&clean::clean_artist(&a.name)))
}

/// Number of `words` found as substrings of `target`.
pub fn word_hits(words: &[&str], target: &str) -> usize {
    words.iter().filter(|w| target.contains(*w)).count()
}

/// Word-overlap gate: hits must reach `len(words) * threshold`.
pub fn overlaps(words: &[&str], target: &str, threshold: f64) -> bool {
    word_hits(words, target) as f64 >= words.len() as f64 * threshold
}

/// Runs one tier's gate over the result set and returns the matched URI.
///
/// Single dispatch point for every tier so the vocabulary stays statically
/// enumerable; callers that need the quick tier's title re-query swap the
/// result set before calling.
pub fn match_tier(
    tier: Tier,
    track: &LocalTrack,
    tags: &CleanTags,
    results: &[RemoteTrack],
) -> Option<String> {
    match tier {
        Tier::Simple => simple_match(results),
        Tier::Title { min_diff } => title_match(tags, results, min_diff),
        Tier::Quick {
            len_diff, min_diff, ..
        } => quick_match(track, tags, results, len_diff, min_diff),
        Tier::Deep { min_diff } => deep_match(track, tags, results, min_diff),
    }
}

fn simple_match(results: &[RemoteTrack]) -> Option<String> {
    results.first().map(|r| r.uri.clone())
}

fn title_match(tags: &CleanTags, results: &[RemoteTrack], min_diff: f64) -> Option<String> {
    let words = tags.title_words();

    for result in results {
        if is_karaoke_track(result) {
            continue;
        }
        if overlaps(&words, &result.name.to_lowercase(), min_diff) {
            return Some(result.uri.clone());
        }
    }
    None
}

fn quick_match(
    track: &LocalTrack,
    tags: &CleanTags,
    results: &[RemoteTrack],
    len_diff: f64,
    min_diff: f64,
) -> Option<String> {
    let album_words = tags.album_words();

    for result in results {
        if is_karaoke_track(result) {
            continue;
        }

        let time_match = (result.length() - track.length).abs() <= len_diff;
        let album_match = overlaps(
            &album_words,
            &result.album_name().unwrap_or_default().to_lowercase(),
            min_diff,
        );
        let year_match = match (track.year, result.release_year()) {
            (Some(local), Some(remote)) => local == remote,
            _ => false,
        };

        if time_match || album_match || year_match {
            return Some(result.uri.clone());
        }
    }
    None
}

/// Unlike the other tiers, deep match never stops at the first acceptable
/// candidate: it evaluates the whole result set and keeps the acceptable
/// candidate closest in length, starting from the
/// [`DEEP_LENGTH_CEILING`] cap. Length is the most reliable signal left at
/// this depth.
fn deep_match(
    track: &LocalTrack,
    tags: &CleanTags,
    results: &[RemoteTrack],
    min_diff: f64,
) -> Option<String> {
    let title_words = tags.title_words();
    let artist_words = tags.artist_words();

    let mut min_length_diff = DEEP_LENGTH_CEILING;
    let mut matched: Option<String> = None;

    for result in results {
        if is_karaoke_track(result) {
            continue;
        }

        let name_clean = clean::clean_title(&result.name);
        let title_ok = overlaps(&title_words, &name_clean, min_diff);

        let mut artist_ok = result.artists.is_empty();
        for artist in &result.artists {
            artist_ok = overlaps(&artist_words, &clean::clean_artist(&artist.name), min_diff);
            if artist_ok {
                break;
            }
        }

        let length_diff = (result.length() - track.length).abs();
        if (title_ok || artist_ok) && length_diff < min_length_diff {
            min_length_diff = length_diff;
            matched = Some(result.uri.clone());
        }
    }

    matched
}

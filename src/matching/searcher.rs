use colored::Colorize;
use indicatif::ProgressBar;

use crate::config::Config;
use crate::library::{TrackCollection, Uri};
use crate::matching::clean::{self, CleanTags};
use crate::matching::scorer::{self, Tier};
use crate::remote::RemoteApi;
use crate::types::RemoteTrack;
use crate::{info, library::LocalTrack, warning};

/// Per-collection outcome of one search pass.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub name: String,
    pub matched: usize,
    pub unmatched: usize,
    pub skipped: usize,
    pub total: usize,
}

/// Accumulated outcomes across all searched collections.
#[derive(Debug, Default)]
pub struct SearchReport {
    pub outcomes: Vec<SearchOutcome>,
}

impl SearchReport {
    pub fn total_matched(&self) -> usize {
        self.outcomes.iter().map(|o| o.matched).sum()
    }

    pub fn total_unmatched(&self) -> usize {
        self.outcomes.iter().map(|o| o.unmatched).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.outcomes.iter().map(|o| o.skipped).sum()
    }

    /// Logs one colour-coded line per collection plus a totals line.
    pub fn log(&self) {
        for o in &self.outcomes {
            let matched = format!("{:>4} matched", o.matched);
            let unmatched = format!("{:>4} unmatched", o.unmatched);
            let skipped = format!("{:>4} skipped", o.skipped);
            info!(
                "{:<40} | {} | {} | {} | {:>4} total",
                if o.name.len() < 40 {
                    o.name.clone()
                } else {
                    format!("{}...", &o.name[..37])
                },
                if o.matched > 0 {
                    matched.green()
                } else {
                    matched.blue()
                },
                if o.unmatched == 0 {
                    unmatched.green()
                } else {
                    unmatched.red()
                },
                if o.skipped == 0 {
                    skipped.green()
                } else {
                    skipped.yellow()
                },
                o.total
            );
        }

        let total: usize = self.outcomes.iter().map(|o| o.total).sum();
        info!(
            "{:<40} | {} | {} | {} | {:>4} total",
            "TOTALS".bold(),
            format!("{:>4} matched", self.total_matched()).green(),
            format!("{:>4} unmatched", self.total_unmatched()).red(),
            format!("{:>4} skipped", self.total_skipped()).yellow(),
            total
        );
    }
}

struct AlbumSettings {
    title_len_match: f64,
    artist_match: bool,
    artist_search: bool,
}

fn album_settings(algorithm: i32) -> AlbumSettings {
    match algorithm {
        1 => AlbumSettings {
            title_len_match: 0.8,
            artist_match: true,
            artist_search: true,
        },
        3 => AlbumSettings {
            title_len_match: 0.6,
            artist_match: false,
            artist_search: false,
        },
        _ => AlbumSettings {
            title_len_match: 0.6,
            artist_match: false,
            artist_search: true,
        },
    }
}

/// Finds remote URIs for local tracks through progressively looser queries
/// and the configured tier sequence.
///
/// A search never fails a batch: API errors on individual queries degrade to
/// "no results" and the affected tracks stay unresolved for the interactive
/// checker to handle.
pub struct Searcher<'a, A: RemoteApi> {
    api: &'a A,
    config: &'a Config,
}

impl<'a, A: RemoteApi> Searcher<'a, A> {
    pub fn new(api: &'a A, config: &'a Config) -> Self {
        Searcher { api, config }
    }

    /// Searches every collection that still has unresolved tracks.
    ///
    /// Collections flagged as compilations are matched track-by-track, the
    /// rest as whole albums with per-track fallback. Tracks that already
    /// carry a resolved or unavailable URI are never re-searched.
    pub async fn search_all(&self, collections: &mut [TrackCollection]) -> SearchReport {
        let mut report = SearchReport::default();

        let todo: Vec<usize> = collections
            .iter()
            .enumerate()
            .filter(|(_, c)| c.tracks.iter().any(|t| t.uri.is_unresolved()))
            .map(|(i, _)| i)
            .collect();

        if todo.is_empty() {
            info!("No tracks to search.");
            return report;
        }

        info!("Searching for track matches on Spotify");
        let bar = ProgressBar::new(todo.len() as u64);

        for index in todo {
            let collection = &mut collections[index];
            let unresolved_start: Vec<bool> = collection
                .tracks
                .iter()
                .map(|t| t.uri.is_unresolved())
                .collect();
            let skipped = unresolved_start.iter().filter(|w| !**w).count();

            if collection.is_compilation() {
                for track in collection.tracks.iter_mut() {
                    if track.uri.is_unresolved() {
                        self.search_track(track).await;
                    }
                }
            } else {
                self.search_album(collection).await;
            }

            let matched = collection
                .tracks
                .iter()
                .zip(&unresolved_start)
                .filter(|(t, was)| **was && t.uri.is_resolved())
                .count();
            let unmatched = collection
                .tracks
                .iter()
                .filter(|t| t.uri.is_unresolved())
                .count();

            report.outcomes.push(SearchOutcome {
                name: collection.name.clone(),
                matched,
                unmatched,
                skipped,
                total: collection.tracks.len(),
            });
            bar.inc(1);
        }

        bar.finish_and_clear();
        report.log();
        report
    }

    /// Runs the query ladder for one track and applies the configured tier
    /// sequence to the results. Sets the track's URI on the first tier that
    /// produces a match; leaves it unresolved otherwise.
    pub async fn search_track(&self, track: &mut LocalTrack) {
        let tags = CleanTags::from_track(track);
        let (query, results) = self.track_results(&tags).await;
        let title_search = query == tags.title;

        if results.is_empty() {
            return;
        }

        let mut results_title: Option<Vec<RemoteTrack>> = None;

        for tier in scorer::tier_walk(self.config.algorithm_track) {
            let pool: &[RemoteTrack] = match tier {
                Tier::Quick {
                    title_requery: true,
                    ..
                } if !title_search => {
                    if results_title.is_none() {
                        results_title = Some(self.query_tracks(&tags.title).await);
                    }
                    results_title.as_deref().unwrap_or(&results)
                }
                _ => &results,
            };

            if let Some(uri) = scorer::match_tier(tier, track, &tags, pool) {
                track.uri = Uri::Resolved(uri);
                break;
            }
        }
    }

    /// Matches a whole collection against remote albums, then falls back to
    /// per-track search for anything left unresolved.
    pub async fn search_album(&self, collection: &mut TrackCollection) {
        if collection.tracks.is_empty() {
            return;
        }
        let settings = album_settings(self.config.algorithm_album);

        // the shortest artist string is least likely to carry collaborator noise
        let artist_raw = collection
            .tracks
            .iter()
            .map(|t| t.artist.clone())
            .min_by_key(|a| a.len())
            .unwrap_or_default();
        let artist_clean = clean::clean_artist(&artist_raw);
        let album_clean = clean::clean_album(&collection.tracks[0].album);

        let query = if settings.artist_search {
            format!("{} {}", album_clean, artist_clean)
        } else {
            album_clean.clone()
        };

        let mut results = match self.api.search_albums(&query, self.config.search_limit).await {
            Ok(results) => results,
            Err(e) => {
                warning!("{} | Album query failed: {}", collection.name, e);
                Vec::new()
            }
        };
        let local_count = collection.tracks.len() as i64;
        results.sort_by_key(|a| (a.total_tracks as i64 - local_count).abs());

        let album_words: Vec<&str> = album_clean.split_whitespace().collect();
        let artist_words: Vec<&str> = artist_clean.split_whitespace().collect();

        for result in results {
            if collection.tracks.iter().all(|t| !t.uri.is_unresolved()) {
                break;
            }
            if scorer::is_karaoke_album(&result) {
                continue;
            }

            let detail = match self.api.album_tracks(&result).await {
                Ok(detail) => detail,
                Err(e) => {
                    warning!("{} | Album fetch failed: {}", collection.name, e);
                    continue;
                }
            };

            let detail_name = detail.name.to_lowercase();
            let album_match = album_words.iter().all(|w| detail_name.contains(w));

            let artist_match = if settings.artist_match {
                let artists = detail
                    .artists
                    .iter()
                    .map(|a| a.name.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
                    .to_lowercase();
                artist_words.iter().all(|w| artists.contains(w))
            } else {
                true
            };

            if !album_match || !artist_match {
                continue;
            }

            let mut pool = detail.tracks.items;
            for track in collection.tracks.iter_mut() {
                if !track.uri.is_unresolved() {
                    continue;
                }

                let title = clean::clean_title(&track.title);
                let title_words: Vec<&str> = title.split_whitespace().collect();
                let title_min = title_words.len() as f64 * settings.title_len_match;

                let position = pool.iter().position(|r| {
                    scorer::word_hits(&title_words, &r.name.to_lowercase()) as f64 >= title_min
                });
                if let Some(i) = position {
                    // pop the matched remote track so no other local track can claim it
                    let remote = pool.remove(i);
                    track.uri = Uri::Resolved(remote.uri);
                }
            }
        }

        for track in collection.tracks.iter_mut() {
            if track.uri.is_unresolved() {
                self.search_track(track).await;
            }
        }
    }

    async fn query_tracks(&self, query: &str) -> Vec<RemoteTrack> {
        match self.api.search_tracks(query, self.config.search_limit).await {
            Ok(results) => results,
            Err(e) => {
                warning!("Query failed ({}): {}", query, e);
                Vec::new()
            }
        }
    }

    /// The query ladder: title+artist, then title+album (unless the album is
    /// a downloads placeholder), then title alone. Returns the last query
    /// tried and its results.
    async fn track_results(&self, tags: &CleanTags) -> (String, Vec<RemoteTrack>) {
        let mut query = format!("{} {}", tags.title, tags.artist);
        let mut results = self.query_tracks(&query).await;

        if results.is_empty() && !tags.album.starts_with("downloads") {
            query = format!("{} {}", tags.title, tags.album);
            results = self.query_tracks(&query).await;
        }

        if results.is_empty() {
            query = tags.title.clone();
            results = self.query_tracks(&query).await;
        }

        (query, results)
    }
}

//! # Interactive Check Module
//!
//! This module lets the user verify and correct the URI matches produced by
//! the search engine. For each batch of collections it creates temporary
//! Spotify playlists from the matched URIs, pauses so the user can inspect
//! (and edit) those playlists in their Spotify client, then reads the
//! playlists back and reconciles what the user changed:
//!
//! * Tracks the user removed from a temp playlist, and tracks that never had
//!   a URI, are queued for per-track resolution.
//! * Tracks the user added to a temp playlist are paired back to unresolved
//!   local tracks by title match and recorded as switched.
//! * Anything left over is resolved through a small per-item command
//!   vocabulary (mark unavailable, leave unresolved, paste a replacement
//!   URI, apply-to-all, refresh, skip, quit).
//!
//! Temporary playlists are deleted on every exit path - normal completion,
//! skip, quit, end of input, or an API failure mid-batch. The deletion step
//! is structured so no early return can bypass it.
//!
//! All prompting goes through the [`UserInput`] seam so the whole state
//! machine can be driven by scripted input in tests. End of input is treated
//! as the quit command.

use std::collections::HashSet;
use std::io::Write;

use colored::Colorize;

use crate::config::Config;
use crate::library::{LocalTrack, TrackCollection, Uri};
use crate::matching::clean::CleanTags;
use crate::matching::scorer::{self, Tier};
use crate::remote::{ApiError, RemoteApi};
use crate::types::RemoteTrack;
use crate::utils::{self, SpotifyKind};
use crate::{info, warning};

/// Width used when printing track names in prompts and listings.
const NAME_WIDTH: usize = 50;

/// Threshold for pairing a user-added remote track to an unresolved local
/// track by title.
const PAIR_MIN_DIFF: f64 = 0.8;

/// Result of one full `check` run.
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Tracks whose URI was changed during this run.
    pub switched: Vec<LocalTrack>,
    /// Tracks confirmed unavailable on the remote service.
    pub unavailable: Vec<LocalTrack>,
    /// Tracks left unresolved for a future run.
    pub skipped: Vec<LocalTrack>,
}

/// Source of user input for the checker.
///
/// `read_line` returns `None` at end of input, which the checker treats as
/// the quit command so cleanup still runs.
pub trait UserInput {
    fn read_line(&mut self, prompt: &str) -> Option<String>;
}

/// Reads from standard input.
#[derive(Debug, Default)]
pub struct StdinInput;

impl UserInput for StdinInput {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        print!("{}: ", prompt);
        std::io::stdout().flush().ok();

        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(_) => None,
        }
    }
}

enum InputSignal {
    Proceed,
    Refresh,
    Abort,
}

/// Interactive checker session.
///
/// Not re-entrant: every call to [`Checker::check`] fully resets the session
/// state before use.
pub struct Checker<'a, A: RemoteApi, I: UserInput> {
    api: &'a A,
    input: I,
    interval: usize,

    /// (collection index, name, temp playlist url) for the current batch.
    temp: Vec<(usize, String, String)>,
    /// Indices into the current collection's tracks awaiting user input.
    remaining: Vec<usize>,
    switched: Vec<LocalTrack>,
    skip: bool,
    quit: bool,

    final_switched: Vec<LocalTrack>,
    final_unavailable: Vec<LocalTrack>,
    final_skipped: Vec<LocalTrack>,
}

impl<'a, A: RemoteApi, I: UserInput> Checker<'a, A, I> {
    pub fn new(api: &'a A, config: &Config, input: I) -> Self {
        Checker {
            api,
            input,
            interval: config.check_interval.max(1),
            temp: Vec::new(),
            remaining: Vec::new(),
            switched: Vec::new(),
            skip: false,
            quit: false,
            final_switched: Vec::new(),
            final_unavailable: Vec::new(),
            final_skipped: Vec::new(),
        }
    }

    /// True when the user asked to stop checking (skip or quit).
    fn done(&self) -> bool {
        self.skip || self.quit
    }

    /// True when the whole program should stop after cleanup.
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    fn reset(&mut self) {
        self.temp.clear();
        self.remaining.clear();
        self.switched.clear();
        self.skip = false;
        self.quit = false;
        self.final_switched.clear();
        self.final_unavailable.clear();
        self.final_skipped.clear();
    }

    /// Runs the interactive check over all collections, in batches of the
    /// configured interval.
    ///
    /// Temporary playlists created for a batch are deleted before the next
    /// batch starts, regardless of how the batch ended.
    pub async fn check(&mut self, collections: &mut [TrackCollection]) -> CheckReport {
        self.reset();

        if collections.iter().all(|c| c.tracks.is_empty()) {
            return CheckReport::default();
        }

        info!("Checking items by creating temporary Spotify playlists");

        let indices: Vec<usize> = (0..collections.len()).collect();
        let total_batches = indices.len().div_ceil(self.interval);

        for (batch_no, batch) in indices.chunks(self.interval).enumerate() {
            for &i in batch {
                self.make_temp_playlist(i, &collections[i]).await;
            }

            if !self.quit && !self.temp.is_empty() {
                self.pause(batch_no + 1, total_batches, collections).await;
            }
            if !self.done() {
                self.check_uris(collections).await;
            }

            // cleanup runs on every path out of the batch above
            self.delete_temp_playlists().await;

            if self.done() {
                break;
            }
        }

        let report = CheckReport {
            switched: std::mem::take(&mut self.final_switched),
            unavailable: std::mem::take(&mut self.final_unavailable),
            skipped: std::mem::take(&mut self.final_skipped),
        };

        info!(
            "{} | {} | {} | {}",
            "CHECK TOTALS".bold(),
            format!("{:>5} switched", report.switched.len()).blue(),
            format!("{:>5} unavailable", report.unavailable.len()).red(),
            format!("{:>5} skipped", report.skipped.len()).yellow(),
        );

        self.remaining.clear();
        self.switched.clear();
        report
    }

    /// Creates one temporary playlist holding the collection's resolved
    /// URIs. Collections with nothing resolved get no playlist and no API
    /// call.
    async fn make_temp_playlist(&mut self, index: usize, collection: &TrackCollection) {
        let uris = collection.resolved_uris();
        if uris.is_empty() {
            return;
        }

        match self.api.create_playlist(&collection.name, false, false).await {
            Ok(url) => {
                if let Err(e) = self.api.add_to_playlist(&url, &uris, false).await {
                    warning!("{} | Failed to fill temp playlist: {}", collection.name, e);
                }
                self.temp.push((index, collection.name.clone(), url));
            }
            Err(e) => {
                warning!("{} | Failed to create temp playlist: {}", collection.name, e);
                self.quit = true;
            }
        }
    }

    /// Deletes every temp playlist created for the current batch. Each URL
    /// is drained from the session first so nothing is deleted twice.
    async fn delete_temp_playlists(&mut self) {
        if self.temp.is_empty() {
            return;
        }
        info!("Deleting {} temporary playlists...", self.temp.len());

        let temp = std::mem::take(&mut self.temp);
        for (_, name, url) in temp {
            if let Err(e) = self.api.delete_playlist(&url).await {
                warning!("{} | Failed to delete temp playlist at {}: {}", name, url, e);
            }
        }
    }

    fn pause_help(&self) -> String {
        [
            format!("{}", "Enter one of the following:".cyan()),
            format!("{:<20}: Continue on and check for any changes made", "<Return>"),
            format!("{:<20}: Print the items originally added to that temp playlist", "Name of playlist"),
            format!("{:<20}: Print the tracks behind the given link", "Spotify link/URI"),
            format!("{:<20}: Delete current temp playlists and skip remaining checks", "s"),
            format!("{:<20}: Delete current temp playlists and quit", "q"),
            format!("{:<20}: Show this dialogue again", "h"),
        ]
        .join("\n\t")
    }

    /// Initial pause after a batch of temp playlists has been created.
    ///
    /// Loops on user input until an empty line proceeds to reconciliation,
    /// or the user skips/quits.
    async fn pause(&mut self, page: usize, page_total: usize, collections: &[TrackCollection]) {
        let help = self.pause_help();
        println!("\n\t{}\n", help);

        loop {
            let line = match self.input.read_line(&format!("Enter ({}/{})", page, page_total)) {
                Some(line) => line,
                None => {
                    // end of input is a quit
                    self.quit = true;
                    return;
                }
            };
            let lower = line.to_lowercase();

            if line.is_empty() {
                return;
            }

            let named = self
                .temp
                .iter()
                .find(|(_, name, _)| name.to_lowercase().starts_with(&lower));
            if let Some((index, name, _)) = named {
                println!("\n\t{}", format!("Showing items originally added to {}:", name).cyan());
                for (i, track) in collections[*index].tracks.iter().enumerate() {
                    println!(
                        "\t{:>4}/{:<4} {} | {}",
                        i + 1,
                        collections[*index].tracks.len(),
                        utils::truncate_align(&track.title, NAME_WIDTH),
                        track.uri.as_str().unwrap_or("<no uri>"),
                    );
                }
                println!();
                continue;
            }

            match lower.as_str() {
                "s" | "q" => {
                    self.quit = lower == "q";
                    self.skip = true;
                    return;
                }
                "h" => println!("\n\t{}\n", help),
                _ => match utils::spotify_kind(&line) {
                    Some(kind) => self.print_remote(kind, &line).await,
                    None => warning!("Input not recognised."),
                },
            }
        }
    }

    /// Prints the track listing behind a pasted link. Read-only.
    async fn print_remote(&self, kind: SpotifyKind, value: &str) {
        let tracks = match kind {
            SpotifyKind::Playlist => self.api.playlist_items(value).await,
            _ => self.api.get_tracks(&[value.to_string()]).await,
        };

        match tracks {
            Ok(tracks) => {
                for (i, track) in tracks.iter().enumerate() {
                    println!(
                        "\t{:>4}/{:<4} {} | {}",
                        i + 1,
                        tracks.len(),
                        utils::truncate_align(&track.name, NAME_WIDTH),
                        track.uri,
                    );
                }
            }
            Err(e) => warning!("Failed to load {}: {}", value, e),
        }
    }

    /// Reconciles every collection in the current batch against its temp
    /// playlist, prompting for anything that cannot be matched
    /// automatically.
    async fn check_uris(&mut self, collections: &mut [TrackCollection]) {
        let batch = self.temp.clone();

        for (index, name, url) in batch {
            let collection = &mut collections[index];

            loop {
                if let Err(e) = self.match_to_remote(&name, &url, collection).await {
                    warning!("{} | Failed to reload temp playlist: {}", name, e);
                    self.remaining.clear();
                    break;
                }
                match self.match_to_input(&name, collection) {
                    InputSignal::Refresh => continue,
                    InputSignal::Abort => {
                        self.drain_collection(collection);
                        return;
                    }
                    InputSignal::Proceed => {
                        if self.remaining.is_empty() {
                            break;
                        }
                    }
                }
            }

            self.drain_collection(collection);
        }
    }

    /// Moves this collection's results into the run accumulators.
    fn drain_collection(&mut self, collection: &TrackCollection) {
        let unavailable: Vec<LocalTrack> = collection
            .tracks
            .iter()
            .filter(|t| t.uri.is_unavailable())
            .cloned()
            .collect();
        let skipped: Vec<LocalTrack> = collection
            .tracks
            .iter()
            .filter(|t| t.uri.is_unresolved())
            .cloned()
            .collect();

        self.final_switched.append(&mut self.switched);
        self.final_unavailable.extend(unavailable);
        self.final_skipped.extend(skipped);
    }

    /// Compares the collection's current state against the temp playlist's
    /// actual contents and pairs up what the user changed. Anything that
    /// cannot be paired lands in `remaining` for interactive resolution.
    async fn match_to_remote(
        &mut self,
        name: &str,
        url: &str,
        collection: &mut TrackCollection,
    ) -> Result<(), ApiError> {
        info!("Attempting to find URIs for items in: {}", name);

        let remote = self.api.playlist_items(url).await?;

        let source_uris: HashSet<&str> = collection
            .tracks
            .iter()
            .filter_map(|t| t.uri.as_str())
            .collect();
        let remote_uris: HashSet<&str> = remote.iter().map(|t| t.uri.as_str()).collect();

        // tracks the user added on the remote side
        let mut added: Vec<RemoteTrack> = remote
            .iter()
            .filter(|t| !source_uris.contains(t.uri.as_str()))
            .cloned()
            .collect();
        // source tracks the user removed remotely, then those never resolved
        let mut remaining: Vec<usize> = Vec::new();
        for (i, track) in collection.tracks.iter().enumerate() {
            if let Some(uri) = track.uri.as_str() {
                if !remote_uris.contains(uri) {
                    remaining.push(i);
                }
            }
        }
        for (i, track) in collection.tracks.iter().enumerate() {
            if track.uri.is_unresolved() {
                remaining.push(i);
            }
        }

        if added.is_empty() && remaining.is_empty() {
            self.remaining.clear();
            return Ok(());
        }

        self.pair_to_added(collection, &mut added, &mut remaining);
        self.remaining = remaining;
        Ok(())
    }

    /// Pairs unresolved or removed local tracks to tracks the user newly
    /// added on the remote side, by title match. Each paired remote track is
    /// consumed so it cannot be reported as an addition later.
    ///
    /// Best-effort: title overlap is a heuristic, not a guarantee. Swap this
    /// function out to tighten the pairing without touching the rest of the
    /// state machine.
    fn pair_to_added(
        &mut self,
        collection: &mut TrackCollection,
        added: &mut Vec<RemoteTrack>,
        remaining: &mut Vec<usize>,
    ) {
        let mut paired: Vec<usize> = Vec::new();

        for &index in remaining.iter() {
            if added.is_empty() {
                break;
            }

            let track = &collection.tracks[index];
            let tags = CleanTags::from_track(track);
            let matched = scorer::match_tier(
                Tier::Title {
                    min_diff: PAIR_MIN_DIFF,
                },
                track,
                &tags,
                added,
            );

            if let Some(uri) = matched {
                added.retain(|t| t.uri != uri);
                collection.tracks[index].uri = Uri::Resolved(uri);
                self.switched.push(collection.tracks[index].clone());
                paired.push(index);
            }
        }

        remaining.retain(|i| !paired.contains(i));
    }

    fn input_help(&self, name: &str) -> String {
        [
            format!("{}", format!("{}: The following items could not be matched automatically.", name).cyan()),
            format!("{:<20}: Mark item as unavailable on Spotify", "u"),
            format!("{:<20}: Leave item unresolved, try again on the next run", "n"),
            format!("{:<20}: Append to 'u' or 'n' to apply it to all remaining items here", "a"),
            format!("{:<20}: Refresh the playlist and restart matching for it", "r"),
            format!("{:<20}: Skip checking for all playlists", "s"),
            format!("{:<20}: Delete current temp playlists and quit", "q"),
            format!("{:<20}: Show this dialogue again", "h"),
            "OR enter a custom URI/URL/ID for this item".to_string(),
        ]
        .join("\n\t")
    }

    /// Prompts for every item in `remaining` until each is resolved, skipped,
    /// or the user aborts.
    fn match_to_input(&mut self, name: &str, collection: &mut TrackCollection) -> InputSignal {
        if self.remaining.is_empty() {
            return InputSignal::Proceed;
        }

        let help = self.input_help(name);
        println!("\n\t{}\n", help);

        let mut current_input = String::new();
        let items = self.remaining.clone();

        for index in items {
            if !self.remaining.contains(&index) {
                continue;
            }

            while self.remaining.contains(&index) {
                if !current_input.contains('a') {
                    let prompt =
                        utils::truncate_align(&collection.tracks[index].title, NAME_WIDTH);
                    current_input = match self.input.read_line(&prompt) {
                        Some(line) => line,
                        None => {
                            // end of input is a quit
                            self.quit = true;
                            self.skip = true;
                            self.remaining.clear();
                            return InputSignal::Abort;
                        }
                    };
                }

                let lower = current_input.to_lowercase();
                if lower.replace('a', "") == "u" {
                    collection.tracks[index].uri = Uri::Unavailable;
                    self.remaining.retain(|i| *i != index);
                } else if lower.replace('a', "") == "n" {
                    collection.tracks[index].uri = Uri::Unresolved;
                    self.remaining.retain(|i| *i != index);
                } else if lower == "r" {
                    return InputSignal::Refresh;
                } else if lower == "s" || lower == "q" {
                    self.quit = lower == "q";
                    self.skip = true;
                    self.remaining.clear();
                    return InputSignal::Abort;
                } else if lower == "h" {
                    println!("\n\t{}\n", help);
                    current_input.clear();
                } else if current_input.len() > 22 {
                    match utils::validate_track_uri(&current_input) {
                        Some(uri) => {
                            collection.tracks[index].uri = Uri::Resolved(uri);
                            self.switched.push(collection.tracks[index].clone());
                            self.remaining.retain(|i| *i != index);
                        }
                        None => warning!("Input not recognised."),
                    }
                    current_input.clear();
                } else {
                    warning!("Input not recognised.");
                    current_input.clear();
                }
            }
        }

        InputSignal::Proceed
    }
}

//! Staged sync pipeline.
//!
//! Runs `search -> check -> tags -> push` with a JSON checkpoint written
//! after each stage. A stage whose checkpoint already exists is loaded
//! instead of recomputed ("quickload"), so an interrupted run resumes from
//! the last completed step; a missing checkpoint simply means the stage runs
//! again from the library.

use crate::check::{CheckReport, Checker, UserInput};
use crate::config::Config;
use crate::library::{LocalLibrary, TagProvider, TrackCollection};
use crate::management::{CheckpointManager, Stage};
use crate::matching::Searcher;
use crate::remote::{PlaylistReconciler, RemoteApi, SyncKind, SyncResult};
use crate::{info, success, warning};

pub struct SyncDriver<'a, A: RemoteApi> {
    api: &'a A,
    config: &'a Config,
    checkpoints: CheckpointManager,
}

impl<'a, A: RemoteApi> SyncDriver<'a, A> {
    pub fn new(api: &'a A, config: &'a Config) -> Self {
        SyncDriver {
            api,
            config,
            checkpoints: CheckpointManager::new(),
        }
    }

    pub fn with_checkpoints(api: &'a A, config: &'a Config, checkpoints: CheckpointManager) -> Self {
        SyncDriver {
            api,
            config,
            checkpoints,
        }
    }

    /// Loads the collections the pipeline operates on: the library's `.m3u`
    /// playlists when a playlist directory is configured, album folders
    /// otherwise.
    pub fn load_collections(&self, provider: &impl TagProvider) -> Vec<TrackCollection> {
        let library = LocalLibrary::load(self.config, provider);
        if !library.errors.is_empty() {
            warning!("{} files could not be read", library.errors.len());
        }

        if self.config.playlist_dir.is_some() {
            library.playlists
        } else {
            library.folders
        }
    }

    /// Search stage: resolves URIs for every collection, or loads the
    /// previous search checkpoint when one exists.
    pub async fn search(&self, provider: &impl TagProvider) -> Vec<TrackCollection> {
        if let Ok(Some(collections)) = self.checkpoints.load(Stage::Search).await {
            info!("Loaded search results from checkpoint");
            return collections;
        }

        let mut collections = self.load_collections(provider);
        let searcher = Searcher::new(self.api, self.config);
        searcher.search_all(&mut collections).await;

        if let Err(e) = self.checkpoints.save(Stage::Search, &collections).await {
            warning!("Failed to save search checkpoint: {:?}", e);
        }
        collections
    }

    /// Check stage: interactive verification of the search results, or a
    /// checkpoint quickload when the stage already completed.
    pub async fn check(
        &self,
        collections: &mut Vec<TrackCollection>,
        input: impl UserInput,
    ) -> CheckReport {
        if let Ok(Some(checked)) = self.checkpoints.load(Stage::Check).await {
            info!("Loaded check results from checkpoint");
            *collections = checked;
            return CheckReport::default();
        }

        let mut checker = Checker::new(self.api, self.config, input);
        let report = checker.check(collections).await;

        if !checker.quit_requested() {
            if let Err(e) = self.checkpoints.save(Stage::Check, collections).await {
                warning!("Failed to save check checkpoint: {:?}", e);
            }
        }
        report
    }

    /// Tag write-back stage: persists every resolved or unavailable URI into
    /// the corresponding file's tags. Returns the number of files updated.
    pub async fn write_tags(
        &self,
        collections: &[TrackCollection],
        provider: &impl TagProvider,
        replace: bool,
        dry_run: bool,
    ) -> usize {
        let mut written = 0;
        for collection in collections {
            for track in &collection.tracks {
                if track.uri.is_unresolved() {
                    continue;
                }
                match provider.write(&track.path, track, replace, dry_run) {
                    Ok(result) if result.saved || (dry_run && !result.updated.is_empty()) => {
                        written += 1;
                    }
                    Ok(_) => {}
                    Err(e) => warning!("Cannot write {}: {:?}", track.path.display(), e),
                }
            }
        }

        if let Err(e) = self.checkpoints.save(Stage::Tags, collections).await {
            warning!("Failed to save tags checkpoint: {:?}", e);
        }
        written
    }

    /// Push stage: reconciles each collection against the remote playlist of
    /// the same name, creating missing playlists on live runs.
    ///
    /// A failed playlist is logged with its URL and skipped so one bad
    /// playlist never aborts the rest of the push.
    pub async fn push(
        &self,
        collections: &[TrackCollection],
        kind: SyncKind,
        reload: bool,
        dry_run: bool,
    ) -> Vec<(String, SyncResult)> {
        let reconciler = PlaylistReconciler::new(self.api);
        let mut results = Vec::new();

        let remote_playlists = match self.api.user_playlists().await {
            Ok(playlists) => playlists,
            Err(e) => {
                warning!("Failed to list remote playlists: {}", e);
                return results;
            }
        };

        for collection in collections {
            let local_uris = collection.resolved_uris();
            if local_uris.is_empty() {
                continue;
            }

            let existing = remote_playlists
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(&collection.name));

            let (url, remote_uris) = match existing {
                Some(playlist) => {
                    let uris = match self.api.playlist_items(&playlist.href).await {
                        Ok(tracks) => tracks.into_iter().map(|t| t.uri).collect(),
                        Err(e) => {
                            warning!("{} | Failed to load remote playlist {}: {}", collection.name, playlist.href, e);
                            continue;
                        }
                    };
                    (playlist.href.clone(), uris)
                }
                None if dry_run => (String::new(), Vec::new()),
                None => match self.api.create_playlist(&collection.name, false, false).await {
                    Ok(url) => (url, Vec::new()),
                    Err(e) => {
                        warning!("{} | Failed to create remote playlist: {}", collection.name, e);
                        continue;
                    }
                },
            };

            match reconciler
                .sync(&url, &local_uris, &remote_uris, kind, reload, dry_run)
                .await
            {
                Ok(result) => results.push((collection.name.clone(), result)),
                Err(e) => {
                    warning!("{} | Sync failed for {}: {}", collection.name, url, e);
                }
            }
        }

        if let Err(e) = self.checkpoints.save(Stage::Push, collections).await {
            warning!("Failed to save push checkpoint: {:?}", e);
        }
        results
    }

    /// Runs the whole pipeline in order. Each stage picks up from its
    /// checkpoint when the previous run already completed it.
    pub async fn run(
        &self,
        provider: &impl TagProvider,
        input: impl UserInput,
        kind: SyncKind,
        replace_tags: bool,
        reload: bool,
        dry_run: bool,
    ) -> Vec<(String, SyncResult)> {
        let mut collections = self.search(provider).await;
        self.check(&mut collections, input).await;

        let written = self
            .write_tags(&collections, provider, replace_tags, dry_run)
            .await;
        success!("{} files updated", written);

        self.push(&collections, kind, reload, dry_run).await
    }
}

use clap::ValueEnum;

use crate::remote::{ApiError, RemoteApi};

/// Strategy for reconciling a local track list against a remote playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SyncKind {
    /// Only add local tracks missing from the remote playlist.
    New,
    /// Clear the remote playlist first, then add every local track.
    Refresh,
    /// Remove remote tracks absent locally, then add missing local tracks.
    Sync,
}

impl std::fmt::Display for SyncKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncKind::New => write!(f, "new"),
            SyncKind::Refresh => write!(f, "refresh"),
            SyncKind::Sync => write!(f, "sync"),
        }
    }
}

/// Immutable record of one reconciliation pass over one playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncResult {
    /// Remote track count before the sync.
    pub start: usize,
    /// Number of tracks added (API-reported on a live run, estimated on a
    /// dry run).
    pub added: usize,
    /// Number of tracks removed.
    pub removed: usize,
    /// Number of tracks present both before and after.
    pub unchanged: usize,
    /// `final_total - start`.
    pub difference: i64,
    /// Remote track count after the sync. Reloaded from the API when
    /// requested on a live run, estimated otherwise.
    pub final_total: usize,
}

/// Computes and applies the difference between an ordered local URI list and
/// a remote playlist.
///
/// When `dry_run` is set no mutating API call is issued and all counts are
/// computed as if the operation had succeeded.
pub struct PlaylistReconciler<'a, A: RemoteApi> {
    api: &'a A,
}

impl<'a, A: RemoteApi> PlaylistReconciler<'a, A> {
    pub fn new(api: &'a A) -> Self {
        PlaylistReconciler { api }
    }

    /// Reconciles `local` against the remote playlist at `url`, whose current
    /// contents are `remote`.
    ///
    /// Running with [`SyncKind::New`] twice in a row over identical inputs
    /// adds nothing on the second pass.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from any mutating call so the caller never
    /// loses track of a partially-cleared playlist.
    pub async fn sync(
        &self,
        url: &str,
        local: &[String],
        remote: &[String],
        kind: SyncKind,
        reload: bool,
        dry_run: bool,
    ) -> Result<SyncResult, ApiError> {
        let start = remote.len();

        let mut to_add: Vec<String> = local
            .iter()
            .filter(|uri| !remote.contains(uri))
            .cloned()
            .collect();
        let mut unchanged = start;
        let mut removed = 0;

        match kind {
            SyncKind::New => {}
            SyncKind::Refresh => {
                removed = if dry_run {
                    start
                } else {
                    self.api.clear_from_playlist(url, None).await?
                };
                to_add = local.to_vec();
                unchanged = 0;
            }
            SyncKind::Sync => {
                let to_clear: Vec<String> = remote
                    .iter()
                    .filter(|uri| !local.contains(uri))
                    .cloned()
                    .collect();
                removed = if dry_run || to_clear.is_empty() {
                    to_clear.len()
                } else {
                    self.api.clear_from_playlist(url, Some(&to_clear)).await?
                };
                unchanged = remote.iter().filter(|uri| local.contains(uri)).count();
            }
        }

        let mut added = to_add.len();
        if !dry_run && !to_add.is_empty() {
            added = self
                .api
                .add_to_playlist(url, &to_add, kind != SyncKind::Refresh)
                .await?;
        }

        let mut final_total = start + added - removed;
        if !dry_run && reload {
            final_total = self.api.playlist_items(url).await?.len();
        }

        Ok(SyncResult {
            start,
            added,
            removed,
            unchanged,
            difference: final_total as i64 - start as i64,
            final_total,
        })
    }
}

use tabled::Table;

use crate::check::StdinInput;
use crate::config::Config;
use crate::driver::SyncDriver;
use crate::library::FileTagProvider;
use crate::remote::{SpotifyClient, SyncKind, SyncResult};
use crate::types::SyncTableRow;
use crate::{error, info, success, warning};

fn print_results(results: &[(String, SyncResult)], dry_run: bool) {
    if results.is_empty() {
        warning!("No playlists were synchronised.");
        return;
    }

    let rows: Vec<SyncTableRow> = results
        .iter()
        .map(|(name, r)| SyncTableRow {
            playlist: name.clone(),
            start: r.start,
            added: r.added,
            removed: r.removed,
            unchanged: r.unchanged,
            difference: r.difference,
            total: r.final_total,
        })
        .collect();

    println!("{}", Table::new(rows));
    if dry_run {
        info!("Dry run: no remote playlist was modified. Re-run with --live to apply.");
    }
}

/// Tag write-back plus playlist push, from the latest checkpoint.
pub async fn sync(kind: SyncKind, live: bool, replace_tags: bool) {
    let config = Config::from_env();
    let api = match SpotifyClient::new().await {
        Ok(api) => api,
        Err(e) => error!("Cannot create API client: {}", e),
    };
    let dry_run = !live;

    let driver = SyncDriver::new(&api, &config);
    let mut collections = driver.search(&FileTagProvider).await;
    driver.check(&mut collections, StdinInput).await;

    let written = driver
        .write_tags(&collections, &FileTagProvider, replace_tags, dry_run)
        .await;
    success!("{} files updated", written);

    let results = driver.push(&collections, kind, true, dry_run).await;
    print_results(&results, dry_run);
}

/// The full pipeline: search, check, tags, push, report.
pub async fn run(kind: SyncKind, live: bool, replace_tags: bool) {
    let config = Config::from_env();
    let api = match SpotifyClient::new().await {
        Ok(api) => api,
        Err(e) => error!("Cannot create API client: {}", e),
    };
    let dry_run = !live;

    let driver = SyncDriver::new(&api, &config);
    let results = driver
        .run(&FileTagProvider, StdinInput, kind, replace_tags, true, dry_run)
        .await;
    print_results(&results, dry_run);
}

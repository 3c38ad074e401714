mod common;

use common::*;
use splisync::driver::SyncDriver;
use splisync::library::TrackCollection;
use splisync::management::CheckpointManager;
use splisync::remote::SyncKind;
use splisync::types::UserPlaylist;

const URI_A: &str = "spotify:track:AAAAAAAAAAAAAAAAAAAAAA";
const URI_B: &str = "spotify:track:BBBBBBBBBBBBBBBBBBBBBB";

fn playlist_collections() -> Vec<TrackCollection> {
    vec![TrackCollection {
        name: "Roadtrip".to_string(),
        tracks: vec![
            local_with_uri("One", "Band", "Roadtrip", 100.0, URI_A),
            local_with_uri("Two", "Band", "Roadtrip", 100.0, URI_B),
            local("Unmatched", "Band", "Roadtrip", 100.0),
        ],
    }]
}

#[tokio::test]
async fn push_dry_run_never_mutates_remote_state() {
    let api = MockApi::new();
    let config = test_config();
    let dir = tempfile::tempdir().unwrap();
    let driver = SyncDriver::with_checkpoints(
        &api,
        &config,
        CheckpointManager::with_dir(dir.path().to_path_buf()),
    );

    let results = driver
        .push(&playlist_collections(), SyncKind::New, false, true)
        .await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].1.added, 2);
    assert!(api.created_urls().is_empty());
    assert!(api.add_calls.lock().unwrap().is_empty());
    assert!(api.clear_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn push_creates_missing_playlists_on_live_runs() {
    let api = MockApi::new();
    let config = test_config();
    let dir = tempfile::tempdir().unwrap();
    let driver = SyncDriver::with_checkpoints(
        &api,
        &config,
        CheckpointManager::with_dir(dir.path().to_path_buf()),
    );

    let results = driver
        .push(&playlist_collections(), SyncKind::New, false, false)
        .await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].1.added, 2);
    assert_eq!(api.created_urls().len(), 1);

    let url = &api.created_urls()[0];
    let contents: Vec<String> = api.playlists.lock().unwrap()[url.as_str()]
        .iter()
        .map(|t| t.uri.clone())
        .collect();
    assert_eq!(contents, vec![URI_A.to_string(), URI_B.to_string()]);
}

#[tokio::test]
async fn push_reuses_existing_playlists_by_name() {
    let api = MockApi::new();
    let config = test_config();
    let dir = tempfile::tempdir().unwrap();

    api.stub_playlist("mock://existing", vec![remote_track("One", URI_A, 0)]);
    api.user_playlists.lock().unwrap().push(UserPlaylist {
        id: "existing".to_string(),
        name: "roadtrip".to_string(), // match is case-insensitive
        href: "mock://existing".to_string(),
    });

    let driver = SyncDriver::with_checkpoints(
        &api,
        &config,
        CheckpointManager::with_dir(dir.path().to_path_buf()),
    );

    let results = driver
        .push(&playlist_collections(), SyncKind::New, true, false)
        .await;

    assert_eq!(results.len(), 1);
    assert!(api.created_urls().is_empty());
    // only the missing track was added
    assert_eq!(results[0].1.added, 1);
    assert_eq!(results[0].1.final_total, 2);
}

mod common;

use std::collections::BTreeMap;
use std::path::PathBuf;

use common::*;
use splisync::library::{LocalTrack, TrackCollection, Uri};
use splisync::management::{BackupManager, CheckpointManager, Stage};

#[test]
fn uri_tri_state_serializes_distinctly() {
    let unresolved = serde_json::to_string(&Uri::Unresolved).unwrap();
    let unavailable = serde_json::to_string(&Uri::Unavailable).unwrap();
    let resolved = serde_json::to_string(&Uri::Resolved("spotify:track:X".to_string())).unwrap();

    assert_eq!(unresolved, "null");
    assert_eq!(unavailable, "false");
    assert_eq!(resolved, "\"spotify:track:X\"");
}

#[test]
fn uri_tri_state_round_trips() {
    for uri in [
        Uri::Unresolved,
        Uri::Unavailable,
        Uri::Resolved("spotify:track:X".to_string()),
    ] {
        let json = serde_json::to_string(&uri).unwrap();
        let back: Uri = serde_json::from_str(&json).unwrap();
        assert_eq!(back, uri, "round trip through {}", json);
    }

    // true is not a valid encoding of any state
    assert!(serde_json::from_str::<Uri>("true").is_err());
}

#[test]
fn local_track_round_trips_with_every_uri_state() {
    for uri in [
        Uri::Unresolved,
        Uri::Unavailable,
        Uri::Resolved("spotify:track:X".to_string()),
    ] {
        let mut track = local("Song", "Band", "Album", 181.5);
        track.uri = uri.clone();

        let json = serde_json::to_string(&track).unwrap();
        let back: LocalTrack = serde_json::from_str(&json).unwrap();
        assert_eq!(back.uri, uri);
        assert_eq!(back.title, "Song");
        assert_eq!(back.length, 181.5);
    }
}

#[test]
fn uri_tag_value_uses_the_unavailable_sentinel() {
    assert_eq!(Uri::Unresolved.tag_value(), None);
    assert_eq!(
        Uri::Unavailable.tag_value().as_deref(),
        Some("spotify:track:unavailable")
    );
    assert_eq!(
        Uri::from_tag_value(Some("spotify:track:unavailable")),
        Uri::Unavailable
    );
    assert_eq!(Uri::from_tag_value(None), Uri::Unresolved);
    assert_eq!(
        Uri::from_tag_value(Some("spotify:track:X")),
        Uri::Resolved("spotify:track:X".to_string())
    );
}

#[tokio::test]
async fn backup_round_trips_the_tri_state() {
    let dir = tempfile::tempdir().unwrap();
    let manager = BackupManager::with_path(dir.path().join("uris.json"));

    let mut unavailable = local("Gone", "Band", "Album", 100.0);
    unavailable.uri = Uri::Unavailable;
    let resolved = local_with_uri("Here", "Band", "Album", 100.0, "spotify:track:X");
    let unresolved = local("Later", "Band", "Album", 100.0);

    let tracks = vec![unavailable.clone(), resolved.clone(), unresolved.clone()];
    let saved = manager.save(tracks.iter()).await.unwrap();
    assert_eq!(saved, 3);

    let map = manager.load().await.unwrap();
    assert_eq!(map[&unavailable.path], Uri::Unavailable);
    assert_eq!(
        map[&resolved.path],
        Uri::Resolved("spotify:track:X".to_string())
    );
    assert_eq!(map[&unresolved.path], Uri::Unresolved);
}

#[test]
fn restore_overlays_only_backed_up_paths() {
    let in_backup = local("Covered", "Band", "Album", 100.0);
    let untouched = local_with_uri("Kept", "Band", "Album", 100.0, "spotify:track:K");

    let mut library = splisync::library::LocalLibrary {
        folders: vec![TrackCollection {
            name: "Album".to_string(),
            tracks: vec![in_backup.clone(), untouched.clone()],
        }],
        playlists: Vec::new(),
        errors: Vec::new(),
    };

    let mut backup: BTreeMap<PathBuf, Uri> = BTreeMap::new();
    backup.insert(in_backup.path.clone(), Uri::Unavailable);

    let restored = library.restore_uris(&backup);
    assert_eq!(restored, 1);
    assert_eq!(library.folders[0].tracks[0].uri, Uri::Unavailable);
    // records absent from the backup keep their current URI
    assert_eq!(
        library.folders[0].tracks[1].uri,
        Uri::Resolved("spotify:track:K".to_string())
    );
}

#[tokio::test]
async fn checkpoints_round_trip_and_missing_stage_means_recompute() {
    let dir = tempfile::tempdir().unwrap();
    let manager = CheckpointManager::with_dir(dir.path().to_path_buf());

    // a missing checkpoint is not an error
    assert!(manager.load(Stage::Search).await.unwrap().is_none());

    let collections = vec![
        TrackCollection {
            name: "A".to_string(),
            tracks: vec![local_with_uri("S", "B", "A", 100.0, "spotify:track:X")],
        },
        TrackCollection {
            name: "B".to_string(),
            tracks: vec![local("T", "B", "B", 200.0)],
        },
    ];

    manager.save(Stage::Search, &collections).await.unwrap();
    let loaded = manager.load(Stage::Search).await.unwrap().unwrap();

    assert_eq!(loaded.len(), 2);
    let a = loaded.iter().find(|c| c.name == "A").unwrap();
    assert_eq!(
        a.tracks[0].uri,
        Uri::Resolved("spotify:track:X".to_string())
    );
    let b = loaded.iter().find(|c| c.name == "B").unwrap();
    assert_eq!(b.tracks[0].uri, Uri::Unresolved);

    // other stages stay independent
    assert!(manager.load(Stage::Push).await.unwrap().is_none());

    manager.clear(Stage::Search).await.unwrap();
    assert!(manager.load(Stage::Search).await.unwrap().is_none());
}

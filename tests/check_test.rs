mod common;

use common::*;
use splisync::check::Checker;
use splisync::library::{TrackCollection, Uri};

const URI_A: &str = "spotify:track:AAAAAAAAAAAAAAAAAAAAAA";
const URI_B: &str = "spotify:track:BBBBBBBBBBBBBBBBBBBBBB";
const URI_C: &str = "spotify:track:CCCCCCCCCCCCCCCCCCCCCC";
const URI_NEW: &str = "spotify:track:DDDDDDDDDDDDDDDDDDDDDD";

fn collection(name: &str, tracks: Vec<splisync::library::LocalTrack>) -> TrackCollection {
    TrackCollection {
        name: name.to_string(),
        tracks,
    }
}

#[tokio::test]
async fn unavailable_all_suffix_applies_to_every_remaining_item() {
    let api = MockApi::new();
    let config = test_config();

    let mut collections = vec![collection(
        "Mixtape",
        vec![
            local_with_uri("Anchor", "Band", "Mixtape", 180.0, URI_A),
            local("T1", "Band", "Mixtape", 100.0),
            local("T2", "Band", "Mixtape", 100.0),
            local("T3", "Band", "Mixtape", 100.0),
            local("T4", "Band", "Mixtape", 100.0),
        ],
    )];

    // proceed past the pause, mark T1 unavailable, then apply to the rest
    let input = ScriptedInput::new(&["", "u", "ua"]);
    let mut checker = Checker::new(&api, &config, input);
    let report = checker.check(&mut collections).await;

    for i in 1..=4 {
        assert_eq!(collections[0].tracks[i].uri, Uri::Unavailable, "track {}", i);
    }
    assert_eq!(report.unavailable.len(), 4);
    assert!(report.switched.is_empty());
    assert!(report.skipped.is_empty());

    // the temp playlist is cleaned up afterwards
    assert_eq!(api.deleted_urls().len(), 1);
    assert_eq!(api.deleted_urls(), api.created_urls());
}

#[tokio::test]
async fn leave_unresolved_keeps_track_for_next_run() {
    let api = MockApi::new();
    let config = test_config();

    let mut collections = vec![collection(
        "Mixtape",
        vec![
            local_with_uri("Anchor", "Band", "Mixtape", 180.0, URI_A),
            local("Mystery", "Band", "Mixtape", 100.0),
        ],
    )];

    let input = ScriptedInput::new(&["", "n"]);
    let mut checker = Checker::new(&api, &config, input);
    let report = checker.check(&mut collections).await;

    assert_eq!(collections[0].tracks[1].uri, Uri::Unresolved);
    assert_eq!(report.skipped.len(), 1);
    assert!(report.unavailable.is_empty());
}

#[tokio::test]
async fn pasted_uri_switches_the_item() {
    let api = MockApi::new();
    let config = test_config();

    let mut collections = vec![collection(
        "Mixtape",
        vec![
            local_with_uri("Anchor", "Band", "Mixtape", 180.0, URI_A),
            local("Mystery", "Band", "Mixtape", 100.0),
        ],
    )];

    // an unrecognisable line reprompts the same item before the valid URI
    let input = ScriptedInput::new(&["", "bogus", URI_NEW]);
    let mut checker = Checker::new(&api, &config, input);
    let report = checker.check(&mut collections).await;

    assert_eq!(
        collections[0].tracks[1].uri,
        Uri::Resolved(URI_NEW.to_string())
    );
    assert_eq!(report.switched.len(), 1);
    assert_eq!(report.switched[0].title, "Mystery");
}

#[tokio::test]
async fn temp_playlists_are_deleted_exactly_once_even_when_a_reload_fails() {
    let api = MockApi::new();
    let config = test_config();

    let mut collections = vec![
        collection("One", vec![local_with_uri("S1", "B", "One", 100.0, URI_A)]),
        collection("Two", vec![local_with_uri("S2", "B", "Two", 100.0, URI_B)]),
        collection("Three", vec![local_with_uri("S3", "B", "Three", 100.0, URI_C)]),
    ];

    // the second temp playlist fails to reload during match_to_remote
    api.fail_items_for("mock://playlists/1");

    let input = ScriptedInput::new(&[""]);
    let mut checker = Checker::new(&api, &config, input);
    checker.check(&mut collections).await;

    let mut deleted = api.deleted_urls();
    deleted.sort();
    assert_eq!(
        deleted,
        vec![
            "mock://playlists/0".to_string(),
            "mock://playlists/1".to_string(),
            "mock://playlists/2".to_string(),
        ],
        "all three temp playlists deleted exactly once"
    );
}

#[tokio::test]
async fn quit_still_cleans_up_temp_playlists() {
    let api = MockApi::new();
    let config = test_config();

    let mut collections = vec![collection(
        "Mixtape",
        vec![local_with_uri("Anchor", "Band", "Mixtape", 180.0, URI_A)],
    )];

    let input = ScriptedInput::new(&["q"]);
    let mut checker = Checker::new(&api, &config, input);
    checker.check(&mut collections).await;

    assert!(checker.quit_requested());
    assert_eq!(api.deleted_urls().len(), 1);
}

#[tokio::test]
async fn end_of_input_behaves_like_quit() {
    let api = MockApi::new();
    let config = test_config();

    let mut collections = vec![collection(
        "Mixtape",
        vec![local_with_uri("Anchor", "Band", "Mixtape", 180.0, URI_A)],
    )];

    let input = ScriptedInput::new(&[]);
    let mut checker = Checker::new(&api, &config, input);
    checker.check(&mut collections).await;

    assert!(checker.quit_requested());
    assert_eq!(api.deleted_urls().len(), 1);
}

#[tokio::test]
async fn remote_additions_pair_back_to_switched_tracks() {
    let api = MockApi::new();
    let config = test_config();

    let mut collections = vec![collection(
        "Fav",
        vec![local_with_uri("The Song", "Band", "Fav", 180.0, URI_A)],
    )];

    // the user replaced the track with a different version in the temp playlist
    api.stub_edit("Fav", vec![remote_track("The Song", URI_NEW, 180_000)]);

    let input = ScriptedInput::new(&[""]);
    let mut checker = Checker::new(&api, &config, input);
    let report = checker.check(&mut collections).await;

    assert_eq!(
        collections[0].tracks[0].uri,
        Uri::Resolved(URI_NEW.to_string())
    );
    assert_eq!(report.switched.len(), 1);
    assert!(report.skipped.is_empty());
    assert_eq!(api.deleted_urls().len(), 1);
}

#[tokio::test]
async fn collections_without_resolved_uris_get_no_playlist() {
    let api = MockApi::new();
    let config = test_config();

    let mut collections = vec![collection(
        "Empty",
        vec![local("Unmatched", "Band", "Empty", 100.0)],
    )];

    let input = ScriptedInput::new(&[]);
    let mut checker = Checker::new(&api, &config, input);
    checker.check(&mut collections).await;

    assert!(api.created_urls().is_empty());
    assert!(api.deleted_urls().is_empty());
    assert!(!checker.quit_requested());
}

#[tokio::test]
async fn skip_halts_remaining_batches_but_still_reports() {
    let api = MockApi::new();
    let mut config = test_config();
    config.check_interval = 1; // one collection per batch

    let mut collections = vec![
        collection("One", vec![local_with_uri("S1", "B", "One", 100.0, URI_A)]),
        collection("Two", vec![local_with_uri("S2", "B", "Two", 100.0, URI_B)]),
    ];

    // skip during the first batch's pause: the second batch never starts
    let input = ScriptedInput::new(&["s"]);
    let mut checker = Checker::new(&api, &config, input);
    checker.check(&mut collections).await;

    assert!(!checker.quit_requested());
    assert_eq!(api.created_urls().len(), 1);
    assert_eq!(api.deleted_urls().len(), 1);
}

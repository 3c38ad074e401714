use splisync::utils::*;

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    // Should not be empty
    assert!(!challenge.is_empty());

    // Should be deterministic - same input produces same output
    let challenge2 = generate_code_challenge(verifier);
    assert_eq!(challenge, challenge2);

    // Different input should produce different output
    let challenge3 = generate_code_challenge("different_verifier");
    assert_ne!(challenge, challenge3);

    // Should be base64-encoded (URL-safe, no padding)
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
}

const ID: &str = "6rqhFgbbKwnb9MLmUQDhG6";

#[test]
fn test_parse_spotify_uri_forms() {
    // canonical URI
    assert_eq!(
        parse_spotify(&format!("spotify:track:{}", ID)),
        Some((SpotifyKind::Track, ID.to_string()))
    );
    assert_eq!(
        parse_spotify(&format!("spotify:playlist:{}", ID)),
        Some((SpotifyKind::Playlist, ID.to_string()))
    );

    // open and API URLs
    assert_eq!(
        parse_spotify(&format!("https://open.spotify.com/track/{}?si=abc", ID)),
        Some((SpotifyKind::Track, ID.to_string()))
    );
    assert_eq!(
        parse_spotify(&format!("https://api.spotify.com/v1/albums/{}", ID)),
        Some((SpotifyKind::Album, ID.to_string()))
    );

    // a bare 22-character id is assumed to be a track
    assert_eq!(
        parse_spotify(ID),
        Some((SpotifyKind::Track, ID.to_string()))
    );
}

#[test]
fn test_parse_spotify_rejects_noise() {
    assert_eq!(parse_spotify(""), None);
    assert_eq!(parse_spotify("not a uri"), None);
    assert_eq!(parse_spotify("spotify:track:short"), None);
    assert_eq!(parse_spotify("spotify:banana:6rqhFgbbKwnb9MLmUQDhG6"), None);
    // wrong length id
    assert_eq!(parse_spotify("6rqhFgbbKwnb9MLmUQDh"), None);
}

#[test]
fn test_validate_track_uri() {
    assert_eq!(
        validate_track_uri(&format!("spotify:track:{}", ID)).as_deref(),
        Some(format!("spotify:track:{}", ID).as_str())
    );
    // URLs normalise to the canonical URI form
    assert_eq!(
        validate_track_uri(&format!("https://open.spotify.com/track/{}", ID)).as_deref(),
        Some(format!("spotify:track:{}", ID).as_str())
    );
    // non-track objects are not track URIs
    assert_eq!(
        validate_track_uri(&format!("spotify:album:{}", ID)),
        None
    );
    assert_eq!(validate_track_uri("gibberish"), None);
}

#[test]
fn test_truncate_align() {
    assert_eq!(truncate_align("abc", 6), "abc   ");
    assert_eq!(truncate_align("abcdef", 6), "abcdef");
    assert_eq!(truncate_align("abcdefgh", 6), "abc...");
}

use chrono::Utc;
use reqwest::Client;
use serde_json::Value;

use crate::{config, error, management::TokenManager, success, types::Token, utils, warning};

/// Runs the OAuth 2.0 PKCE authentication flow with Spotify.
///
/// This function orchestrates the authentication process:
/// 1. Generating a PKCE code verifier and challenge
/// 2. Opening the authorization URL in the user's browser
/// 3. Reading the redirect URL the user pastes back after authorizing
/// 4. Exchanging the authorization code for an access token
/// 5. Persisting the obtained token for future use
///
/// The PKCE (Proof Key for Code Exchange) flow provides enhanced security
/// for OAuth flows without requiring a client secret to be stored securely.
///
/// # User Interaction
///
/// After granting access, the browser lands on the configured redirect URI.
/// The user copies that URL (or just the `code` parameter) back into the
/// terminal prompt; no local callback server is started.
///
/// # Error Handling
///
/// - Browser launch failures result in a warning with manual URL instructions
/// - Token persistence failures terminate the program with an error
/// - An empty or malformed pasted URL terminates with an error message
pub async fn auth() {
    // generate PKCE verifier and challenge
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    // Construct the authorization URL
    let auth_url = format!(
        "{spotify_auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&code_challenge={code_challenge}&code_challenge_method=S256&scope={scope}",
        spotify_auth_url = &config::spotify_apiauth_url(),
        client_id = &config::spotify_client_id(),
        redirect_uri = &config::spotify_redirect_uri(),
        code_challenge = code_challenge,
        scope = &config::spotify_scope()
    );

    // Open the authorization URL in the default browser
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    println!("After authorizing, paste the URL you were redirected to (or the code itself):");
    let mut line = String::new();
    if std::io::stdin().read_line(&mut line).is_err() {
        error!("Failed to read authorization code from input.");
    }

    let code = match extract_code(line.trim()) {
        Some(code) => code,
        None => error!("No authorization code found in the pasted input."),
    };

    match exchange_code_pkce(&code, &code_verifier).await {
        Ok(token) => {
            let token_manager = TokenManager::new(token);
            if let Err(e) = token_manager.persist().await {
                error!("Failed to save token to cache: {}", e);
            }
            success!("Authentication completed. Token stored.");
        }
        Err(e) => {
            error!("Token exchange failed: {}", e);
        }
    }
}

/// Pulls the `code` query parameter out of a pasted redirect URL, or returns
/// the input unchanged when it looks like a bare code.
fn extract_code(input: &str) -> Option<String> {
    if input.is_empty() {
        return None;
    }

    if let Some(query) = input.split('?').nth(1) {
        for pair in query.split('&') {
            if let Some(value) = pair.strip_prefix("code=") {
                return Some(value.to_string());
            }
        }
        return None;
    }

    // bare codes contain no URL separators
    if input.contains('/') || input.contains('=') {
        return None;
    }
    Some(input.to_string())
}

/// Exchanges an authorization code plus PKCE verifier for an access token.
///
/// Sends the final token request of the PKCE flow to the configured token
/// endpoint and assembles a [`Token`] with its obtained-at timestamp so
/// expiry can be computed later.
///
/// # Errors
///
/// Returns `reqwest::Error` on network failure or a malformed response.
pub async fn exchange_code_pkce(code: &str, verifier: &str) -> Result<Token, reqwest::Error> {
    let client_id = config::spotify_client_id();
    let redirect_uri = config::spotify_redirect_uri();

    let client = Client::new();
    let res = client
        .post(config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri.as_str()),
            ("client_id", client_id.as_str()),
            ("code_verifier", verifier),
        ])
        .send()
        .await?;

    let json: Value = res.json().await?;

    Ok(Token {
        access_token: json["access_token"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        refresh_token: json["refresh_token"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        scope: json["scope"].as_str().unwrap_or_default().to_string(),
        expires_in: json["expires_in"].as_i64().unwrap_or(3600) as u64,
        obtained_at: Utc::now().timestamp() as u64,
    })
}

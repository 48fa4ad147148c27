use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    Error, Result, config,
    management::TokenManager,
    server::start_api_server,
    types::{PkceToken, Token},
    utils, warning,
};

const LOGIN_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

impl TokenResponse {
    fn into_token(self, previous_refresh: Option<&str>) -> Token {
        Token {
            access_token: self.access_token,
            refresh_token: self
                .refresh_token
                .or_else(|| previous_refresh.map(str::to_string))
                .unwrap_or_default(),
            scope: self.scope.unwrap_or_default(),
            expires_in: self.expires_in.unwrap_or(3600),
            obtained_at: Utc::now().timestamp() as u64,
        }
    }
}

/// Builds the authorize URL the user is sent to.
pub fn authorize_url(client_id: &str, code_challenge: &str, state: &str) -> String {
    format!(
        "{auth_url}?response_type=code&client_id={client_id}&redirect_uri={redirect_uri}&code_challenge_method=S256&code_challenge={code_challenge}&scope={scope}&state={state}&show_dialog=false",
        auth_url = config::spotify_apiauth_url(),
        client_id = urlencoding::encode(client_id),
        redirect_uri = urlencoding::encode(&config::spotify_redirect_uri()),
        code_challenge = code_challenge,
        scope = urlencoding::encode(&config::spotify_scope()),
        state = state,
    )
}

/// Runs the OAuth 2.0 PKCE login and persists the resulting token.
///
/// 1. Generates the code verifier, its S256 challenge and a `state` token
/// 2. Starts the local callback server
/// 3. Opens the authorization URL in the browser (or prints it)
/// 4. Waits for the callback handler to exchange the code
/// 5. Saves the token through [`TokenManager`]
pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Result<Token> {
    let client_id = config::spotify_client_id()?;

    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);
    let state = utils::generate_state();

    // Store verifier and state before the browser can hit the callback
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier,
            state: state.clone(),
            token: None,
        });
    }

    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        if let Err(e) = start_api_server(server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    let auth_url = authorize_url(&client_id, &code_challenge, &state);
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let token = wait_for_token(shared_state)
        .await
        .ok_or(Error::AuthRequired)?;

    TokenManager::new(token.clone()).persist().await?;
    tracing::info!("Token stored");
    Ok(token)
}

/// Polls the shared state until the callback stored a token, or the login times out.
async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Option<Token> {
    let start = std::time::Instant::now();

    while start.elapsed() < LOGIN_TIMEOUT {
        {
            let lock = shared_state.lock().await;
            if let Some(token) = lock.as_ref().and_then(|p| p.token.clone()) {
                return Some(token);
            }
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

async fn request_token(form: &[(&str, &str)], previous_refresh: Option<&str>) -> Result<Token> {
    let response = Client::new()
        .post(config::spotify_apitoken_url())
        .form(form)
        .send()
        .await
        .map_err(crate::TransportError::from)?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(crate::TransportError::RequestFailed { status, body }.into());
    }

    let json: TokenResponse = response
        .json()
        .await
        .map_err(|e| Error::Decode(e.to_string()))?;
    Ok(json.into_token(previous_refresh))
}

/// Exchanges the authorization code and PKCE verifier for a token.
pub async fn exchange_code_pkce(code: &str, verifier: &str) -> Result<Token> {
    let client_id = config::spotify_client_id()?;
    let redirect_uri = config::spotify_redirect_uri();

    request_token(
        &[
            ("grant_type", "authorization_code"),
            ("client_id", &client_id),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", &redirect_uri),
        ],
        None,
    )
    .await
}

/// Trades a refresh token for a fresh access token. Spotify may omit a new
/// refresh token, in which case the old one is kept.
pub async fn refresh_token(refresh_token: &str) -> Result<Token> {
    let client_id = config::spotify_client_id()?;

    request_token(
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", &client_id),
        ],
        Some(refresh_token),
    )
    .await
}

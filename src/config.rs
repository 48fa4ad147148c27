//! Configuration management for spotlist.
//!
//! Values come from environment variables, which may be seeded from a `.env`
//! file in the local data directory. Everything except the client id has a
//! sensible default for the public Spotify endpoints.
//!
//! The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, path::PathBuf};

use crate::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const DEFAULT_SCOPE: &str = "user-read-private playlist-modify-public";
pub const DEFAULT_MAX_RETRIES: u32 = 10;

/// Directory holding the `.env` file and the token cache.
///
/// Falls back to the working directory when the platform has no local data
/// directory.
///
/// - Linux: `~/.local/share/spotlist`
/// - macOS: `~/Library/Application Support/spotlist`
/// - Windows: `%LOCALAPPDATA%/spotlist`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotlist");
    path
}

/// Loads environment variables from the `.env` file in the local data directory.
///
/// Creates the directory when it does not exist. A missing `.env` file is not
/// an error; the process environment and defaults are used instead.
///
/// # Example
///
/// ```
/// if let Err(e) = spotlist::config::load_env().await {
///     eprintln!("Configuration error: {}", e);
/// }
/// ```
pub async fn load_env() -> Result<()> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir)
        .await
        .map_err(|e| Error::Config(e.to_string()))?;

    let path = dir.join(".env");
    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| Error::Config(e.to_string()))?;
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }
    Ok(())
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Address the local OAuth callback server binds to.
///
/// Read from `SERVER_ADDRESS`. The port has to agree with the one in
/// [`spotify_redirect_uri`], otherwise Spotify redirects to a port nobody
/// listens on.
///
/// # Example
///
/// ```
/// let addr = spotlist::config::server_addr(); // "127.0.0.1:8888" by default
/// ```
pub fn server_addr() -> String {
    var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Client id of the registered Spotify application.
///
/// Read from `SPOTIFY_API_AUTH_CLIENT_ID`. Only the login and the token
/// refresh need it; import and export run on the cached token alone. There is
/// no client secret, the PKCE flow does without one.
///
/// # Errors
///
/// Returns [`Error::Config`] when `SPOTIFY_API_AUTH_CLIENT_ID` is unset or blank.
///
/// # Example
///
/// ```
/// match spotlist::config::spotify_client_id() {
///     Ok(id) => println!("using client {}", id),
///     Err(e) => eprintln!("{}", e),
/// }
/// ```
pub fn spotify_client_id() -> Result<String> {
    env::var("SPOTIFY_API_AUTH_CLIENT_ID")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::Config("SPOTIFY_API_AUTH_CLIENT_ID must be set".to_string()))
}

/// OAuth redirect URI; must match the one registered with Spotify.
///
/// Read from `SPOTIFY_API_REDIRECT_URI`, defaulting to
/// [`DEFAULT_REDIRECT_URI`].
pub fn spotify_redirect_uri() -> String {
    var_or("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI)
}

/// Space separated OAuth scopes requested during login.
///
/// The default covers what the tool does: reading the account id and writing
/// public playlists. Add `playlist-read-private` to export private playlists.
///
/// # Example
///
/// ```
/// let scope = spotlist::config::spotify_scope();
/// assert!(scope.split(' ').count() >= 1);
/// ```
pub fn spotify_scope() -> String {
    var_or("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE)
}

pub fn spotify_apiauth_url() -> String {
    var_or("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)
}

/// Base URL of the Web API including the version segment, without a trailing slash.
///
/// Read from `SPOTIFY_API_URL`. Pointing it elsewhere is how the client is run
/// against a local stand-in server.
///
/// # Example
///
/// ```
/// let url = spotlist::config::spotify_apiurl();
/// assert!(!url.ends_with('/'));
/// ```
pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", DEFAULT_API_URL)
        .trim_end_matches('/')
        .to_string()
}

pub fn spotify_apitoken_url() -> String {
    var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL)
}

/// Retry ceiling for rate-limited and transient server failures.
///
/// Both kinds of retry count against this one number. `0` turns retries off
/// entirely.
///
/// # Returns
///
/// The value of `SPOTLIST_MAX_RETRIES`, or [`DEFAULT_MAX_RETRIES`] when it is
/// unset or not a non-negative integer.
pub fn max_retries() -> u32 {
    env::var("SPOTLIST_MAX_RETRIES")
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_MAX_RETRIES)
}

/// Access token supplied directly through `SPOTIFY_ACCESS_TOKEN`, bypassing the token cache.
pub fn access_token_override() -> Option<String> {
    env::var("SPOTIFY_ACCESS_TOKEN")
        .ok()
        .filter(|v| !v.trim().is_empty())
}

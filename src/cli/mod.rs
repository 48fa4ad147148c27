//! # CLI Module
//!
//! User-facing commands. Each command wires configuration, credentials and a
//! progress bar into the sync engine and presents the outcome.
//!
//! ## Commands
//!
//! - [`auth`] - Spotify OAuth 2.0 PKCE login
//! - [`import`] - Build a playlist from a song list file or stdin
//! - [`export`] - Print or save a playlist as numbered text
//! - [`rename`] - Change a playlist's name or description
//!
//! ## Usage Patterns
//!
//! ```bash
//! spotlist auth
//! spotlist import --name "Night Drive" songs.txt
//! spotlist import --name "Night Drive" --dry-run songs.json
//! spotlist export https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M --output list.txt
//! spotlist rename spotify:playlist:37i9dQZF1DXcBWIGoYBM5M --description "Late night"
//! ```
//!
//! ## Credentials
//!
//! `SPOTIFY_ACCESS_TOKEN` takes precedence; otherwise the token cached by
//! `spotlist auth` is used. With neither, commands fail before any request.

mod auth;
mod export;
mod import;
mod progress;

use std::sync::Arc;

use crate::{
    config,
    management::{CredentialProvider, StaticCredential, TokenManager},
};

pub use auth::auth;
pub use export::{export, rename};
pub use import::import;
pub use progress::CliProgress;

/// Picks the credential source for this run.
pub async fn credentials() -> Arc<dyn CredentialProvider> {
    if let Some(token) = config::access_token_override() {
        return Arc::new(StaticCredential::new(token));
    }

    match TokenManager::load().await {
        Ok(mgr) => Arc::new(mgr),
        Err(e) => {
            tracing::debug!(error = %e, "No cached token");
            Arc::new(StaticCredential::none())
        }
    }
}

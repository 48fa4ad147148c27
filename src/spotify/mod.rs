//! # Spotify Integration Module
//!
//! The layer between spotlist and the Spotify Web API: authentication, the
//! typed endpoint client, and the resilient transport underneath both.
//!
//! ```text
//! Sync engine (resolver, committer, exporter)
//!          ↓
//! SpotifyClient (typed endpoints)
//!          ↓
//! Transport (429 / 5xx retry policy)
//!          ↓
//! reqwest → Spotify Web API
//! ```
//!
//! ## Modules
//!
//! - [`auth`] - OAuth 2.0 PKCE login, code exchange and token refresh
//! - [`client`] - `SpotifyClient` with one method per endpoint used
//! - [`transport`] - `Transport` and its `RetryPolicy`
//!
//! ## API Coverage
//!
//! - `GET /me`
//! - `POST /users/{user_id}/playlists`
//! - `PUT /playlists/{playlist_id}`
//! - `GET /search?type=track&limit=1`
//! - `POST /playlists/{playlist_id}/tracks`
//! - `GET /playlists/{playlist_id}/tracks` and its `next` cursors
//!
//! ## Rate Limiting
//!
//! `429 Too Many Requests` waits for the `Retry-After` hint plus 250ms before
//! retrying; `500/502/503/504` back off exponentially from 400ms up to 8s.
//! Both count against the same retry ceiling (10 by default). Other error
//! statuses fail immediately.

pub mod auth;
pub mod client;
pub mod transport;

pub use client::{ApiConfig, SpotifyClient};
pub use transport::{RetryPolicy, Transport};

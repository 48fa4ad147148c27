//! # API Module
//!
//! HTTP endpoints served by the short-lived local server that completes the
//! Spotify OAuth 2.0 PKCE login.
//!
//! ## Endpoints
//!
//! - [`callback`] - Receives the authorization code, checks the `state` token
//!   and exchanges the code plus verifier for an access token.
//! - [`health`] - Reports version and whether a login is still pending.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use spotlist::server::router;
//!
//! let app = router(shared_state);
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;

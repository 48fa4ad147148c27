use std::sync::LazyLock;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::types::{SongQuery, SongTableRow};

/// RFC 7636 unreserved characters allowed in a code verifier.
const PKCE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

static PLAYLIST_URI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"spotify:playlist:([a-zA-Z0-9]+)").expect("valid regex"));
static PLAYLIST_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"playlist/([a-zA-Z0-9]+)").expect("valid regex"));
static BARE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]{10,}$").expect("valid regex"));

fn random_string(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| PKCE_CHARSET[rng.random_range(0..PKCE_CHARSET.len())] as char)
        .collect()
}

pub fn generate_code_verifier() -> String {
    random_string(64)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Anti-forgery token echoed back by the authorization server.
pub fn generate_state() -> String {
    random_string(32)
}

/// Pulls a playlist id out of a share URL, a `spotify:playlist:` URI, or a bare id.
///
/// Returns `None` when nothing recognisable is found.
pub fn extract_playlist_id(input: &str) -> Option<String> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(caps) = PLAYLIST_URI.captures(s) {
        return Some(caps[1].to_string());
    }
    if let Some(caps) = PLAYLIST_URL.captures(s) {
        return Some(caps[1].to_string());
    }
    if BARE_ID.is_match(s) {
        return Some(s.to_string());
    }
    None
}

pub fn song_table_rows(songs: &[SongQuery]) -> Vec<SongTableRow> {
    songs
        .iter()
        .enumerate()
        .map(|(i, s)| SongTableRow {
            index: i + 1,
            title: s.title.clone(),
            artist: if s.artist.is_empty() {
                "-".to_string()
            } else {
                s.artist.clone()
            },
        })
        .collect()
}

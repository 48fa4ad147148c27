//! Spotify Song List CLI Library
//!
//! This library turns free-text or JSON song lists into Spotify playlists and
//! exports existing playlists back into numbered text. It contains the
//! synchronization engine (search resolution, batched commits, paginated
//! export) together with the reliability layer every request goes through.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error types shared by the engine
//! - `logging` - Tracing subscriber setup
//! - `management` - Credentials, session store and operation guard
//! - `parser` - Song list parsing
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client and resilient transport
//! - `sync` - Import and export orchestration
//! - `types` - Data structures and type definitions
//! - `utils` - PKCE helpers and playlist reference parsing
//!
//! # Example
//!
//! ```
//! use spotlist::{config, parser};
//!
//! #[tokio::main]
//! async fn main() -> spotlist::Res<()> {
//!     config::load_env().await?;
//!     let songs = parser::parse("1. Goosebumps - Travis Scott");
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod management;
pub mod parser;
pub mod server;
pub mod spotify;
pub mod sync;
pub mod types;
pub mod utils;

pub use error::{Error, Result, TransportError};

/// A convenient Result type alias for CLI glue that mixes error sources.
///
/// Engine code returns [`Result`]; the boxed form is used where errors from
/// several crates meet, such as the authentication flow.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Output goes to stdout, prefixed with a blue `o`. Used for status lines
/// the user is meant to read, such as the playlist link after an import.
///
/// # Arguments
///
/// Same as `println!`: a format string followed by its arguments.
///
/// # Example
///
/// ```
/// info!("Reading song list from {}", path);
/// info!("Detected songs: {}", songs.len());
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Arguments
///
/// Same as `println!`.
///
/// # Example
///
/// ```
/// success!("Playlist ready: {} of {} songs found.", found, total);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for fatal errors where recovery is not possible; code after this
/// macro does not execute. The message goes to stderr and the process exits
/// with status 1, so the macro can stand in any expression position, for
/// instance as a `match` arm.
///
/// # Arguments
///
/// Same as `eprintln!`.
///
/// # Example
///
/// ```
/// let raw = match read_input(file).await {
///     Ok(raw) => raw,
///     Err(e) => error!("{}", e),
/// };
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Written to stderr, so warnings never end up in exported text piped from
/// stdout. Execution continues.
///
/// # Example
///
/// ```
/// warning!("{} song(s) could not be found:", not_found.len());
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

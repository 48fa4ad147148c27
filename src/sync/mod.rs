//! # Sync Engine
//!
//! Turns song lists into playlists and playlists back into text.
//!
//! ```text
//! import:  raw text → parser → resolver (one search per song)
//!                   → committer (batches of 100) → ImportSummary
//! export:  playlist id → exporter (pages of 50, follows `next`) → ExportResult
//! ```
//!
//! Operations run one at a time per [`crate::management::Session`] and report
//! progress as [`ProgressEvent`]s to a caller supplied [`ProgressSink`]. All
//! requests go through [`crate::spotify::Transport`], so rate limiting and
//! transient server errors are handled below this layer.
//!
//! Nothing is rolled back on failure. A playlist created before a failing
//! search, or partially filled before a failing batch, stays as it is.

pub mod committer;
pub mod export;
pub mod exporter;
pub mod import;
pub mod progress;
pub mod resolver;

pub use export::{export_playlist, rename_playlist};
pub use import::import_playlist;
pub use progress::{NoProgress, ProgressEvent, ProgressLog, ProgressSink};

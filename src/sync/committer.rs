use std::time::Duration;

use tokio::time::sleep;

use crate::{
    Error, Result,
    spotify::SpotifyClient,
    sync::progress::{ProgressEvent, ProgressSink},
};

/// Most URIs Spotify accepts in a single add-items request.
pub const MAX_BATCH_SIZE: usize = 100;

/// Pause between batches to stay clear of rate limiting.
pub const BATCH_DELAY: Duration = Duration::from_millis(150);

/// Splits `uris` into ordered, contiguous batches of at most [`MAX_BATCH_SIZE`].
pub fn batches(uris: &[String]) -> Vec<&[String]> {
    uris.chunks(MAX_BATCH_SIZE).collect()
}

/// Adds `uris` to the playlist batch by batch, in order.
///
/// Emits [`ProgressEvent::SendingBatch`] before and [`ProgressEvent::BatchDone`]
/// after each request. There is no rollback: when a batch fails, the batches
/// before it stay in the playlist and [`Error::PartialCommit`] reports how many
/// tracks were added. A failing first batch leaves nothing behind and comes
/// back as a plain [`Error::Transport`].
pub async fn commit(
    client: &SpotifyClient,
    playlist_id: &str,
    uris: &[String],
    sink: &mut dyn ProgressSink,
) -> Result<()> {
    let total = uris.len();
    let chunks = batches(uris);
    let total_batches = chunks.len();
    let mut added_so_far = 0;

    for (i, chunk) in chunks.into_iter().enumerate() {
        let batch = i + 1;
        let batch_size = chunk.len();

        sink.emit(ProgressEvent::SendingBatch {
            batch,
            total_batches,
            added_so_far,
            total,
            batch_size,
        });

        if let Err(source) = client.add_tracks(playlist_id, chunk).await {
            tracing::error!(batch, total_batches, committed = added_so_far, error = %source, "Batch failed");
            if added_so_far == 0 {
                return Err(Error::Transport(source));
            }
            return Err(Error::PartialCommit {
                committed: added_so_far,
                source,
            });
        }

        added_so_far += batch_size;
        tracing::debug!(batch, total_batches, added_so_far, "Batch committed");

        sink.emit(ProgressEvent::BatchDone {
            batch,
            total_batches,
            added_so_far,
            total,
            batch_size,
        });

        sleep(BATCH_DELAY).await;
    }

    Ok(())
}

use crate::{
    Result,
    spotify::SpotifyClient,
    sync::progress::{ProgressEvent, ProgressSink},
    types::{ResolutionResult, ResolvedTrack, SongQuery},
};

/// Search expression for a song: `track:<title>` plus `artist:<artist>` when known.
pub fn search_expression(query: &SongQuery) -> String {
    let mut parts = Vec::with_capacity(2);
    if !query.title.is_empty() {
        parts.push(format!("track:{}", query.title));
    }
    if !query.artist.is_empty() {
        parts.push(format!("artist:{}", query.artist));
    }
    parts.join(" ")
}

/// Looks up the single best match for a song. `None` means no match.
///
/// This is a best-effort search; the first candidate is taken as is.
pub async fn resolve(client: &SpotifyClient, query: &SongQuery) -> Result<Option<ResolvedTrack>> {
    let response = client.search_track(&search_expression(query)).await?;
    let track = response
        .tracks
        .and_then(|t| t.items.into_iter().next())
        .and_then(|item| item.uri)
        .filter(|uri| !uri.is_empty())
        .map(|uri| ResolvedTrack { uri });

    if track.is_none() {
        tracing::debug!(title = %query.title, artist = %query.artist, "No match");
    }
    Ok(track)
}

/// Resolves every song one after another, in input order.
///
/// Emits [`ProgressEvent::Searching`] before each search. A failed search
/// aborts the whole run; unmatched songs are collected in `not_found`.
pub async fn resolve_all(
    client: &SpotifyClient,
    songs: &[SongQuery],
    sink: &mut dyn ProgressSink,
) -> Result<ResolutionResult> {
    let mut result = ResolutionResult::default();
    let total = songs.len();

    for (i, song) in songs.iter().enumerate() {
        sink.emit(ProgressEvent::Searching {
            index: i + 1,
            total,
            query: song.clone(),
        });

        match resolve(client, song).await? {
            Some(track) => result.found.push(track),
            None => result.not_found.push(song.clone()),
        }
    }

    Ok(result)
}

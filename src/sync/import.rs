use crate::{
    Error, Result,
    management::{
        KEY_LAST_FOUND, KEY_LAST_NOT_FOUND, KEY_LAST_NOT_FOUND_COUNT, KEY_LAST_PLAYLIST_URL,
        KEY_LAST_TOTAL, Session,
    },
    parser,
    spotify::{ApiConfig, client::PLAYLIST_DESCRIPTION},
    sync::{committer, progress::ProgressSink, resolver},
    types::ImportSummary,
};

/// Builds a new playlist named `name` from the raw song list `raw`.
///
/// Steps, in order: claim the session, check for a credential, validate the
/// input, look up the account, create the playlist, resolve every song, then
/// add the matches in batches. The counts, the not-found list and the playlist
/// URL are written to the session store for the result screen.
///
/// # Errors
///
/// - [`Error::Busy`] when another operation is running.
/// - [`Error::AuthRequired`] when no token is available; nothing is sent.
/// - [`Error::Validation`] for an empty name or a list without songs.
/// - [`Error::Transport`] when a request fails for good. The playlist may
///   already exist at that point and is left as is.
/// - [`Error::PartialCommit`] when adding tracks failed midway.
pub async fn import_playlist(
    session: &Session,
    api: &ApiConfig,
    name: &str,
    raw: &str,
    sink: &mut dyn ProgressSink,
) -> Result<ImportSummary> {
    let _guard = session.begin()?;
    let token = session.bearer_token().await?;

    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("Playlist name cannot be empty".to_string()));
    }
    let songs = parser::parse(raw);
    if songs.is_empty() {
        return Err(Error::Validation("Song list cannot be empty".to_string()));
    }

    let client = api.client(token);

    tracing::info!("Verifying Spotify account");
    let me = client.me().await?;

    tracing::info!(name, "Creating playlist");
    let playlist = client
        .create_playlist(&me.id, name, PLAYLIST_DESCRIPTION)
        .await?;

    tracing::info!(songs = songs.len(), "Searching tracks");
    let resolution = resolver::resolve_all(&client, &songs, sink).await?;
    tracing::info!(
        found = resolution.found.len(),
        total = resolution.total(),
        "Search finished"
    );

    let store = session.store();
    store.set(KEY_LAST_TOTAL, songs.len().to_string());
    store.set(KEY_LAST_FOUND, resolution.found.len().to_string());
    store.set(
        KEY_LAST_NOT_FOUND_COUNT,
        resolution.not_found.len().to_string(),
    );

    if resolution.found.is_empty() {
        tracing::info!("No tracks found, playlist left empty");
    } else {
        committer::commit(&client, &playlist.id, &resolution.uris(), sink).await?;
    }

    let playlist_url = playlist.external_urls.spotify.clone().unwrap_or_default();
    store.set(KEY_LAST_PLAYLIST_URL, playlist_url.clone());
    store.set(
        KEY_LAST_NOT_FOUND,
        serde_json::to_string(&resolution.not_found).unwrap_or_else(|_| "[]".to_string()),
    );

    tracing::info!(playlist = %playlist.id, "Import finished");
    Ok(ImportSummary {
        playlist_id: playlist.id,
        playlist_url,
        total: songs.len(),
        found: resolution.found.len(),
        not_found: resolution.not_found,
    })
}

use crate::{
    Error, Result,
    management::Session,
    spotify::ApiConfig,
    sync::{exporter, progress::ProgressSink},
    types::{ExportResult, UpdatePlaylistRequest},
    utils,
};

fn playlist_id(reference: &str) -> Result<String> {
    utils::extract_playlist_id(reference).ok_or_else(|| {
        Error::Validation(format!(
            "Could not read a playlist id from '{}'. Use a link like https://open.spotify.com/playlist/...",
            reference.trim()
        ))
    })
}

/// Exports a playlist, given as link, URI or id, to numbered text lines.
///
/// # Errors
///
/// [`Error::Busy`], [`Error::AuthRequired`] and [`Error::Validation`] before any
/// request is made; [`Error::Transport`] when a page cannot be fetched, in
/// which case no partial text is returned.
pub async fn export_playlist(
    session: &Session,
    api: &ApiConfig,
    reference: &str,
    sink: &mut dyn ProgressSink,
) -> Result<ExportResult> {
    let _guard = session.begin()?;
    let token = session.bearer_token().await?;
    let id = playlist_id(reference)?;

    tracing::info!(playlist = %id, "Reading playlist");
    let client = api.client(token);
    let result = exporter::export_to_text(&client, &id, sink).await?;
    tracing::info!(total = result.total, "Export finished");
    Ok(result)
}

/// Changes a playlist's name and/or description.
///
/// # Errors
///
/// [`Error::Validation`] when neither field is given or the reference is not
/// a playlist.
pub async fn rename_playlist(
    session: &Session,
    api: &ApiConfig,
    reference: &str,
    details: UpdatePlaylistRequest,
) -> Result<()> {
    let _guard = session.begin()?;
    let token = session.bearer_token().await?;
    let id = playlist_id(reference)?;

    let details = UpdatePlaylistRequest {
        name: details
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        description: details.description,
    };
    if details.name.is_none() && details.description.is_none() {
        return Err(Error::Validation(
            "Nothing to update: give a name or a description".to_string(),
        ));
    }

    api.client(token).update_playlist(&id, &details).await?;
    tracing::info!(playlist = %id, "Playlist details updated");
    Ok(())
}

use std::path::PathBuf;

use crate::{
    cli::{credentials, progress::CliProgress},
    error,
    management::Session,
    spotify::ApiConfig,
    success, sync,
    types::UpdatePlaylistRequest,
};

pub async fn export(playlist: String, output: Option<PathBuf>) {
    let session = Session::new(credentials().await);
    let api = ApiConfig::from_env();

    let mut progress = CliProgress::new("Reading playlist...");
    let result = sync::export_playlist(&session, &api, &playlist, &mut progress).await;
    progress.finish();

    let result = match result {
        Ok(r) => r,
        Err(e) => error!("Export failed: {}", e),
    };

    match output {
        Some(path) => {
            if let Err(e) = async_fs::write(&path, format!("{}\n", result.text)).await {
                error!("Cannot write {}: {}", path.display(), e);
            }
            success!("Exported {} songs to {}", result.total, path.display());
        }
        // stdout carries only the exported text so it can be piped
        None => {
            println!("{}", result.text);
            tracing::info!(total = result.total, "Exported to stdout");
        }
    }
}

pub async fn rename(playlist: String, name: Option<String>, description: Option<String>) {
    let session = Session::new(credentials().await);
    let api = ApiConfig::from_env();

    let details = UpdatePlaylistRequest { name, description };
    match sync::rename_playlist(&session, &api, &playlist, details).await {
        Ok(()) => success!("Playlist updated."),
        Err(e) => error!("Update failed: {}", e),
    }
}

use std::path::PathBuf;

use tabled::Table;
use tokio::io::AsyncReadExt;

use crate::{
    Error, error, info,
    cli::{credentials, progress::CliProgress},
    management::{KEY_LAST_FOUND, KEY_LAST_PLAYLIST_URL, KEY_LAST_TOTAL, Session, SessionStore},
    parser,
    spotify::ApiConfig,
    success, sync, utils, warning,
};

async fn read_input(file: Option<PathBuf>) -> Result<String, String> {
    match file {
        Some(path) if path.as_os_str() != "-" => async_fs::read_to_string(&path)
            .await
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e)),
        _ => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .map_err(|e| format!("Cannot read stdin: {}", e))?;
            Ok(raw)
        }
    }
}

pub async fn import(name: String, file: Option<PathBuf>, dry_run: bool) {
    let raw = match read_input(file).await {
        Ok(raw) => raw,
        Err(e) => error!("{}", e),
    };

    if dry_run {
        let songs = parser::parse(&raw);
        if songs.is_empty() {
            warning!("No songs detected.");
            return;
        }
        println!("{}", Table::new(utils::song_table_rows(&songs)));
        info!("Detected songs: {}", songs.len());
        return;
    }

    let session = Session::new(credentials().await);
    let api = ApiConfig::from_env();

    info!("Creating playlist \"{}\"", name.trim());
    let mut progress = CliProgress::new("Verifying Spotify account...");
    let result = sync::import_playlist(&session, &api, &name, &raw, &mut progress).await;
    progress.finish();

    match result {
        Ok(_) => show_result(session.store()),
        Err(Error::PartialCommit { committed, source }) => error!(
            "Adding tracks stopped after {} track(s); the playlist keeps what was added. Err: {}",
            committed, source
        ),
        Err(e) => error!("{}", e),
    }
}

/// Prints the outcome of the last import from the session store.
fn show_result(store: &SessionStore) {
    let total = store.get_count(KEY_LAST_TOTAL);
    let found = store.get_count(KEY_LAST_FOUND);
    let not_found = store.last_not_found();

    success!("Playlist ready: {} of {} songs found.", found, total);
    match store.get(KEY_LAST_PLAYLIST_URL).filter(|u| !u.is_empty()) {
        Some(url) => info!("Open it at {}", url),
        None => warning!("Spotify did not return a playlist link."),
    }

    if found == 0 {
        warning!("No songs were found; the playlist was created empty.");
    }

    if !not_found.is_empty() {
        warning!("{} song(s) could not be found:", not_found.len());
        println!("{}", Table::new(utils::song_table_rows(&not_found)));
    }
}

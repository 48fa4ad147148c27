use std::time::Duration;

use tokio::time::sleep;

use crate::{
    Result,
    spotify::{SpotifyClient, client::EXPORT_PAGE_SIZE},
    sync::progress::{ProgressEvent, ProgressSink},
    types::{ExportResult, PlaylistItem},
};

/// Pause between page fetches.
pub const PAGE_DELAY: Duration = Duration::from_millis(120);

/// Formats one exported track, or `None` when the item has no usable track.
///
/// Artist names are joined with `", "`; a track without artists prints just
/// its name.
pub fn format_line(index: usize, item: &PlaylistItem) -> Option<String> {
    let track = item.track.as_ref()?;
    let name = track.name.as_deref().unwrap_or_default().trim();
    if name.is_empty() {
        return None;
    }

    let artists = track
        .artists
        .iter()
        .filter_map(|a| a.name.as_deref())
        .filter(|n| !n.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    let artists = artists.trim();

    if artists.is_empty() {
        Some(format!("{}. {}", index, name))
    } else {
        Some(format!("{}. {} – {}", index, name, artists))
    }
}

/// Page counters reported after each fetch: `(fetched, total, page, pages)`.
///
/// With an unknown total everything collapses to a single page.
pub fn page_progress(fetched: u64, total: Option<u64>, limit: u64) -> (u64, u64, u64, u64) {
    let (page, pages) = match total {
        Some(total) if total > 0 => {
            let pages = total.div_ceil(limit).max(1);
            (fetched.div_ceil(limit).clamp(1, pages), pages)
        }
        _ => (1, 1),
    };
    let reported_total = total.unwrap_or(fetched);
    (fetched.min(reported_total), reported_total, page, pages)
}

/// Reads every page of a playlist and renders it as numbered lines.
///
/// Numbering runs across the whole playlist. The loop ends as soon as a page
/// carries no `next` cursor, whatever the reported total says. If any page
/// fails after its retries the whole export fails and no text is returned.
pub async fn export_to_text(
    client: &SpotifyClient,
    playlist_id: &str,
    sink: &mut dyn ProgressSink,
) -> Result<ExportResult> {
    let limit = u64::from(EXPORT_PAGE_SIZE);
    let mut url = Some(client.playlist_tracks_url(playlist_id));
    let mut total: Option<u64> = None;
    let mut fetched: u64 = 0;
    let mut lines: Vec<String> = Vec::new();

    while let Some(current) = url.take() {
        let page = client.playlist_tracks_page(&current).await?;

        if page.total.is_some() {
            total = page.total;
        }

        for item in &page.items {
            if let Some(line) = format_line(lines.len() + 1, item) {
                lines.push(line);
            }
        }
        fetched += page.items.len() as u64;

        let (reported, reported_total, page_no, pages) = page_progress(fetched, total, limit);
        tracing::debug!(page = page_no, pages, fetched, "Fetched playlist page");
        sink.emit(ProgressEvent::FetchingPage {
            fetched: reported,
            total: reported_total,
            page: page_no,
            pages,
        });

        url = page.next.filter(|next| !next.is_empty());
        if url.is_some() {
            sleep(PAGE_DELAY).await;
        }
    }

    let total = total.unwrap_or(lines.len() as u64);
    Ok(ExportResult {
        text: lines.join("\n"),
        total,
    })
}

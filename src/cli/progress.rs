use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::sync::{ProgressEvent, ProgressSink};

/// Renders engine progress as an `indicatif` bar on stderr.
pub struct CliProgress {
    pb: ProgressBar,
}

impl CliProgress {
    pub fn new(message: &str) -> Self {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::with_template("{spinner:.blue} [{bar:30.green}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .progress_chars("=> "),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(message.to_string());
        Self { pb }
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

impl ProgressSink for CliProgress {
    fn emit(&mut self, event: ProgressEvent) {
        match event {
            ProgressEvent::Searching {
                index,
                total,
                query,
            } => {
                self.pb.set_length(total as u64);
                self.pb.set_position(index as u64);
                self.pb.set_message(format!("Searching: {}", query));
            }
            ProgressEvent::SendingBatch {
                batch,
                total_batches,
                added_so_far,
                total,
                batch_size,
            } => {
                self.pb.set_length(total as u64);
                self.pb.set_position(added_so_far as u64);
                self.pb.set_message(format!(
                    "Sending batch {}/{} ({} songs)",
                    batch, total_batches, batch_size
                ));
            }
            ProgressEvent::BatchDone {
                batch,
                total_batches,
                added_so_far,
                total,
                ..
            } => {
                self.pb.set_position(added_so_far as u64);
                self.pb.println(format!(
                    "Added batch {}/{} (total {}/{})",
                    batch, total_batches, added_so_far, total
                ));
            }
            ProgressEvent::FetchingPage {
                fetched,
                total,
                page,
                pages,
            } => {
                self.pb.set_length(total);
                self.pb.set_position(fetched);
                self.pb.set_message(format!("Reading page {}/{}", page, pages));
            }
        }
    }
}

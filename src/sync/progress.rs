use crate::types::SongQuery;

/// Progress notifications emitted while an import or export runs.
///
/// Events are purely observational; dropping them changes nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// About to search for song `index` (1-based) of `total`.
    Searching {
        index: usize,
        total: usize,
        query: SongQuery,
    },
    /// Batch `batch` of `total_batches` is about to be sent.
    SendingBatch {
        batch: usize,
        total_batches: usize,
        added_so_far: usize,
        total: usize,
        batch_size: usize,
    },
    /// Batch `batch` was accepted; `added_so_far` includes it.
    BatchDone {
        batch: usize,
        total_batches: usize,
        added_so_far: usize,
        total: usize,
        batch_size: usize,
    },
    /// A playlist page was read.
    FetchingPage {
        fetched: u64,
        total: u64,
        page: u64,
        pages: u64,
    },
}

/// Receiver for [`ProgressEvent`]s. Implemented for closures, so
/// `&mut |event| println!("{event:?}")` works as a sink.
pub trait ProgressSink {
    fn emit(&mut self, event: ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: FnMut(ProgressEvent),
{
    fn emit(&mut self, event: ProgressEvent) {
        self(event)
    }
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn emit(&mut self, _event: ProgressEvent) {}
}

/// Sink that keeps every event in order.
#[derive(Debug, Default, Clone)]
pub struct ProgressLog {
    pub events: Vec<ProgressEvent>,
}

impl ProgressSink for ProgressLog {
    fn emit(&mut self, event: ProgressEvent) {
        self.events.push(event);
    }
}

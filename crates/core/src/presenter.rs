//! Search presenter: owns the displayed record list and the observable view
//! state, and runs the fetch + extract pipeline on a worker thread.
//!
//! Threading contract: `search` and `poll` are called from the owning
//! (interaction) thread; the record list is only ever touched there. The
//! worker communicates results back over a channel tagged with a search
//! generation, and a superseded generation is dropped on arrival
//! (cancel-and-replace).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::catalog::Fetcher;
use crate::connectivity::ConnectivityProbe;
use crate::extract;
use crate::record::BookRecord;
use crate::thumbnail::ThumbnailSource;

pub const HINT_MESSAGE: &str = "Type a search to find books.";
pub const NO_RESULTS_MESSAGE: &str = "No books found.";
pub const NO_NETWORK_MESSAGE: &str = "No internet connection.";

/// Status-line texts for the two list-less states.
#[derive(Debug, Clone)]
pub struct Messages {
    pub hint: String,
    pub no_results: String,
    pub no_network: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            hint: HINT_MESSAGE.to_string(),
            no_results: NO_RESULTS_MESSAGE.to_string(),
            no_network: NO_NETWORK_MESSAGE.to_string(),
        }
    }
}

/// Observable view state. The record list is visible iff `Populated`; the
/// status line is visible otherwise -- never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Nothing to show. Carries the startup hint or the no-results text.
    Empty { message: String },
    /// The record list is on screen.
    Populated,
    /// Connectivity was absent at trigger time; no request was made.
    Error { message: String },
}

struct Outcome {
    generation: u64,
    records: Vec<BookRecord>,
}

struct SearchTask {
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl SearchTask {
    fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

pub struct Presenter {
    fetcher: Arc<Fetcher>,
    thumbs: Arc<dyn ThumbnailSource>,
    probe: Box<dyn ConnectivityProbe>,
    messages: Messages,
    records: Vec<BookRecord>,
    state: ViewState,
    generation: u64,
    task: Option<SearchTask>,
    results_tx: Sender<Outcome>,
    results_rx: Receiver<Outcome>,
}

impl Presenter {
    pub fn new(
        fetcher: Fetcher,
        thumbs: Arc<dyn ThumbnailSource>,
        probe: Box<dyn ConnectivityProbe>,
    ) -> Self {
        Self::with_messages(fetcher, thumbs, probe, Messages::default())
    }

    pub fn with_messages(
        fetcher: Fetcher,
        thumbs: Arc<dyn ThumbnailSource>,
        probe: Box<dyn ConnectivityProbe>,
        messages: Messages,
    ) -> Self {
        let (results_tx, results_rx) = mpsc::channel();
        let state = ViewState::Empty {
            message: messages.hint.clone(),
        };
        Self {
            fetcher: Arc::new(fetcher),
            thumbs,
            probe,
            messages,
            records: Vec::new(),
            state,
            generation: 0,
            task: None,
            results_tx,
            results_rx,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// The displayed list. Non-empty iff the state is `Populated`.
    pub fn records(&self) -> &[BookRecord] {
        &self.records
    }

    /// Whether a worker is still fetching.
    pub fn is_searching(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.handle.is_finished())
    }

    /// Trigger a search. With connectivity absent this short-circuits to the
    /// error state without a request; otherwise any in-flight search is
    /// cancelled and a fresh worker runs the pipeline.
    pub fn search(&mut self, query: &str) {
        if !self.probe.is_connected() {
            tracing::info!("search skipped: no connectivity");
            self.records.clear();
            self.state = ViewState::Error {
                message: self.messages.no_network.clone(),
            };
            return;
        }

        if let Some(task) = self.task.take() {
            task.cancel();
        }
        self.generation += 1;

        let generation = self.generation;
        let fetcher = Arc::clone(&self.fetcher);
        let thumbs = Arc::clone(&self.thumbs);
        let cancel = Arc::new(AtomicBool::new(false));
        let token = Arc::clone(&cancel);
        let tx = self.results_tx.clone();
        let query = query.to_string();

        let handle = std::thread::spawn(move || {
            let records = run_cancellable(&fetcher, thumbs.as_ref(), &query, &token);
            if token.load(Ordering::Relaxed) {
                return;
            }
            // The presenter may be gone; a dead channel just drops the result.
            let _ = tx.send(Outcome {
                generation,
                records,
            });
        });
        self.task = Some(SearchTask { cancel, handle });
    }

    /// Apply finished work. Call from the owning thread; returns whether the
    /// view changed. Results from superseded searches are discarded here.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(done) = self.results_rx.try_recv() {
            if done.generation != self.generation {
                tracing::debug!(
                    generation = done.generation,
                    current = self.generation,
                    "dropping stale search result"
                );
                continue;
            }
            self.records = done.records;
            self.state = if self.records.is_empty() {
                ViewState::Empty {
                    message: self.messages.no_results.clone(),
                }
            } else {
                ViewState::Populated
            };
            changed = true;
        }
        changed
    }
}

impl Drop for Presenter {
    fn drop(&mut self) {
        // Screen teardown: flag the worker so it stops fetching thumbnails.
        if let Some(task) = self.task.take() {
            task.cancel();
        }
    }
}

/// One full search: catalog fetch, then extraction with its nested thumbnail
/// fetches. Every failure is absorbed into "fewer records".
pub fn run_search(fetcher: &Fetcher, thumbs: &dyn ThumbnailSource, query: &str) -> Vec<BookRecord> {
    let cancel = AtomicBool::new(false);
    run_cancellable(fetcher, thumbs, query, &cancel)
}

fn run_cancellable(
    fetcher: &Fetcher,
    thumbs: &dyn ThumbnailSource,
    query: &str,
    cancel: &AtomicBool,
) -> Vec<BookRecord> {
    let body = match fetcher.search_raw(query) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, "catalog fetch failed");
            String::new()
        }
    };
    if cancel.load(Ordering::Relaxed) {
        return Vec::new();
    }
    extract::extract_cancellable(&body, thumbs, cancel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::{AlwaysOnline, Offline};
    use crate::error::FetchError;
    use image::DynamicImage;
    use std::time::{Duration, Instant};

    struct NoThumbs;

    impl ThumbnailSource for NoThumbs {
        fn fetch(&self, _url: &str) -> Result<Option<DynamicImage>, FetchError> {
            Ok(None)
        }
    }

    fn presenter(probe: Box<dyn ConnectivityProbe>) -> Presenter {
        // Unroutable catalog: tests below only exercise paths that never
        // issue a request (offline short-circuit, blank query).
        let fetcher = Fetcher::new("http://127.0.0.1:1/volumes").unwrap();
        Presenter::new(fetcher, Arc::new(NoThumbs), probe)
    }

    fn poll_until_change(p: &mut Presenter) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if p.poll() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        false
    }

    #[test]
    fn starts_empty_with_hint() {
        let p = presenter(Box::new(AlwaysOnline));
        assert_eq!(
            *p.state(),
            ViewState::Empty {
                message: HINT_MESSAGE.to_string()
            }
        );
        assert!(p.records().is_empty());
        assert!(!p.is_searching());
    }

    #[test]
    fn offline_trigger_goes_straight_to_error() {
        let mut p = presenter(Box::new(Offline));
        p.search("fantasy");
        assert_eq!(
            *p.state(),
            ViewState::Error {
                message: NO_NETWORK_MESSAGE.to_string()
            }
        );
        assert!(p.records().is_empty());
        // No worker was spawned at all.
        assert!(!p.is_searching());
        assert!(!p.poll());
    }

    #[test]
    fn blank_query_lands_in_empty_with_no_results_message() {
        let mut p = presenter(Box::new(AlwaysOnline));
        p.search("   ");
        assert!(poll_until_change(&mut p));
        assert_eq!(
            *p.state(),
            ViewState::Empty {
                message: NO_RESULTS_MESSAGE.to_string()
            }
        );
        assert!(p.records().is_empty());
    }

    #[test]
    fn custom_messages_are_surfaced() {
        let fetcher = Fetcher::new("http://127.0.0.1:1/volumes").unwrap();
        let messages = Messages {
            hint: "hi".into(),
            no_results: "nothing".into(),
            no_network: "offline".into(),
        };
        let mut p = Presenter::with_messages(fetcher, Arc::new(NoThumbs), Box::new(Offline), messages);
        assert_eq!(*p.state(), ViewState::Empty { message: "hi".into() });
        p.search("q");
        assert_eq!(*p.state(), ViewState::Error { message: "offline".into() });
    }
}

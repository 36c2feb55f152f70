//! Run coordination: spawn one transfer per unique URL, drive the status
//! line, react to interruption and decide the exit status.
use crate::aggregator::run_aggregator;
use crate::counter::{TransferCounter, TransferSnapshot};
use crate::downloader::{download_file, remove_partial};
use crate::error::TransferError;
use crate::observer::StatusObserver;
use crate::registry::ProgressRegistry;
use crate::utils::{get_filename_from_url, unique_urls};
use futures_util::future::join_all;
use reqwest::Client;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every transfer completed successfully.
    Succeeded,
    /// At least one transfer ended with an error.
    Failed,
    /// The run was interrupted by the named signal.
    Interrupted(String),
}

impl RunOutcome {
    /// Process exit status: 0 on success, 1 on failure, 130 when interrupted.
    pub fn code(&self) -> u8 {
        match self {
            Self::Succeeded => 0,
            Self::Failed => 1,
            Self::Interrupted(_) => 130,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }

    fn summary(&self) -> String {
        match self {
            Self::Succeeded => "Download finished.".to_string(),
            Self::Failed => "Download finished with errors.".to_string(),
            Self::Interrupted(signal) => format!("Download interrupted by {}.", signal),
        }
    }
}

/// Result of a whole run, as observed after cleanup.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Last status line drawn.
    pub final_line: String,
    /// Final state of every transfer, sorted by identifier.
    pub transfers: Vec<TransferSnapshot>,
    /// Number of download tasks actually spawned.
    pub spawned: usize,
}

/// Drives a set of concurrent downloads into a destination directory.
pub struct Coordinator {
    client: Client,
    dest_dir: PathBuf,
    tick: Duration,
    observer: Arc<dyn StatusObserver>,
}

impl Coordinator {
    pub fn new(
        client: Client,
        dest_dir: impl Into<PathBuf>,
        tick: Duration,
        observer: Arc<dyn StatusObserver>,
    ) -> Self {
        Self {
            client,
            dest_dir: dest_dir.into(),
            tick,
            observer,
        }
    }

    /// Downloads every unique URL concurrently.
    ///
    /// `interrupt` resolves with a signal name when the run should be
    /// cancelled. All transfers are awaited, including their cleanup,
    /// before the report is returned.
    pub async fn run<I, F>(&self, urls: I, interrupt: F) -> RunReport
    where
        I: IntoIterator<Item = String>,
        F: Future<Output = String>,
    {
        let urls = unique_urls(urls);
        let registry = Arc::new(ProgressRegistry::new());
        let cancel = CancellationToken::new();
        let stop = CancellationToken::new();

        self.observer.println("Download started");

        let mut counters = Vec::with_capacity(urls.len());
        let mut tasks = Vec::new();

        for url in urls {
            let identifier = get_filename_from_url(&url);
            let counter = Arc::new(TransferCounter::new(identifier.as_str(), url.as_str()));

            if let Err(holder) = registry.register_if_absent(counter.clone()).await {
                // Two URLs would write the same file; only the first one runs
                // and keeps its place on the status line.
                warn!(
                    url = %url,
                    identifier = %identifier,
                    claimed_by = holder.url(),
                    "destination conflict"
                );
                self.observer.println(&format!(
                    "Skipping {}: {} is already downloaded from {}",
                    url,
                    identifier,
                    holder.url()
                ));
                counter.fail(TransferError::DestinationConflict(holder.url().to_string()));
                counters.push(counter);
                continue;
            }

            self.observer.println(&format!("Download: {}", url));

            let client = self.client.clone();
            let dest = self.dest_dir.join(&identifier);
            let task_counter = counter.clone();
            let task_cancel = cancel.clone();
            let task = tokio::spawn(async move {
                download_file(&client, &url, &dest, &task_counter, &task_cancel).await;
            });

            tasks.push((counter.clone(), task));
            counters.push(counter);
        }
        let spawned = tasks.len();

        let aggregator = tokio::spawn(run_aggregator(
            registry.clone(),
            self.observer.clone(),
            self.tick,
            stop.clone(),
        ));

        let (task_counters, handles): (Vec<_>, Vec<_>) = tasks.into_iter().unzip();
        let downloads = join_all(handles);
        tokio::pin!(downloads);
        tokio::pin!(interrupt);

        let (results, interrupted) = tokio::select! {
            results = &mut downloads => (results, None),
            signal = &mut interrupt => {
                info!(signal = %signal, "interrupt received, cancelling transfers");
                self.observer.println(&format!("Terminating by {} signal", signal));
                cancel.cancel();
                (downloads.await, Some(signal))
            }
        };

        for (counter, result) in task_counters.iter().zip(results) {
            if let Err(e) = result {
                let dest = self.dest_dir.join(counter.identifier());
                settle_aborted(counter, &dest, &e).await;
            }
        }

        stop.cancel();
        let final_line = match aggregator.await {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "status renderer stopped unexpectedly");
                crate::aggregator::render_line(&registry.snapshot().await)
            }
        };

        let mut transfers: Vec<TransferSnapshot> =
            counters.iter().map(|c| c.snapshot()).collect();
        transfers.sort_by(|a, b| a.identifier.cmp(&b.identifier));

        let outcome = match interrupted {
            Some(signal) => RunOutcome::Interrupted(signal),
            None if transfers.iter().all(TransferSnapshot::succeeded) => RunOutcome::Succeeded,
            None => RunOutcome::Failed,
        };
        self.observer.println(&outcome.summary());

        RunReport {
            outcome,
            final_line,
            transfers,
            spawned,
        }
    }
}

/// Records a download task that died without reaching a terminal state
/// and removes whatever it left at `dest`.
async fn settle_aborted(counter: &TransferCounter, dest: &Path, err: &JoinError) {
    warn!(url = counter.url(), error = %err, "download task aborted");
    if counter.is_completed() {
        return;
    }
    if let Err(e) = remove_partial(dest).await {
        warn!(dest = %dest.display(), error = %e, "failed to remove partial file");
    }
    counter.fail(TransferError::Network(format!(
        "download task aborted: {}",
        err
    )));
}

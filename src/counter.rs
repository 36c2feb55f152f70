//! Per-transfer progress state.
//!
//! A [`TransferCounter`] is written by exactly one downloader task and read
//! concurrently by the aggregator. All state lives behind a single short
//! mutex so a reader never observes a byte count from one moment paired
//! with a terminal state from another.
use crate::error::TransferError;
use indicatif::HumanBytes;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Progress {
    total_bytes: Option<u64>,
    downloaded_bytes: u64,
    error: Option<TransferError>,
    completed: bool,
}

/// Live progress of one URL-to-file transfer.
#[derive(Debug)]
pub struct TransferCounter {
    identifier: String,
    url: String,
    progress: Mutex<Progress>,
}

impl TransferCounter {
    pub fn new(identifier: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            url: url.into(),
            progress: Mutex::new(Progress::default()),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn lock(&self) -> MutexGuard<'_, Progress> {
        // The critical sections never panic midway, so a poisoned lock
        // still holds coherent data.
        self.progress.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records the expected size once the response headers are known.
    pub fn set_total(&self, total: Option<u64>) {
        let mut progress = self.lock();
        if !progress.completed {
            progress.total_bytes = total;
        }
    }

    /// Adds `n` freshly written bytes.
    ///
    /// Refuses to grow past a known total; the caller treats that as a
    /// malformed response. Calls after the transfer finished are ignored.
    pub fn record(&self, n: u64) -> Result<(), TransferError> {
        let mut progress = self.lock();
        if progress.completed {
            return Ok(());
        }
        let next = progress.downloaded_bytes.saturating_add(n);
        if let Some(total) = progress.total_bytes
            && next > total
        {
            return Err(TransferError::Incomplete {
                expected: total,
                received: next,
            });
        }
        progress.downloaded_bytes = next;
        Ok(())
    }

    /// Marks the transfer as successfully finished.
    ///
    /// Fails without completing when a known total was not reached.
    pub fn succeed(&self) -> Result<(), TransferError> {
        let mut progress = self.lock();
        if let Some(total) = progress.total_bytes
            && progress.downloaded_bytes != total
        {
            return Err(TransferError::Incomplete {
                expected: total,
                received: progress.downloaded_bytes,
            });
        }
        progress.completed = true;
        Ok(())
    }

    /// Records a terminal error. The first terminal state wins.
    pub fn fail(&self, err: TransferError) {
        let mut progress = self.lock();
        if progress.completed {
            return;
        }
        progress.error = Some(err);
        progress.completed = true;
    }

    pub fn is_completed(&self) -> bool {
        self.lock().completed
    }

    pub fn snapshot(&self) -> TransferSnapshot {
        let progress = self.lock();
        TransferSnapshot {
            identifier: self.identifier.clone(),
            downloaded_bytes: progress.downloaded_bytes,
            total_bytes: progress.total_bytes,
            error: progress.error.clone(),
            completed: progress.completed,
        }
    }

    pub fn render(&self) -> String {
        self.snapshot().render()
    }
}

/// Immutable point-in-time view of a [`TransferCounter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSnapshot {
    pub identifier: String,
    pub downloaded_bytes: u64,
    pub total_bytes: Option<u64>,
    pub error: Option<TransferError>,
    pub completed: bool,
}

impl TransferSnapshot {
    /// Whole percent done, or `None` when the total is unknown or zero.
    pub fn percent(&self) -> Option<u8> {
        let total = self.total_bytes.filter(|&t| t > 0)?;
        let pct = (u128::from(self.downloaded_bytes) * 100 / u128::from(total)).min(100);
        u8::try_from(pct).ok()
    }

    pub fn succeeded(&self) -> bool {
        self.completed && self.error.is_none()
    }

    pub fn render(&self) -> String {
        if let Some(err) = &self.error {
            return format!("{} {}", self.identifier, err);
        }
        match self.percent() {
            Some(pct) => format!("{} {}%", self.identifier, pct),
            None => format!("{} {}", self.identifier, HumanBytes(self.downloaded_bytes)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> TransferCounter {
        TransferCounter::new("file.bin", "http://example.com/file.bin")
    }

    #[test]
    fn renders_percent_when_total_known() {
        let c = counter();
        c.set_total(Some(200));
        c.record(50).unwrap();
        assert_eq!(c.render(), "file.bin 25%");
        c.record(150).unwrap();
        assert_eq!(c.render(), "file.bin 100%");
    }

    #[test]
    fn falls_back_to_byte_count_without_total() {
        let c = counter();
        c.record(1024).unwrap();
        assert_eq!(c.snapshot().percent(), None);
        assert_eq!(c.render(), "file.bin 1.00 KiB");

        // A zero-length body must not divide by zero either.
        let empty = counter();
        empty.set_total(Some(0));
        assert_eq!(empty.snapshot().percent(), None);
        assert_eq!(empty.render(), "file.bin 0 B");
    }

    #[test]
    fn renders_error_in_place_of_progress() {
        let c = counter();
        c.set_total(Some(10));
        c.record(4).unwrap();
        c.fail(TransferError::Network("connection reset".into()));
        assert_eq!(c.render(), "file.bin network error: connection reset");
    }

    #[test]
    fn refuses_to_exceed_known_total() {
        let c = counter();
        c.set_total(Some(10));
        c.record(8).unwrap();
        let err = c.record(5).unwrap_err();
        assert_eq!(
            err,
            TransferError::Incomplete {
                expected: 10,
                received: 13
            }
        );
        assert_eq!(c.snapshot().downloaded_bytes, 8);
    }

    #[test]
    fn success_requires_full_body() {
        let c = counter();
        c.set_total(Some(10));
        c.record(9).unwrap();
        assert!(c.succeed().is_err());
        assert!(!c.is_completed());
        c.record(1).unwrap();
        c.succeed().unwrap();
        let snap = c.snapshot();
        assert!(snap.succeeded());
        assert_eq!(snap.downloaded_bytes, 10);
    }

    #[test]
    fn terminal_state_freezes_counter() {
        let c = counter();
        c.record(3).unwrap();
        c.fail(TransferError::Cancelled);
        c.record(100).unwrap();
        c.fail(TransferError::Network("late".into()));

        let snap = c.snapshot();
        assert_eq!(snap.downloaded_bytes, 3);
        assert_eq!(snap.error, Some(TransferError::Cancelled));
        assert!(snap.completed);
    }

    #[test]
    fn percent_is_clamped() {
        let snap = TransferSnapshot {
            identifier: "x".into(),
            downloaded_bytes: u64::MAX,
            total_bytes: Some(1),
            error: None,
            completed: false,
        };
        assert_eq!(snap.percent(), Some(100));
    }
}

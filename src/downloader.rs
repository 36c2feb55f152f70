//! Single-file download: one GET streamed into one destination file.
//!
//! The outcome is never returned to the caller. Success or the terminal
//! error is recorded into the transfer's [`TransferCounter`], and any
//! partially written file is removed before a failure becomes visible.
use crate::counter::TransferCounter;
use crate::error::TransferError;
use reqwest::Client;
use std::io;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Downloads `url` into `dest`, reporting progress through `counter`.
///
/// Stops reading from the network as soon as `cancel` fires. On failure
/// or cancellation the destination file is deleted (best effort).
pub async fn download_file(
    client: &Client,
    url: &str,
    dest: &Path,
    counter: &TransferCounter,
    cancel: &CancellationToken,
) {
    debug!(url, dest = %dest.display(), "transfer starting");

    let mut created = false;
    let result = transfer(client, url, dest, counter, cancel, &mut created)
        .await
        .and_then(|()| counter.succeed());

    match result {
        Ok(()) => {
            let snapshot = counter.snapshot();
            info!(url, bytes = snapshot.downloaded_bytes, "transfer finished");
        }
        Err(err) => {
            if created && let Err(e) = remove_partial(dest).await {
                warn!(dest = %dest.display(), error = %e, "failed to remove partial file");
            }
            if err == TransferError::Cancelled {
                info!(url, "transfer cancelled");
            } else {
                warn!(url, error = %err, "transfer failed");
            }
            counter.fail(err);
        }
    }
}

async fn transfer(
    client: &Client,
    url: &str,
    dest: &Path,
    counter: &TransferCounter,
    cancel: &CancellationToken,
    created: &mut bool,
) -> Result<(), TransferError> {
    if cancel.is_cancelled() {
        return Err(TransferError::Cancelled);
    }

    let request = client.get(url).build()?;
    let mut response = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(TransferError::Cancelled),
        response = client.execute(request) => response?,
    };

    let status = response.status();
    if !status.is_success() {
        return Err(TransferError::HttpStatus(status.as_u16()));
    }
    counter.set_total(response.content_length());
    debug!(url, total = ?response.content_length(), "response headers received");

    let path = dest.display().to_string();
    let file = File::create(dest)
        .await
        .map_err(|e| TransferError::file_system(&path, &e))?;
    *created = true;
    let mut writer = BufWriter::new(file);

    loop {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TransferError::Cancelled),
            chunk = response.chunk() => chunk?,
        };
        let Some(bytes) = chunk else {
            break;
        };

        writer
            .write_all(&bytes)
            .await
            .map_err(|e| TransferError::file_system(&path, &e))?;
        counter.record(bytes.len() as u64)?;
    }

    writer
        .flush()
        .await
        .map_err(|e| TransferError::file_system(&path, &e))?;
    Ok(())
}

/// Removes a partially written file. Missing files are not an error.
pub async fn remove_partial(path: &Path) -> io::Result<()> {
    match tokio::fs::remove_file(path).await {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

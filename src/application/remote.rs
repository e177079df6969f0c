// SPDX-License-Identifier: MPL-2.0
//! Remote processing use cases.

use crate::application::port::{RemoteProcessor, RemoteRequest};
use crate::editor::{EditSession, RemoteOutcome};
use crate::error::{Error, Result};
use tokio::sync::Mutex;

/// Sends the visible surface to `processor` and commits the returned image.
///
/// The session lock is not held during the network call. If the session
/// changes meanwhile the result is dropped and [`RemoteOutcome::Stale`] is
/// returned.
///
/// # Errors
///
/// Returns [`Error::RemoteProcessing`] if the processor fails or returns
/// something that is not an image; the session is unchanged.
pub async fn apply_remote<P: RemoteProcessor>(
    session: &Mutex<EditSession>,
    processor: &P,
    request: RemoteRequest,
) -> Result<RemoteOutcome> {
    let job = session.lock().await.begin_remote(request)?;
    let (request, image, ticket) = job.into_parts();
    tracing::info!(endpoint = request.endpoint(), "sending to remote processor");
    let response = processor.process(&request, image).await;
    session.lock().await.complete_remote(ticket, response)
}

/// Sends the visible surface to `processor` and returns its text answer.
///
/// Queries (OCR, palette extraction) never change the session.
///
/// # Errors
///
/// Returns [`Error::RemoteProcessing`] if the processor fails.
pub async fn query_remote<P: RemoteProcessor>(
    session: &Mutex<EditSession>,
    processor: &P,
    request: RemoteRequest,
) -> Result<String> {
    let job = session.lock().await.begin_remote(request)?;
    let (request, image, _) = job.into_parts();
    processor.query(&request, image).await.map_err(|err| {
        tracing::warn!(endpoint = request.endpoint(), error = %err, "remote query failed");
        Error::RemoteProcessing(format!("{}: {err}", request.endpoint()))
    })
}

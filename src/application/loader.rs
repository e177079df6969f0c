// SPDX-License-Identifier: MPL-2.0
//! Asynchronous image loading.

use crate::editor::{EditSession, ImageSource, LoadMode, LoadOutcome};
use crate::error::{Error, Result};
use tokio::sync::Mutex;

/// Decodes `source` on the blocking pool and installs it into `session`.
///
/// The lock is released while decoding, so the session can be cleared or
/// given another image meanwhile; in that case this load reports
/// [`LoadOutcome::Stale`] and changes nothing.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the bytes are not an image (see
/// [`LoadMode`] for what happens to the session).
pub async fn load_image(
    session: &Mutex<EditSession>,
    source: ImageSource,
    mode: LoadMode,
) -> Result<LoadOutcome> {
    let ticket = session
        .lock()
        .await
        .begin_load(source.name.as_deref(), mode);

    let decoded = tokio::task::spawn_blocking(move || source.decode())
        .await
        .map_err(|err| Error::Decode(format!("decode task failed: {err}")))
        .and_then(|result| result);

    session.lock().await.complete_load(ticket, decoded)
}

// SPDX-License-Identifier: MPL-2.0
//! Hand-off of the visible surface to the remote processing service.
//!
//! Like loading, a remote call is split into `begin_remote`, which captures a
//! PNG of the surface together with the session revision, and
//! `complete_remote`, which commits the response only if nothing changed in
//! between.

use super::EditSession;
use crate::application::port::{RemoteError, RemoteRequest};
use crate::domain::editing::ExportQuality;
use crate::error::{Error, Result};
use crate::media::{codec, ExportFormat, PushOutcome};

/// Identifies the session state a remote job was started from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTicket {
    generation: u64,
    revision: u64,
    endpoint: String,
}

/// Everything a processor needs, plus the ticket to redeem afterwards.
#[derive(Debug, Clone)]
pub struct RemoteJob {
    pub request: RemoteRequest,
    /// PNG encoding of the visible surface.
    pub image: Vec<u8>,
    pub ticket: RemoteTicket,
}

impl RemoteJob {
    #[must_use]
    pub fn into_parts(self) -> (RemoteRequest, Vec<u8>, RemoteTicket) {
        (self.request, self.image, self.ticket)
    }
}

/// Result of redeeming a [`RemoteTicket`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOutcome {
    /// The response became the new base.
    Applied(PushOutcome),
    /// The session changed meanwhile; the response was dropped.
    Stale,
}

impl EditSession {
    /// Captures the visible surface for `request`.
    ///
    /// # Errors
    ///
    /// Returns an editability error when there is nothing to send.
    pub fn begin_remote(&self, request: RemoteRequest) -> Result<RemoteJob> {
        self.ensure_editable()?;
        let image = codec::encode(self.surface(), ExportFormat::Png, ExportQuality::default())?;
        tracing::debug!(endpoint = request.endpoint(), bytes = image.len(), "remote job started");
        Ok(RemoteJob {
            ticket: RemoteTicket {
                generation: self.generation,
                revision: self.revision,
                endpoint: request.endpoint().to_string(),
            },
            request,
            image,
        })
    }

    /// Commits a processor response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RemoteProcessing`] if the processor failed or the
    /// response is not an image. The session is unchanged in both cases.
    pub fn complete_remote(
        &mut self,
        ticket: RemoteTicket,
        response: std::result::Result<Vec<u8>, RemoteError>,
    ) -> Result<RemoteOutcome> {
        if ticket.generation != self.generation || ticket.revision != self.revision {
            tracing::warn!(endpoint = %ticket.endpoint, "discarding stale remote result");
            return Ok(RemoteOutcome::Stale);
        }
        let bytes = response.map_err(|err| {
            tracing::warn!(endpoint = %ticket.endpoint, error = %err, "remote processing failed");
            Error::RemoteProcessing(format!("{}: {err}", ticket.endpoint))
        })?;
        let buffer = codec::decode(&bytes, None).map_err(|err| {
            Error::RemoteProcessing(format!("{} returned an unusable image: {err}", ticket.endpoint))
        })?;
        tracing::info!(
            endpoint = %ticket.endpoint,
            width = buffer.width(),
            height = buffer.height(),
            "remote result applied"
        );
        self.replace_base(buffer);
        Ok(RemoteOutcome::Applied(self.commit("remote")))
    }
}

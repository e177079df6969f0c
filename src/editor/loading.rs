// SPDX-License-Identifier: MPL-2.0
//! Image loading with a generation guard against stale decodes.
//!
//! Loading is split in two so the decode can run elsewhere (a blocking
//! thread, a worker, a test):
//!
//! 1. [`EditSession::begin_load`] bumps the generation and hands out a
//!    [`LoadTicket`].
//! 2. [`EditSession::complete_load`] applies the decoded buffer only if the
//!    ticket still belongs to the current generation.
//!
//! `clear()` and any newer `begin_load` invalidate older tickets, so a late
//! decode can never overwrite a newer image.

use super::EditSession;
use crate::error::{Error, Result};
use crate::media::{codec, HistoryEntry, RasterBuffer};
use std::path::Path;

/// Encoded image plus what the uploader declared about it.
#[derive(Debug, Clone, Default)]
pub struct ImageSource {
    pub bytes: Vec<u8>,
    /// Declared MIME type, e.g. `image/png`.
    pub mime: Option<String>,
    /// Original file name, e.g. `holiday.jpg`.
    pub name: Option<String>,
}

impl ImageSource {
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime: None,
            name: None,
        }
    }

    /// Reads a file from disk, remembering its name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string);
        Ok(Self {
            bytes,
            mime: None,
            name,
        })
    }

    #[must_use]
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Decodes the bytes, honouring the declared MIME type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] for non-image input.
    pub fn decode(&self) -> Result<RasterBuffer> {
        codec::decode(&self.bytes, self.mime.as_deref())
    }
}

/// How a failed decode affects the current image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// A new image replaces the session; failure leaves it empty.
    #[default]
    Fresh,
    /// Validate before replacing; failure keeps the current image.
    Reload,
}

/// Proof that a load was started; redeemed by [`EditSession::complete_load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    mode: LoadMode,
    name: Option<String>,
}

impl LoadTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn mode(&self) -> LoadMode {
        self.mode
    }
}

/// Result of redeeming a [`LoadTicket`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The image is now the session's base and first history entry.
    Loaded { width: u32, height: u32 },
    /// A newer load or a clear happened meanwhile; the result was dropped.
    Stale,
}

impl EditSession {
    /// Starts a load and returns the ticket its completion must present.
    ///
    /// `file_name` is the uploaded file's name; its stem is used for export
    /// file names.
    pub fn begin_load(&mut self, file_name: Option<&str>, mode: LoadMode) -> LoadTicket {
        self.generation += 1;
        self.pending_load = Some(self.generation);
        tracing::debug!(generation = self.generation, ?mode, "load started");
        LoadTicket {
            generation: self.generation,
            mode,
            name: file_name.and_then(codec::base_name),
        }
    }

    /// Applies a finished decode.
    ///
    /// # Errors
    ///
    /// Returns the decode error for a current ticket. A fresh load leaves the
    /// session empty; a reload leaves the previous image in place. Stale
    /// tickets never error and never change the session.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        decoded: Result<RasterBuffer>,
    ) -> Result<LoadOutcome> {
        if ticket.generation != self.generation || self.pending_load != Some(ticket.generation) {
            tracing::warn!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale load"
            );
            return Ok(LoadOutcome::Stale);
        }
        self.pending_load = None;

        match decoded {
            Ok(buffer) if !buffer.is_empty() => {
                let (width, height) = buffer.dimensions();
                self.install(buffer, ticket.name);
                tracing::info!(width, height, "image loaded");
                Ok(LoadOutcome::Loaded { width, height })
            }
            Ok(_) => {
                let err = Error::Decode("image has no pixels".into());
                self.fail_load(ticket.mode, &err);
                Err(err)
            }
            Err(err) => {
                self.fail_load(ticket.mode, &err);
                Err(err)
            }
        }
    }

    /// Decodes `source` synchronously and replaces the session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] for non-image input; the session is then empty.
    pub fn load_image(&mut self, source: ImageSource) -> Result<LoadOutcome> {
        let ticket = self.begin_load(source.name.as_deref(), LoadMode::Fresh);
        let decoded = source.decode();
        self.complete_load(ticket, decoded)
    }

    /// Decodes `source` synchronously, keeping the current image on failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] for non-image input.
    pub fn reload_image(&mut self, source: ImageSource) -> Result<LoadOutcome> {
        let ticket = self.begin_load(source.name.as_deref(), LoadMode::Reload);
        let decoded = source.decode();
        self.complete_load(ticket, decoded)
    }

    fn install(&mut self, buffer: RasterBuffer, name: Option<String>) {
        self.reset_contents();
        self.original = buffer.clone();
        self.base = buffer;
        self.source_name = name;
        self.rerender();
        let entry = HistoryEntry::new(self.surface().clone(), "load");
        self.history.push_initial(entry);
    }

    fn fail_load(&mut self, mode: LoadMode, err: &Error) {
        tracing::warn!(?mode, error = %err, "load failed");
        if mode == LoadMode::Fresh {
            self.reset_contents();
        }
    }
}

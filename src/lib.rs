// SPDX-License-Identifier: MPL-2.0
//! `clarifi_studio` is the editing core of a single-image photo studio.
//!
//! A session holds one base raster, a set of live adjustments rendered over
//! it, and a bounded undo/redo history of committed snapshots. Geometry edits
//! (crop, resize, rotate, flip) are computed locally; heavier operations are
//! delegated to a remote processing service through a port trait. The visible
//! surface can be exported as PNG, JPEG or WebP.
//!
//! # Layout
//!
//! - [`domain`]: value types with clamping and validation
//! - [`media`]: rasters, rendering, transforms, history and codecs
//! - [`editor`]: the [`editor::EditSession`] state machine
//! - [`application`]: async use cases and the remote processing port
//! - [`infrastructure`]: the HTTP adapter for that port
//! - [`config`]: persisted settings

#![doc(html_root_url = "https://docs.rs/clarifi_studio/0.1.0")]

pub mod application;
pub mod config;
pub mod domain;
pub mod editor;
pub mod error;
pub mod infrastructure;
pub mod media;

#[cfg(test)]
pub(crate) mod test_utils;

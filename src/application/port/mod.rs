// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces that infrastructure adapters implement.
//! The editor core only sees these traits, so tests can swap in-memory
//! implementations for the real network service.
//!
//! # Available Ports
//!
//! - [`remote`]: Remote image processing and analysis
//!
//! # Design Notes
//!
//! - Traits use crate types only (no `reqwest` types leak through)
//! - Traits are `Send + Sync` so adapters can be shared across tasks
//! - Methods return futures that are `Send`, so callers may spawn them
//!
//! # Example
//!
//! ```ignore
//! use clarifi_studio::application::port::{RemoteProcessor, RemoteRequest};
//!
//! async fn colorize(processor: &impl RemoteProcessor, png: Vec<u8>) -> Option<Vec<u8>> {
//!     processor.process(&RemoteRequest::colorize(), png).await.ok()
//! }
//! ```

pub mod remote;

pub use remote::{RemoteError, RemoteFilter, RemoteProcessor, RemoteRequest};

// SPDX-License-Identifier: MPL-2.0
//! Application layer - Use cases and orchestration.
//!
//! This module drives an [`EditSession`](crate::editor::EditSession) through
//! its asynchronous steps:
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//! - [`loader`]: Decoding images off the async runtime
//! - [`remote`]: Round trips to the remote processing service
//! - [`batch`]: One operation over many images, one session each
//!
//! # Architecture
//!
//! The session itself is synchronous. Use cases here hold the session lock
//! only for the short begin/complete steps and release it while the slow
//! part (decode, network) runs, relying on the session's tickets to drop
//! results that arrive after the user moved on.
//!
//! # Dependency Rule
//!
//! - Application layer depends on the editor and domain layers
//! - Infrastructure layer implements application layer ports
//! - The binary wires concrete adapters into these use cases

pub mod batch;
pub mod loader;
pub mod port;
pub mod remote;

pub use batch::{run_batch, BatchItem, BatchOperation, BatchReport};
pub use loader::load_image;
pub use remote::{apply_remote, query_remote};

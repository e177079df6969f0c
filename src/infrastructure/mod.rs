// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! This module contains concrete implementations of the port traits defined in
//! `application::port`.
//!
//! # Available Adapters
//!
//! - [`http`]: Remote processing over HTTP (implements [`RemoteProcessor`])
//!
//! [`RemoteProcessor`]: crate::application::port::RemoteProcessor

pub mod http;

pub use http::HttpProcessor;

// SPDX-License-Identifier: MPL-2.0
//! Domain layer: value objects that are valid by construction.
//!
//! Nothing in here touches pixels, files or the network.

pub mod editing;

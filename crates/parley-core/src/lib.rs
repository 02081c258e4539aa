// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Parley conversation store.
//!
//! This crate provides the error taxonomy, common types, and the durable
//! key-value trait that the storage crate implements. Nothing here performs
//! I/O; the seams are defined here so the store's correctness properties can
//! be stated (and tested) independently of any particular backend.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ParleyError;
pub use traits::KvStore;
pub use types::{HealthStatus, Message, Role, SessionId};

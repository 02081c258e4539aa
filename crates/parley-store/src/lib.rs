// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed conversation store for Parley.
//!
//! Layering, bottom up:
//! - [`database`]: connection lifecycle, PRAGMAs, and the [`KvStore`]
//!   implementation over a single serialized SQLite connection
//! - [`queries`]: the SQL, one module per concern
//! - [`log`]: per-session message logs with append serialization
//! - [`registry`]: one live log handle per session id
//! - [`store`]: the facade callers actually use
//!
//! [`KvStore`]: parley_core::KvStore

pub mod database;
pub mod log;
pub mod migrations;
pub mod queries;
pub mod registry;
pub mod store;

pub use database::Database;
pub use log::SessionLog;
pub use registry::SessionRegistry;
pub use store::ConversationStore;

// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for the seams between the store and its substrate.

pub mod kv;

pub use kv::KvStore;

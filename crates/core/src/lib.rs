//! Donor Finder Core - Shared domain library.
//!
//! This crate provides everything the front ends share:
//! - `web` - Server-rendered donor directory
//! - `cli` - Command-line tools over the same directory and request list
//!
//! # Architecture
//!
//! The core crate performs no network I/O. Persistence goes through the
//! [`storage::KeyValueStore`] capability, so callers decide where request
//! records live (in memory for tests, a JSON file with the `fs` feature).
//!
//! # Modules
//!
//! - [`types`] - Blood groups, cities, donors, requests and type-safe IDs
//! - [`assign`] - Deterministic donor metadata assignment
//! - [`derive`] - Filter/search/sort derivation of the displayed donor list
//! - [`storage`] - Key-value storage adapter for the request list
//! - [`workflow`] - Request creation, cancellation and status updates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod assign;
pub mod derive;
pub mod storage;
pub mod types;
pub mod workflow;

pub use assign::assign_donor_meta;
pub use derive::{DonorQuery, available_count, derive_display_list};
pub use storage::{KeyValueStore, MemoryStore, RequestStore, StorageError};
pub use types::*;
pub use workflow::RequestService;

#[cfg(feature = "fs")]
pub use storage::FileStore;

//! Key-value persistence using Apache OpenDAL.
//!
//! The ledger needs only a get/set/remove primitive over JSON values in a
//! single namespace. [`OpenDalStore`] provides it on top of any OpenDAL
//! service; the ones wired up here are:
//! - In-memory (tests, throwaway sessions)
//! - Local filesystem
//!
//! # Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ KeyValueStore::set("expenses", value)        │
//! │        │                                     │
//! │        ▼                                     │
//! │ op.write("expenses.json", serde_json bytes)  │
//! └──────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod service;

pub use config::StorageProvider;
pub use error::StorageError;
pub use service::{KeyValueStore, OpenDalStore};

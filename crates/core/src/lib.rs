//! Core engine for Tally.
//!
//! This crate contains the ledger and conversion logic with ZERO web
//! dependencies. The rate provider is reached through a trait and the
//! persisted collection through a key-value abstraction.
//!
//! # Modules
//!
//! - `currency` - Rate cache, conversion and static fallbacks
//! - `ledger` - Expense collection, filtering, pagination and summaries
//! - `storage` - Key-value persistence over OpenDAL

pub mod currency;
pub mod ledger;
pub mod storage;

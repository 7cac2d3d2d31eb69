//! Polls Core - Shared domain types.
//!
//! This crate provides the types shared by the polls components:
//! - `web` - Public site serving the index, detail, results and vote endpoints
//! - `cli` - Command-line tools for migrations and poll administration
//!
//! # Architecture
//!
//! The core crate contains only types and pure domain rules - no I/O, no
//! database access, no HTTP. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, validated labels, publication and pluralization rules

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

//! Core types for polls.
//!
//! This module provides type-safe wrappers for the poll domain.

pub mod id;
pub mod label;
pub mod poll;

pub use id::*;
pub use label::{Label, LabelError};
pub use poll::{
    INDEX_LIMIT, RECENT_WINDOW_SECS, is_published, pluralize, vote_count_label,
    was_published_recently,
};

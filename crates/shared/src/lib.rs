//! Shared types for Arabella.
//!
//! This crate provides common types used across all other crates:
//! - Money type with exact decimal precision
//! - Pagination types for list operations

pub mod types;

pub use types::money::{Money, MoneyError};
pub use types::pagination::{PageRequest, PageResponse};

//! Storage layer for loan-checkout
//!
//! Handles profile configuration stored as a TOML file in the user's
//! configuration directory.

use crate::error::StorageError;

pub mod config;

type Result<T> = std::result::Result<T, StorageError>;

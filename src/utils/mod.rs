//! Utils module - Shared utilities and helpers
//!
//! This module provides utility functions and helpers that are used across
//! multiple layers of the application architecture.

/// Subscriber setup and verbose output
pub mod logging;

/// Input validation utilities
pub mod validation;

//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions such as autocomplete.

/// Autocomplete handlers for ring numbers, breeders, seasons, couples and more
pub mod autocomplete;

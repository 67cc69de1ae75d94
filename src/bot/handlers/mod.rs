//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions such as autocomplete
//! and for gateway events such as members joining and leaving.

/// Autocomplete handlers for embed template names
pub mod autocomplete;
/// Gateway event handlers (member join/leave greetings)
pub mod events;

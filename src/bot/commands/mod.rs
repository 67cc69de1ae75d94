//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Embed template authoring commands
pub mod embed;

/// General utility commands
pub mod general;

/// Welcome and goodbye commands
pub mod greeting;

/// Role manager commands
pub mod role_manager;

// Export commands
pub use embed::*;
pub use general::*;
pub use greeting::*;
pub use role_manager::*;

//! HTTP request handlers organized by domain

pub mod analyze;

// Re-export all handlers for use in router
pub use analyze::*;

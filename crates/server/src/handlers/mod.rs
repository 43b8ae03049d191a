//! # API Route Handlers
//!
//! This module organizes all the Axum route handlers for the `uroki-server`.
//! The handlers are split into logical sub-modules based on their
//! functionality.

pub mod admin;
pub mod general;
pub mod personalize;
pub mod survey;

// Re-export all handlers from the sub-modules to make them easily accessible
// to the router under a single `handlers::` path.
pub use admin::*;
pub use general::*;
pub use personalize::*;
pub use survey::*;

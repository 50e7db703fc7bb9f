//! Phase-ordered dispatch of registered operations.

pub mod phase;
pub mod registry;

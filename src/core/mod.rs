//! Core business logic modules.

pub mod favorites;
pub mod query;
pub mod store;

//! Data models.

pub mod config;
pub mod memo;
pub mod movie;

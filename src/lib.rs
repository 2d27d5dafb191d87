//! Movie Memo Library
//!
//! Discover movies on TMDB and keep favorites with personal viewing memos.
//! Favorite state is mirrored to the TMDB account and to a local store;
//! memos stay on this device.

pub mod cli;
pub mod core;
pub mod error;
pub mod models;
pub mod preflight;
pub mod services;

pub use error::{Error, Result};

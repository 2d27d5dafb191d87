//! Local storage preflight check.

use super::CheckResult;
use crate::core::store::{FileStore, KeyValueStore};
use crate::models::config::Config;

/// Check that the data directory can be written.
pub fn check(config: &Config) -> CheckResult {
    let store = FileStore::new(&config.data_dir);
    if store.is_available() {
        CheckResult::ok("Local storage", &config.data_dir.display().to_string())
    } else {
        // Memos would silently not persist, so flag it up front.
        CheckResult::fail(
            "Local storage",
            &format!("{} is not writable", config.data_dir.display()),
            "Set data_dir in config.toml to a writable directory",
        )
    }
}

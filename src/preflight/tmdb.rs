//! TMDB API preflight check.

use super::CheckResult;
use crate::models::config::Config;
use crate::services::tmdb::TmdbClient;
use crate::Error;

/// Check that TMDB is reachable and accepts the access token.
pub async fn check(config: &Config) -> CheckResult {
    match TmdbClient::from_settings(&config.tmdb) {
        Ok(client) => match client.verify_credentials().await {
            Ok(true) => CheckResult::ok("TMDB API", "connected"),
            Ok(false) => CheckResult::fail(
                "TMDB API",
                "credentials rejected or service unreachable",
                "Check TMDB_ACCESS_TOKEN and your network connection",
            ),
            Err(_) => CheckResult::fail(
                "TMDB API",
                "connection failed",
                "Check your network connection",
            ),
        },
        Err(Error::ConfigMissing(name)) => CheckResult::fail(
            "TMDB API",
            &format!("{} not configured", name),
            &format!("Set {} in the environment or config.toml", name),
        ),
        Err(e) => CheckResult::fail("TMDB API", &e.to_string(), "Check config.toml"),
    }
}

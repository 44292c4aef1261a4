use std::env;

use anyhow::Context;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Bearer key for the `/admin` routes. Unset means every admin call is refused.
    pub admin_api_key: Option<String>,
    /// Age in days after which public posts of archiving communities are archived
    pub archive_after_days: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            admin_api_key: env::var("ADMIN_API_KEY").ok().filter(|k| !k.is_empty()),
            archive_after_days: parse_archive_after_days(
                env::var("ARCHIVE_AFTER_DAYS").ok().as_deref(),
            )?,
        })
    }

    /// Check if the admin surface can be reached at all
    pub fn admin_enabled(&self) -> bool {
        self.admin_api_key.is_some()
    }
}

/// Days before posts are archived, 180 when unset
fn parse_archive_after_days(value: Option<&str>) -> anyhow::Result<u32> {
    match value {
        Some(days) => days.trim().parse().with_context(|| {
            format!(
                "ARCHIVE_AFTER_DAYS must be a non-negative whole number of days, got '{}'",
                days
            )
        }),
        None => Ok(180),
    }
}

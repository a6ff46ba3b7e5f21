//! Runtime configuration utilities for demand-forecast.

use std::env;

use chrono::NaiveDate;
use sqlx::postgres::PgConnectOptions;

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Database name holding the `material_data` table.
    pub db_name: String,
    pub db_user: String,
    pub db_password: String,
    pub db_host: String,
    pub db_port: u16,
    /// Address the HTTP server binds to.
    pub host: String,
    /// Port the HTTP server listens on.
    pub port: u16,
    /// Seed for the historical perturbation; entropy when unset.
    pub noise_seed: Option<u64>,
    /// Fixed reference date for forecasts; the local date when unset.
    pub as_of: Option<NaiveDate>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_name: "postgres".to_string(),
            db_user: "postgres".to_string(),
            db_password: "postgres".to_string(),
            db_host: "127.0.0.1".to_string(),
            db_port: 5432,
            host: "0.0.0.0".to_string(),
            port: 8080,
            noise_seed: None,
            as_of: None,
        }
    }
}

impl Settings {
    /// Load configuration from environment with development defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Ok(Self::from_lookup(|key| env::var(key).ok()))
    }

    /// Resolve settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            db_name: lookup("DB_NAME").unwrap_or(defaults.db_name),
            db_user: lookup("DB_USER").unwrap_or(defaults.db_user),
            db_password: lookup("DB_PASSWORD").unwrap_or(defaults.db_password),
            db_host: lookup("DB_HOST").unwrap_or(defaults.db_host),
            db_port: lookup("DB_PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.db_port),
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.port),
            noise_seed: lookup("NOISE_SEED").and_then(|v| v.trim().parse().ok()),
            as_of: lookup("FORECAST_AS_OF")
                .and_then(|v| NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").ok()),
        }
    }

    /// Connection options for the PostgreSQL store.
    pub fn pg_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let settings = Settings::from_lookup(|_| None);
        assert_eq!(settings.db_name, "postgres");
        assert_eq!(settings.db_port, 5432);
        assert_eq!(settings.port, 8080);
        assert!(settings.noise_seed.is_none());
        assert!(settings.as_of.is_none());
    }

    #[test]
    fn environment_overrides_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("DB_NAME", "inventory"),
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6543"),
            ("PORT", "9000"),
            ("NOISE_SEED", "42"),
            ("FORECAST_AS_OF", "2026-03-10"),
        ]));
        assert_eq!(settings.db_name, "inventory");
        assert_eq!(settings.db_host, "db.internal");
        assert_eq!(settings.db_port, 6543);
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.noise_seed, Some(42));
        assert_eq!(settings.as_of, NaiveDate::from_ymd_opt(2026, 3, 10));
    }

    #[test]
    fn malformed_ports_fall_back() {
        let settings = Settings::from_lookup(lookup_from(&[("DB_PORT", "abc"), ("PORT", "")]));
        assert_eq!(settings.db_port, 5432);
        assert_eq!(settings.port, 8080);
    }
}

//! Database configuration from the environment.
//!
//! A `.env` file in the working directory is loaded first (if present), then
//! the `PG_*` variables are read with the defaults below.

use sqlx::postgres::PgConnectOptions;

use crate::error::AppError;

pub const DEFAULT_USER: &str = "postgres";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_DATABASE: &str = "clima_agro";

/// Connection settings for the `clima_agro` Postgres database.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database: String,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. A variable set to an empty
    /// string is taken as-is, not replaced by its default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let port = match lookup("PG_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| AppError::new(2, format!("Invalid PG_PORT '{raw}': {e}")))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            user: lookup("PG_USER").unwrap_or_else(|| DEFAULT_USER.to_string()),
            password: lookup("PG_PASS").unwrap_or_default(),
            host: lookup("PG_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database: lookup("PG_DB").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
        })
    }

    /// `user@host:port/db`, for messages. Never includes the password.
    pub fn target(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = DbConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.user, "postgres");
        assert_eq!(cfg.password, "");
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 5432);
        assert_eq!(cfg.database, "clima_agro");
        assert_eq!(cfg.target(), "postgres@127.0.0.1:5432/clima_agro");
    }

    #[test]
    fn overrides_from_vars() {
        let cfg = DbConfig::from_lookup(lookup(&[
            ("PG_USER", "agro"),
            ("PG_PASS", "s3cret"),
            ("PG_HOST", "db.local"),
            ("PG_PORT", " 6543 "),
            ("PG_DB", "lecturas_dev"),
        ]))
        .unwrap();
        assert_eq!(cfg.port, 6543);
        assert_eq!(cfg.target(), "agro@db.local:6543/lecturas_dev");
        assert!(!format!("{cfg:?}").contains("s3cret"));
    }

    #[test]
    fn invalid_port_is_a_config_error() {
        let err = DbConfig::from_lookup(lookup(&[("PG_PORT", "abc")])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("PG_PORT"));
    }
}

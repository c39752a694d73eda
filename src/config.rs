use std::str::FromStr;

use anyhow::Context;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_database: Option<String>,
    pub db_max_connections: u32,
    pub port: u16,
}

impl Config {
    /// Reads the process environment. `main` merges `.env` into it first.
    pub fn from_env() -> anyhow::Result<Config> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            db_host: lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
            db_port: parsed(&lookup, "DB_PORT", 3306)?,
            db_user: lookup("DB_USER").unwrap_or_else(|| "root".to_string()),
            db_password: lookup("DB_PASSWORD").unwrap_or_default(),
            db_database: lookup("DB_DATABASE").filter(|db| !db.is_empty()),
            db_max_connections: parsed(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            port: parsed(&lookup, "PORT", 3000)?,
        })
    }
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("`{}` is not a valid value for {}", raw, key)),
        None => Ok(default),
    }
}

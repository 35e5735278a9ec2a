use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub bind_addr: String,
    /// JSON array of company records, loaded once at startup.
    pub data_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. `from_env` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = non_empty(lookup("PORT"))
            .unwrap_or_else(|| "8000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid number")?;

        let bind_addr = non_empty(lookup("BIND_ADDR")).unwrap_or_else(|| "0.0.0.0".to_string());

        let data_path = non_empty(lookup("DATA_PATH"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("companies-data.json"));

        Ok(Config {
            port,
            bind_addr,
            data_path,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

/// Treat empty or whitespace-only values as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

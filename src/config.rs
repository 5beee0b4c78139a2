use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use tracing::info;

pub const DEFAULT_TMDB_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3146";
pub const DEFAULT_QUERY: &str = "Iron Man";

#[derive(Debug, Clone)]
pub struct Config {
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub bind_addr: SocketAddr,
    pub default_query: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let tmdb_api_key = env::var("TMDB_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("Missing required environment variable: TMDB_API_KEY"))?;

        let tmdb_base_url = optional_var("TMDB_BASE_URL")
            .unwrap_or_else(|| DEFAULT_TMDB_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let bind_raw = optional_var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_raw
            .parse()
            .with_context(|| format!("BIND_ADDR is not a socket address: {bind_raw}"))?;

        let default_query =
            optional_var("DEFAULT_QUERY").unwrap_or_else(|| DEFAULT_QUERY.to_string());

        info!("Configuration loaded (TMDB base {})", tmdb_base_url);
        Ok(Self {
            tmdb_api_key,
            tmdb_base_url,
            bind_addr,
            default_query,
        })
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

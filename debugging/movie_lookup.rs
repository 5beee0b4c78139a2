//! Run the search -> detail + recommendations flow once and print the view state.
//! Usage:
//!   cargo run --bin movie_lookup -- title <movie title...>
//!   cargo run --bin movie_lookup -- id <tmdb_id>
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{Context, Result};
use dotenvy::dotenv;
use reelscout::config::Config;
use reelscout::orchestrator::Orchestrator;
use reelscout::store::ViewStore;
use reelscout::tmdb::{MovieApi, TmdbClient};
use serde_json::json;
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args: Vec<String> = env::args().skip(1).collect();
    let Some((mode, rest)) = args.split_first().filter(|(_, rest)| !rest.is_empty()) else {
        eprintln!("Usage: cargo run --bin movie_lookup -- title <movie title...>");
        eprintln!("       cargo run --bin movie_lookup -- id <tmdb_id>");
        std::process::exit(1);
    };

    let config = Config::from_env()?;
    let api: Arc<dyn MovieApi> = Arc::new(TmdbClient::from_config(&config)?);
    let orchestrator = Orchestrator::new(api, Arc::new(ViewStore::new()));

    let view = match mode.as_str() {
        "title" => orchestrator.search(&rest.join(" ")).await,
        "id" => {
            let id: i32 = rest[0].parse().context("tmdb_id must be an integer")?;
            orchestrator.open(id).await
        }
        other => anyhow::bail!("mode must be 'title' or 'id', got '{}'", other),
    };

    let out = json!({
        "phase": view.phase(),
        "trailer_url": view.current_movie.as_ref().and_then(|m| m.trailer_url()),
        "state": view,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

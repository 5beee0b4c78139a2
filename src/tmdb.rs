use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::MetadataError;
use crate::models::{Genre, Movie, RelatedMovie, Video};

pub type ApiResult<T> = std::result::Result<T, MetadataError>;

#[async_trait]
pub trait MovieApi: Send + Sync {
    /// Id of the first search hit for `title`.
    async fn search_by_title(&self, title: &str) -> ApiResult<i32>;
    async fn get_detail(&self, id: i32) -> ApiResult<Movie>;
    async fn get_recommendations(&self, id: i32) -> ApiResult<Vec<RelatedMovie>>;
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> anyhow::Result<Self> {
        let user_agent = format!("reelscout/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build TMDB HTTP client: {}", e))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(config.tmdb_api_key.clone(), config.tmdb_base_url.clone())
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        extra_query: &str,
    ) -> ApiResult<T> {
        // `path` is what ends up in errors and logs; the key only lives in `url`.
        let url = format!(
            "{}{path}?api_key={}{extra_query}",
            self.base_url,
            urlencoding::encode(&self.api_key)
        );
        debug!(path = %path, "TMDB request");
        let res = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| MetadataError::Network {
                path: path.to_string(),
                source,
            })?;
        let status = res.status();
        if !status.is_success() {
            return Err(MetadataError::Http {
                path: path.to_string(),
                status,
            });
        }
        let text = res.text().await.map_err(|source| MetadataError::Network {
            path: path.to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|e| MetadataError::schema(path, e.to_string()))
    }
}

#[async_trait]
impl MovieApi for TmdbClient {
    async fn search_by_title(&self, title: &str) -> ApiResult<i32> {
        let path = "/search/movie";
        let query = format!("&query={}", urlencoding::encode(title));
        let data: SearchResponse = self.get_json(path, &query).await?;
        let first = data
            .results
            .first()
            .ok_or_else(|| MetadataError::NotFound(format!("no TMDB movie for '{}'", title)))?;
        if first.id <= 0 {
            return Err(MetadataError::schema(path, format!("invalid id {}", first.id)));
        }
        Ok(first.id)
    }

    async fn get_detail(&self, id: i32) -> ApiResult<Movie> {
        let path = format!("/movie/{id}");
        let detail: MovieDetail = self
            .get_json(&path, "&append_to_response=videos")
            .await
            .map_err(|e| match e {
                MetadataError::Http { path, status } if status == StatusCode::NOT_FOUND => {
                    MetadataError::NotFound(path)
                }
                other => other,
            })?;
        detail.into_movie(&path)
    }

    async fn get_recommendations(&self, id: i32) -> ApiResult<Vec<RelatedMovie>> {
        let path = format!("/movie/{id}/recommendations");
        let data: RecommendationsResponse = self.get_json(&path, "").await?;
        let related = data
            .results
            .into_iter()
            .filter_map(|r| match r.into_related(&path) {
                Ok(movie) => Some(movie),
                Err(e) => {
                    warn!("Skipping recommendation: {}", e);
                    None
                }
            })
            .collect();
        Ok(related)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: i32,
}

#[derive(Debug, Deserialize)]
struct RawGenre {
    id: i32,
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawVideo {
    #[serde(rename = "type")]
    video_type: String,
    key: String,
    site: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Videos {
    #[serde(default)]
    results: Vec<RawVideo>,
}

#[derive(Debug, Deserialize)]
struct MovieDetail {
    id: i32,
    title: String,
    poster_path: Option<String>,
    genres: Option<Vec<RawGenre>>,
    original_language: Option<String>,
    release_date: Option<String>,
    runtime: Option<u32>,
    vote_average: Option<f64>,
    overview: Option<String>,
    #[serde(default)]
    videos: Option<Videos>,
}

impl MovieDetail {
    fn into_movie(self, path: &str) -> ApiResult<Movie> {
        if self.id <= 0 {
            return Err(MetadataError::schema(path, format!("invalid id {}", self.id)));
        }
        if self.title.trim().is_empty() {
            return Err(MetadataError::schema(path, "movie has an empty title"));
        }
        let release_date = normalize_release_date(self.release_date, path)?;
        let vote_average = match self.vote_average {
            Some(v) if !v.is_finite() => {
                return Err(MetadataError::schema(path, "vote_average is not a number"))
            }
            Some(v) => v,
            None => 0.0,
        };
        let genres = self
            .genres
            .unwrap_or_default()
            .into_iter()
            .map(|g| Genre {
                id: g.id,
                name: g.name,
            })
            .collect();
        let videos = self
            .videos
            .unwrap_or_default()
            .results
            .into_iter()
            .map(|v| Video {
                video_type: v.video_type,
                key: v.key,
                site: v.site,
            })
            .collect();

        Ok(Movie {
            id: self.id,
            title: self.title,
            poster_path: non_empty(self.poster_path),
            genres,
            original_language: self.original_language.unwrap_or_default(),
            release_date,
            runtime_minutes: self.runtime.filter(|r| *r > 0),
            vote_average,
            overview: self.overview.unwrap_or_default(),
            videos,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RecommendationsResponse {
    #[serde(default)]
    results: Vec<RawRelated>,
}

#[derive(Debug, Deserialize)]
struct RawRelated {
    id: Option<i32>,
    title: Option<String>,
    poster_path: Option<String>,
}

impl RawRelated {
    fn into_related(self, path: &str) -> ApiResult<RelatedMovie> {
        let (Some(id), Some(title)) = (self.id.filter(|id| *id > 0), non_empty(self.title)) else {
            return Err(MetadataError::schema(
                path,
                format!("malformed recommendation entry (id {:?})", self.id),
            ));
        };
        Ok(RelatedMovie {
            id,
            title,
            poster_path: non_empty(self.poster_path),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// TMDB sends `""` for unknown release dates.
fn normalize_release_date(raw: Option<String>, path: &str) -> ApiResult<Option<String>> {
    let Some(date) = non_empty(raw) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| MetadataError::schema(path, format!("bad release_date '{}'", date)))?;
    Ok(Some(date))
}

use serde::{Deserialize, Serialize};

pub const POSTER_BASE: &str = "https://image.tmdb.org/t/p/w500";
pub const TRAILER_WATCH_BASE: &str = "https://www.youtube.com/watch?v=";
pub const TRAILER_EMBED_BASE: &str = "https://www.youtube.com/embed/";
pub const TRAILER_TYPE: &str = "Trailer";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Video {
    pub video_type: String,
    pub key: String,
    pub site: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub poster_path: Option<String>,
    pub genres: Vec<Genre>,
    pub original_language: String,
    pub release_date: Option<String>,
    pub runtime_minutes: Option<u32>,
    pub vote_average: f64,
    pub overview: String,
    pub videos: Vec<Video>,
}

/// Slim projection of a movie shown in the recommendation strip.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RelatedMovie {
    pub id: i32,
    pub title: String,
    pub poster_path: Option<String>,
}

impl Movie {
    /// Key of the first video typed "Trailer", if any.
    pub fn trailer_key(&self) -> Option<&str> {
        self.videos
            .iter()
            .find(|v| v.video_type == TRAILER_TYPE)
            .map(|v| v.key.as_str())
    }

    pub fn trailer_url(&self) -> Option<String> {
        self.trailer_key().map(trailer_watch_url)
    }

    pub fn poster_url(&self) -> Option<String> {
        self.poster_path.as_deref().map(poster_url)
    }
}

impl RelatedMovie {
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path.as_deref().map(poster_url)
    }
}

pub fn poster_url(path: &str) -> String {
    format!("{POSTER_BASE}/{}", path.trim_start_matches('/'))
}

pub fn trailer_watch_url(key: &str) -> String {
    format!("{TRAILER_WATCH_BASE}{key}")
}

pub fn trailer_embed_url(key: &str) -> String {
    format!("{TRAILER_EMBED_BASE}{key}")
}

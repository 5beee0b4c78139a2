//! View state container.
//!
//! Every fetch takes a [`RequestToken`] from [`ViewStore::begin`]. Outcomes are
//! applied only while their token is the most recent one, so a slow response
//! for a superseded query can never overwrite a newer view.

use serde::Serialize;
use tokio::sync::Mutex;

use crate::models::{Movie, RelatedMovie};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewState {
    pub current_movie: Option<Movie>,
    pub recommendations: Vec<RelatedMovie>,
    pub is_loading: bool,
    pub is_trailer_visible: bool,
    pub not_found_query: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    NotFound,
}

impl ViewState {
    pub fn phase(&self) -> Phase {
        if self.is_loading {
            Phase::Loading
        } else if self.not_found_query.is_some() {
            Phase::NotFound
        } else if self.current_movie.is_some() {
            Phase::Loaded
        } else {
            Phase::Idle
        }
    }

    pub fn has_trailer(&self) -> bool {
        self.current_movie
            .as_ref()
            .and_then(Movie::trailer_key)
            .is_some()
    }
}

/// Result of one fetch flow, applied atomically by [`reduce`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Loaded {
        movie: Movie,
        recommendations: Vec<RelatedMovie>,
    },
    NotFound {
        query: String,
    },
    /// Upstream failure: keep whatever was shown before.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

pub fn reduce(state: &mut ViewState, outcome: Outcome) {
    state.is_loading = false;
    match outcome {
        Outcome::Loaded {
            movie,
            recommendations,
        } => {
            state.current_movie = Some(movie);
            state.recommendations = recommendations;
            state.not_found_query = None;
            state.is_trailer_visible = false;
        }
        Outcome::NotFound { query } => {
            state.current_movie = None;
            state.recommendations = Vec::new();
            state.not_found_query = Some(query);
            state.is_trailer_visible = false;
        }
        Outcome::Failed => {}
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: ViewState,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct ViewStore {
    inner: Mutex<Inner>,
}

impl ViewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new request, superseding every token handed out before.
    pub async fn begin(&self, show_loading: bool) -> RequestToken {
        let mut guard = self.inner.lock().await;
        guard.generation += 1;
        if show_loading {
            guard.state.is_loading = true;
        }
        RequestToken(guard.generation)
    }

    /// Applies `outcome` and returns the committed state, or hands the outcome
    /// back untouched when the token was superseded.
    pub async fn commit(
        &self,
        token: RequestToken,
        outcome: Outcome,
    ) -> Result<ViewState, Outcome> {
        let mut guard = self.inner.lock().await;
        if token.0 != guard.generation {
            return Err(outcome);
        }
        reduce(&mut guard.state, outcome);
        Ok(guard.state.clone())
    }

    /// Showing is refused when the current movie has no trailer.
    pub async fn set_trailer_visible(&self, visible: bool) -> bool {
        let mut guard = self.inner.lock().await;
        if visible && !guard.state.has_trailer() {
            return false;
        }
        guard.state.is_trailer_visible = visible;
        true
    }

    pub async fn snapshot(&self) -> ViewState {
        self.inner.lock().await.state.clone()
    }
}

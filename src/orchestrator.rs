use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::store::{reduce, Outcome, RequestToken, ViewState, ViewStore};
use crate::tmdb::MovieApi;

/// Drives the search -> detail + recommendations sequence and commits the
/// result into one page session's [`ViewStore`].
#[derive(Clone)]
pub struct Orchestrator {
    api: Arc<dyn MovieApi>,
    store: Arc<ViewStore>,
}

impl Orchestrator {
    pub fn new(api: Arc<dyn MovieApi>, store: Arc<ViewStore>) -> Self {
        Self { api, store }
    }

    /// Primary flow, triggered by page load or a submitted query.
    pub async fn search(&self, query: &str) -> ViewState {
        let token = self.store.begin(true).await;
        info!("Searching TMDB for '{}'", query);
        let outcome = match self.api.search_by_title(query).await {
            Ok(id) => {
                debug!(query = %query, tmdb_id = id, "Search resolved");
                self.load(id).await
            }
            Err(e) if e.is_not_found() => {
                info!("No movie found for '{}'", query);
                Outcome::NotFound {
                    query: query.to_string(),
                }
            }
            Err(e) => {
                warn!("Search for '{}' failed: {:?}", query, e);
                Outcome::Failed
            }
        };
        self.finish(token, outcome).await
    }

    /// Secondary flow, triggered by clicking a recommendation.
    pub async fn open(&self, id: i32) -> ViewState {
        let token = self.store.begin(false).await;
        info!("Opening TMDB movie {}", id);
        let outcome = self.load(id).await;
        self.finish(token, outcome).await
    }

    async fn load(&self, id: i32) -> Outcome {
        let (detail, recommendations) = tokio::join!(
            self.api.get_detail(id),
            self.api.get_recommendations(id)
        );
        let movie = match detail {
            Ok(movie) => movie,
            Err(e) => {
                warn!("Failed to fetch detail for movie {}: {:?}", id, e);
                return Outcome::Failed;
            }
        };
        let recommendations = recommendations.unwrap_or_else(|e| {
            warn!("Failed to fetch recommendations for movie {}: {:?}", id, e);
            Vec::new()
        });
        Outcome::Loaded {
            movie,
            recommendations,
        }
    }

    /// The returned view always reflects this request's own outcome, even when
    /// a newer request in the same session already owns the store.
    async fn finish(&self, token: RequestToken, outcome: Outcome) -> ViewState {
        match self.store.commit(token, outcome).await {
            Ok(view) => view,
            Err(outcome) => {
                debug!(
                    generation = token.generation(),
                    "Discarding result of superseded request"
                );
                let mut view = self.store.snapshot().await;
                reduce(&mut view, outcome);
                view
            }
        }
    }
}

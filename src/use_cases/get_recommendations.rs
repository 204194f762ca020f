use std::sync::Arc;

use chrono::Utc;

use crate::{
    error::AppResult,
    events::{DomainEvent, EventEmitter, RecommendationsRefreshed},
    models::{Recommendation, RecommendationType},
    services::RecommendationRepository,
};

/// Loads a user's recommendation sets, regenerating them when asked to or
/// when none exist yet
pub struct GetRecommendationsUseCase {
    repository: Arc<dyn RecommendationRepository>,
    events: Arc<EventEmitter>,
}

impl GetRecommendationsUseCase {
    pub fn new(repository: Arc<dyn RecommendationRepository>, events: Arc<EventEmitter>) -> Self {
        Self { repository, events }
    }

    pub async fn execute(
        &self,
        user_id: &str,
        kind: RecommendationType,
        force_refresh: bool,
    ) -> AppResult<Vec<Recommendation>> {
        if force_refresh {
            return self.refresh(user_id, kind).await;
        }

        let recommendations = self.repository.find_by_user(user_id, kind, false).await?;
        if recommendations.is_empty() {
            tracing::info!(user_id = %user_id, kind = %kind, "No recommendations yet, refreshing");
            return self.refresh(user_id, kind).await;
        }

        Ok(recommendations)
    }

    /// Asks the backend to regenerate; generation itself is server-side
    async fn refresh(
        &self,
        user_id: &str,
        kind: RecommendationType,
    ) -> AppResult<Vec<Recommendation>> {
        let recommendations = self.repository.find_by_user(user_id, kind, true).await?;

        self.events
            .emit(&DomainEvent::RecommendationsRefreshed(RecommendationsRefreshed {
                user_id: user_id.to_string(),
                kind,
                count: recommendations.len(),
                refreshed_at: Utc::now(),
            }));

        Ok(recommendations)
    }
}

use crate::{
    error::AppResult,
    models::{Recommendation, RecommendationDto, RecommendationReason, RecommendationType},
    services::http::ApiClient,
};

/// Source of recommendation sets
///
/// Implementations translate wire DTOs into domain models. Generation and
/// ranking live behind the backend; `force_refresh` asks it to regenerate.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationRepository: Send + Sync {
    /// Lists the user's recommendation sets for a category
    async fn find_by_user(
        &self,
        user_id: &str,
        kind: RecommendationType,
        force_refresh: bool,
    ) -> AppResult<Vec<Recommendation>>;

    /// Fetches one recommendation; `None` when the backend does not know it
    async fn find_by_id(&self, recommendation_id: &str) -> AppResult<Option<Recommendation>>;

    /// Fetches the backend's explanation for a recommendation
    async fn get_reason(
        &self,
        user_id: &str,
        recommendation_id: &str,
    ) -> AppResult<RecommendationReason>;
}

/// [`RecommendationRepository`] backed by the REST API
#[derive(Clone)]
pub struct HttpRecommendationRepository {
    client: ApiClient,
}

impl HttpRecommendationRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl RecommendationRepository for HttpRecommendationRepository {
    async fn find_by_user(
        &self,
        user_id: &str,
        kind: RecommendationType,
        force_refresh: bool,
    ) -> AppResult<Vec<Recommendation>> {
        let dtos: Vec<RecommendationDto> = self
            .client
            .get_json(
                &["api", "users", user_id, "recommendations"],
                &[
                    ("type", kind.to_string()),
                    ("force_refresh", force_refresh.to_string()),
                ],
            )
            .await?;

        let recommendations = dtos
            .into_iter()
            .map(Recommendation::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        tracing::info!(
            user_id = %user_id,
            kind = %kind,
            force_refresh,
            results = recommendations.len(),
            "Recommendations fetched"
        );

        Ok(recommendations)
    }

    async fn find_by_id(&self, recommendation_id: &str) -> AppResult<Option<Recommendation>> {
        let dto: Option<RecommendationDto> = self
            .client
            .get_optional(&["api", "recommendations", recommendation_id])
            .await?;
        dto.map(Recommendation::try_from).transpose()
    }

    async fn get_reason(
        &self,
        user_id: &str,
        recommendation_id: &str,
    ) -> AppResult<RecommendationReason> {
        self.client
            .get_json(
                &["api", "users", user_id, "recommendations", recommendation_id, "reason"],
                &[],
            )
            .await
    }
}

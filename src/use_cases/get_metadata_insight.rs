use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::MetadataInsight,
    services::{MetadataService, RecommendationRepository},
};

/// Explains a recommendation to the user it was generated for
pub struct GetMetadataInsightUseCase {
    recommendations: Arc<dyn RecommendationRepository>,
    metadata: Arc<dyn MetadataService>,
}

impl GetMetadataInsightUseCase {
    pub fn new(
        recommendations: Arc<dyn RecommendationRepository>,
        metadata: Arc<dyn MetadataService>,
    ) -> Self {
        Self {
            recommendations,
            metadata,
        }
    }

    pub async fn execute(&self, user_id: &str, recommendation_id: &str) -> AppResult<MetadataInsight> {
        let recommendation = self
            .recommendations
            .find_by_id(recommendation_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Recommendation {} not found", recommendation_id))
            })?;

        if !recommendation.belongs_to(user_id) {
            return Err(AppError::Forbidden(format!(
                "Recommendation {} does not belong to user {}",
                recommendation_id, user_id
            )));
        }

        self.metadata.get_insight(user_id, recommendation_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MetadataItem, MetadataType, Recommendation, RecommendationType};
    use crate::services::metadata::MockMetadataService;
    use crate::services::recommendations::MockRecommendationRepository;
    use chrono::Utc;

    fn repo_owned_by(owner: &'static str) -> MockRecommendationRepository {
        let mut repo = MockRecommendationRepository::new();
        repo.expect_find_by_id().returning(move |id| {
            Ok(Some(
                Recommendation::new(id, owner, RecommendationType::Film, vec![], "t", "d", Utc::now())
                    .unwrap(),
            ))
        });
        repo
    }

    #[tokio::test]
    async fn test_owner_receives_insight() {
        let mut metadata = MockMetadataService::new();
        metadata.expect_get_insight().times(1).returning(|_, rec_id| {
            Ok(MetadataInsight {
                recommendation_id: rec_id.to_string(),
                primary_factors: vec![MetadataItem::new(MetadataType::Director, "Mann", 3, 0.9)],
                ..MetadataInsight::default()
            })
        });

        let use_case =
            GetMetadataInsightUseCase::new(Arc::new(repo_owned_by("user_1")), Arc::new(metadata));
        let insight = use_case.execute("user_1", "rec_1").await.unwrap();

        assert_eq!(insight.recommendation_id, "rec_1");
        assert_eq!(insight.primary_factors[0].name, "Mann");
    }

    #[tokio::test]
    async fn test_other_users_recommendation_is_forbidden() {
        let mut metadata = MockMetadataService::new();
        metadata.expect_get_insight().never();

        let use_case =
            GetMetadataInsightUseCase::new(Arc::new(repo_owned_by("user_2")), Arc::new(metadata));
        let err = use_case.execute("user_1", "rec_1").await.unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_unknown_recommendation_is_not_found() {
        let mut repo = MockRecommendationRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        let mut metadata = MockMetadataService::new();
        metadata.expect_get_insight().never();

        let use_case = GetMetadataInsightUseCase::new(Arc::new(repo), Arc::new(metadata));
        let err = use_case.execute("user_1", "rec_9").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(err.to_string().contains("rec_9"));
    }
}

use crate::{
    error::AppResult,
    models::{MetadataInsight, MetadataWeight, WeightsUpdateRequest},
    services::http::ApiClient,
};

/// Per-user weight vectors and per-recommendation insight breakdowns
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataService: Send + Sync {
    async fn get_insight(&self, user_id: &str, recommendation_id: &str)
        -> AppResult<MetadataInsight>;

    async fn get_weights(&self, user_id: &str) -> AppResult<Vec<MetadataWeight>>;

    /// Replaces the user's weight vector
    async fn update_weights(&self, user_id: &str, weights: &[MetadataWeight]) -> AppResult<()>;
}

/// [`MetadataService`] backed by the REST API
#[derive(Clone)]
pub struct HttpMetadataService {
    client: ApiClient,
}

impl HttpMetadataService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl MetadataService for HttpMetadataService {
    async fn get_insight(
        &self,
        user_id: &str,
        recommendation_id: &str,
    ) -> AppResult<MetadataInsight> {
        self.client
            .get_json(
                &["api", "users", user_id, "recommendations", recommendation_id, "metadata"],
                &[],
            )
            .await
    }

    async fn get_weights(&self, user_id: &str) -> AppResult<Vec<MetadataWeight>> {
        self.client
            .get_json(&["api", "users", user_id, "metadata", "weights"], &[])
            .await
    }

    async fn update_weights(&self, user_id: &str, weights: &[MetadataWeight]) -> AppResult<()> {
        let body = WeightsUpdateRequest {
            weights: weights.to_vec(),
        };
        self.client
            .put_json(&["api", "users", user_id, "metadata", "weights"], &body)
            .await?;

        tracing::info!(
            user_id = %user_id,
            weights = weights.len(),
            "Metadata weights updated"
        );

        Ok(())
    }
}

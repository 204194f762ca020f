use crate::{
    error::AppResult,
    models::{Feedback, FeedbackDto, FeedbackRequest},
    services::http::ApiClient,
};

/// Persistence of like/dislike feedback
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Persists one feedback action with a single request
    async fn save(&self, feedback: &Feedback) -> AppResult<Feedback>;

    async fn find_by_recommendation(&self, recommendation_id: &str) -> AppResult<Vec<Feedback>>;

    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<Feedback>>;
}

/// [`FeedbackRepository`] backed by the REST API
#[derive(Clone)]
pub struct HttpFeedbackRepository {
    client: ApiClient,
}

impl HttpFeedbackRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl FeedbackRepository for HttpFeedbackRepository {
    async fn save(&self, feedback: &Feedback) -> AppResult<Feedback> {
        let segments = [
            "api",
            "users",
            feedback.user_id.as_str(),
            "recommendations",
            feedback.recommendation_id.as_str(),
            "feedback",
        ];
        let body = FeedbackRequest {
            feedback_type: feedback.feedback_type,
            item_id: Some(feedback.item_id.clone()),
            feedback_id: Some(feedback.id.clone()),
        };

        let saved: FeedbackDto = self.client.post_json(&segments, &body).await?;

        tracing::info!(
            feedback_id = %saved.id,
            recommendation_id = %saved.recommendation_id,
            item_id = %saved.item_id,
            feedback_type = %saved.feedback_type,
            "Feedback saved"
        );

        Ok(saved.into())
    }

    async fn find_by_recommendation(&self, recommendation_id: &str) -> AppResult<Vec<Feedback>> {
        let dtos: Vec<FeedbackDto> = self
            .client
            .get_json(&["api", "recommendations", recommendation_id, "feedback"], &[])
            .await?;
        Ok(dtos.into_iter().map(Feedback::from).collect())
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<Feedback>> {
        let dtos: Vec<FeedbackDto> = self
            .client
            .get_json(&["api", "users", user_id, "feedback"], &[])
            .await?;
        Ok(dtos.into_iter().map(Feedback::from).collect())
    }
}

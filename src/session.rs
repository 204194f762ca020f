//! Recommendation session: the list, the cursor and the weight sliders for
//! one view, mediating between the swipe controller and the use cases.

use std::sync::Arc;

use futures::future::join_all;

use crate::{
    config::{Config, FeatureFlags},
    error::{AppError, AppResult},
    events::EventEmitter,
    models::{
        EnhancedRecommendation, Feedback, FeedbackType, MetadataInsight, MetadataWeight,
        Recommendation, RecommendationReason, RecommendationType,
    },
    services::{
        ApiClient, FeedbackRepository, HttpFeedbackRepository, HttpMetadataService,
        HttpRecommendationRepository, MetadataService, RecommendationRepository,
    },
    swipe::{SwipeController, SwipeOutcome},
    use_cases::{
        GetMetadataInsightUseCase, GetRecommendationsUseCase, SubmitFeedbackUseCase,
        UpdateMetadataWeightsUseCase,
    },
};

/// The backend collaborators a session talks to
#[derive(Clone)]
pub struct SessionBackend {
    pub recommendations: Arc<dyn RecommendationRepository>,
    pub feedback: Arc<dyn FeedbackRepository>,
    pub metadata: Arc<dyn MetadataService>,
}

impl SessionBackend {
    /// REST-backed collaborators sharing one HTTP client
    pub fn http(client: ApiClient) -> Self {
        Self {
            recommendations: Arc::new(HttpRecommendationRepository::new(client.clone())),
            feedback: Arc::new(HttpFeedbackRepository::new(client.clone())),
            metadata: Arc::new(HttpMetadataService::new(client)),
        }
    }
}

/// What happened to a feedback action
#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackOutcome {
    Submitted(Feedback),
    /// The item is not part of the current recommendation; nothing was sent
    Skipped,
    /// The submission failed; the flow continues without advancing
    Failed { message: String },
}

impl FeedbackOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FeedbackOutcome::Submitted(_))
    }

    pub fn into_result(self) -> AppResult<Feedback> {
        match self {
            FeedbackOutcome::Submitted(feedback) => Ok(feedback),
            FeedbackOutcome::Skipped => Err(AppError::NotFound(
                "Item is not part of the current recommendation".to_string(),
            )),
            FeedbackOutcome::Failed { message } => Err(AppError::Internal(message)),
        }
    }
}

pub struct RecommendationSession {
    user_id: String,
    category: RecommendationType,
    flags: FeatureFlags,
    default_weight: f64,
    backend: SessionBackend,
    events: Arc<EventEmitter>,
    get_recommendations: GetRecommendationsUseCase,
    submit_feedback: SubmitFeedbackUseCase,
    update_weights: UpdateMetadataWeightsUseCase,
    get_insight: GetMetadataInsightUseCase,
    recommendations: Vec<EnhancedRecommendation>,
    current_index: usize,
    weights: Vec<MetadataWeight>,
    loading: bool,
    error: Option<String>,
    last_force_refresh: bool,
}

impl RecommendationSession {
    pub fn new(
        user_id: impl Into<String>,
        category: RecommendationType,
        backend: SessionBackend,
        config: &Config,
    ) -> Self {
        let events = Arc::new(EventEmitter::new());

        Self {
            user_id: user_id.into(),
            category,
            flags: config.feature_flags(),
            default_weight: config.default_weight,
            get_recommendations: GetRecommendationsUseCase::new(
                backend.recommendations.clone(),
                events.clone(),
            ),
            submit_feedback: SubmitFeedbackUseCase::new(
                backend.recommendations.clone(),
                backend.feedback.clone(),
                events.clone(),
            ),
            update_weights: UpdateMetadataWeightsUseCase::new(
                backend.metadata.clone(),
                events.clone(),
            ),
            get_insight: GetMetadataInsightUseCase::new(
                backend.recommendations.clone(),
                backend.metadata.clone(),
            ),
            backend,
            events,
            recommendations: Vec::new(),
            current_index: 0,
            weights: Vec::new(),
            loading: false,
            error: None,
            last_force_refresh: false,
        }
    }

    /// Event bus scoped to this session
    pub fn events(&self) -> &Arc<EventEmitter> {
        &self.events
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn category(&self) -> RecommendationType {
        self.category
    }

    pub fn recommendations(&self) -> &[EnhancedRecommendation] {
        &self.recommendations
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> Option<&EnhancedRecommendation> {
        self.recommendations.get(self.current_index)
    }

    pub fn weights(&self) -> &[MetadataWeight] {
        &self.weights
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replaces the whole list with a fresh fetch and rewinds to the first entry
    pub async fn fetch_recommendations(&mut self, force_refresh: bool) -> AppResult<()> {
        self.loading = true;
        self.error = None;
        self.last_force_refresh = force_refresh;

        let result = self
            .get_recommendations
            .execute(&self.user_id, self.category, force_refresh)
            .await;

        let outcome = match result {
            Ok(recommendations) => {
                let enhanced = self.enhance(recommendations).await;
                tracing::info!(
                    user_id = %self.user_id,
                    kind = %self.category,
                    count = enhanced.len(),
                    "Recommendations loaded"
                );
                self.recommendations = enhanced;
                self.current_index = 0;
                Ok(())
            }
            Err(e) => {
                tracing::error!(user_id = %self.user_id, error = %e, "Failed to load recommendations");
                self.error = Some(e.user_message());
                Err(e)
            }
        };

        self.loading = false;
        outcome
    }

    /// Repeats the last fetch
    pub async fn retry(&mut self) -> AppResult<()> {
        self.fetch_recommendations(self.last_force_refresh).await
    }

    async fn enhance(&self, recommendations: Vec<Recommendation>) -> Vec<EnhancedRecommendation> {
        join_all(
            recommendations
                .into_iter()
                .map(|recommendation| self.enhance_one(recommendation)),
        )
        .await
    }

    /// Attaches reason then insight; either failure degrades to a placeholder
    async fn enhance_one(&self, recommendation: Recommendation) -> EnhancedRecommendation {
        let reason = if self.flags.enable_reasons {
            match self
                .backend
                .recommendations
                .get_reason(&self.user_id, recommendation.id())
                .await
            {
                Ok(reason) => reason,
                Err(e) => {
                    tracing::warn!(
                        recommendation_id = %recommendation.id(),
                        error = %e,
                        "Reason unavailable, using placeholder"
                    );
                    RecommendationReason::placeholder()
                }
            }
        } else {
            RecommendationReason::placeholder()
        };

        let insight = if self.flags.enable_insights {
            match self
                .backend
                .metadata
                .get_insight(&self.user_id, recommendation.id())
                .await
            {
                Ok(insight) => insight,
                Err(e) => {
                    tracing::warn!(
                        recommendation_id = %recommendation.id(),
                        error = %e,
                        "Insight unavailable, using placeholder"
                    );
                    MetadataInsight::empty(recommendation.id())
                }
            }
        } else {
            MetadataInsight::empty(recommendation.id())
        };

        EnhancedRecommendation {
            recommendation,
            reason,
            insight,
        }
    }

    /// Submits feedback for an item of the current recommendation
    ///
    /// Advances to the next recommendation on success, never past the last one.
    pub async fn handle_feedback(
        &mut self,
        item_id: &str,
        feedback_type: FeedbackType,
    ) -> FeedbackOutcome {
        let Some(current) = self.current() else {
            return FeedbackOutcome::Skipped;
        };
        if !current.recommendation.contains_item(item_id) {
            tracing::debug!(item_id = %item_id, "Item not in current recommendation, ignoring");
            return FeedbackOutcome::Skipped;
        }
        let recommendation_id = current.recommendation.id().to_string();

        match self
            .submit_feedback
            .execute(&self.user_id, &recommendation_id, item_id, feedback_type)
            .await
        {
            Ok(feedback) => {
                if self.current_index + 1 < self.recommendations.len() {
                    self.current_index += 1;
                }
                FeedbackOutcome::Submitted(feedback)
            }
            Err(e) => {
                tracing::warn!(
                    recommendation_id = %recommendation_id,
                    item_id = %item_id,
                    error = %e,
                    "Feedback submission failed"
                );
                FeedbackOutcome::Failed {
                    message: e.user_message(),
                }
            }
        }
    }

    /// Commits the controller's swiped card as feedback for `item_id`
    pub async fn swipe(
        &mut self,
        controller: &mut SwipeController,
        item_id: &str,
    ) -> AppResult<SwipeOutcome> {
        controller
            .commit(move |feedback_type| async move {
                self.handle_feedback(item_id, feedback_type)
                    .await
                    .into_result()
                    .map(|_| ())
            })
            .await
    }

    /// Persists new weights, then always refetches with a forced refresh
    pub async fn update_weights(&mut self, weights: Vec<MetadataWeight>) -> AppResult<()> {
        if let Err(e) = self.update_weights.execute(&self.user_id, &weights).await {
            self.error = Some(e.user_message());
            return Err(e);
        }
        self.weights = weights;
        self.fetch_recommendations(true).await
    }

    /// Loads the user's persisted weight vector into the sliders
    pub async fn load_weights(&mut self) -> AppResult<&[MetadataWeight]> {
        self.weights = self.backend.metadata.get_weights(&self.user_id).await?;
        Ok(&self.weights)
    }

    /// Switches category and resets every slider to the default weight
    ///
    /// The previous category's list is dropped; call
    /// [`fetch_recommendations`](Self::fetch_recommendations) to load the new one.
    pub fn select_category(&mut self, category: RecommendationType) {
        self.category = category;
        self.recommendations.clear();
        self.current_index = 0;
        for weight in &mut self.weights {
            weight.weight = self.default_weight;
        }
    }

    /// Insight for one of the user's recommendations, with ownership checks
    pub async fn explain(&self, recommendation_id: &str) -> AppResult<MetadataInsight> {
        self.get_insight.execute(&self.user_id, recommendation_id).await
    }
}

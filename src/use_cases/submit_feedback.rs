use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    events::{DomainEvent, EventEmitter, FeedbackSubmitted},
    models::{Feedback, FeedbackType},
    services::{FeedbackRepository, RecommendationRepository},
};

/// Records a like/dislike for one item of a recommendation
pub struct SubmitFeedbackUseCase {
    recommendations: Arc<dyn RecommendationRepository>,
    feedback: Arc<dyn FeedbackRepository>,
    events: Arc<EventEmitter>,
}

impl SubmitFeedbackUseCase {
    pub fn new(
        recommendations: Arc<dyn RecommendationRepository>,
        feedback: Arc<dyn FeedbackRepository>,
        events: Arc<EventEmitter>,
    ) -> Self {
        Self {
            recommendations,
            feedback,
            events,
        }
    }

    pub async fn execute(
        &self,
        user_id: &str,
        recommendation_id: &str,
        item_id: &str,
        feedback_type: FeedbackType,
    ) -> AppResult<Feedback> {
        let recommendation = self
            .recommendations
            .find_by_id(recommendation_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Recommendation {} not found", recommendation_id))
            })?;

        if !recommendation.contains_item(item_id) {
            return Err(AppError::NotFound(format!(
                "Item {} not found in recommendation {}",
                item_id, recommendation_id
            )));
        }

        let feedback = Feedback::new(user_id, recommendation_id, item_id, feedback_type);
        let saved = self.feedback.save(&feedback).await?;

        self.events
            .emit(&DomainEvent::FeedbackSubmitted(FeedbackSubmitted {
                feedback: saved.clone(),
            }));

        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::models::{Recommendation, RecommendationItem, RecommendationType};
    use crate::services::feedback::MockFeedbackRepository;
    use crate::services::recommendations::MockRecommendationRepository;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn recommendation() -> Recommendation {
        Recommendation::new(
            "rec_1",
            "user_1",
            RecommendationType::Music,
            vec![
                RecommendationItem::new("a", "So What", "track"),
                RecommendationItem::new("b", "Freddie Freeloader", "track"),
            ],
            "Kind of Blue",
            "Modal jazz",
            Utc::now(),
        )
        .unwrap()
    }

    fn repo_with_recommendation() -> MockRecommendationRepository {
        let mut repo = MockRecommendationRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok((id == "rec_1").then(recommendation)));
        repo
    }

    #[tokio::test]
    async fn test_submit_saves_and_emits() {
        let mut feedback_repo = MockFeedbackRepository::new();
        feedback_repo
            .expect_save()
            .times(1)
            .returning(|feedback| Ok(feedback.clone()));

        let events = Arc::new(EventEmitter::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        events.subscribe(EventKind::FeedbackSubmitted, move |event| {
            if let DomainEvent::FeedbackSubmitted(e) = event {
                sink.lock().unwrap().push(e.feedback.id.clone());
            }
            Ok(())
        });

        let use_case = SubmitFeedbackUseCase::new(
            Arc::new(repo_with_recommendation()),
            Arc::new(feedback_repo),
            events,
        );

        let feedback = use_case
            .execute("user_1", "rec_1", "b", FeedbackType::Like)
            .await
            .unwrap();

        assert_eq!(feedback.item_id, "b");
        assert_eq!(feedback.feedback_type, FeedbackType::Like);
        assert!(feedback.id.starts_with("feedback_"));
        assert_eq!(*seen.lock().unwrap(), vec![feedback.id]);
    }

    #[tokio::test]
    async fn test_missing_recommendation_fails_with_id() {
        let mut feedback_repo = MockFeedbackRepository::new();
        feedback_repo.expect_save().never();

        let use_case = SubmitFeedbackUseCase::new(
            Arc::new(repo_with_recommendation()),
            Arc::new(feedback_repo),
            Arc::new(EventEmitter::new()),
        );

        let err = use_case
            .execute("user_1", "rec_404", "a", FeedbackType::Like)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(err.to_string().contains("rec_404"));
    }

    #[tokio::test]
    async fn test_missing_item_fails_without_saving() {
        let mut feedback_repo = MockFeedbackRepository::new();
        feedback_repo.expect_save().never();

        let use_case = SubmitFeedbackUseCase::new(
            Arc::new(repo_with_recommendation()),
            Arc::new(feedback_repo),
            Arc::new(EventEmitter::new()),
        );

        let err = use_case
            .execute("user_1", "rec_1", "zzz", FeedbackType::Dislike)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("zzz"));
    }

    #[tokio::test]
    async fn test_save_failure_emits_nothing() {
        let mut feedback_repo = MockFeedbackRepository::new();
        feedback_repo.expect_save().returning(|_| {
            Err(AppError::Api {
                status: 500,
                message: "Internal Server Error".to_string(),
            })
        });

        let events = Arc::new(EventEmitter::new());
        let emitted = Arc::new(AtomicUsize::new(0));
        let counter = emitted.clone();
        events.subscribe(EventKind::FeedbackSubmitted, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let use_case = SubmitFeedbackUseCase::new(
            Arc::new(repo_with_recommendation()),
            Arc::new(feedback_repo),
            events,
        );

        let result = use_case
            .execute("user_1", "rec_1", "a", FeedbackType::Like)
            .await;
        assert!(result.is_err());
        assert_eq!(emitted.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_panicking_listener_does_not_fail_saved_feedback() {
        let mut feedback_repo = MockFeedbackRepository::new();
        feedback_repo
            .expect_save()
            .times(1)
            .returning(|feedback| Ok(feedback.clone()));

        let events = Arc::new(EventEmitter::new());
        events.subscribe(EventKind::FeedbackSubmitted, |_| panic!("listener bug"));

        let use_case = SubmitFeedbackUseCase::new(
            Arc::new(repo_with_recommendation()),
            Arc::new(feedback_repo),
            events,
        );

        let feedback = use_case
            .execute("user_1", "rec_1", "a", FeedbackType::Like)
            .await
            .unwrap();
        assert_eq!(feedback.item_id, "a");
    }
}

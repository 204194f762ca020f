//! Validation and orchestration on top of the repositories

pub mod get_metadata_insight;
pub mod get_recommendations;
pub mod submit_feedback;
pub mod update_metadata_weights;

pub use get_metadata_insight::GetMetadataInsightUseCase;
pub use get_recommendations::GetRecommendationsUseCase;
pub use submit_feedback::SubmitFeedbackUseCase;
pub use update_metadata_weights::{validate_weights, UpdateMetadataWeightsUseCase};

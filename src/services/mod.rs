//! Backend access: HTTP plumbing, repositories and the metadata service
//!
//! Each concern sits behind an async trait so use cases and the session can
//! run against the REST implementations or test doubles.

pub mod feedback;
pub mod http;
pub mod metadata;
pub mod recommendations;

pub use feedback::{FeedbackRepository, HttpFeedbackRepository};
pub use http::ApiClient;
pub use metadata::{HttpMetadataService, MetadataService};
pub use recommendations::{HttpRecommendationRepository, RecommendationRepository};

//! Adaptive recommendation client: swipe through music/film recommendations,
//! submit like/dislike feedback and tune the metadata weights derived from it.

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod services;
pub mod session;
pub mod swipe;
pub mod use_cases;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use session::{FeedbackOutcome, RecommendationSession, SessionBackend};
pub use swipe::{SwipeController, SwipeDirection, SwipeState};

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::AppResult;
use crate::models::{Feedback, Recommendation, RecommendationItem, RecommendationType};

use super::taste::{seed_catalog, TasteProfile};

/// Items per generated recommendation set
pub const ITEMS_PER_SET: usize = 3;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<RwLock<AppStateInner>>,
}

/// Inner state that can be modified
pub struct AppStateInner {
    pub catalog: Vec<(RecommendationType, RecommendationItem)>,
    pub recommendations: Vec<Recommendation>,
    pub feedback: Vec<Feedback>,
    pub profiles: HashMap<String, TasteProfile>,
    next_recommendation_id: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Creates a state backed by the built-in catalog
    pub fn new() -> Self {
        Self::with_catalog(seed_catalog())
    }

    pub fn with_catalog(catalog: Vec<(RecommendationType, RecommendationItem)>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(AppStateInner {
                catalog,
                recommendations: Vec::new(),
                feedback: Vec::new(),
                profiles: HashMap::new(),
                next_recommendation_id: 1,
            })),
        }
    }
}

impl AppStateInner {
    pub fn recommendation(&self, recommendation_id: &str) -> Option<&Recommendation> {
        self.recommendations
            .iter()
            .find(|rec| rec.id() == recommendation_id)
    }

    pub fn recommendations_for(&self, user_id: &str, kind: RecommendationType) -> Vec<&Recommendation> {
        self.recommendations
            .iter()
            .filter(|rec| rec.belongs_to(user_id) && rec.kind() == kind)
            .collect()
    }

    pub fn catalog_item(&self, item_id: &str) -> Option<&RecommendationItem> {
        self.catalog
            .iter()
            .map(|(_, item)| item)
            .find(|item| item.id == item_id)
    }

    /// Items the user has liked so far, oldest first
    pub fn liked_items(&self, user_id: &str) -> Vec<RecommendationItem> {
        self.feedback
            .iter()
            .filter(|f| f.user_id == user_id && f.is_like())
            .filter_map(|f| self.catalog_item(&f.item_id).cloned())
            .collect()
    }

    /// Drops the user's sets for `kind` and builds new ones from unrated content
    pub fn regenerate(&mut self, user_id: &str, kind: RecommendationType) -> AppResult<Vec<Recommendation>> {
        self.recommendations
            .retain(|rec| !(rec.belongs_to(user_id) && rec.kind() == kind));

        let rated: Vec<&str> = self
            .feedback
            .iter()
            .filter(|f| f.user_id == user_id)
            .map(|f| f.item_id.as_str())
            .collect();

        let candidates: Vec<RecommendationItem> = self
            .catalog
            .iter()
            .filter(|(item_kind, item)| *item_kind == kind && !rated.contains(&item.id.as_str()))
            .map(|(_, item)| item.clone())
            .collect();

        let mut generated = Vec::new();
        for (set_index, chunk) in candidates.chunks(ITEMS_PER_SET).enumerate() {
            let id = format!("rec_{}", self.next_recommendation_id);
            self.next_recommendation_id += 1;

            let recommendation = Recommendation::new(
                id,
                user_id,
                kind,
                chunk.to_vec(),
                format!("Your {} picks #{}", kind, set_index + 1),
                format!("{} {} suggestions based on your feedback", chunk.len(), kind),
                Utc::now(),
            )?;
            generated.push(recommendation);
        }

        tracing::info!(
            user_id = %user_id,
            kind = %kind,
            sets = generated.len(),
            "Recommendations regenerated"
        );

        self.recommendations.extend(generated.iter().cloned());
        Ok(generated)
    }
}

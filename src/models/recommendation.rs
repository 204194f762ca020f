use std::collections::HashSet;
use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

use super::metadata::MetadataInsight;

/// Content category a recommendation set was generated for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationType {
    Music,
    Film,
}

impl RecommendationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationType::Music => "music",
            RecommendationType::Film => "film",
        }
    }
}

impl Display for RecommendationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single piece of content inside a recommendation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationItem {
    pub id: String,
    pub name: String,
    /// Free-form content kind, e.g. "film", "album", "track", "artist"
    pub item_type: String,
    pub details: Map<String, Value>,
    pub explanation: Option<String>,
    /// Model confidence between 0 and 1
    pub confidence: Option<f64>,
}

impl RecommendationItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, item_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            item_type: item_type.into(),
            details: Map::new(),
            explanation: None,
            confidence: None,
        }
    }

    pub fn with_details(mut self, details: Map<String, Value>) -> Self {
        self.details = details;
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// A server-generated bundle of content items shown to a user for feedback
///
/// Never mutated after construction: a refreshed set replaces the old one.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    id: String,
    user_id: String,
    kind: RecommendationType,
    items: Vec<RecommendationItem>,
    title: String,
    description: String,
    created_at: DateTime<Utc>,
}

impl Recommendation {
    /// Builds a recommendation, rejecting duplicate item IDs
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        kind: RecommendationType,
        items: Vec<RecommendationItem>,
        title: impl Into<String>,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        let id = id.into();
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id.as_str()) {
                return Err(AppError::InvalidInput(format!(
                    "Duplicate item {} in recommendation {}",
                    item.id, id
                )));
            }
        }

        Ok(Self {
            id,
            user_id: user_id.into(),
            kind,
            items,
            title: title.into(),
            description: description.into(),
            created_at,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn kind(&self) -> RecommendationType {
        self.kind
    }

    pub fn items(&self) -> &[RecommendationItem] {
        &self.items
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn item(&self, item_id: &str) -> Option<&RecommendationItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn contains_item(&self, item_id: &str) -> bool {
        self.item(item_id).is_some()
    }

    pub fn belongs_to(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// Why a recommendation was produced, as explained by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationReason {
    pub primary_reason: String,
    #[serde(default)]
    pub related_items: Vec<String>,
}

/// Shown when the reason endpoint is unavailable
pub const NO_DATA_PLACEHOLDER: &str = "Brak danych";

impl RecommendationReason {
    pub fn placeholder() -> Self {
        Self {
            primary_reason: NO_DATA_PLACEHOLDER.to_string(),
            related_items: Vec::new(),
        }
    }
}

/// A recommendation together with the context shown next to it
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedRecommendation {
    pub recommendation: Recommendation,
    pub reason: RecommendationReason,
    pub insight: MetadataInsight,
}

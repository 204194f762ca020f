use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;

pub mod feedback;
pub mod metadata;
pub mod recommendation;

pub use feedback::{generate_feedback_id, Feedback, FeedbackType};
pub use metadata::{metadata_key, MetadataInsight, MetadataItem, MetadataType, MetadataWeight};
pub use recommendation::{
    EnhancedRecommendation, Recommendation, RecommendationItem, RecommendationReason,
    RecommendationType, NO_DATA_PLACEHOLDER,
};

// ============================================================================
// Backend wire types
// ============================================================================

/// Recommendation as returned by `/api/users/{id}/recommendations`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationDto {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    #[serde(default)]
    pub items: Vec<RecommendationItemDto>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationItemDto {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub details: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl From<RecommendationItemDto> for RecommendationItem {
    fn from(dto: RecommendationItemDto) -> Self {
        RecommendationItem {
            id: dto.id,
            name: dto.name,
            item_type: dto.item_type,
            details: dto.details,
            explanation: dto.explanation,
            confidence: dto.confidence,
        }
    }
}

impl From<&RecommendationItem> for RecommendationItemDto {
    fn from(item: &RecommendationItem) -> Self {
        RecommendationItemDto {
            id: item.id.clone(),
            name: item.name.clone(),
            item_type: item.item_type.clone(),
            details: item.details.clone(),
            explanation: item.explanation.clone(),
            confidence: item.confidence,
        }
    }
}

impl TryFrom<RecommendationDto> for Recommendation {
    type Error = AppError;

    fn try_from(dto: RecommendationDto) -> Result<Self, Self::Error> {
        Recommendation::new(
            dto.id,
            dto.user_id,
            dto.kind,
            dto.items.into_iter().map(RecommendationItem::from).collect(),
            dto.title,
            dto.description,
            dto.created_at,
        )
    }
}

impl From<&Recommendation> for RecommendationDto {
    fn from(rec: &Recommendation) -> Self {
        RecommendationDto {
            id: rec.id().to_string(),
            user_id: rec.user_id().to_string(),
            kind: rec.kind(),
            items: rec.items().iter().map(RecommendationItemDto::from).collect(),
            title: rec.title().to_string(),
            description: rec.description().to_string(),
            created_at: rec.created_at(),
        }
    }
}

/// Persisted feedback row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackDto {
    pub id: String,
    pub recommendation_id: String,
    pub item_id: String,
    pub feedback_type: FeedbackType,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<FeedbackDto> for Feedback {
    fn from(dto: FeedbackDto) -> Self {
        Feedback {
            id: dto.id,
            recommendation_id: dto.recommendation_id,
            item_id: dto.item_id,
            feedback_type: dto.feedback_type,
            user_id: dto.user_id,
            created_at: dto.created_at,
        }
    }
}

impl From<&Feedback> for FeedbackDto {
    fn from(feedback: &Feedback) -> Self {
        FeedbackDto {
            id: feedback.id.clone(),
            recommendation_id: feedback.recommendation_id.clone(),
            item_id: feedback.item_id.clone(),
            feedback_type: feedback.feedback_type,
            user_id: feedback.user_id.clone(),
            created_at: feedback.created_at,
        }
    }
}

/// Body of `POST /api/users/{id}/recommendations/{recId}/feedback`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackRequest {
    pub feedback_type: FeedbackType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_id: Option<String>,
}

/// Body of `PUT /api/users/{id}/metadata/weights`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightsUpdateRequest {
    pub weights: Vec<MetadataWeight>,
}

/// Query string of the recommendation list endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationQuery {
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    #[serde(default)]
    pub force_refresh: bool,
}

/// Body carried by every non-2xx backend response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dto_json() -> &'static str {
        r#"{
            "id": "rec_42",
            "user_id": "user_7",
            "type": "music",
            "items": [
                {"id": "t1", "name": "Blue in Green", "type": "track",
                 "details": {"artist": "Miles Davis", "genres": ["jazz"]},
                 "confidence": 0.82},
                {"id": "t2", "name": "Naima", "type": "track"}
            ],
            "title": "Late night jazz",
            "description": "Modal and cool jazz",
            "created_at": "2024-05-01T12:00:00Z"
        }"#
    }

    #[test]
    fn test_recommendation_dto_to_domain() {
        let dto: RecommendationDto = serde_json::from_str(sample_dto_json()).unwrap();
        let rec = Recommendation::try_from(dto).unwrap();

        assert_eq!(rec.id(), "rec_42");
        assert_eq!(rec.kind(), RecommendationType::Music);
        assert_eq!(rec.items().len(), 2);
        assert_eq!(rec.items()[0].confidence, Some(0.82));
        assert_eq!(rec.items()[0].details["artist"], "Miles Davis");
        assert!(rec.items()[1].details.is_empty());
        assert_eq!(rec.items()[1].explanation, None);
    }

    #[test]
    fn test_recommendation_dto_with_duplicate_items_rejected() {
        let mut dto: RecommendationDto = serde_json::from_str(sample_dto_json()).unwrap();
        dto.items[1].id = "t1".to_string();
        assert!(Recommendation::try_from(dto).is_err());
    }

    #[test]
    fn test_unknown_recommendation_type_rejected() {
        let json = sample_dto_json().replace("\"music\"", "\"podcast\"");
        assert!(serde_json::from_str::<RecommendationDto>(&json).is_err());
    }

    #[test]
    fn test_feedback_request_wire_format() {
        let body = FeedbackRequest {
            feedback_type: FeedbackType::Dislike,
            item_id: Some("t1".to_string()),
            feedback_id: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"feedback_type": "dislike", "item_id": "t1"}));
    }

    #[test]
    fn test_weights_request_wire_format() {
        let body = WeightsUpdateRequest {
            weights: vec![MetadataWeight::new(MetadataType::FilmGenre, "noir", 0.8)],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["weights"][0]["type"], "film_genre");
        assert_eq!(json["weights"][0]["weight"], 0.8);
    }
}

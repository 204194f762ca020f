use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Category of a weighted preference signal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MetadataType {
    MusicGenre,
    FilmGenre,
    Director,
    CastMember,
    Screenwriter,
    Artist,
}

impl MetadataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataType::MusicGenre => "music_genre",
            MetadataType::FilmGenre => "film_genre",
            MetadataType::Director => "director",
            MetadataType::CastMember => "cast_member",
            MetadataType::Screenwriter => "screenwriter",
            MetadataType::Artist => "artist",
        }
    }
}

impl Display for MetadataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A preference signal derived from liked content
///
/// `weight` is expected in [0, 1]; it is checked where weights are submitted,
/// not here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetadataItem {
    pub id: String,
    #[serde(rename = "type")]
    pub metadata_type: MetadataType,
    pub name: String,
    /// Occurrences in liked content
    pub count: u32,
    pub weight: f64,
}

impl MetadataItem {
    pub fn new(metadata_type: MetadataType, name: impl Into<String>, count: u32, weight: f64) -> Self {
        let name = name.into();
        Self {
            id: metadata_key(metadata_type, &name),
            metadata_type,
            name,
            count,
            weight,
        }
    }
}

/// Stable identifier for a (type, name) pair
pub fn metadata_key(metadata_type: MetadataType, name: &str) -> String {
    format!("{}:{}", metadata_type, name.to_lowercase())
}

/// Which factors explain a given recommendation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MetadataInsight {
    pub recommendation_id: String,
    #[serde(default)]
    pub primary_factors: Vec<MetadataItem>,
    #[serde(default)]
    pub secondary_factors: Vec<MetadataItem>,
    #[serde(default)]
    pub unique_factors: Vec<MetadataItem>,
}

impl MetadataInsight {
    /// Placeholder used when the insight endpoint is unavailable
    pub fn empty(recommendation_id: impl Into<String>) -> Self {
        Self {
            recommendation_id: recommendation_id.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.primary_factors.is_empty()
            && self.secondary_factors.is_empty()
            && self.unique_factors.is_empty()
    }
}

/// Slider state for one metadata category, adjusted by the user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetadataWeight {
    #[serde(rename = "type")]
    pub metadata_type: MetadataType,
    pub name: String,
    pub weight: f64,
}

impl MetadataWeight {
    pub fn new(metadata_type: MetadataType, name: impl Into<String>, weight: f64) -> Self {
        Self {
            metadata_type,
            name: name.into(),
            weight,
        }
    }

    pub fn is_in_range(&self) -> bool {
        self.weight.is_finite() && (0.0..=1.0).contains(&self.weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_type_serialization() {
        assert_eq!(
            serde_json::to_string(&MetadataType::CastMember).unwrap(),
            "\"cast_member\""
        );
        let parsed: MetadataType = serde_json::from_str("\"music_genre\"").unwrap();
        assert_eq!(parsed, MetadataType::MusicGenre);
    }

    #[test]
    fn test_metadata_item_id_is_case_insensitive() {
        let a = MetadataItem::new(MetadataType::FilmGenre, "Noir", 1, 0.5);
        let b = MetadataItem::new(MetadataType::FilmGenre, "noir", 3, 0.9);
        assert_eq!(a.id, b.id);
        assert_eq!(a.id, "film_genre:noir");
    }

    #[test]
    fn test_weight_range_is_inclusive() {
        assert!(MetadataWeight::new(MetadataType::Director, "x", 0.0).is_in_range());
        assert!(MetadataWeight::new(MetadataType::Director, "x", 1.0).is_in_range());
        assert!(!MetadataWeight::new(MetadataType::Director, "x", 1.01).is_in_range());
        assert!(!MetadataWeight::new(MetadataType::Director, "x", -0.01).is_in_range());
        assert!(!MetadataWeight::new(MetadataType::Director, "x", f64::NAN).is_in_range());
    }

    #[test]
    fn test_empty_insight() {
        let insight = MetadataInsight::empty("rec_1");
        assert_eq!(insight.recommendation_id, "rec_1");
        assert!(insight.is_empty());
    }
}

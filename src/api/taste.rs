//! Taste profile bookkeeping for the reference backend
//!
//! Metadata tags are read from an item's `details` bag; feedback nudges the
//! matching tag weights linearly and clamps them to [0, 1].

use std::collections::{BTreeMap, HashSet};

use serde_json::{json, Map, Value};

use crate::models::{
    metadata_key, FeedbackType, MetadataInsight, MetadataItem, MetadataType, MetadataWeight,
    Recommendation, RecommendationItem, RecommendationReason, RecommendationType,
};

/// Weight a tag starts from before any feedback
pub const NEUTRAL_WEIGHT: f64 = 0.5;
/// Linear step applied per like/dislike
pub const FEEDBACK_STEP: f64 = 0.1;
const PRIMARY_THRESHOLD: f64 = 0.7;
const SECONDARY_THRESHOLD: f64 = 0.4;

/// A user's metadata signals keyed by [`metadata_key`]
pub type TasteProfile = BTreeMap<String, MetadataItem>;

/// Metadata tags carried by an item's details
pub fn extract_tags(kind: RecommendationType, item: &RecommendationItem) -> Vec<(MetadataType, String)> {
    let genre_type = match kind {
        RecommendationType::Music => MetadataType::MusicGenre,
        RecommendationType::Film => MetadataType::FilmGenre,
    };

    let fields = [
        ("genres", genre_type),
        ("director", MetadataType::Director),
        ("cast", MetadataType::CastMember),
        ("screenwriter", MetadataType::Screenwriter),
        ("artist", MetadataType::Artist),
    ];

    let mut tags = Vec::new();
    for (field, metadata_type) in fields {
        match item.details.get(field) {
            Some(Value::String(name)) => tags.push((metadata_type, name.clone())),
            Some(Value::Array(values)) => tags.extend(
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|name| (metadata_type, name.to_string())),
            ),
            _ => {}
        }
    }
    tags
}

/// Applies one like/dislike to every tag of the item
pub fn apply_feedback(
    profile: &mut TasteProfile,
    tags: &[(MetadataType, String)],
    feedback_type: FeedbackType,
) {
    for (metadata_type, name) in tags {
        let entry = profile
            .entry(metadata_key(*metadata_type, name))
            .or_insert_with(|| MetadataItem::new(*metadata_type, name.clone(), 0, NEUTRAL_WEIGHT));

        match feedback_type {
            FeedbackType::Like => {
                entry.count += 1;
                entry.weight = (entry.weight + FEEDBACK_STEP).clamp(0.0, 1.0);
            }
            FeedbackType::Dislike => {
                entry.weight = (entry.weight - FEEDBACK_STEP).clamp(0.0, 1.0);
            }
        }
    }
}

/// Overwrites slider weights; unseen tags are added with a zero count
pub fn apply_weights(profile: &mut TasteProfile, weights: &[MetadataWeight]) {
    for w in weights {
        profile
            .entry(metadata_key(w.metadata_type, &w.name))
            .and_modify(|item| item.weight = w.weight)
            .or_insert_with(|| MetadataItem::new(w.metadata_type, w.name.clone(), 0, w.weight));
    }
}

pub fn profile_weights(profile: &TasteProfile) -> Vec<MetadataWeight> {
    profile
        .values()
        .map(|item| MetadataWeight::new(item.metadata_type, item.name.clone(), item.weight))
        .collect()
}

fn recommendation_tags(recommendation: &Recommendation) -> Vec<(MetadataType, String)> {
    let mut seen = HashSet::new();
    recommendation
        .items()
        .iter()
        .flat_map(|item| extract_tags(recommendation.kind(), item))
        .filter(|(t, name)| seen.insert(metadata_key(*t, name)))
        .collect()
}

/// Groups a recommendation's tags by how strongly the profile backs them
///
/// Primary: weight >= 0.7. Unique: not primary and seen in at most one liked
/// item (including tags the profile has never seen). Secondary: the rest with
/// weight >= 0.4. Weaker tags are left out.
pub fn build_insight(recommendation: &Recommendation, profile: &TasteProfile) -> MetadataInsight {
    let mut insight = MetadataInsight::empty(recommendation.id());

    for (metadata_type, name) in recommendation_tags(recommendation) {
        let item = profile
            .get(&metadata_key(metadata_type, &name))
            .cloned()
            .unwrap_or_else(|| MetadataItem::new(metadata_type, name, 0, NEUTRAL_WEIGHT));

        if item.weight >= PRIMARY_THRESHOLD {
            insight.primary_factors.push(item);
        } else if item.count <= 1 {
            insight.unique_factors.push(item);
        } else if item.weight >= SECONDARY_THRESHOLD {
            insight.secondary_factors.push(item);
        }
    }

    insight
}

/// Names the strongest liked tag behind a recommendation
///
/// `liked` are items the user liked earlier, used to list related titles.
pub fn build_reason(
    recommendation: &Recommendation,
    profile: &TasteProfile,
    liked: &[RecommendationItem],
) -> RecommendationReason {
    let strongest = recommendation_tags(recommendation)
        .into_iter()
        .filter_map(|(t, name)| profile.get(&metadata_key(t, &name)))
        .filter(|item| item.count > 0)
        .max_by(|a, b| a.weight.total_cmp(&b.weight));

    let Some(factor) = strongest else {
        return RecommendationReason {
            primary_reason: format!("Exploring new {} for you", recommendation.kind()),
            related_items: Vec::new(),
        };
    };

    let related_items = liked
        .iter()
        .filter(|item| {
            extract_tags(recommendation.kind(), item)
                .iter()
                .any(|(t, name)| metadata_key(*t, name) == factor.id)
        })
        .map(|item| item.name.clone())
        .collect();

    RecommendationReason {
        primary_reason: format!(
            "Because you liked {} {}",
            factor.metadata_type.as_str().replace('_', " "),
            factor.name
        ),
        related_items,
    }
}

fn details(pairs: Value) -> Map<String, Value> {
    match pairs {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Content the reference backend recommends from
pub fn seed_catalog() -> Vec<(RecommendationType, RecommendationItem)> {
    use RecommendationType::{Film, Music};

    vec![
        (
            Film,
            RecommendationItem::new("film_heat", "Heat", "film").with_details(details(json!({
                "genres": ["crime", "thriller"],
                "director": "Michael Mann",
                "cast": ["Al Pacino", "Robert De Niro"],
                "screenwriter": "Michael Mann",
                "year": 1995
            }))),
        ),
        (
            Film,
            RecommendationItem::new("film_collateral", "Collateral", "film").with_details(details(
                json!({
                    "genres": ["crime", "thriller"],
                    "director": "Michael Mann",
                    "cast": ["Tom Cruise", "Jamie Foxx"],
                    "screenwriter": "Stuart Beattie",
                    "year": 2004
                }),
            )),
        ),
        (
            Film,
            RecommendationItem::new("film_arrival", "Arrival", "film").with_details(details(json!({
                "genres": ["science fiction", "drama"],
                "director": "Denis Villeneuve",
                "cast": ["Amy Adams"],
                "screenwriter": "Eric Heisserer",
                "year": 2016
            }))),
        ),
        (
            Film,
            RecommendationItem::new("film_sicario", "Sicario", "film").with_details(details(json!({
                "genres": ["crime", "thriller"],
                "director": "Denis Villeneuve",
                "cast": ["Emily Blunt", "Benicio del Toro"],
                "screenwriter": "Taylor Sheridan",
                "year": 2015
            }))),
        ),
        (
            Film,
            RecommendationItem::new("film_paterson", "Paterson", "film").with_details(details(
                json!({
                    "genres": ["drama"],
                    "director": "Jim Jarmusch",
                    "cast": ["Adam Driver"],
                    "screenwriter": "Jim Jarmusch",
                    "year": 2016
                }),
            )),
        ),
        (
            Film,
            RecommendationItem::new("film_thief", "Thief", "film").with_details(details(json!({
                "genres": ["crime", "drama"],
                "director": "Michael Mann",
                "cast": ["James Caan"],
                "screenwriter": "Michael Mann",
                "year": 1981
            }))),
        ),
        (
            Music,
            RecommendationItem::new("album_kind_of_blue", "Kind of Blue", "album").with_details(
                details(json!({"artist": "Miles Davis", "genres": ["jazz", "modal jazz"]})),
            ),
        ),
        (
            Music,
            RecommendationItem::new("album_a_love_supreme", "A Love Supreme", "album")
                .with_details(details(json!({"artist": "John Coltrane", "genres": ["jazz"]}))),
        ),
        (
            Music,
            RecommendationItem::new("album_blue_lines", "Blue Lines", "album").with_details(
                details(json!({"artist": "Massive Attack", "genres": ["trip hop"]})),
            ),
        ),
        (
            Music,
            RecommendationItem::new("album_mezzanine", "Mezzanine", "album").with_details(details(
                json!({"artist": "Massive Attack", "genres": ["trip hop", "electronic"]}),
            )),
        ),
        (
            Music,
            RecommendationItem::new("track_teardrop", "Teardrop", "track").with_details(details(
                json!({"artist": "Massive Attack", "genres": ["trip hop"]}),
            )),
        ),
        (
            Music,
            RecommendationItem::new("album_in_a_silent_way", "In a Silent Way", "album")
                .with_details(details(
                    json!({"artist": "Miles Davis", "genres": ["jazz", "jazz fusion"]}),
                )),
        ),
    ]
}

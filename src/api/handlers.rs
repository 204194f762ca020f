use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::{
        generate_feedback_id, Feedback, FeedbackDto, FeedbackRequest, MetadataInsight,
        MetadataWeight, Recommendation, RecommendationDto, RecommendationQuery,
        RecommendationReason, WeightsUpdateRequest,
    },
    use_cases::validate_weights,
};

use super::{
    state::AppStateInner,
    taste::{apply_feedback, apply_weights, build_insight, build_reason, extract_tags, profile_weights},
    AppState,
};

/// Looks up a recommendation owned by `user_id`
fn owned_recommendation<'a>(
    inner: &'a AppStateInner,
    user_id: &str,
    recommendation_id: &str,
) -> AppResult<&'a Recommendation> {
    let recommendation = inner
        .recommendation(recommendation_id)
        .ok_or_else(|| AppError::NotFound(format!("Recommendation {} not found", recommendation_id)))?;

    if !recommendation.belongs_to(user_id) {
        return Err(AppError::Forbidden(format!(
            "Recommendation {} does not belong to user {}",
            recommendation_id, user_id
        )));
    }
    Ok(recommendation)
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Lists a user's recommendation sets, regenerating on `force_refresh`
pub async fn list_user_recommendations(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<RecommendationDto>>> {
    let recommendations: Vec<RecommendationDto> = if query.force_refresh {
        let mut inner = state.inner.write().await;
        inner
            .regenerate(&user_id, query.kind)?
            .iter()
            .map(RecommendationDto::from)
            .collect()
    } else {
        let inner = state.inner.read().await;
        inner
            .recommendations_for(&user_id, query.kind)
            .into_iter()
            .map(RecommendationDto::from)
            .collect()
    };

    Ok(Json(recommendations))
}

pub async fn get_recommendation(
    State(state): State<AppState>,
    Path(recommendation_id): Path<String>,
) -> AppResult<Json<RecommendationDto>> {
    let inner = state.inner.read().await;
    inner
        .recommendation(&recommendation_id)
        .map(|rec| Json(RecommendationDto::from(rec)))
        .ok_or_else(|| AppError::NotFound(format!("Recommendation {} not found", recommendation_id)))
}

pub async fn get_reason(
    State(state): State<AppState>,
    Path((user_id, recommendation_id)): Path<(String, String)>,
) -> AppResult<Json<RecommendationReason>> {
    let inner = state.inner.read().await;
    let recommendation = owned_recommendation(&inner, &user_id, &recommendation_id)?;

    let empty = Default::default();
    let profile = inner.profiles.get(&user_id).unwrap_or(&empty);
    let liked = inner.liked_items(&user_id);

    Ok(Json(build_reason(recommendation, profile, &liked)))
}

pub async fn get_metadata_insight(
    State(state): State<AppState>,
    Path((user_id, recommendation_id)): Path<(String, String)>,
) -> AppResult<Json<MetadataInsight>> {
    let inner = state.inner.read().await;
    let recommendation = owned_recommendation(&inner, &user_id, &recommendation_id)?;

    let empty = Default::default();
    let profile = inner.profiles.get(&user_id).unwrap_or(&empty);

    Ok(Json(build_insight(recommendation, profile)))
}

/// Records feedback and nudges the user's taste profile
pub async fn submit_feedback(
    State(state): State<AppState>,
    Path((user_id, recommendation_id)): Path<(String, String)>,
    Json(request): Json<FeedbackRequest>,
) -> AppResult<(StatusCode, Json<FeedbackDto>)> {
    let mut inner = state.inner.write().await;
    let recommendation = owned_recommendation(&inner, &user_id, &recommendation_id)?;

    let item_id = request
        .item_id
        .ok_or_else(|| AppError::InvalidInput("item_id is required".to_string()))?;
    let item = recommendation.item(&item_id).ok_or_else(|| {
        AppError::InvalidInput(format!(
            "Item {} is not part of recommendation {}",
            item_id, recommendation_id
        ))
    })?;
    let tags = extract_tags(recommendation.kind(), item);

    let now = chrono::Utc::now();
    let feedback = Feedback {
        id: request.feedback_id.unwrap_or_else(|| generate_feedback_id(now)),
        recommendation_id: recommendation_id.clone(),
        item_id,
        feedback_type: request.feedback_type,
        user_id: user_id.clone(),
        created_at: now,
    };

    apply_feedback(
        inner.profiles.entry(user_id.clone()).or_default(),
        &tags,
        feedback.feedback_type,
    );
    inner.feedback.push(feedback.clone());

    tracing::info!(
        user_id = %user_id,
        recommendation_id = %recommendation_id,
        item_id = %feedback.item_id,
        feedback_type = %feedback.feedback_type,
        tags = tags.len(),
        "Feedback recorded"
    );

    Ok((StatusCode::CREATED, Json(FeedbackDto::from(&feedback))))
}

pub async fn get_weights(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<MetadataWeight>> {
    let inner = state.inner.read().await;
    let weights = inner
        .profiles
        .get(&user_id)
        .map(profile_weights)
        .unwrap_or_default();
    Json(weights)
}

/// Overwrites slider weights; rejects the whole batch on any out-of-range value
pub async fn update_weights(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<WeightsUpdateRequest>,
) -> AppResult<StatusCode> {
    validate_weights(&request.weights)?;

    let mut inner = state.inner.write().await;
    apply_weights(inner.profiles.entry(user_id).or_default(), &request.weights);

    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_recommendation_feedback(
    State(state): State<AppState>,
    Path(recommendation_id): Path<String>,
) -> Json<Vec<FeedbackDto>> {
    let inner = state.inner.read().await;
    Json(
        inner
            .feedback
            .iter()
            .filter(|f| f.recommendation_id == recommendation_id)
            .map(FeedbackDto::from)
            .collect(),
    )
}

pub async fn get_user_feedback(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<FeedbackDto>> {
    let inner = state.inner.read().await;
    Json(
        inner
            .feedback
            .iter()
            .filter(|f| f.user_id == user_id)
            .map(FeedbackDto::from)
            .collect(),
    )
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::{session::SessionUpdate, ConfidenceTier, Recommendation};
use crate::services::{engine, engine::TurnInput, ResponseSource};
use crate::store::ConversationEntry;

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    pub conversation_id: Option<String>,
    pub school: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    pub time_commitment: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub grade: Option<i64>,
    pub prior_experience: Option<String>,
    pub follow_up: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpRequest {
    pub conversation_id: Option<String>,
    pub follow_up: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendResponse {
    pub success: bool,
    pub source: ResponseSource,
    pub recommendations: Vec<Recommendation>,
    pub school: String,
    pub conversation_id: String,
    pub confidence: ConfidenceTier,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_intent: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationStatusResponse {
    pub success: bool,
    pub has_recommendations: bool,
    pub recommendation_count: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SchoolsResponse {
    pub success: bool,
    pub schools: Vec<String>,
    pub count: usize,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// First-turn (or continued) recommendation request
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> AppResult<Json<RecommendResponse>> {
    let conversation_id = required(request.conversation_id, "conversationId")?;
    let school = required(request.school, "school")?;

    let mut interests: Vec<String> = request
        .interests
        .iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect();
    if interests.is_empty() {
        return Err(AppError::InvalidInput(
            "at least one interest is required".to_string(),
        ));
    }
    interests.extend(
        request
            .skills
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
    );

    let clubs = state.catalog.clubs_for(&school);
    if clubs.is_empty() {
        return Err(AppError::NotFound(format!(
            "No clubs found for school: {}",
            school
        )));
    }

    let now = Utc::now();
    let mut entry = {
        let store = state.store.read().await;
        store.get(&conversation_id).cloned()
    }
    // A first turn with an unknown id starts a fresh conversation.
    .unwrap_or_else(|| ConversationEntry::new(now));

    let mut query = match &request.follow_up {
        Some(follow_up) => follow_up.clone(),
        None => interests.join(", "),
    };
    if let Some(prior) = &request.prior_experience {
        if !prior.trim().is_empty() {
            query.push_str("; prior experience: ");
            query.push_str(prior.trim());
        }
    }

    entry.session.apply(SessionUpdate {
        school: Some(school.clone()),
        grade: request.grade.and_then(|g| u8::try_from(g).ok()),
        interests: interests.clone(),
        activity_type: request.activity_type,
        time_commitment: request.time_commitment,
        goal: None,
        teamwork: None,
        query: Some(query),
    });

    let excluded = entry.excluded_names();
    let outcome = engine::run_turn(
        state.provider.as_ref(),
        TurnInput {
            clubs: &clubs,
            session: &entry.session,
            interests: &interests,
            follow_up: request.follow_up.as_deref(),
            excluded: &excluded,
        },
    )
    .await;

    entry.session.record_viewed(
        outcome
            .recommendations
            .iter()
            .map(|r| (r.club_name.as_str(), r.category.as_str())),
    );
    entry.record_turn(outcome.recommendations.clone(), now);
    state
        .store
        .write()
        .await
        .upsert(conversation_id.clone(), entry);

    Ok(Json(RecommendResponse {
        success: true,
        source: outcome.source,
        recommendations: outcome.recommendations,
        school,
        conversation_id,
        confidence: outcome.confidence,
        message: outcome.message,
        follow_up_intent: outcome.intent.map(|i| i.label()),
    }))
}

/// Follow-up turn within an existing conversation
pub async fn follow_up(
    State(state): State<AppState>,
    Json(request): Json<FollowUpRequest>,
) -> AppResult<Json<RecommendResponse>> {
    let conversation_id = required(request.conversation_id, "conversationId")?;
    let follow_up = required(request.follow_up, "followUp")?;

    let mut entry = {
        let store = state.store.read().await;
        store.get(&conversation_id).cloned()
    }
    .ok_or_else(|| AppError::NotFound(format!("Conversation not found: {}", conversation_id)))?;

    let school = entry.session.school.clone().ok_or_else(|| {
        AppError::InvalidInput("conversation has no school on record".to_string())
    })?;
    let clubs = state.catalog.clubs_for(&school);
    if clubs.is_empty() {
        return Err(AppError::NotFound(format!(
            "No clubs found for school: {}",
            school
        )));
    }

    entry.session.apply(SessionUpdate {
        query: Some(follow_up.clone()),
        ..Default::default()
    });

    let now = Utc::now();
    let excluded = entry.excluded_names();
    let interests = entry.session.interests.clone();
    let outcome = engine::run_turn(
        state.provider.as_ref(),
        TurnInput {
            clubs: &clubs,
            session: &entry.session,
            interests: &interests,
            follow_up: Some(follow_up.as_str()),
            excluded: &excluded,
        },
    )
    .await;

    entry.session.record_viewed(
        outcome
            .recommendations
            .iter()
            .map(|r| (r.club_name.as_str(), r.category.as_str())),
    );
    entry.record_turn(outcome.recommendations.clone(), now);
    state
        .store
        .write()
        .await
        .upsert(conversation_id.clone(), entry);

    Ok(Json(RecommendResponse {
        success: true,
        source: outcome.source,
        recommendations: outcome.recommendations,
        school,
        conversation_id,
        confidence: outcome.confidence,
        message: outcome.message,
        follow_up_intent: outcome.intent.map(|i| i.label()),
    }))
}

/// Conversation status lookup
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> AppResult<Json<ConversationStatusResponse>> {
    let store = state.store.read().await;
    let entry = store.get(&conversation_id).ok_or_else(|| {
        AppError::NotFound(format!("Conversation not found: {}", conversation_id))
    })?;

    Ok(Json(ConversationStatusResponse {
        success: true,
        has_recommendations: !entry.last_recommendations.is_empty(),
        recommendation_count: entry.last_recommendations.len(),
        timestamp: entry.updated_at,
    }))
}

/// All known schools, sorted
pub async fn get_schools(State(state): State<AppState>) -> Json<SchoolsResponse> {
    let schools = state.catalog.schools();
    let count = schools.len();
    Json(SchoolsResponse {
        success: true,
        schools,
        count,
    })
}

fn required(value: Option<String>, field: &str) -> AppResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::InvalidInput(format!("{} is required", field)))
}

//! Voting endpoints.

use axum::{Json, Router, extract::State, routing::post};
use mosaique_common::AppResult;
use mosaique_core::{BattleSplit, NomineeTally, RankedNominee, RankingSummary, VoteChannel};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::{extractors::VoterKey, middleware::AppState, response::ApiResponse};

/// Cast vote request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteRequest {
    #[validate(length(min = 1, max = 128))]
    pub category_id: String,

    #[validate(length(min = 1, max = 128))]
    pub nominee_id: String,

    #[validate(length(min = 1, max = 32))]
    pub channel: String,
}

/// Cast vote response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteResponse {
    pub category_id: String,
    pub nominee_id: String,
    pub channel: VoteChannel,
    pub weight: u32,
    pub tally: NomineeTally,
}

/// Request naming a single category.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    #[validate(length(min = 1, max = 128))]
    pub category_id: String,
}

/// Vote status response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteStatusResponse {
    pub has_voted: bool,
}

/// Cast a vote.
async fn cast(
    VoterKey(voter_key): VoterKey,
    State(state): State<AppState>,
    Json(req): Json<CastVoteRequest>,
) -> AppResult<ApiResponse<CastVoteResponse>> {
    req.validate()?;

    debug!(
        category_id = %req.category_id,
        nominee_id = %req.nominee_id,
        channel = %req.channel,
        "Casting vote"
    );

    let outcome = state
        .voting_service
        .vote(&req.category_id, &req.nominee_id, &req.channel, &voter_key)
        .await?;

    Ok(ApiResponse::ok(CastVoteResponse {
        category_id: outcome.category_id,
        nominee_id: outcome.nominee_id,
        channel: outcome.channel,
        weight: outcome.weight,
        tally: outcome.tally,
    }))
}

/// Ranking of a category.
async fn ranking(
    State(state): State<AppState>,
    Json(req): Json<CategoryRequest>,
) -> AppResult<ApiResponse<Vec<RankedNominee>>> {
    req.validate()?;

    let ranking = state.ranking_service.rank(&req.category_id).await?;
    Ok(ApiResponse::ok(ranking))
}

/// Percentage split of a battle.
async fn battle(
    State(state): State<AppState>,
    Json(req): Json<CategoryRequest>,
) -> AppResult<ApiResponse<BattleSplit>> {
    req.validate()?;

    let split = state.ranking_service.battle_split(&req.category_id).await?;
    Ok(ApiResponse::ok(split))
}

/// Totals and ranking of a category.
async fn summary(
    State(state): State<AppState>,
    Json(req): Json<CategoryRequest>,
) -> AppResult<ApiResponse<RankingSummary>> {
    req.validate()?;

    let summary = state.ranking_service.summary(&req.category_id).await?;
    Ok(ApiResponse::ok(summary))
}

/// Whether the caller already voted in a category.
async fn status(
    VoterKey(voter_key): VoterKey,
    State(state): State<AppState>,
    Json(req): Json<CategoryRequest>,
) -> AppResult<ApiResponse<VoteStatusResponse>> {
    req.validate()?;

    let has_voted = state
        .voting_service
        .has_voted(&req.category_id, &voter_key)
        .await?;
    Ok(ApiResponse::ok(VoteStatusResponse { has_voted }))
}

/// List category IDs.
async fn categories(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<String>>> {
    let ids = state.category_registry.list_categories().await?;
    Ok(ApiResponse::ok(ids))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cast", post(cast))
        .route("/ranking", post(ranking))
        .route("/battle", post(battle))
        .route("/summary", post(summary))
        .route("/status", post(status))
        .route("/categories", post(categories))
}

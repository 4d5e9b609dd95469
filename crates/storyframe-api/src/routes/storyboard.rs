//! Routes for storyboard generation.

use std::sync::Arc;

use axum::extract::State;
use axum::{Json, Router, routing::post};
use storyframe_core::error::StoryboardError;
use storyframe_core::storyboard::{StoryboardRequest, StoryboardResponse};
use storyframe_pipeline::application::command_handlers;
use storyframe_pipeline::domain::commands;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

fn validate(request: &StoryboardRequest) -> Result<(), StoryboardError> {
    if request.title.trim().is_empty() {
        return Err(StoryboardError::Validation("title must not be blank".to_owned()));
    }
    if request.script.trim().is_empty() {
        return Err(StoryboardError::Validation("script must not be blank".to_owned()));
    }
    Ok(())
}

/// POST /api/storyboard
#[instrument(skip(state, request), fields(title = %request.title, shot_preference = request.shot_preference.as_str()))]
async fn generate_storyboard(
    State(state): State<AppState>,
    Json(request): Json<StoryboardRequest>,
) -> Result<Json<StoryboardResponse>, ApiError> {
    validate(&request)?;

    let command = commands::GenerateStoryboard {
        correlation_id: Uuid::new_v4(),
        request,
    };

    info!(correlation_id = %command.correlation_id, "handling generate_storyboard command");

    let response = command_handlers::handle_generate_storyboard(
        &command,
        Arc::clone(&state.enricher),
        &state.config,
    )
    .await?;

    Ok(Json(response))
}

/// Returns the router for the storyboard context.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/storyboard", post(generate_storyboard))
}

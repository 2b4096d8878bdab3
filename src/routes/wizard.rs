use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::wizard::{
        PlanningRequest, ScheduleResponse, StepCompletionRequest, TeamsResponse, WizardSnapshot,
    },
    error::AppError,
    services::wizard_service,
    state::{SharedState, user::CurrentUser},
};

/// Routes driving the tournament creation wizard.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/wizards", post(create_wizard))
        .route("/wizards/{id}", get(get_wizard).delete(delete_wizard))
        .route("/wizards/{id}/teams", get(available_teams))
        .route("/wizards/{id}/steps", post(complete_step))
        .route("/wizards/{id}/schedule", post(schedule_planning))
        .route("/wizards/{id}/navigate/{step}", post(navigate))
        .route("/wizards/{id}/reset", post(reset_wizard))
}

/// Open a wizard on the creation step.
#[utoipa::path(
    post,
    path = "/wizards",
    tag = "wizard",
    responses((status = 201, description = "Wizard opened", body = WizardSnapshot))
)]
pub async fn create_wizard(
    State(state): State<SharedState>,
    user: CurrentUser,
) -> (StatusCode, Json<WizardSnapshot>) {
    let snapshot = wizard_service::create_wizard(&state, user).await;
    (StatusCode::CREATED, Json(snapshot))
}

/// Current position, gating and draft of a wizard.
#[utoipa::path(
    get,
    path = "/wizards/{id}",
    tag = "wizard",
    params(("id" = Uuid, Path, description = "Wizard identifier")),
    responses(
        (status = 200, description = "Wizard state", body = WizardSnapshot),
        (status = 404, description = "Unknown wizard")
    )
)]
pub async fn get_wizard(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardSnapshot>, AppError> {
    Ok(Json(wizard_service::get_wizard(&state, id).await?))
}

/// Close a wizard.
#[utoipa::path(
    delete,
    path = "/wizards/{id}",
    tag = "wizard",
    params(("id" = Uuid, Path, description = "Wizard identifier")),
    responses(
        (status = 204, description = "Wizard closed"),
        (status = 404, description = "Unknown wizard")
    )
)]
pub async fn delete_wizard(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    wizard_service::delete_wizard(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Teams loaded for the team-selection step.
#[utoipa::path(
    get,
    path = "/wizards/{id}/teams",
    tag = "wizard",
    params(("id" = Uuid, Path, description = "Wizard identifier")),
    responses((status = 200, description = "Selectable teams", body = TeamsResponse))
)]
pub async fn available_teams(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamsResponse>, AppError> {
    Ok(Json(wizard_service::available_teams(&state, id).await?))
}

/// Report the completion of the current step.
#[utoipa::path(
    post,
    path = "/wizards/{id}/steps",
    tag = "wizard",
    params(("id" = Uuid, Path, description = "Wizard identifier")),
    request_body = StepCompletionRequest,
    responses(
        (status = 200, description = "Step completed", body = WizardSnapshot),
        (status = 400, description = "Invalid data or next step locked"),
        (status = 409, description = "Step is not the current one")
    )
)]
pub async fn complete_step(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StepCompletionRequest>,
) -> Result<Json<WizardSnapshot>, AppError> {
    Ok(Json(wizard_service::complete_step(&state, id, payload).await?))
}

/// Complete the planning step through the tournament service.
#[utoipa::path(
    post,
    path = "/wizards/{id}/schedule",
    tag = "wizard",
    params(("id" = Uuid, Path, description = "Wizard identifier")),
    request_body = PlanningRequest,
    responses(
        (status = 200, description = "Planning saved, remotely or locally", body = ScheduleResponse),
        (status = 409, description = "Wizard is not on the planning step")
    )
)]
pub async fn schedule_planning(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    user: CurrentUser,
    Valid(Json(payload)): Valid<Json<PlanningRequest>>,
) -> Result<Json<ScheduleResponse>, AppError> {
    Ok(Json(
        wizard_service::schedule_planning(&state, id, user, payload).await?,
    ))
}

/// Go back to an earlier step. Forward jumps leave the wizard unchanged.
#[utoipa::path(
    post,
    path = "/wizards/{id}/navigate/{step}",
    tag = "wizard",
    params(
        ("id" = Uuid, Path, description = "Wizard identifier"),
        ("step" = u8, Path, description = "Target step (1-7)")
    ),
    responses((status = 200, description = "Wizard state after navigation", body = WizardSnapshot))
)]
pub async fn navigate(
    State(state): State<SharedState>,
    Path((id, step)): Path<(Uuid, u8)>,
) -> Result<Json<WizardSnapshot>, AppError> {
    Ok(Json(wizard_service::navigate(&state, id, step).await?))
}

/// Discard the draft and restart from the first step.
#[utoipa::path(
    post,
    path = "/wizards/{id}/reset",
    tag = "wizard",
    params(("id" = Uuid, Path, description = "Wizard identifier")),
    responses((status = 200, description = "Wizard reset", body = WizardSnapshot))
)]
pub async fn reset_wizard(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardSnapshot>, AppError> {
    Ok(Json(wizard_service::reset(&state, id).await?))
}

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::schedule::{DailyScheduleQuery, DailyScheduleResponse},
    error::AppError,
    services::schedule_service,
    state::{SharedState, user::CurrentUser},
};

/// Court availability routes.
pub fn router() -> Router<SharedState> {
    Router::new().route("/courts/{court_id}/daily-schedule", get(daily_schedule))
}

/// Slots of one day for a court, with their availability.
#[utoipa::path(
    get,
    path = "/courts/{court_id}/daily-schedule",
    tag = "schedule",
    params(
        ("court_id" = String, Path, description = "Court identifier"),
        DailyScheduleQuery
    ),
    responses(
        (status = 200, description = "Daily slots", body = DailyScheduleResponse),
        (status = 400, description = "Malformed date"),
        (status = 502, description = "Bookings service unavailable")
    )
)]
pub async fn daily_schedule(
    State(state): State<SharedState>,
    Path(court_id): Path<String>,
    Query(query): Query<DailyScheduleQuery>,
    user: CurrentUser,
) -> Result<Json<DailyScheduleResponse>, AppError> {
    let response = schedule_service::daily_schedule(&state, user, court_id, &query.date).await?;
    Ok(Json(response))
}

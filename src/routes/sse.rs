use std::convert::Infallible;

use axum::{
    Router,
    extract::{Query, State},
    response::sse::Sse,
    routing::get,
};
use futures::Stream;
use tracing::info;

use crate::{
    dto::sse::WizardStreamQuery, error::AppError, services::sse_service, state::SharedState,
};

#[utoipa::path(
    get,
    path = "/sse/wizards",
    tag = "sse",
    params(WizardStreamQuery),
    responses(
        (status = 200, description = "Wizard SSE stream", content_type = "text/event-stream", body = String),
        (status = 404, description = "Unknown wizard")
    )
)]
/// Stream wizard moves, champion announcements and degraded-mode changes. Without
/// `wizardId` the stream carries the events of every open wizard.
pub async fn wizard_stream(
    State(state): State<SharedState>,
    Query(query): Query<WizardStreamQuery>,
) -> Result<Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>>, AppError> {
    let (receiver, handshake) = sse_service::subscribe_wizards(&state, query.wizard_id)?;
    info!(wizard_id = ?query.wizard_id, "New wizard SSE connection");
    Ok(sse_service::to_sse_stream(receiver, handshake, query.wizard_id))
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/sse/wizards", get(wizard_stream))
}

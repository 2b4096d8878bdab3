use axum::Router;

use crate::state::SharedState;

mod current_user;
/// Swagger UI.
pub mod docs;
/// Health check.
pub mod health;
/// Court daily schedule.
pub mod schedule;
/// Server-Sent Events streams.
pub mod sse;
/// Tournament wizard.
pub mod wizard;

/// Compose the wizard, schedule, SSE, health and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(sse::router())
        .merge(wizard::router())
        .merge(schedule::router())
        .merge(docs::router());

    api_router.with_state(state)
}

use tracing::{info, warn};

use crate::{dto::health::HealthResponse, services::sse_events, state::SharedState};

/// Report liveness along with whether the upstream services answered last time.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let sessions = state.session_count();
    if state.is_degraded() {
        HealthResponse::degraded(sessions)
    } else {
        HealthResponse::ok(sessions)
    }
}

/// Track the outcome of an upstream call, announcing transitions in and out of degraded mode.
pub fn record_upstream(state: &SharedState, healthy: bool) {
    if !state.set_degraded(!healthy) {
        return;
    }

    if healthy {
        info!("upstream services reachable again");
    } else {
        warn!("upstream call failed (degraded mode)");
    }
    sse_events::broadcast_system_status(state, !healthy);
}

use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Courtside Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::wizard_stream,
        crate::routes::wizard::create_wizard,
        crate::routes::wizard::get_wizard,
        crate::routes::wizard::delete_wizard,
        crate::routes::wizard::available_teams,
        crate::routes::wizard::complete_step,
        crate::routes::wizard::schedule_planning,
        crate::routes::wizard::navigate,
        crate::routes::wizard::reset_wizard,
        crate::routes::schedule::daily_schedule,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::sse::Handshake,
            crate::dto::sse::SystemStatus,
            crate::dto::sse::StepChangedEvent,
            crate::dto::sse::ChampionCrownedEvent,
            crate::dto::sse::WizardDeletedEvent,
            crate::dto::wizard::WizardSnapshot,
            crate::dto::wizard::StepCompletionRequest,
            crate::dto::wizard::ScheduleResponse,
            crate::dto::schedule::DailyScheduleResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "wizard", description = "Tournament creation wizard"),
        (name = "schedule", description = "Court daily availability"),
    )
)]
pub struct ApiDoc;

use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Health check payloads.
pub mod health;
/// Daily schedule payloads.
pub mod schedule;
/// Server-Sent Events payloads.
pub mod sse;
/// Shared request validators.
pub mod validation;
/// Wizard requests and snapshots.
pub mod wizard;

fn format_timestamp(time: OffsetDateTime) -> String {
    time.format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}

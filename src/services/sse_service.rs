use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::{
    broadcast::{self, error::RecvError},
    mpsc,
};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dto::sse::{Handshake, ServerEvent},
    error::ServiceError,
    state::SharedState,
};

const STREAM_NAME: &str = "wizards";
const EVENT_HANDSHAKE: &str = "handshake";

/// Subscribe to the wizard event stream, returning the receiver and the handshake to send
/// first on this connection. With `wizard_id`, the wizard must exist.
pub fn subscribe_wizards(
    state: &SharedState,
    wizard_id: Option<Uuid>,
) -> Result<(broadcast::Receiver<ServerEvent>, Option<ServerEvent>), ServiceError> {
    if let Some(id) = wizard_id {
        state.session(id)?;
    }

    let receiver = state.sse().subscribe();
    let message = match wizard_id {
        Some(id) => format!("Subscribed to events of wizard {id}"),
        None => "Subscribed to wizard events".to_string(),
    };
    let handshake = Handshake {
        stream: STREAM_NAME.to_string(),
        message,
        degraded: state.is_degraded(),
    };
    let handshake = match ServerEvent::json(Some(EVENT_HANDSHAKE.to_string()), &handshake) {
        Ok(event) => Some(event),
        Err(err) => {
            warn!(error = %err, "failed to serialize SSE handshake");
            None
        }
    };
    Ok((receiver, handshake))
}

/// Convert a broadcast receiver into an SSE response. `first` is delivered to this
/// connection only, before any broadcast event; events of other wizards than `filter`
/// are dropped.
pub fn to_sse_stream(
    mut receiver: broadcast::Receiver<ServerEvent>,
    first: Option<ServerEvent>,
    filter: Option<Uuid>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    tokio::spawn(async move {
        if let Some(payload) = first {
            if tx.send(Ok(to_event(payload))).await.is_err() {
                return;
            }
        }

        loop {
            tokio::select! {
                _ = tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(payload) if !payload.is_visible_to(filter) => continue,
                        Ok(payload) => {
                            if tx.send(Ok(to_event(payload))).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            debug!(skipped, "SSE subscriber lagged");
                            continue;
                        }
                    }
                }
            }
        }

        info!("Wizard SSE stream disconnected");
    });

    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

fn to_event(payload: ServerEvent) -> Event {
    let event = Event::default().data(payload.data);
    match payload.event {
        Some(name) => event.event(name),
        None => event,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeGateway, state_with};

    #[tokio::test]
    async fn handshake_reports_degraded_mode() {
        let state = state_with(FakeGateway::with_teams(0));
        state.set_degraded(true);

        let (_receiver, handshake) = subscribe_wizards(&state, None).unwrap();
        let handshake = handshake.unwrap();
        assert_eq!(handshake.event.as_deref(), Some(EVENT_HANDSHAKE));
        assert!(handshake.data.contains(r#""degraded":true"#));
    }

    #[tokio::test]
    async fn scoped_subscription_requires_a_live_wizard() {
        let state = state_with(FakeGateway::with_teams(0));
        assert!(matches!(
            subscribe_wizards(&state, Some(Uuid::new_v4())),
            Err(ServiceError::NotFound(_))
        ));
    }
}

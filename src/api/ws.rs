use crate::app_state::models::AppState;
use crate::error::ServiceError;
use crate::services::streaming::registry::ConnectionId;
use crate::services::streaming::stream_loop::StreamState;
use axum::extract::Extension;
use axum::extract::ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Close frame sent to every client when the server shuts down.
pub fn shutdown_frame() -> Message {
    Message::Close(Some(CloseFrame {
        code: close_code::AWAY,
        reason: Utf8Bytes::from_static("server shutting down"),
    }))
}

/// `GET /ws`, `GET /ws/live`
pub async fn ws_live(
    ws: WebSocketUpgrade,
    Extension(app_state): Extension<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

fn transition(id: ConnectionId, from: StreamState, to: StreamState) -> StreamState {
    debug!("Connection {}: {:?} -> {:?}", id, from, to);
    to
}

/// A socket write failure ends the stream loop through cancellation, so the
/// writer's result decides whether the session was cancelled or lost.
fn session_outcome(
    streamed: Result<(), ServiceError>,
    written: Result<(), ServiceError>,
) -> Result<(), ServiceError> {
    streamed.and(written)
}

/// One session: a writer task drains the outbound queue into the socket, a
/// reader task watches for the client going away, and the stream loop feeds
/// the queue until either side ends the connection.
async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>) {
    let buffer = app_state.settings.app_config.stream.outbound_buffer;
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<Message>(buffer);

    let registration = app_state.registry.register(outbound_tx.clone()).await;
    let id = registration.id;
    let state = transition(id, StreamState::Connecting, StreamState::Open);
    info!(
        "WebSocket connected: {} (one record every {:?})",
        id,
        app_state.stream_loop.interval()
    );

    let (mut sender, mut receiver) = socket.split();

    // the reply to a client close jumps ahead of queued records
    let (close_tx, mut close_rx) = oneshot::channel::<Message>();

    let writer_cancel = registration.cancel.clone();
    let writer = tokio::spawn(async move {
        let mut close_pending = true;
        loop {
            let message = tokio::select! {
                biased;
                reply = &mut close_rx, if close_pending => match reply {
                    Ok(reply) => reply,
                    Err(_) => {
                        close_pending = false;
                        continue;
                    }
                },
                message = outbound_rx.recv() => match message {
                    Some(message) => message,
                    None => break,
                },
            };

            let closing = matches!(message, Message::Close(_));
            if let Err(e) = sender.send(message).await {
                debug!("Send to connection {} failed: {}", id, e);
                writer_cancel.cancel();
                return Err(ServiceError::ConnectionLost(id));
            }
            if closing {
                break;
            }
        }
        Ok(())
    });

    let reader_cancel = registration.cancel.clone();
    let reader = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Close(_)) => {
                    debug!("Close message received from {}", id);
                    if close_tx.send(Message::Close(None)).is_err() {
                        debug!("Writer for {} already gone, close not answered", id);
                    }
                    break;
                }
                // inbound traffic carries no application data
                Ok(_) => {}
                Err(e) => {
                    warn!("WebSocket receive error on {}: {}", id, e);
                    break;
                }
            }
        }
        reader_cancel.cancel();
    });

    let streamed = app_state
        .stream_loop
        .run(id, &outbound_tx, &registration.cancel)
        .await;

    app_state.registry.deregister(id).await;
    drop(outbound_tx);
    let written = match writer.await {
        Ok(written) => written,
        Err(e) => {
            warn!("Writer task for {} ended abnormally: {}", id, e);
            Ok(())
        }
    };
    reader.abort();

    match session_outcome(streamed, written) {
        Ok(()) => debug!("Stream for {} cancelled", id),
        Err(ServiceError::ConnectionLost(_)) => debug!("Stream for {} lost its connection", id),
        Err(e) => warn!("Stream for {} failed: {}", id, e),
    }

    transition(id, state, StreamState::Closed);
    info!(
        "WebSocket disconnected: {} ({} still connected)",
        id,
        app_state.registry.len().await
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::models::test_support::test_state;
    use crate::models::setting_record::SettingRecord;
    use crate::services::streaming::registry::ConnectionRegistry;
    use std::net::SocketAddr;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio::time::{sleep, timeout};
    use tokio_tungstenite::tungstenite::Message as ClientMessage;
    use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

    const INTERVAL: Duration = Duration::from_millis(50);
    const WAIT: Duration = Duration::from_secs(5);

    async fn serve(app_state: Arc<AppState>) -> SocketAddr {
        let app = crate::create_application_router(app_state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        addr
    }

    async fn wait_until_empty(app_state: &AppState) {
        timeout(WAIT, async {
            while !app_state.registry.is_empty().await {
                sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("connection was never deregistered");
    }

    #[tokio::test]
    async fn test_stream_pushes_records_until_client_leaves() {
        let app_state = test_state(Vec::new(), INTERVAL);
        let addr = serve(app_state.clone()).await;

        let (mut client, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws/live", addr))
            .await
            .unwrap();

        let mut records = Vec::new();
        while records.len() < 2 {
            let message = timeout(WAIT, client.next()).await.unwrap().unwrap().unwrap();
            if let ClientMessage::Text(text) = message {
                records.push(serde_json::from_str::<SettingRecord>(text.as_str()).unwrap());
            }
        }
        assert_ne!(records[0], records[1]);
        assert_eq!(app_state.registry.len().await, 1);

        client.close(None).await.unwrap();
        wait_until_empty(&app_state).await;
    }

    #[tokio::test]
    async fn test_client_close_is_answered() {
        let app_state = test_state(Vec::new(), INTERVAL);
        let addr = serve(app_state.clone()).await;

        let (mut client, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws/live", addr))
            .await
            .unwrap();
        timeout(WAIT, client.next()).await.unwrap().unwrap().unwrap();

        client.send(ClientMessage::Close(None)).await.unwrap();

        let reply = timeout(WAIT, async {
            loop {
                match client.next().await {
                    Some(Ok(ClientMessage::Close(_))) => return Ok(()),
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return Err(e.to_string()),
                    None => return Err("stream ended without a close frame".to_string()),
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(reply, Ok(()));

        wait_until_empty(&app_state).await;
    }

    #[tokio::test]
    async fn test_session_outcome_prefers_writer_failure() {
        let registry = ConnectionRegistry::<String>::new();
        let id = registry.register(mpsc::channel(1).0).await.id;

        assert!(session_outcome(Ok(()), Ok(())).is_ok());
        assert!(matches!(
            session_outcome(Ok(()), Err(ServiceError::ConnectionLost(id))),
            Err(ServiceError::ConnectionLost(lost)) if lost == id
        ));
        assert!(matches!(
            session_outcome(Err(ServiceError::ConnectionLost(id)), Ok(())),
            Err(ServiceError::ConnectionLost(_))
        ));
    }

    #[tokio::test]
    async fn test_ws_alias_streams_too() {
        let app_state = test_state(Vec::new(), INTERVAL);
        let addr = serve(app_state.clone()).await;

        let (mut client, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", addr))
            .await
            .unwrap();
        let message = timeout(WAIT, client.next()).await.unwrap().unwrap().unwrap();
        assert!(serde_json::from_str::<SettingRecord>(message.to_text().unwrap()).is_ok());

        drop(client);
        wait_until_empty(&app_state).await;
    }

    #[tokio::test]
    async fn test_shutdown_closes_every_client() {
        let app_state = test_state(Vec::new(), INTERVAL);
        let addr = serve(app_state.clone()).await;

        let mut clients = Vec::new();
        for _ in 0..3 {
            let (client, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws/live", addr))
                .await
                .unwrap();
            clients.push(client);
        }
        timeout(WAIT, async {
            while app_state.registry.len().await < 3 {
                sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();

        app_state.registry.close_all(shutdown_frame()).await;

        for client in clients.iter_mut() {
            let close = timeout(WAIT, async {
                while let Some(Ok(message)) = client.next().await {
                    if let ClientMessage::Close(frame) = message {
                        return frame;
                    }
                }
                None
            })
            .await
            .unwrap();
            assert_eq!(close.map(|frame| frame.code), Some(CloseCode::Away));
        }
        wait_until_empty(&app_state).await;
    }
}

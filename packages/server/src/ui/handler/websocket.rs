//! WebSocket connection handlers.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        Query, State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::sync::{mpsc, watch};

use crate::{
    domain::{CloseReason, Session, Username},
    infrastructure::dto::websocket::ConnectQuery,
    ui::state::AppState,
    usecase::{
        ActiveConnection, ConnectSessionUseCase, DisconnectSessionUseCase, SendMessageError,
        SendMessageUseCase,
    },
};

/// Always upgrades; authentication happens on the open socket so that a
/// rejected client receives a close frame with a readable reason.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, query.token))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>, token: Option<String>) {
    let mut session = Session::new();

    // Use ConnectSessionUseCase to authenticate and register
    let connect_usecase = ConnectSessionUseCase::new(
        state.registry.clone(),
        state.token_service.clone(),
        state.outbound_buffer,
    );

    let active = match connect_usecase.execute(&mut session, token.as_deref()).await {
        Ok(active) => active,
        Err(e) => {
            let reason = session
                .close_reason()
                .unwrap_or(CloseReason::AuthenticationRequired);
            tracing::warn!(reason = reason.as_str(), "Rejected WebSocket session: {}", e);
            let frame = close_frame(reason);
            if let Err(e) = socket.send(Message::Close(Some(frame))).await {
                tracing::debug!("Failed to send close frame: {}", e);
            }
            return;
        }
    };

    let ActiveConnection {
        connection_id,
        identity,
        outbound,
    } = active;
    tracing::info!(%connection_id, identity = %identity, "Session active");

    let (sender, receiver) = socket.split();

    let mut send_task = tokio::spawn(write_loop(
        sender,
        outbound,
        state.shutdown.clone(),
        state.write_timeout,
    ));

    let send_usecase = SendMessageUseCase::new(
        state.message_repository.clone(),
        state.registry.clone(),
    );
    let mut recv_task = tokio::spawn(read_loop(receiver, send_usecase, identity.clone()));

    // If any one of the tasks completes, abort the other
    let reason = tokio::select! {
        result = &mut send_task => {
            recv_task.abort();
            result.unwrap_or(CloseReason::TransportError)
        }
        result = &mut recv_task => {
            send_task.abort();
            result.unwrap_or(CloseReason::TransportError)
        }
    };

    // Use DisconnectSessionUseCase to deregister
    let disconnect_usecase = DisconnectSessionUseCase::new(state.registry.clone());
    let removed = disconnect_usecase.execute(&mut session, reason).await;
    tracing::info!(
        %connection_id,
        identity = %identity,
        reason = reason.as_str(),
        removed,
        "Session closed"
    );
}

/// Consume inbound frames until the client goes away
async fn read_loop(
    mut receiver: SplitStream<WebSocket>,
    usecase: SendMessageUseCase,
    identity: Username,
) -> CloseReason {
    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(identity = %identity, "WebSocket error: {}", e);
                return CloseReason::TransportError;
            }
        };

        match msg {
            Message::Text(text) => match usecase.execute(&identity, text.as_str()).await {
                Ok(outcome) => {
                    tracing::debug!(
                        identity = %identity,
                        delivered = outcome.report.delivered,
                        persisted = outcome.persisted,
                        "Relayed message"
                    );
                }
                Err(SendMessageError::MalformedFrame(e)) => {
                    tracing::warn!(identity = %identity, "Dropped malformed frame: {}", e);
                }
                Err(SendMessageError::InvalidText(e)) => {
                    tracing::warn!(identity = %identity, "Dropped frame: {}", e);
                }
            },
            Message::Binary(_) => {
                tracing::warn!(identity = %identity, "Dropped binary frame");
            }
            Message::Close(_) => {
                tracing::debug!(identity = %identity, "Client requested close");
                return CloseReason::ClientClosed;
            }
            // Ping/pong is handled automatically by the WebSocket protocol
            Message::Ping(_) | Message::Pong(_) => {}
        }
    }
    CloseReason::ClientClosed
}

/// Forward queued frames to the socket until the queue closes, a write
/// fails or the server shuts down
async fn write_loop(
    mut sender: SplitSink<WebSocket, Message>,
    mut outbound: mpsc::Receiver<String>,
    mut shutdown: watch::Receiver<bool>,
    write_timeout: Duration,
) -> CloseReason {
    if *shutdown.borrow_and_update() {
        send_going_away(&mut sender, write_timeout).await;
        return CloseReason::ServerShutdown;
    }

    loop {
        tokio::select! {
            frame = outbound.recv() => {
                // The registry dropped this connection (stalled or closed)
                let Some(frame) = frame else {
                    return CloseReason::TransportError;
                };
                match tokio::time::timeout(write_timeout, sender.send(Message::Text(frame.into()))).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        tracing::debug!("Failed to write frame: {}", e);
                        return CloseReason::TransportError;
                    }
                    Err(_) => {
                        tracing::warn!("Timed out writing frame");
                        return CloseReason::TransportError;
                    }
                }
            }
            // A dropped sender also means the server is going away
            _ = shutdown.changed() => {
                send_going_away(&mut sender, write_timeout).await;
                return CloseReason::ServerShutdown;
            }
        }
    }
}

async fn send_going_away(sender: &mut SplitSink<WebSocket, Message>, write_timeout: Duration) {
    let frame = close_frame(CloseReason::ServerShutdown);
    if let Err(e) = tokio::time::timeout(write_timeout, sender.send(Message::Close(Some(frame)))).await
    {
        tracing::debug!("Timed out sending going-away frame: {}", e);
    }
}

/// 1008 for authentication failures, 1001 on shutdown, 1000 otherwise
fn close_frame(reason: CloseReason) -> CloseFrame {
    let code = if reason.is_policy_violation() {
        close_code::POLICY
    } else if reason == CloseReason::ServerShutdown {
        close_code::AWAY
    } else {
        close_code::NORMAL
    };
    CloseFrame {
        code,
        reason: reason.as_str().into(),
    }
}

use async_trait::async_trait;
use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::dispatcher::{ClientEvent, DispatcherHandle};
use crate::shared::{AppError, AppState};
use crate::websockets::messages::{
    AnswerPayload, CreateRoomPayload, JoinRoomPayload, MessageType, StartGamePayload,
    WebSocketMessage,
};

use super::socket::{Connection, MessageHandler};

/// Message handler for receiving WebSocket messages from the client.
///
/// Parses each frame and forwards it to the dispatcher as a typed event.
/// Unparseable or out-of-contract frames are logged and dropped.
pub struct WebsocketReceiveHandler {
    dispatcher: DispatcherHandle,
}

impl WebsocketReceiveHandler {
    pub fn new(dispatcher: DispatcherHandle) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl MessageHandler for WebsocketReceiveHandler {
    async fn handle_message(&self, connection_id: &str, message: String) {
        debug!(
            connection_id = %connection_id,
            message = %message,
            "Received message"
        );

        let ws_message = match serde_json::from_str::<WebSocketMessage>(&message) {
            Ok(ws_message) => ws_message,
            Err(e) => {
                warn!(
                    connection_id = %connection_id,
                    error = %e,
                    "Failed to parse WebSocket message"
                );
                return;
            }
        };

        let event = match ws_message.message_type {
            MessageType::CreateRoom => {
                serde_json::from_value::<CreateRoomPayload>(ws_message.payload)
                    .ok()
                    .map(|p| ClientEvent::CreateRoom {
                        connection_id: connection_id.to_string(),
                        code: p.code,
                    })
            }
            MessageType::JoinRoom => serde_json::from_value::<JoinRoomPayload>(ws_message.payload)
                .ok()
                .map(|p| ClientEvent::JoinRoom {
                    connection_id: connection_id.to_string(),
                    code: p.code,
                }),
            MessageType::StartGame => {
                serde_json::from_value::<StartGamePayload>(ws_message.payload)
                    .ok()
                    .map(|p| ClientEvent::StartGame {
                        connection_id: connection_id.to_string(),
                        code: p.code,
                    })
            }
            MessageType::Answer => serde_json::from_value::<AnswerPayload>(ws_message.payload)
                .ok()
                .map(|p| ClientEvent::Answer {
                    connection_id: connection_id.to_string(),
                    code: p.code,
                    answer: p.answer,
                }),
            other => {
                debug!(message_type = ?other, "Unhandled message type");
                None
            }
        };

        match event {
            Some(event) => self.dispatcher.dispatch(event),
            None => warn!(
                connection_id = %connection_id,
                "Frame did not match the expected payload shape"
            ),
        }
    }
}

/// WebSocket endpoint
/// GET /ws - the server assigns each connection an opaque id on upgrade
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
) -> Result<Response, AppError> {
    // Refuse new sockets when the dispatcher task is gone; nothing would
    // ever answer them
    if app_state.dispatcher.is_closed() {
        warn!("Dispatcher unavailable, rejecting WebSocket connection");
        return Err(AppError::Internal);
    }

    Ok(ws.on_upgrade(move |socket| handle_websocket_connection(socket, app_state)))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(socket: axum::extract::ws::WebSocket, app_state: AppState) {
    let connection_id = uuid::Uuid::new_v4().to_string();

    info!(
        connection_id = %connection_id,
        "WebSocket connection established"
    );

    // Create the outbound channel (app -> client)
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();

    app_state
        .connection_manager
        .add_connection(connection_id.clone(), outbound_sender)
        .await;

    // Wrap the axum WebSocket in our simple interface
    let socket_wrapper = Box::new(socket);

    let message_handler = Arc::new(WebsocketReceiveHandler::new(app_state.dispatcher.clone()));

    let connection = Connection::new(
        connection_id.clone(),
        socket_wrapper,
        outbound_receiver,
        message_handler,
    );

    // Run the connection until disconnect
    match connection.run().await {
        Ok(()) => {
            info!(
                connection_id = %connection_id,
                "WebSocket connection closed cleanly"
            );
        }
        Err(e) => {
            warn!(
                connection_id = %connection_id,
                error = ?e,
                "WebSocket connection error"
            );
        }
    }

    // Cleanup: remove from connection manager and emit disconnect event
    app_state
        .connection_manager
        .remove_connection(&connection_id)
        .await;

    app_state.dispatcher.dispatch(ClientEvent::Disconnected {
        connection_id: connection_id.clone(),
    });

    info!(
        connection_id = %connection_id,
        "WebSocket disconnect event dispatched"
    );
}

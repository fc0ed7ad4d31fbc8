/// WebSocket live updates
///
/// Project members open a socket per project and receive task events
/// (`task_created`, `task_updated`, `task_deleted`) as JSON text
/// frames. Browsers cannot set headers on WebSocket requests, so the
/// access token travels as a query parameter instead of the usual
/// bearer header.
///
/// # Endpoint
///
/// ```text
/// GET /api/ws/:project_id?token=<access token>
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::projects::require_member,
};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use projecthub_shared::{auth::jwt, models::project::Project};
use serde::Deserialize;
use uuid::Uuid;

/// WebSocket auth query parameters
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Access token
    pub token: String,
}

/// Upgrades a project member's connection to a live update stream
///
/// Authentication and membership are checked before the upgrade, so a
/// rejected client gets a proper HTTP error instead of a dropped
/// socket.
pub async fn project_updates(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> ApiResult<Response> {
    let claims = jwt::validate_access_token(&query.token, state.jwt_secret())?;
    let user_id = claims.sub;

    let project = Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    require_member(&state, project.id, user_id).await?;

    Ok(ws.on_upgrade(move |socket| handle_socket(state, project_id, user_id, socket)))
}

/// Pumps broadcast events to the socket until either side goes away
async fn handle_socket(state: AppState, project_id: Uuid, user_id: Uuid, socket: WebSocket) {
    let (subscriber_id, mut events) = state.channels.subscribe(project_id);
    let (mut sink, mut stream) = socket.split();

    tracing::debug!(
        project_id = %project_id,
        user_id = %user_id,
        "WebSocket subscriber connected"
    );

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Some(message) => {
                        if sink.send(Message::Text(message)).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
            incoming = stream.next() => {
                match incoming {
                    // Clients only listen; anything but a ping is ignored
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(Message::Ping(payload))) => {
                        if sink.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    state.channels.unsubscribe(project_id, subscriber_id);

    tracing::debug!(
        project_id = %project_id,
        user_id = %user_id,
        "WebSocket subscriber disconnected"
    );
}

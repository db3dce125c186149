//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to the state owner. We reply with a single JSON message per
//! request; mutations answer with the refreshed dashboard snapshot.

use std::sync::Arc;

use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use chrono::Local;
use tracing::{debug, error, info, instrument};

use crate::protocol::{snapshot_out, summary_out, ClientWsMessage, ServerWsMessage};
use crate::state::{AppState, OnboardOutcome};

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "momentum_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "momentum_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "momentum_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "momentum_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "momentum_backend", "WebSocket disconnected");
}

#[instrument(level = "info", skip(state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  let today = Local::now().date_naive();
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::GetState => {
      let snapshot = state.snapshot().await;
      ServerWsMessage::State { state: snapshot_out(&snapshot, today) }
    }

    ClientWsMessage::SetProfile { profile } => match state.onboard(profile).await {
      OnboardOutcome::Created(snapshot) => {
        tracing::info!(target: "tracker", "WS onboarding accepted");
        ServerWsMessage::State { state: snapshot_out(&snapshot, today) }
      }
      OnboardOutcome::AlreadyOnboarded =>
        ServerWsMessage::Error { message: "Profile already exists; reset first.".into() },
    },

    ClientWsMessage::ToggleTask { task_id } => {
      let snapshot = state.toggle_task(&task_id).await;
      tracing::info!(target: "tracker", %task_id, momentum = snapshot.momentum, "WS toggle applied");
      ServerWsMessage::State { state: snapshot_out(&snapshot, today) }
    }

    ClientWsMessage::GenerateTasks => {
      let snapshot = state.regenerate_tasks().await;
      tracing::info!(target: "tracker", "WS daily set regenerated");
      ServerWsMessage::State { state: snapshot_out(&snapshot, today) }
    }

    ClientWsMessage::Reset => {
      let snapshot = state.reset().await;
      ServerWsMessage::State { state: snapshot_out(&snapshot, today) }
    }

    ClientWsMessage::Summary => {
      ServerWsMessage::Summary { summary: summary_out(state.weekly_summary().await) }
    }
  }
}

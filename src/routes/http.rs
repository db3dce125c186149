//! HTTP endpoint handlers. These are thin wrappers that forward to the state
//! owner and reshape the result; no tracker rules live here.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Local;
use tracing::{info, instrument};

use crate::domain::Profile;
use crate::protocol::*;
use crate::state::{AppState, OnboardOutcome};

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_state(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let snapshot = state.snapshot().await;
  Json(snapshot_out(&snapshot, Local::now().date_naive()))
}

#[instrument(level = "info", skip(state, body), fields(weak_skill = body.weak_skill.as_str()))]
pub async fn http_post_profile(
  State(state): State<Arc<AppState>>,
  Json(body): Json<Profile>,
) -> impl IntoResponse {
  match state.onboard(body).await {
    OnboardOutcome::Created(snapshot) => {
      info!(target: "tracker", "HTTP onboarding accepted");
      Json(snapshot_out(&snapshot, Local::now().date_naive())).into_response()
    }
    OnboardOutcome::AlreadyOnboarded => (
      StatusCode::CONFLICT,
      Json(ErrorOut { message: "Profile already exists; reset first.".into() }),
    )
      .into_response(),
  }
}

#[instrument(level = "info", skip(state, body), fields(%body.task_id))]
pub async fn http_post_toggle(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ToggleIn>,
) -> impl IntoResponse {
  let snapshot = state.toggle_task(&body.task_id).await;
  Json(snapshot_out(&snapshot, Local::now().date_naive()))
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_generate(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let snapshot = state.regenerate_tasks().await;
  info!(target: "tracker", "HTTP daily set regenerated");
  Json(snapshot_out(&snapshot, Local::now().date_naive()))
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_reset(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let snapshot = state.reset().await;
  Json(snapshot_out(&snapshot, Local::now().date_naive()))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_chart(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let snapshot = state.snapshot().await;
  let out = snapshot_out(&snapshot, Local::now().date_naive());
  Json(out.chart)
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_summary(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(summary_out(state.weekly_summary().await))
}

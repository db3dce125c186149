//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Strictly a consumer of `ProgressState`: assembling the dashboard snapshot
//! here is plain field plumbing, no business rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Profile, ProgressState, Skill, Task};
use crate::engine::{self, WeeklySummary};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    GetState,
    SetProfile {
        profile: Profile,
    },
    ToggleTask {
        #[serde(rename = "taskId")]
        task_id: String,
    },
    GenerateTasks,
    Reset,
    Summary,
}

/// Messages the server sends back over WebSocket. Every mutation answers
/// with the full refreshed snapshot so the frontend just re-renders.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    State {
        state: StateOut,
    },
    Summary {
        summary: SummaryOut,
    },
    Error {
        message: String,
    },
}

/// The full dashboard snapshot: everything the view needs, pre-digested.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateOut {
    /// False routes the frontend to the onboarding form instead.
    pub onboarded: bool,
    pub profile: Option<Profile>,
    pub tasks: Vec<Task>,
    pub momentum: u32,
    /// Bar fill for the momentum widget; same scale as `momentum`.
    pub momentum_bar_percent: u32,
    pub streak: u32,
    pub completed_tasks_count: u32,
    pub all_completed: bool,
    pub days_to_exam: Option<i64>,
    /// Ready-made display string, e.g. "5 days to exam".
    pub days_to_exam_label: Option<String>,
    pub chart: ChartOut,
    pub badges: Vec<String>,
}

/// Input to the external chart widget: `render(labels, series)`.
#[derive(Debug, Serialize)]
pub struct ChartOut {
    pub labels: Vec<String>,
    pub series: Vec<u32>,
}

/// Convert the internal aggregate into the public dashboard DTO.
pub fn snapshot_out(state: &ProgressState, today: NaiveDate) -> StateOut {
    let days_to_exam = state
        .profile
        .as_ref()
        .map(|p| engine::days_to_exam(p.exam_date, today));

    StateOut {
        onboarded: state.profile.is_some(),
        profile: state.profile.clone(),
        tasks: state.tasks.clone(),
        momentum: state.momentum,
        momentum_bar_percent: state.momentum,
        streak: state.streak,
        completed_tasks_count: state.completed_tasks_count,
        all_completed: state.all_completed(),
        days_to_exam,
        days_to_exam_label: days_to_exam.map(|d| format!("{} days to exam", d)),
        chart: ChartOut {
            labels: Skill::ALL.iter().map(|s| s.as_str().to_string()).collect(),
            series: state.skill_stats.series(),
        },
        badges: state.badges.clone(),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct ToggleIn {
    #[serde(rename = "taskId")]
    pub task_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryOut {
    pub weekly_tasks: u32,
    pub active_days: u32,
}

pub fn summary_out(summary: WeeklySummary) -> SummaryOut {
    SummaryOut {
        weekly_tasks: summary.weekly_tasks,
        active_days: summary.active_days,
    }
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub message: String,
}

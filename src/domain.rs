//! Domain models: the skill enumeration, catalog templates, active tasks,
//! the learner profile, and the `ProgressState` aggregate that is persisted
//! as a single blob.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The four trained skills. Fixed at design time; keys both the task catalog
/// and the per-skill completion tallies.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Skill {
  Reading,
  Writing,
  Listening,
  Speaking,
}

impl Skill {
  pub const ALL: [Skill; 4] = [Skill::Reading, Skill::Writing, Skill::Listening, Skill::Speaking];

  pub fn as_str(&self) -> &'static str {
    match self {
      Skill::Reading => "Reading",
      Skill::Writing => "Writing",
      Skill::Listening => "Listening",
      Skill::Speaking => "Speaking",
    }
  }
}

/// Immutable catalog entry: what to practice and for how long (minutes).
#[derive(Clone, Copy, Debug)]
pub struct TaskTemplate {
  pub description: &'static str,
  pub duration: u32,
}

/// One instance in the active set: a catalog template stamped with its source
/// skill, a completion flag, and a unique id. Replaced wholesale on the next
/// generation; only the aggregate tallies outlive it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Task {
  pub id: String,
  pub skill: Skill,
  pub description: String,
  pub duration: u32,
  #[serde(default)]
  pub completed: bool,
}

/// User-declared configuration captured at onboarding. Immutable afterwards
/// except by full reset.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
  pub target_score: String,
  pub exam_date: NaiveDate,
  /// Available study time per day, in minutes.
  pub study_time: u32,
  pub weak_skill: Skill,
}

/// Lifetime per-skill completion tallies. A struct rather than a map so the
/// serialized object always carries all four skills.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct SkillStats {
  #[serde(default)]
  pub reading: u32,
  #[serde(default)]
  pub writing: u32,
  #[serde(default)]
  pub listening: u32,
  #[serde(default)]
  pub speaking: u32,
}

impl SkillStats {
  pub fn get(&self, skill: Skill) -> u32 {
    match skill {
      Skill::Reading => self.reading,
      Skill::Writing => self.writing,
      Skill::Listening => self.listening,
      Skill::Speaking => self.speaking,
    }
  }

  pub fn bump(&mut self, skill: Skill) {
    *self.slot(skill) += 1;
  }

  /// Saturating decrement: tallies never go negative even if a caller manages
  /// to un-toggle something that was never counted.
  pub fn drop_one(&mut self, skill: Skill) {
    let slot = self.slot(skill);
    *slot = slot.saturating_sub(1);
  }

  fn slot(&mut self, skill: Skill) -> &mut u32 {
    match skill {
      Skill::Reading => &mut self.reading,
      Skill::Writing => &mut self.writing,
      Skill::Listening => &mut self.listening,
      Skill::Speaking => &mut self.speaking,
    }
  }

  /// Tallies in `Skill::ALL` order, for the chart series.
  pub fn series(&self) -> Vec<u32> {
    Skill::ALL.iter().map(|s| self.get(*s)).collect()
  }
}

/// One line of the daily history log, appended the first time the active set
/// is fully completed on a given day.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
  pub date: NaiveDate,
  pub completed_count: u32,
  pub momentum: u32,
  pub streak: u32,
}

/// The aggregate root. Owned by the running session, persisted write-through
/// after every mutation.
///
/// Invariants (enforced by the engine, checked by tests):
/// - `momentum` stays within [0, 100]; every mutation clamps.
/// - `tasks` holds 0 (before first generation) or exactly 3 entries with
///   pairwise-distinct ids.
/// - `completed_tasks_count` and the skill tallies never go negative.
/// - `streak` only ever increments, at most once per calendar day.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressState {
  pub profile: Option<Profile>,
  pub tasks: Vec<Task>,
  pub momentum: u32,
  pub streak: u32,
  pub completed_tasks_count: u32,
  pub skill_stats: SkillStats,
  pub last_completed_date: Option<NaiveDate>,
  pub is_demo_data_added: bool,
  #[serde(default)]
  pub history: Vec<HistoryEntry>,
  #[serde(default)]
  pub badges: Vec<String>,
}

impl Default for ProgressState {
  fn default() -> Self {
    Self {
      profile: None,
      tasks: Vec::new(),
      momentum: 0,
      streak: 0,
      completed_tasks_count: 0,
      skill_stats: SkillStats::default(),
      last_completed_date: None,
      is_demo_data_added: false,
      history: Vec::new(),
      badges: Vec::new(),
    }
  }
}

impl ProgressState {
  pub fn all_completed(&self) -> bool {
    !self.tasks.is_empty() && self.tasks.iter().all(|t| t.completed)
  }

  pub fn completed_in_set(&self) -> usize {
    self.tasks.iter().filter(|t| t.completed).count()
  }

  pub fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
    self.tasks.iter_mut().find(|t| t.id == id)
  }
}

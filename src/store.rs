//! Persistence adapter: the whole `ProgressState` serialized as one
//! versioned JSON blob under a fixed path, write-through after every
//! mutation.
//!
//! Load policy: a missing file yields the default empty state; a malformed
//! or version-mismatched blob is discarded with an error log rather than
//! crashing the session. A blob that carries a profile but no demo-data flag
//! (written before backfill existed, or partially saved) gets the backfill
//! applied and is re-saved.

use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::domain::ProgressState;
use crate::engine;

/// Bumped on any change to the persisted shape that serde defaults can't
/// absorb. Mismatched blobs are discarded on load.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Envelope {
  version: u32,
  state: ProgressState,
}

pub struct Store {
  path: PathBuf,
}

impl Store {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Serialize and overwrite the blob. Callers log-and-continue on failure;
  /// the in-memory state stays authoritative for the session.
  #[instrument(level = "debug", skip(self, state), fields(path = %self.path.display()))]
  pub fn save(&self, state: &ProgressState) -> io::Result<()> {
    let envelope = Envelope { version: SCHEMA_VERSION, state: state.clone() };
    let blob = serde_json::to_vec_pretty(&envelope).map_err(io::Error::from)?;
    std::fs::write(&self.path, blob)
  }

  /// Load the blob, falling back to the default state when it is missing or
  /// unusable, and running the one-time backfill for pre-backfill blobs.
  #[instrument(level = "info", skip(self, rng), fields(path = %self.path.display()))]
  pub fn load(&self, rng: &mut impl Rng, today: NaiveDate) -> ProgressState {
    let raw = match std::fs::read_to_string(&self.path) {
      Ok(s) => s,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        info!(target: "tracker", "no saved state, starting fresh");
        return ProgressState::default();
      }
      Err(e) => {
        error!(target: "tracker", error = %e, "failed to read saved state, starting fresh");
        return ProgressState::default();
      }
    };

    let mut state = match serde_json::from_str::<Envelope>(&raw) {
      Ok(envelope) if envelope.version == SCHEMA_VERSION => envelope.state,
      Ok(envelope) => {
        warn!(
          target: "tracker",
          found = envelope.version,
          expected = SCHEMA_VERSION,
          "saved state has an unknown schema version, starting fresh"
        );
        return ProgressState::default();
      }
      Err(e) => {
        error!(target: "tracker", error = %e, "saved state is malformed, starting fresh");
        return ProgressState::default();
      }
    };

    if state.profile.is_some() && !state.is_demo_data_added {
      engine::backfill(&mut state, rng, today);
      if let Err(e) = self.save(&state) {
        error!(target: "tracker", error = %e, "failed to re-save backfilled state");
      }
    }
    state
  }

  /// Drop the blob entirely (full reset). Missing files are fine.
  #[instrument(level = "info", skip(self), fields(path = %self.path.display()))]
  pub fn clear(&self) -> io::Result<()> {
    match std::fs::remove_file(&self.path) {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Profile, Skill};
  use rand::rngs::StdRng;
  use rand::SeedableRng;
  use tempfile::tempdir;

  fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
  }

  fn profile() -> Profile {
    Profile {
      target_score: "8.0".into(),
      exam_date: NaiveDate::from_ymd_opt(2026, 11, 15).unwrap(),
      study_time: 90,
      weak_skill: Skill::Listening,
    }
  }

  #[test]
  fn save_then_load_round_trips_every_field() {
    let dir = tempdir().unwrap();
    let store = Store::new(dir.path().join("state.json"));
    let mut rng = StdRng::seed_from_u64(1);

    let mut state = ProgressState::default();
    state.profile = Some(profile());
    engine::backfill(&mut state, &mut rng, today());
    state.momentum = 73;
    store.save(&state).unwrap();

    let loaded = store.load(&mut rng, today());
    assert_eq!(loaded, state);
  }

  #[test]
  fn missing_file_loads_the_default_state() {
    let dir = tempdir().unwrap();
    let store = Store::new(dir.path().join("absent.json"));
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(store.load(&mut rng, today()), ProgressState::default());
  }

  #[test]
  fn malformed_blob_falls_back_to_the_default_state() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{not json").unwrap();
    let store = Store::new(path);
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(store.load(&mut rng, today()), ProgressState::default());
  }

  #[test]
  fn unknown_schema_version_falls_back_to_the_default_state() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    let blob = serde_json::json!({
      "version": SCHEMA_VERSION + 1,
      "state": ProgressState::default(),
    });
    std::fs::write(&path, serde_json::to_vec(&blob).unwrap()).unwrap();
    let store = Store::new(path);
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(store.load(&mut rng, today()), ProgressState::default());
  }

  #[test]
  fn load_backfills_profiles_saved_without_demo_data_and_resaves() {
    let dir = tempdir().unwrap();
    let store = Store::new(dir.path().join("state.json"));
    let mut rng = StdRng::seed_from_u64(2);

    let mut state = ProgressState::default();
    state.profile = Some(profile());
    store.save(&state).unwrap();

    let loaded = store.load(&mut rng, today());
    assert!(loaded.is_demo_data_added);
    assert_eq!(loaded.completed_tasks_count, 30);
    assert_eq!(loaded.streak, 10);

    // The backfilled state was written back: a second load applies nothing.
    let reloaded = store.load(&mut rng, today());
    assert_eq!(reloaded, loaded);
  }

  #[test]
  fn clear_removes_the_blob_and_tolerates_absence() {
    let dir = tempdir().unwrap();
    let store = Store::new(dir.path().join("state.json"));
    store.save(&ProgressState::default()).unwrap();
    store.clear().unwrap();
    assert!(!store.path().exists());
    store.clear().unwrap();
  }
}

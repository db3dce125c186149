//! Runtime configuration from an optional TOML file.
//!
//! `TRACKER_CONFIG_PATH` points at the file; every field has a default so
//! running with no config at all is fine. The `PORT` env var still overrides
//! the listen port (see `main`).

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize)]
pub struct TrackerConfig {
  /// Where the serialized progress blob lives.
  #[serde(default = "default_storage_path")]
  pub storage_path: PathBuf,
  #[serde(default = "default_port")]
  pub port: u16,
}

fn default_storage_path() -> PathBuf {
  PathBuf::from("./study_momentum_state.json")
}

fn default_port() -> u16 {
  3000
}

impl Default for TrackerConfig {
  fn default() -> Self {
    Self { storage_path: default_storage_path(), port: default_port() }
  }
}

/// Load `TrackerConfig` from TRACKER_CONFIG_PATH. On any parsing/IO error the
/// defaults are used; a broken config should not keep the tracker down.
pub fn load_config_from_env() -> TrackerConfig {
  let Some(path) = std::env::var("TRACKER_CONFIG_PATH").ok() else {
    return TrackerConfig::default();
  };
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<TrackerConfig>(&s) {
      Ok(cfg) => {
        info!(target: "momentum_backend", %path, "Loaded tracker config (TOML)");
        cfg
      }
      Err(e) => {
        error!(target: "momentum_backend", %path, error = %e, "Failed to parse TOML config, using defaults");
        TrackerConfig::default()
      }
    },
    Err(e) => {
      error!(target: "momentum_backend", %path, error = %e, "Failed to read TOML config file, using defaults");
      TrackerConfig::default()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partial_toml_fills_in_defaults() {
    let cfg: TrackerConfig = toml::from_str("storage_path = \"/tmp/momentum.json\"").unwrap();
    assert_eq!(cfg.storage_path, PathBuf::from("/tmp/momentum.json"));
    assert_eq!(cfg.port, 3000);
  }

  #[test]
  fn empty_toml_is_all_defaults() {
    let cfg: TrackerConfig = toml::from_str("").unwrap();
    assert_eq!(cfg.storage_path, default_storage_path());
    assert_eq!(cfg.port, default_port());
  }
}

//! Daily task generation: a fresh set of three distinct tasks, biased toward
//! the learner's declared weak skill.
//!
//! The random source is injected so tests can drive selection with a seeded
//! RNG and assert exact output sets.

use rand::Rng;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::catalog::{self, DAILY_SET_SIZE};
use crate::domain::{Profile, Skill, Task, TaskTemplate};

/// Upper bound on rejection-sampling draws. With 16 templates and a 3-task
/// set this is unreachable; hitting it means the catalog was broken.
const MAX_DRAWS: usize = 256;

/// Generate the active set for one day: the first task comes from the weak
/// skill's bucket, the remaining two from uniformly random buckets, rejecting
/// any template whose description is already in the set.
#[instrument(level = "debug", skip(rng), fields(weak_skill = profile.weak_skill.as_str()))]
pub fn generate(profile: &Profile, rng: &mut impl Rng) -> Vec<Task> {
  let mut tasks: Vec<Task> = Vec::with_capacity(DAILY_SET_SIZE);

  let weak_bucket = catalog::bucket(profile.weak_skill);
  let first = &weak_bucket[rng.gen_range(0..weak_bucket.len())];
  tasks.push(instantiate(first, profile.weak_skill));

  let mut draws = 0usize;
  while tasks.len() < DAILY_SET_SIZE {
    draws += 1;
    assert!(draws <= MAX_DRAWS, "task catalog cannot yield {} distinct descriptions", DAILY_SET_SIZE);

    let skill = Skill::ALL[rng.gen_range(0..Skill::ALL.len())];
    let pool = catalog::bucket(skill);
    let tpl = &pool[rng.gen_range(0..pool.len())];

    // Duplicate descriptions are rejected regardless of which skill they
    // came from.
    if tasks.iter().any(|t| t.description == tpl.description) {
      continue;
    }
    tasks.push(instantiate(tpl, skill));
  }

  debug!(target: "tracker", draws, "daily set generated");
  tasks
}

fn instantiate(tpl: &TaskTemplate, skill: Skill) -> Task {
  Task {
    id: Uuid::new_v4().to_string(),
    skill,
    description: tpl.description.to_string(),
    duration: tpl.duration,
    completed: false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDate;
  use rand::{rngs::StdRng, SeedableRng};

  fn profile(weak: Skill) -> Profile {
    Profile {
      target_score: "7.5".into(),
      exam_date: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
      study_time: 60,
      weak_skill: weak,
    }
  }

  #[test]
  fn produces_three_tasks_with_distinct_descriptions() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
      let tasks = generate(&profile(Skill::Reading), &mut rng);
      assert_eq!(tasks.len(), 3);
      assert_ne!(tasks[0].description, tasks[1].description);
      assert_ne!(tasks[0].description, tasks[2].description);
      assert_ne!(tasks[1].description, tasks[2].description);
    }
  }

  #[test]
  fn first_task_comes_from_the_weak_skill() {
    let mut rng = StdRng::seed_from_u64(11);
    for weak in Skill::ALL {
      let tasks = generate(&profile(weak), &mut rng);
      assert_eq!(tasks[0].skill, weak);
    }
  }

  #[test]
  fn tasks_start_uncompleted_with_unique_ids() {
    let mut rng = StdRng::seed_from_u64(3);
    let tasks = generate(&profile(Skill::Writing), &mut rng);
    assert!(tasks.iter().all(|t| !t.completed));
    assert_ne!(tasks[0].id, tasks[1].id);
    assert_ne!(tasks[0].id, tasks[2].id);
    assert_ne!(tasks[1].id, tasks[2].id);
  }

  #[test]
  fn seeded_rng_yields_a_deterministic_set() {
    let a = generate(&profile(Skill::Speaking), &mut StdRng::seed_from_u64(42));
    let b = generate(&profile(Skill::Speaking), &mut StdRng::seed_from_u64(42));
    let descs = |ts: &[Task]| ts.iter().map(|t| t.description.clone()).collect::<Vec<_>>();
    assert_eq!(descs(&a), descs(&b));
  }
}

//! Built-in task catalog: four candidate templates per skill, fixed content.
//! Pure data; generation policy lives in `generator`.

use crate::domain::{Skill, TaskTemplate};

/// Number of tasks in a generated daily set.
pub const DAILY_SET_SIZE: usize = 3;

const READING: [TaskTemplate; 4] = [
  TaskTemplate { description: "Solve 10 passages", duration: 40 },
  TaskTemplate { description: "Read 2 academic articles", duration: 30 },
  TaskTemplate { description: "Complete 1 full mock test section", duration: 60 },
  TaskTemplate { description: "Speed read 5 pages", duration: 15 },
];

const WRITING: [TaskTemplate; 4] = [
  TaskTemplate { description: "Write Task 1 (150 words)", duration: 20 },
  TaskTemplate { description: "Write Task 2 (250 words)", duration: 40 },
  TaskTemplate { description: "Review grammar rules", duration: 15 },
  TaskTemplate { description: "Paraphrase 5 sentences", duration: 10 },
];

const LISTENING: [TaskTemplate; 4] = [
  TaskTemplate { description: "Practice audio quiz", duration: 30 },
  TaskTemplate { description: "Listen to a TED Talk", duration: 15 },
  TaskTemplate { description: "Transcribe 2 mins of audio", duration: 20 },
  TaskTemplate { description: "Full Listening Mock Test", duration: 40 },
];

const SPEAKING: [TaskTemplate; 4] = [
  TaskTemplate { description: "Record 2 minute speech", duration: 10 },
  TaskTemplate { description: "Practice Part 1 questions", duration: 15 },
  TaskTemplate { description: "Describe a picture", duration: 5 },
  TaskTemplate { description: "Shadowing exercise", duration: 20 },
];

/// Candidate templates for one skill.
pub fn bucket(skill: Skill) -> &'static [TaskTemplate] {
  match skill {
    Skill::Reading => &READING,
    Skill::Writing => &WRITING,
    Skill::Listening => &LISTENING,
    Skill::Speaking => &SPEAKING,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_bucket_holds_four_templates() {
    for skill in Skill::ALL {
      assert_eq!(bucket(skill).len(), 4, "{} bucket", skill.as_str());
    }
  }

  #[test]
  fn descriptions_are_unique_across_the_whole_catalog() {
    // The generator dedupes on description alone, so a duplicate anywhere in
    // the catalog would silently shrink the selectable pool.
    let mut seen = std::collections::HashSet::new();
    for skill in Skill::ALL {
      for tpl in bucket(skill) {
        assert!(seen.insert(tpl.description), "duplicate: {}", tpl.description);
      }
    }
  }
}

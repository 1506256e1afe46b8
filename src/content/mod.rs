//! Reading content consumed by the engine: question sets and achievement
//! definitions. A small sample library is bundled into the binary; files in
//! the user data directory take precedence over bundled ones.

pub mod achievement;
pub mod question;

use std::fs;
use std::path::PathBuf;

use rust_embed::Embed;
use serde::de::DeserializeOwned;

pub use achievement::{Achievement, AchievementIcon};
pub use question::{ComprehensionQuestion, QuestionCategory, QuestionOption, QuestionSet};

#[derive(Embed)]
#[folder = "assets/content/"]
struct ContentAssets;

const SAMPLE_ACHIEVEMENTS: &str = "achievements.json";
const SAMPLE_PROFILE: &str = "sample_profile.json";

fn user_content_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("readwise"))
}

fn parse_bundled<T: DeserializeOwned>(path: &str) -> Option<T> {
    let file = ContentAssets::get(path)?;
    let content = std::str::from_utf8(file.data.as_ref()).ok()?;
    match serde_json::from_str(content) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!("bundled content {path} failed to parse: {err}");
            None
        }
    }
}

/// Load a question set by name, preferring
/// `<data_dir>/readwise/questions/<name>.json` over the bundled copy.
pub fn load_question_set(name: &str) -> Option<QuestionSet> {
    if let Some(dir) = user_content_dir() {
        let user_path = dir.join("questions").join(format!("{name}.json"));
        if let Ok(content) = fs::read_to_string(&user_path) {
            match serde_json::from_str::<QuestionSet>(&content) {
                Ok(set) => return Some(set),
                Err(err) => {
                    tracing::warn!("ignoring {}: {err}", user_path.display());
                }
            }
        }
    }

    parse_bundled(&format!("questions/{name}.json"))
}

/// Names of the bundled question sets.
pub fn available_question_sets() -> Vec<String> {
    let mut names: Vec<String> = ContentAssets::iter()
        .filter_map(|path| {
            path.strip_prefix("questions/")
                .and_then(|rest| rest.strip_suffix(".json"))
                .map(|name| name.to_string())
        })
        .collect();
    names.sort();
    names
}

/// The bundled achievement catalogue with its sample earned/progress state.
pub fn sample_achievements() -> Vec<Achievement> {
    parse_bundled(SAMPLE_ACHIEVEMENTS).unwrap_or_default()
}

/// Raw JSON of the bundled sample reader profile.
pub fn sample_profile_json() -> Option<String> {
    let file = ContentAssets::get(SAMPLE_PROFILE)?;
    std::str::from_utf8(file.data.as_ref())
        .ok()
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_question_sets_listed() {
        let names = available_question_sets();
        assert!(names.contains(&"enchanted-forest".to_string()));
    }

    #[test]
    fn test_bundled_question_set_parses() {
        let set = parse_bundled::<QuestionSet>("questions/enchanted-forest.json").unwrap();
        assert_eq!(set.name, "enchanted-forest");
        assert_eq!(set.post_reading().len(), 5);
        assert_eq!(set.questions.len(), 8);
        for q in &set.questions {
            assert_eq!(q.correct_option_count(), 1, "{} should have one answer", q.id);
        }
    }

    #[test]
    fn test_sample_achievements_parse() {
        let achievements = sample_achievements();
        assert_eq!(achievements.len(), 9);
        assert!(achievements.iter().all(|a| a.icon.is_known()));
    }
}

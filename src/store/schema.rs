use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::content::achievement::Achievement;
use crate::engine::activity::ActivityLog;
use crate::engine::level::SkillSet;
use crate::engine::quiz::QuizResult;

pub const SCHEMA_VERSION: u32 = 1;

/// One finished quiz as kept in the reader's history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuizRecord {
    pub question_set: String,
    pub taken_on: NaiveDate,
    pub timestamp: DateTime<Utc>,
    pub percentage: u32,
    pub correct_count: usize,
    pub total_count: usize,
}

impl QuizRecord {
    pub fn from_result(
        question_set: &str,
        result: &QuizResult,
        taken_on: NaiveDate,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            question_set: question_set.to_string(),
            taken_on,
            timestamp,
            percentage: result.percentage,
            correct_count: result.correct_count,
            total_count: result.total_count,
        }
    }

    pub fn is_perfect(&self) -> bool {
        self.total_count > 0 && self.correct_count == self.total_count
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    pub schema_version: u32,
    #[serde(default)]
    pub reader_name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub xp_points: u32,
    #[serde(default = "default_xp_to_next_level")]
    pub xp_to_next_level: u32,
    #[serde(default)]
    pub books_read: u32,
    #[serde(default)]
    pub skills: SkillSet,
    #[serde(default)]
    pub activity: ActivityLog,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
    #[serde(default)]
    pub quiz_history: Vec<QuizRecord>,
}

fn default_level() -> u32 {
    1
}

fn default_xp_to_next_level() -> u32 {
    100
}

impl Default for ProfileData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            reader_name: String::new(),
            level: default_level(),
            xp_points: 0,
            xp_to_next_level: default_xp_to_next_level(),
            books_read: 0,
            skills: SkillSet::default(),
            activity: ActivityLog::new(),
            achievements: Vec::new(),
            quiz_history: Vec::new(),
        }
    }
}

impl ProfileData {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    /// Add a finished quiz to the history and mark the day as a quiz day.
    pub fn record_quiz(&mut self, record: QuizRecord) {
        self.activity.entry(record.taken_on).or_default().quiz_taken = true;
        self.quiz_history.push(record);
    }

    /// Credit XP without ever overflowing the counter.
    pub fn add_xp(&mut self, xp: u32) {
        self.xp_points = self.xp_points.saturating_add(xp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_profile_fills_defaults() {
        let profile: ProfileData = serde_json::from_str(r#"{"schema_version": 1}"#).unwrap();
        assert!(!profile.needs_reset());
        assert_eq!(profile.level, 1);
        assert_eq!(profile.xp_to_next_level, 100);
        assert!(profile.activity.is_empty());
    }

    #[test]
    fn test_stale_schema_needs_reset() {
        let profile: ProfileData = serde_json::from_str(r#"{"schema_version": 0}"#).unwrap();
        assert!(profile.needs_reset());
    }

    #[test]
    fn test_record_quiz_marks_day() {
        let mut profile = ProfileData::default();
        let day = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
        let result = QuizResult {
            percentage: 100,
            correct_count: 5,
            total_count: 5,
            per_question: Vec::new(),
        };
        profile.record_quiz(QuizRecord::from_result("enchanted-forest", &result, day, Utc::now()));
        assert!(profile.activity[&day].quiz_taken);
        assert_eq!(profile.activity[&day].minutes_read, 0);
        assert!(profile.quiz_history[0].is_perfect());
    }

    #[test]
    fn test_add_xp_saturates() {
        let mut profile = ProfileData {
            xp_points: u32::MAX - 5,
            ..ProfileData::default()
        };
        profile.add_xp(50);
        assert_eq!(profile.xp_points, u32::MAX);
    }
}

use serde::{Deserialize, Serialize};

use crate::content::achievement::Achievement;
use crate::engine::rounded_percentage;

/// How to read an achievement whose progress meets its requirement while
/// `earned` is still false.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionPolicy {
    /// `earned` is authoritative; progress numbers are advisory.
    #[default]
    EarnedFlag,
    /// Progress at or past the requirement also counts as earned.
    ProgressMeetsRequirement,
}

impl CompletionPolicy {
    pub fn is_complete(self, achievement: &Achievement) -> bool {
        match self {
            CompletionPolicy::EarnedFlag => achievement.earned,
            CompletionPolicy::ProgressMeetsRequirement => {
                achievement.earned || achievement.requirement_met()
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AchievementState {
    Earned,
    InProgress {
        progress: u32,
        requirement: u32,
        fraction: f64,
    },
    Locked,
}

impl Achievement {
    /// What the gallery shows for this achievement. Progress is only shown
    /// for unearned achievements that track both numbers.
    pub fn state(&self, policy: CompletionPolicy) -> AchievementState {
        if policy.is_complete(self) {
            return AchievementState::Earned;
        }
        match self.tracked_progress() {
            Some((progress, requirement)) => AchievementState::InProgress {
                progress,
                requirement,
                fraction: if requirement == 0 {
                    1.0
                } else {
                    (progress as f64 / requirement as f64).min(1.0)
                },
            },
            None => AchievementState::Locked,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub earned_count: usize,
    pub total_count: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OverallCount {
    pub earned_count: usize,
    pub total_count: usize,
    pub completion_percentage: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AchievementSummary {
    /// Categories in the order they first appear in the input.
    pub by_category: Vec<(String, CategoryCount)>,
    pub overall: OverallCount,
}

impl AchievementSummary {
    pub fn category(&self, name: &str) -> Option<&CategoryCount> {
        self.by_category
            .iter()
            .find(|(category, _)| category == name)
            .map(|(_, count)| count)
    }
}

pub fn evaluate(achievements: &[Achievement], policy: CompletionPolicy) -> AchievementSummary {
    let mut by_category: Vec<(String, CategoryCount)> = Vec::new();
    let mut earned_total = 0;

    for achievement in achievements {
        let complete = policy.is_complete(achievement);
        if !achievement.earned && achievement.requirement_met() {
            tracing::debug!(
                "achievement {} meets its requirement but is not marked earned ({policy:?})",
                achievement.id
            );
        }

        let index = match by_category
            .iter()
            .position(|(category, _)| *category == achievement.category)
        {
            Some(index) => index,
            None => {
                by_category.push((achievement.category.clone(), CategoryCount::default()));
                by_category.len() - 1
            }
        };
        let count = &mut by_category[index].1;
        count.total_count += 1;
        if complete {
            count.earned_count += 1;
            earned_total += 1;
        }
    }

    AchievementSummary {
        by_category,
        overall: OverallCount {
            earned_count: earned_total,
            total_count: achievements.len(),
            completion_percentage: rounded_percentage(earned_total, achievements.len()),
        },
    }
}

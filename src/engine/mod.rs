pub mod achievements;
pub mod activity;
pub mod bands;
pub mod level;
pub mod quiz;
pub mod summary;

pub use achievements::{AchievementSummary, CompletionPolicy, evaluate};
pub use activity::{ActivityTier, MonthSummary, classify_day, month_summary};
pub use bands::{Band, BandError, BandTable, ColorTier};
pub use level::{LevelProgress, level_progress, level_tier, skill_tier};
pub use quiz::{AnswerMap, QuizResult, score};
pub use summary::{StarParts, analyze_star, similarity};

/// Whole-number percentage of `part` in `total`, rounding halves up.
/// A zero `total` yields 0 and `part` is capped at `total`.
pub fn rounded_percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let part = part.min(total) as u64;
    let total = total as u64;
    ((200 * part + total) / (2 * total)) as u32
}

use std::fmt::Write;

use crate::config::Thresholds;
use crate::content::achievement::Achievement;
use crate::content::question::ComprehensionQuestion;
use crate::engine::achievements::{AchievementState, CompletionPolicy, evaluate};
use crate::engine::activity::{ActivityTier, CalendarMonth, GoalProgress};
use crate::engine::level::{LevelProgress, LevelTier, SkillBreakdown};
use crate::engine::quiz::QuizResult;
use crate::engine::summary::StarParts;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

fn tier_cell(tier: ActivityTier) -> char {
    match tier {
        ActivityTier::None => '·',
        ActivityTier::Low => '░',
        ActivityTier::Medium => '▒',
        ActivityTier::High => '█',
    }
}

pub fn quiz_report(
    title: &str,
    questions: &[ComprehensionQuestion],
    result: &QuizResult,
    thresholds: &Thresholds,
    celebration_percentage: u32,
) -> String {
    let grade = result.grade(&thresholds.quiz_grades);
    let mut out = String::new();
    let _ = writeln!(out, "Quiz: {title}");
    for (question, outcome) in questions.iter().zip(&result.per_question) {
        let mark = if outcome.is_correct { "✓" } else { "✗" };
        let picked = outcome.selected_option_id.as_deref().unwrap_or("-");
        let _ = writeln!(out, "  {mark} {} (picked {picked})", question.prompt);
        if !outcome.is_correct && !question.explanation.is_empty() {
            let _ = writeln!(out, "      {}", question.explanation);
        }
    }
    let _ = writeln!(
        out,
        "Score: {}% ({}/{})",
        result.percentage, result.correct_count, result.total_count
    );
    let _ = writeln!(out, "Badge: {} [{}]", grade.label, grade.tier.to_key());
    let _ = writeln!(out, "{}", grade.message);
    if result.celebrates(celebration_percentage) {
        let _ = writeln!(out, "Celebration unlocked!");
    }
    out
}

pub fn level_report(
    reader: &str,
    level: u32,
    tier: &LevelTier,
    xp_points: u32,
    progress: &LevelProgress,
) -> String {
    let mut out = String::new();
    let name = if reader.is_empty() { "Reader" } else { reader };
    let _ = writeln!(out, "{name}: Level {level} - {} [{}]", tier.title, tier.color.to_key());
    let _ = writeln!(
        out,
        "XP {xp_points}  {} {}%  ({} XP needed)",
        bar(progress.fraction, 20),
        progress.percent(),
        progress.xp_remaining
    );
    out
}

pub fn skills_report(breakdown: &SkillBreakdown<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Average: {}% - {}",
        breakdown.average, breakdown.average_tier.label
    );
    for reading in &breakdown.skills {
        let _ = writeln!(
            out,
            "  {:<18} {:>3}% {} {}",
            reading.skill.name(),
            reading.percentage,
            bar(reading.percentage as f64 / 100.0, 20),
            reading.tier.label
        );
    }
    out
}

pub fn calendar_report(
    calendar: &CalendarMonth,
    current_streak: u32,
    goal: &GoalProgress,
    monthly_book_goal: u32,
) -> String {
    let mut out = String::new();
    let month_name = MONTH_NAMES
        .get(calendar.month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("?");
    let _ = writeln!(out, "{month_name} {}", calendar.year);
    let _ = writeln!(out, " S  M  T  W  T  F  S");

    let mut column = calendar.leading_blanks as usize;
    let mut line = "   ".repeat(column);
    for day in &calendar.days {
        let cell = if day.is_future { ' ' } else { tier_cell(day.tier) };
        let marker = if day.is_today { '*' } else { ' ' };
        let _ = write!(line, " {cell}{marker}");
        column += 1;
        if column == 7 {
            let _ = writeln!(out, "{}", line.trim_end());
            line.clear();
            column = 0;
        }
    }
    if !line.is_empty() {
        let _ = writeln!(out, "{}", line.trim_end());
    }

    let summary = &calendar.summary;
    let _ = writeln!(out, "Days read: {}", summary.active_days);
    let _ = writeln!(out, "Books completed: {}", summary.total_books);
    let _ = writeln!(out, "Reading time: {}h", summary.hours_read());
    let _ = writeln!(out, "Current streak: {current_streak} days");
    let _ = writeln!(
        out,
        "Monthly goal: {}/{monthly_book_goal} {}{}",
        summary.total_books,
        bar(goal.fraction, 10),
        if goal.reached { " reached!" } else { "" }
    );
    out
}

pub fn achievements_report(achievements: &[Achievement], policy: CompletionPolicy) -> String {
    let summary = evaluate(achievements, policy);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Achievements: {}/{} earned ({}%)",
        summary.overall.earned_count,
        summary.overall.total_count,
        summary.overall.completion_percentage
    );
    for (category, count) in &summary.by_category {
        let _ = writeln!(
            out,
            "{category}: {}/{} Earned",
            count.earned_count, count.total_count
        );
        for achievement in achievements.iter().filter(|a| &a.category == category) {
            let status = match achievement.state(policy) {
                AchievementState::Earned => "earned".to_string(),
                AchievementState::InProgress {
                    progress,
                    requirement,
                    fraction,
                } => format!("{progress}/{requirement} {}", bar(fraction, 10)),
                AchievementState::Locked => "locked".to_string(),
            };
            let _ = writeln!(
                out,
                "  [{}] {} - {status}",
                achievement.icon.display_icon(),
                achievement.name
            );
        }
    }
    out
}

/// STAR slots of a summary. `comparison` holds the overall word overlap with
/// a model summary and the overlap of each slot, in slot order.
pub fn star_report(parts: &StarParts, comparison: Option<(u32, [u32; 4])>) -> String {
    let slots = [
        ("Situation", &parts.situation),
        ("Task", &parts.task),
        ("Action", &parts.action),
        ("Result", &parts.result),
    ];
    let mut out = String::new();
    for (index, (label, text)) in slots.iter().enumerate() {
        match comparison {
            Some((_, per_slot)) => {
                let _ = writeln!(out, "{label}: {text} ({}% match)", per_slot[index]);
            }
            None => {
                let _ = writeln!(out, "{label}: {text}");
            }
        }
    }
    if let Some((overall, _)) = comparison {
        let _ = writeln!(out, "Overall match: {overall}% {}", bar(overall as f64 / 100.0, 10));
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::config::Config;
    use crate::engine::activity::{ActivityLog, DailyActivity, goal_progress, month_calendar};
    use crate::engine::level::{SkillSet, level_progress, level_tier, skill_breakdown};

    #[test]
    fn test_bar_widths() {
        assert_eq!(bar(0.0, 4), "[----]");
        assert_eq!(bar(0.5, 4), "[##--]");
        assert_eq!(bar(1.7, 4), "[####]");
    }

    #[test]
    fn test_level_report_mentions_remaining_xp() {
        let thresholds = Config::default().thresholds().unwrap();
        let progress = level_progress(2850, 3000);
        let text = level_report("Emma", 5, level_tier(5, &thresholds.level_tiers), 2850, &progress);
        assert!(text.contains("Level 5 - Independent Reader"));
        assert!(text.contains("95%"));
        assert!(text.contains("150 XP needed"));
    }

    #[test]
    fn test_skills_report_lists_every_skill() {
        let thresholds = Config::default().thresholds().unwrap();
        let skills = SkillSet {
            vocabulary: 78,
            comprehension: 85,
            fluency: 72,
            critical_thinking: 68,
        };
        let text = skills_report(&skill_breakdown(&skills, &thresholds.skill_tiers));
        assert!(text.starts_with("Average: 76% - Good"));
        assert!(text.contains("Critical Thinking"));
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn test_calendar_report_layout() {
        let mut log = ActivityLog::new();
        let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        log.insert(first, DailyActivity::new(45, 1));
        let today = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let calendar =
            month_calendar(&log, 2024, 1, today, &Default::default()).unwrap();
        let text = calendar_report(&calendar, 1, &goal_progress(1, 10), 10);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "January 2024");
        // Monday the 1st sits in the second column.
        assert_eq!(lines[2], "    █  ·*");
        assert!(text.contains("Monthly goal: 1/10"));
        assert!(text.contains("Current streak: 1 days"));
    }

    #[test]
    fn test_star_report_with_and_without_comparison() {
        let parts = crate::engine::summary::analyze_star(
            "Emma got lost. She looked for the path. She helped Luna. Luna led her home.",
        );
        let plain = star_report(&parts, None);
        assert_eq!(plain.lines().count(), 4);
        assert!(plain.starts_with("Situation: Emma got lost\n"));
        assert!(plain.contains("Result: Luna led her home"));

        let compared = star_report(&parts, Some((50, [100, 0, 25, 75])));
        assert!(compared.contains("Task: She looked for the path (0% match)"));
        assert!(compared.contains("Overall match: 50% [#####-----]"));
    }

    #[test]
    fn test_achievements_report_groups_by_category() {
        let achievements = vec![
            Achievement::new("1", "First Book", "Reading Milestones", true),
            Achievement::new("6", "Reading Champion", "Reading Milestones", false)
                .with_progress(23, 50),
        ];
        let text = achievements_report(&achievements, CompletionPolicy::EarnedFlag);
        assert!(text.contains("Achievements: 1/2 earned (50%)"));
        assert!(text.contains("Reading Milestones: 1/2 Earned"));
        assert!(text.contains("23/50"));
        assert!(text.contains("[trophy] First Book - earned"));
    }
}

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One day of reading. Dates live in the log key, never in the record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyActivity {
    #[serde(default, alias = "books", deserialize_with = "crate::serde_helpers::non_negative")]
    pub books_completed: u32,
    #[serde(default, alias = "minutes", deserialize_with = "crate::serde_helpers::non_negative")]
    pub minutes_read: u32,
    #[serde(default, alias = "hasQuiz")]
    pub quiz_taken: bool,
}

impl DailyActivity {
    pub fn new(minutes_read: u32, books_completed: u32) -> Self {
        Self {
            books_completed,
            minutes_read,
            quiz_taken: false,
        }
    }

    /// A day counts toward active days and streaks once any minutes were read.
    pub fn is_active(&self) -> bool {
        self.minutes_read > 0
    }
}

/// Reading log keyed by ISO-8601 date (`YYYY-MM-DD` on disk).
pub type ActivityLog = BTreeMap<NaiveDate, DailyActivity>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityTier {
    None,
    Low,
    Medium,
    High,
}

impl ActivityTier {
    pub fn to_key(self) -> &'static str {
        match self {
            ActivityTier::None => "none",
            ActivityTier::Low => "low",
            ActivityTier::Medium => "medium",
            ActivityTier::High => "high",
        }
    }
}

/// Cut-offs for the heat-map tiers. A day is high when both high
/// thresholds are met, medium when either medium threshold is met, low when
/// any minutes were read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityThresholds {
    #[serde(default = "default_high_minutes")]
    pub high_minutes: u32,
    #[serde(default = "default_high_books")]
    pub high_books: u32,
    #[serde(default = "default_medium_minutes")]
    pub medium_minutes: u32,
    #[serde(default = "default_medium_books")]
    pub medium_books: u32,
}

fn default_high_minutes() -> u32 {
    30
}
fn default_high_books() -> u32 {
    1
}
fn default_medium_minutes() -> u32 {
    15
}
fn default_medium_books() -> u32 {
    1
}

impl Default for ActivityThresholds {
    fn default() -> Self {
        Self {
            high_minutes: default_high_minutes(),
            high_books: default_high_books(),
            medium_minutes: default_medium_minutes(),
            medium_books: default_medium_books(),
        }
    }
}

impl ActivityThresholds {
    pub fn classify(&self, activity: Option<&DailyActivity>) -> ActivityTier {
        let Some(day) = activity else {
            return ActivityTier::None;
        };
        // Quiz-only or placeholder records never light up, whatever the bands say.
        if day.minutes_read == 0 && day.books_completed == 0 {
            return ActivityTier::None;
        }

        // High must be checked first: the medium clauses also match high days.
        if day.minutes_read >= self.high_minutes && day.books_completed >= self.high_books {
            ActivityTier::High
        } else if day.minutes_read >= self.medium_minutes
            || day.books_completed >= self.medium_books
        {
            ActivityTier::Medium
        } else if day.minutes_read > 0 {
            ActivityTier::Low
        } else {
            ActivityTier::None
        }
    }
}

/// Heat-map tier for a day using the default thresholds. A missing record
/// is a day without reading.
pub fn classify_day(activity: Option<&DailyActivity>) -> ActivityTier {
    ActivityThresholds::default().classify(activity)
}

// --- Month aggregates ---

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub active_days: u32,
    pub total_books: u32,
    pub total_minutes: u32,
}

impl MonthSummary {
    /// Reading time in whole hours, rounded half up.
    pub fn hours_read(&self) -> u32 {
        (self.total_minutes.saturating_add(30)) / 60
    }
}

fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn month_entries(
    log: &ActivityLog,
    year: i32,
    month: u32,
) -> impl Iterator<Item = (&NaiveDate, &DailyActivity)> {
    let first = first_of_month(year, month);
    first
        .into_iter()
        .flat_map(move |first| log.range(first..))
        .take_while(move |(date, _)| date.year() == year && date.month() == month)
}

/// Totals for one month. `month` is 1-indexed (1 = January); an invalid
/// month yields an empty summary.
pub fn month_summary(log: &ActivityLog, year: i32, month: u32) -> MonthSummary {
    if first_of_month(year, month).is_none() {
        tracing::debug!("month summary for invalid month {year}-{month}");
        return MonthSummary::default();
    }

    month_entries(log, year, month).fold(MonthSummary::default(), |mut summary, (_, day)| {
        if day.is_active() {
            summary.active_days += 1;
        }
        summary.total_books = summary.total_books.saturating_add(day.books_completed);
        summary.total_minutes = summary.total_minutes.saturating_add(day.minutes_read);
        summary
    })
}

/// Year and 1-indexed month `delta` months away from the given one.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year as i64 * 12 + (month.clamp(1, 12) as i64 - 1) + delta as i64;
    (index.div_euclid(12) as i32, index.rem_euclid(12) as u32 + 1)
}

// --- Streaks ---

fn is_active_on(log: &ActivityLog, date: NaiveDate) -> bool {
    log.get(&date).is_some_and(DailyActivity::is_active)
}

/// Consecutive active days ending today. A day that has not been read yet
/// does not break the streak, so counting then starts from yesterday.
pub fn current_streak(log: &ActivityLog, today: NaiveDate) -> u32 {
    let start = if is_active_on(log, today) {
        Some(today)
    } else {
        today.pred_opt()
    };

    let mut streak = 0;
    let mut cursor = start;
    while let Some(day) = cursor {
        if !is_active_on(log, day) {
            break;
        }
        streak += 1;
        cursor = day.pred_opt();
    }
    streak
}

pub fn longest_streak(log: &ActivityLog) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for (&date, _) in log.iter().filter(|(_, day)| day.is_active()) {
        run = match previous {
            Some(prev) if prev.succ_opt() == Some(date) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(date);
    }
    longest
}

// --- Calendar grid ---

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub tier: ActivityTier,
    pub is_today: bool,
    pub is_future: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    /// Empty cells before day 1 in a Sunday-first week row.
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
    pub summary: MonthSummary,
}

/// Heat-map grid for one month. `today` is supplied by the caller so the
/// grid never depends on the wall clock.
pub fn month_calendar(
    log: &ActivityLog,
    year: i32,
    month: u32,
    today: NaiveDate,
    thresholds: &ActivityThresholds,
) -> Option<CalendarMonth> {
    let first = first_of_month(year, month)?;

    let days = first
        .iter_days()
        .take_while(|date| date.month() == month)
        .map(|date| CalendarDay {
            date,
            tier: thresholds.classify(log.get(&date)),
            is_today: date == today,
            is_future: date > today,
        })
        .collect();

    Some(CalendarMonth {
        year,
        month,
        leading_blanks: first.weekday().num_days_from_sunday(),
        days,
        summary: month_summary(log, year, month),
    })
}

// --- Goals ---

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GoalProgress {
    /// Share of the goal reached, within `[0, 1]`.
    pub fraction: f64,
    pub reached: bool,
}

/// Progress toward a count goal such as books per month. A zero goal is
/// treated as unset.
pub fn goal_progress(current: u32, goal: u32) -> GoalProgress {
    if goal == 0 {
        return GoalProgress {
            fraction: 0.0,
            reached: false,
        };
    }
    GoalProgress {
        fraction: (current as f64 / goal as f64).min(1.0),
        reached: current >= goal,
    }
}

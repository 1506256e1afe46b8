use serde::{Deserialize, Serialize};

use crate::engine::bands::{Band, BandTable, ColorTier};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelProgress {
    /// Share of the way to the next level, always within `[0, 1]`.
    pub fraction: f64,
    pub xp_remaining: u32,
}

impl LevelProgress {
    pub fn percent(&self) -> u32 {
        (self.fraction * 100.0).round() as u32
    }
}

/// Progress toward the next level. XP past the requirement still reports a
/// full bar. A zero requirement is invalid and reports an empty bar.
pub fn level_progress(xp_points: u32, xp_to_next_level: u32) -> LevelProgress {
    if xp_to_next_level == 0 {
        tracing::warn!("level progress requested with a zero XP requirement");
        return LevelProgress {
            fraction: 0.0,
            xp_remaining: 0,
        };
    }

    let fraction = (xp_points as f64 / xp_to_next_level as f64).clamp(0.0, 1.0);
    LevelProgress {
        fraction,
        xp_remaining: xp_to_next_level.saturating_sub(xp_points),
    }
}

// --- Level tiers ---

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTier {
    pub min_level: u32,
    pub title: String,
    pub color: ColorTier,
}

impl Band for LevelTier {
    fn threshold(&self) -> u32 {
        self.min_level
    }
}

impl LevelTier {
    fn new(min_level: u32, title: &str, color: ColorTier) -> Self {
        Self {
            min_level,
            title: title.to_string(),
            color,
        }
    }

    /// Levels 1-2, 3-4, 5-6, 7-8 and 9+.
    pub fn defaults() -> Vec<LevelTier> {
        vec![
            LevelTier::new(0, "Beginning Reader", ColorTier::Green),
            LevelTier::new(3, "Developing Reader", ColorTier::Blue),
            LevelTier::new(5, "Independent Reader", ColorTier::Orange),
            LevelTier::new(7, "Advanced Reader", ColorTier::Purple),
            LevelTier::new(9, "Expert Reader", ColorTier::Pink),
        ]
    }
}

/// Title and color for a reading level. Level 0 is read as level 1.
pub fn level_tier(level: u32, tiers: &BandTable<LevelTier>) -> &LevelTier {
    tiers.lookup(level.max(1))
}

// --- Skills ---

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTier {
    pub min_percentage: u32,
    pub label: String,
    pub color: ColorTier,
}

impl Band for SkillTier {
    fn threshold(&self) -> u32 {
        self.min_percentage
    }
}

impl SkillTier {
    fn new(min_percentage: u32, label: &str, color: ColorTier) -> Self {
        Self {
            min_percentage,
            label: label.to_string(),
            color,
        }
    }

    pub fn defaults() -> Vec<SkillTier> {
        vec![
            SkillTier::new(90, "Excellent", ColorTier::Green),
            SkillTier::new(80, "Great", ColorTier::Blue),
            SkillTier::new(70, "Good", ColorTier::Orange),
            SkillTier::new(60, "Improving", ColorTier::Yellow),
            SkillTier::new(0, "Needs Practice", ColorTier::Gray),
        ]
    }
}

/// Tier for a skill percentage. Values above 100 are read as 100.
pub fn skill_tier(percentage: u32, tiers: &BandTable<SkillTier>) -> &SkillTier {
    tiers.lookup(percentage.min(100))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Vocabulary,
    Comprehension,
    Fluency,
    CriticalThinking,
}

impl Skill {
    pub fn all() -> &'static [Skill] {
        &[
            Skill::Vocabulary,
            Skill::Comprehension,
            Skill::Fluency,
            Skill::CriticalThinking,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            Skill::Vocabulary => "Vocabulary",
            Skill::Comprehension => "Comprehension",
            Skill::Fluency => "Fluency",
            Skill::CriticalThinking => "Critical Thinking",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSet {
    pub vocabulary: u32,
    pub comprehension: u32,
    pub fluency: u32,
    #[serde(alias = "criticalThinking")]
    pub critical_thinking: u32,
}

impl SkillSet {
    /// Percentage for `skill`, capped at 100.
    pub fn get(&self, skill: Skill) -> u32 {
        let raw = match skill {
            Skill::Vocabulary => self.vocabulary,
            Skill::Comprehension => self.comprehension,
            Skill::Fluency => self.fluency,
            Skill::CriticalThinking => self.critical_thinking,
        };
        raw.min(100)
    }

    /// Mean of the four skills, rounded half up.
    pub fn average(&self) -> u32 {
        let count = Skill::all().len() as u32;
        let sum: u32 = Skill::all().iter().map(|&s| self.get(s)).sum();
        (2 * sum + count) / (2 * count)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkillReading<'a> {
    pub skill: Skill,
    pub percentage: u32,
    pub tier: &'a SkillTier,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkillBreakdown<'a> {
    pub skills: Vec<SkillReading<'a>>,
    pub average: u32,
    pub average_tier: &'a SkillTier,
}

pub fn skill_breakdown<'a>(skills: &SkillSet, tiers: &'a BandTable<SkillTier>) -> SkillBreakdown<'a> {
    let readings = Skill::all()
        .iter()
        .map(|&skill| {
            let percentage = skills.get(skill);
            SkillReading {
                skill,
                percentage,
                tier: skill_tier(percentage, tiers),
            }
        })
        .collect();
    let average = skills.average();

    SkillBreakdown {
        skills: readings,
        average,
        average_tier: skill_tier(average, tiers),
    }
}

// --- XP awards ---

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XpEvent {
    BookFinished,
    PerfectQuiz,
    DailyReading,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpAwards {
    #[serde(default = "default_book_finished")]
    pub book_finished: u32,
    #[serde(default = "default_perfect_quiz")]
    pub perfect_quiz: u32,
    #[serde(default = "default_daily_reading")]
    pub daily_reading: u32,
}

fn default_book_finished() -> u32 {
    50
}
fn default_perfect_quiz() -> u32 {
    25
}
fn default_daily_reading() -> u32 {
    10
}

impl Default for XpAwards {
    fn default() -> Self {
        Self {
            book_finished: default_book_finished(),
            perfect_quiz: default_perfect_quiz(),
            daily_reading: default_daily_reading(),
        }
    }
}

impl XpAwards {
    pub fn value(&self, event: XpEvent) -> u32 {
        match event {
            XpEvent::BookFinished => self.book_finished,
            XpEvent::PerfectQuiz => self.perfect_quiz,
            XpEvent::DailyReading => self.daily_reading,
        }
    }
}

/// Total XP earned by `events`, saturating instead of overflowing.
pub fn xp_for<'a, I>(events: I, awards: &XpAwards) -> u32
where
    I: IntoIterator<Item = &'a XpEvent>,
{
    events
        .into_iter()
        .fold(0u32, |total, &event| total.saturating_add(awards.value(event)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_tiers() -> BandTable<LevelTier> {
        BandTable::new(LevelTier::defaults()).unwrap()
    }

    fn skill_tiers() -> BandTable<SkillTier> {
        BandTable::new(SkillTier::defaults()).unwrap()
    }

    #[test]
    fn test_level_progress_sample_reader() {
        let progress = level_progress(2850, 3000);
        assert!((progress.fraction - 0.95).abs() < 1e-9);
        assert_eq!(progress.xp_remaining, 150);
        assert_eq!(progress.percent(), 95);
    }

    #[test]
    fn test_level_progress_clamps_overshoot() {
        let progress = level_progress(3500, 3000);
        assert_eq!(progress.fraction, 1.0);
        assert_eq!(progress.xp_remaining, 0);
    }

    #[test]
    fn test_level_progress_fraction_always_bounded() {
        for xp in (0..10_000).step_by(37) {
            let fraction = level_progress(xp, 3000).fraction;
            assert!((0.0..=1.0).contains(&fraction), "xp {xp} gave {fraction}");
        }
        assert_eq!(level_progress(u32::MAX, 1).fraction, 1.0);
    }

    #[test]
    fn test_level_progress_zero_requirement_is_neutral() {
        let progress = level_progress(100, 0);
        assert_eq!(progress.fraction, 0.0);
        assert_eq!(progress.xp_remaining, 0);
    }

    #[test]
    fn test_level_tier_breakpoints() {
        let tiers = level_tiers();
        let titles: Vec<&str> = (1..=10)
            .map(|level| level_tier(level, &tiers).title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec![
                "Beginning Reader",
                "Beginning Reader",
                "Developing Reader",
                "Developing Reader",
                "Independent Reader",
                "Independent Reader",
                "Advanced Reader",
                "Advanced Reader",
                "Expert Reader",
                "Expert Reader",
            ]
        );
        assert_eq!(level_tier(5, &tiers).color, ColorTier::Orange);
        assert_eq!(level_tier(0, &tiers).title, "Beginning Reader");
    }

    #[test]
    fn test_level_tier_is_monotonic() {
        let tiers = level_tiers();
        for level in 1..50 {
            assert!(tiers.rank(level + 1) >= tiers.rank(level));
        }
    }

    #[test]
    fn test_skill_tier_bands() {
        let tiers = skill_tiers();
        assert_eq!(skill_tier(95, &tiers).label, "Excellent");
        assert_eq!(skill_tier(85, &tiers).label, "Great");
        assert_eq!(skill_tier(78, &tiers).label, "Good");
        assert_eq!(skill_tier(68, &tiers).label, "Improving");
        assert_eq!(skill_tier(59, &tiers).label, "Needs Practice");
        assert_eq!(skill_tier(250, &tiers).label, "Excellent");
    }

    #[test]
    fn test_skill_tier_is_monotonic() {
        let tiers = skill_tiers();
        for pct in 0..100 {
            assert!(tiers.rank(pct + 1) >= tiers.rank(pct));
        }
    }

    #[test]
    fn test_skill_breakdown_sample_reader() {
        let skills = SkillSet {
            vocabulary: 78,
            comprehension: 85,
            fluency: 72,
            critical_thinking: 68,
        };
        let tiers = skill_tiers();
        let breakdown = skill_breakdown(&skills, &tiers);
        // (78 + 85 + 72 + 68) / 4 = 75.75
        assert_eq!(breakdown.average, 76);
        assert_eq!(breakdown.average_tier.label, "Good");
        let labels: Vec<&str> = breakdown.skills.iter().map(|r| r.tier.label.as_str()).collect();
        assert_eq!(labels, vec!["Good", "Great", "Good", "Improving"]);
        assert_eq!(breakdown.skills[3].skill, Skill::CriticalThinking);
    }

    #[test]
    fn test_skill_average_rounds_half_up_and_caps() {
        let skills = SkillSet {
            vocabulary: 70,
            comprehension: 71,
            fluency: 70,
            critical_thinking: 71,
        };
        assert_eq!(skills.average(), 71);

        let wild = SkillSet {
            vocabulary: 400,
            comprehension: 100,
            fluency: 100,
            critical_thinking: 100,
        };
        assert_eq!(wild.average(), 100);
    }

    #[test]
    fn test_skill_set_accepts_camel_case() {
        let skills: SkillSet = serde_json::from_str(
            r#"{"vocabulary": 1, "comprehension": 2, "fluency": 3, "criticalThinking": 4}"#,
        )
        .unwrap();
        assert_eq!(skills.critical_thinking, 4);
    }

    #[test]
    fn test_xp_for_events() {
        let awards = XpAwards::default();
        let events = [
            XpEvent::BookFinished,
            XpEvent::PerfectQuiz,
            XpEvent::DailyReading,
            XpEvent::DailyReading,
        ];
        assert_eq!(xp_for(&events, &awards), 95);
        assert_eq!(xp_for(&[] as &[XpEvent], &awards), 0);
    }

    #[test]
    fn test_xp_for_saturates() {
        let awards = XpAwards {
            book_finished: u32::MAX,
            ..XpAwards::default()
        };
        let events = [XpEvent::BookFinished, XpEvent::BookFinished];
        assert_eq!(xp_for(&events, &awards), u32::MAX);
    }
}

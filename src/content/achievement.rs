use std::fmt;

use serde::{Deserialize, Serialize};

/// Icon an achievement is drawn with. Names outside the known set are kept
/// as `Unknown` so callers can see them instead of silently getting a default.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AchievementIcon {
    Book,
    Trophy,
    Target,
    Zap,
    TrendingUp,
    Users,
    Star,
    Crown,
    Award,
    Flame,
    Unknown(String),
}

impl AchievementIcon {
    pub fn to_key(&self) -> &str {
        match self {
            AchievementIcon::Book => "book",
            AchievementIcon::Trophy => "trophy",
            AchievementIcon::Target => "target",
            AchievementIcon::Zap => "zap",
            AchievementIcon::TrendingUp => "trending-up",
            AchievementIcon::Users => "users",
            AchievementIcon::Star => "star",
            AchievementIcon::Crown => "crown",
            AchievementIcon::Award => "award",
            AchievementIcon::Flame => "flame",
            AchievementIcon::Unknown(name) => name,
        }
    }

    pub fn from_key(key: &str) -> Self {
        match key {
            "book" => AchievementIcon::Book,
            "trophy" => AchievementIcon::Trophy,
            "target" => AchievementIcon::Target,
            "zap" => AchievementIcon::Zap,
            "trending-up" => AchievementIcon::TrendingUp,
            "users" => AchievementIcon::Users,
            "star" => AchievementIcon::Star,
            "crown" => AchievementIcon::Crown,
            "award" => AchievementIcon::Award,
            "flame" => AchievementIcon::Flame,
            other => AchievementIcon::Unknown(other.to_string()),
        }
    }

    /// Icon to actually draw: unknown names fall back to the trophy.
    pub fn display_icon(&self) -> AchievementIcon {
        match self {
            AchievementIcon::Unknown(_) => AchievementIcon::Trophy,
            known => known.clone(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, AchievementIcon::Unknown(_))
    }
}

impl From<String> for AchievementIcon {
    fn from(value: String) -> Self {
        Self::from_key(&value)
    }
}

impl From<AchievementIcon> for String {
    fn from(value: AchievementIcon) -> Self {
        value.to_key().to_string()
    }
}

impl fmt::Display for AchievementIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_key())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default = "default_icon")]
    pub icon: AchievementIcon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub earned: bool,
    #[serde(
        default,
        deserialize_with = "crate::serde_helpers::non_negative_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub progress: Option<u32>,
    #[serde(
        default,
        deserialize_with = "crate::serde_helpers::non_negative_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub requirement: Option<u32>,
}

fn default_icon() -> AchievementIcon {
    AchievementIcon::Trophy
}

impl Achievement {
    pub fn new(id: &str, name: &str, category: &str, earned: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            icon: default_icon(),
            description: None,
            earned,
            progress: None,
            requirement: None,
        }
    }

    pub fn with_progress(mut self, progress: u32, requirement: u32) -> Self {
        self.progress = Some(progress);
        self.requirement = Some(requirement);
        self
    }

    /// Both progress numbers, when the definition tracks them.
    pub fn tracked_progress(&self) -> Option<(u32, u32)> {
        self.progress.zip(self.requirement)
    }

    /// Progress says the requirement is met, whatever `earned` claims.
    pub fn requirement_met(&self) -> bool {
        self.tracked_progress()
            .is_some_and(|(progress, requirement)| progress >= requirement)
    }
}

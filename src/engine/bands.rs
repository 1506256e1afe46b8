use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A tier in a threshold table. A tier covers every value from its threshold
/// up to (but excluding) the next tier's threshold.
pub trait Band {
    fn threshold(&self) -> u32;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BandError {
    #[error("band table has no tiers")]
    Empty,

    #[error("band table has no floor tier: lowest threshold is {0}, expected 0")]
    MissingFloor(u32),

    #[error("duplicate band threshold {0}")]
    DuplicateThreshold(u32),
}

/// Palette slot a tier is drawn with. The presentation layer decides what
/// each slot actually looks like.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTier {
    Gold,
    Green,
    Blue,
    Orange,
    Purple,
    Pink,
    Yellow,
    Gray,
}

impl ColorTier {
    pub fn to_key(self) -> &'static str {
        match self {
            ColorTier::Gold => "gold",
            ColorTier::Green => "green",
            ColorTier::Blue => "blue",
            ColorTier::Orange => "orange",
            ColorTier::Purple => "purple",
            ColorTier::Pink => "pink",
            ColorTier::Yellow => "yellow",
            ColorTier::Gray => "gray",
        }
    }
}

/// Ordered threshold lookup shared by quiz grades, skill tiers and level tiers.
///
/// Tiers are kept sorted by descending threshold, so a lookup is a scan for
/// the first tier whose threshold the value reaches. The table always holds a
/// floor tier at threshold 0, which makes every lookup succeed.
#[derive(Clone, Debug)]
pub struct BandTable<T> {
    tiers: Vec<T>,
}

impl<T: Band> BandTable<T> {
    pub fn new(mut tiers: Vec<T>) -> Result<Self, BandError> {
        tiers.sort_by_key(|tier| std::cmp::Reverse(tier.threshold()));

        let Some(floor) = tiers.last() else {
            return Err(BandError::Empty);
        };
        if floor.threshold() != 0 {
            return Err(BandError::MissingFloor(floor.threshold()));
        }
        if let Some(pair) = tiers
            .windows(2)
            .find(|pair| pair[0].threshold() == pair[1].threshold())
        {
            return Err(BandError::DuplicateThreshold(pair[0].threshold()));
        }

        Ok(Self { tiers })
    }

    pub fn lookup(&self, value: u32) -> &T {
        &self.tiers[self.position(value)]
    }

    /// Ordinal of the tier `value` falls into, counted up from the floor tier
    /// (rank 0). Higher values never produce a lower rank.
    pub fn rank(&self, value: u32) -> usize {
        self.tiers.len() - 1 - self.position(value)
    }

    /// Tiers from the highest threshold down to the floor.
    pub fn tiers(&self) -> &[T] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    fn position(&self, value: u32) -> usize {
        self.tiers
            .iter()
            .position(|tier| value >= tier.threshold())
            .unwrap_or(self.tiers.len() - 1)
    }
}

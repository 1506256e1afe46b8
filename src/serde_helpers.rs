//! Lenient deserializers for counters coming from hand-edited or older data
//! files. Negative values are clamped to zero instead of failing the load.

use serde::{Deserialize, Deserializer};

pub fn non_negative<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(clamp_count(raw))
}

pub fn non_negative_opt<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.map(clamp_count))
}

fn clamp_count(raw: i64) -> u32 {
    if raw < 0 {
        tracing::debug!("clamping negative count {raw} to 0");
    }
    raw.clamp(0, u32::MAX as i64) as u32
}

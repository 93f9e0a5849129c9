//! Subscription tier definitions.
//!
//! Each tier grants channel access for a fixed duration. Durations are
//! static configuration, not derived from pricing.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How long a trial grant lasts.
///
/// Kept in one place so lifecycle logic and user-facing messaging cannot
/// drift apart.
pub const TRIAL_DURATION_MINUTES: i64 = 30;

/// Returns the trial access duration.
pub fn trial_duration() -> Duration {
    Duration::minutes(TRIAL_DURATION_MINUTES)
}

/// Paid subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// 7 days of access.
    Weekly,
    /// 28 days of access.
    Monthly,
    /// 364 days of access.
    Annual,
}

impl Tier {
    /// Returns the access duration granted by this tier.
    pub fn duration(&self) -> Duration {
        match self {
            Tier::Weekly => Duration::days(7),
            Tier::Monthly => Duration::days(28),
            Tier::Annual => Duration::days(364),
        }
    }

    /// Returns the wire name used in callback payloads and the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Weekly => "weekly",
            Tier::Monthly => "monthly",
            Tier::Annual => "annual",
        }
    }

    /// Returns the display name shown to users.
    pub fn display_name(&self) -> &'static str {
        match self {
            Tier::Weekly => "Weekly",
            Tier::Monthly => "Monthly",
            Tier::Annual => "Annual",
        }
    }

    /// All tiers in menu order.
    pub fn all() -> [Tier; 3] {
        [Tier::Weekly, Tier::Monthly, Tier::Annual]
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a tier name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tier: {0}")]
pub struct UnknownTier(pub String);

impl FromStr for Tier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(Tier::Weekly),
            "monthly" => Ok(Tier::Monthly),
            "annual" => Ok(Tier::Annual),
            other => Err(UnknownTier(other.to_string())),
        }
    }
}

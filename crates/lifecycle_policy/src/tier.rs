//! Storage tiers and their static monthly cost.

use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A cost/latency class for object storage.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StorageTier {
    /// Frequently accessed, standard storage.
    Hot,
    /// Infrequent access.
    Warm,
    /// Instant-retrieval archive.
    Cold,
    /// Flexible-retrieval archive.
    Glacier,
    /// Long-term archive with hours of retrieval latency.
    DeepArchive,
    /// Any tier name this build does not recognise. Never a move target.
    #[serde(other)]
    Unknown,
}

impl StorageTier {
    /// All tiers from warmest to coldest.
    pub const ALL: [Self; 5] = [
        Self::Hot,
        Self::Warm,
        Self::Cold,
        Self::Glacier,
        Self::DeepArchive,
    ];

    /// Monthly cost in USD per GB stored. Unknown tiers are priced as HOT.
    #[must_use]
    pub const fn cost_per_gb(self) -> f64 {
        match self {
            Self::Hot | Self::Unknown => 0.023,
            Self::Warm => 0.0125,
            Self::Cold => 0.004,
            Self::Glacier => 0.0036,
            Self::DeepArchive => 0.000_99,
        }
    }

    /// Coldness rank (higher = colder).
    #[must_use]
    pub const fn coldness(self) -> u8 {
        match self {
            Self::Hot | Self::Unknown => 0,
            Self::Warm => 1,
            Self::Cold => 2,
            Self::Glacier => 3,
            Self::DeepArchive => 4,
        }
    }

    /// Returns false for [`StorageTier::Unknown`].
    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Wire name of the tier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hot => "HOT",
            Self::Warm => "WARM",
            Self::Cold => "COLD",
            Self::Glacier => "GLACIER",
            Self::DeepArchive => "DEEP_ARCHIVE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for StorageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str() == normalized)
            .ok_or_else(|| Error::InvalidTier(s.to_string()))
    }
}

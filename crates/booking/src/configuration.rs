//! Closed configuration sets for rentable equipment.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BookingError;

/// Physical unit variant being rented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceConfiguration {
    Small,
    Medium,
    Large,
}

impl ResourceConfiguration {
    pub const ALL: [ResourceConfiguration; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Number of people the unit accommodates.
    pub fn capacity(&self) -> u32 {
        match self {
            ResourceConfiguration::Small => 2,
            ResourceConfiguration::Medium => 4,
            ResourceConfiguration::Large => 6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceConfiguration::Small => "small",
            ResourceConfiguration::Medium => "medium",
            ResourceConfiguration::Large => "large",
        }
    }
}

impl std::fmt::Display for ResourceConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceConfiguration {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BookingError::InvalidConfiguration(s.to_string()))
    }
}

/// Attachable option or consumable variant; the second pricing axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionConfiguration {
    None,
    Standard,
    Premium,
}

impl OptionConfiguration {
    pub const ALL: [OptionConfiguration; 3] = [Self::None, Self::Standard, Self::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionConfiguration::None => "none",
            OptionConfiguration::Standard => "standard",
            OptionConfiguration::Premium => "premium",
        }
    }
}

impl std::fmt::Display for OptionConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionConfiguration {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BookingError::InvalidConfiguration(s.to_string()))
    }
}

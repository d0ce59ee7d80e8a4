//! Vote weight policy.
//!
//! A vote counts for more when it comes through a paid channel.

use std::fmt;
use std::str::FromStr;

use mosaique_common::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Channel a vote was cast through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChannel {
    /// Free web vote.
    Free,
    /// Paid SMS vote.
    Sms,
    /// Premium vote.
    Premium,
}

impl VoteChannel {
    /// Weight credited to the nominee for one vote on this channel.
    #[must_use]
    pub const fn weight(self) -> u32 {
        match self {
            Self::Free => 1,
            Self::Sms => 3,
            Self::Premium => 5,
        }
    }

    /// Stable string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Sms => "sms",
            Self::Premium => "premium",
        }
    }
}

impl FromStr for VoteChannel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "sms" => Ok(Self::Sms),
            "premium" => Ok(Self::Premium),
            other => Err(AppError::InvalidChannel(other.to_string())),
        }
    }
}

impl fmt::Display for VoteChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the weight of a channel given by name.
pub fn weight_for(channel: &str) -> AppResult<u32> {
    channel.parse::<VoteChannel>().map(VoteChannel::weight)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_known_channel_weights() {
        assert_eq!(weight_for("free").unwrap(), 1);
        assert_eq!(weight_for("sms").unwrap(), 3);
        assert_eq!(weight_for("premium").unwrap(), 5);
    }

    #[test]
    fn test_unknown_channel() {
        let result = weight_for("carrier-pigeon");
        assert!(matches!(result, Err(AppError::InvalidChannel(c)) if c == "carrier-pigeon"));
    }

    #[test]
    fn test_channel_names_are_exact() {
        assert!(weight_for("SMS").is_err());
        assert!(weight_for(" free").is_err());
        assert!(weight_for("").is_err());
    }

    #[test]
    fn test_display_matches_parse() {
        for channel in [VoteChannel::Free, VoteChannel::Sms, VoteChannel::Premium] {
            assert_eq!(channel.to_string().parse::<VoteChannel>().unwrap(), channel);
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&VoteChannel::Premium).unwrap();
        assert_eq!(json, "\"premium\"");
    }
}

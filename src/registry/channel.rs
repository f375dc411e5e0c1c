//! Channel identifier type
//!
//! Channels are addressed by a caller-chosen integer. The registry puts no
//! constraint on its range; anything that parses as a signed 64-bit integer
//! is a valid channel.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Unique identifier for a live channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChannelId(i64);

impl ChannelId {
    /// Create a channel ID from its integer value
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the integer value
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for ChannelId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a string is not a valid channel ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseChannelIdError(ParseIntError);

impl fmt::Display for ParseChannelIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid channel id: {}", self.0)
    }
}

impl std::error::Error for ParseChannelIdError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for ChannelId {
    type Err = ParseChannelIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self).map_err(ParseChannelIdError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let id: ChannelId = "1234".parse().unwrap();
        assert_eq!(id.get(), 1234);
    }

    #[test]
    fn test_parse_signed() {
        assert_eq!("-7".parse::<ChannelId>().unwrap(), ChannelId::new(-7));
        assert_eq!("+7".parse::<ChannelId>().unwrap(), ChannelId::new(7));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<ChannelId>().is_err());
        assert!("abc".parse::<ChannelId>().is_err());
        assert!("12a".parse::<ChannelId>().is_err());
        assert!(" 12".parse::<ChannelId>().is_err());
        assert!("1.5".parse::<ChannelId>().is_err());
    }

    #[test]
    fn test_parse_overflow() {
        assert!("9223372036854775808".parse::<ChannelId>().is_err());
        assert_eq!(
            "9223372036854775807".parse::<ChannelId>().unwrap(),
            ChannelId::new(i64::MAX)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ChannelId::new(4321).to_string(), "4321");
        assert_eq!(ChannelId::from(-1).to_string(), "-1");
    }
}

//! Room key value object.
//!
//! A room is a logical broadcast group keyed by conversation context. Room
//! identity is a tagged variant rather than a raw string so the four key
//! families cannot collide; keys are formatted to wire strings (`user:1`,
//! `group:7`, `channel:3`, `voice:lobby`) only at the transport boundary.

use std::fmt;
use std::str::FromStr;

/// Maximum accepted length for a voice room name.
const MAX_VOICE_NAME_LEN: usize = 100;

/// Identifies a broadcast room.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoomKey {
    /// Personal room, auto-joined on connect; delivery target for direct
    /// messages addressed to this identity on any of its devices.
    User(i64),
    /// All live connections of a group's members that joined the group room.
    Group(i64),
    /// All live connections joined to a channel.
    Channel(i64),
    /// Ephemeral voice session, keyed by room name.
    Voice(String),
}

impl RoomKey {
    /// Personal room for an identity.
    pub fn user(id: i64) -> Self {
        RoomKey::User(id)
    }

    pub fn is_voice(&self) -> bool {
        matches!(self, RoomKey::Voice(_))
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomKey::User(id) => write!(f, "user:{}", id),
            RoomKey::Group(id) => write!(f, "group:{}", id),
            RoomKey::Channel(id) => write!(f, "channel:{}", id),
            RoomKey::Voice(name) => write!(f, "voice:{}", name),
        }
    }
}

/// Error parsing a wire room string.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RoomKeyError {
    #[error("unknown room family: {0}")]
    UnknownFamily(String),
    #[error("invalid room id: {0}")]
    InvalidId(String),
    #[error("invalid voice room name")]
    InvalidVoiceName,
}

impl FromStr for RoomKey {
    type Err = RoomKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (family, rest) = s
            .split_once(':')
            .ok_or_else(|| RoomKeyError::UnknownFamily(s.to_string()))?;

        let numeric = |rest: &str| {
            rest.parse::<i64>()
                .map_err(|_| RoomKeyError::InvalidId(rest.to_string()))
        };

        match family {
            "user" => Ok(RoomKey::User(numeric(rest)?)),
            "group" => Ok(RoomKey::Group(numeric(rest)?)),
            "channel" => Ok(RoomKey::Channel(numeric(rest)?)),
            "voice" => {
                if rest.is_empty() || rest.len() > MAX_VOICE_NAME_LEN {
                    return Err(RoomKeyError::InvalidVoiceName);
                }
                Ok(RoomKey::Voice(rest.to_string()))
            }
            other => Err(RoomKeyError::UnknownFamily(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats_wire_strings() {
        assert_eq!(RoomKey::User(1).to_string(), "user:1");
        assert_eq!(RoomKey::Group(42).to_string(), "group:42");
        assert_eq!(RoomKey::Channel(7).to_string(), "channel:7");
        assert_eq!(RoomKey::Voice("lobby".into()).to_string(), "voice:lobby");
    }

    #[test]
    fn test_parse_numeric_families() {
        assert_eq!("user:1".parse(), Ok(RoomKey::User(1)));
        assert_eq!("group:42".parse(), Ok(RoomKey::Group(42)));
        assert_eq!("channel:7".parse(), Ok(RoomKey::Channel(7)));
    }

    #[test]
    fn test_parse_voice_room() {
        assert_eq!("voice:lobby".parse(), Ok(RoomKey::Voice("lobby".into())));
    }

    #[test]
    fn test_parse_voice_name_with_colon() {
        // Everything after the first separator is the room name.
        assert_eq!(
            "voice:team:standup".parse(),
            Ok(RoomKey::Voice("team:standup".into()))
        );
    }

    #[test]
    fn test_parse_rejects_unknown_family() {
        assert_eq!(
            "session:5".parse::<RoomKey>(),
            Err(RoomKeyError::UnknownFamily("session".into()))
        );
        assert_eq!(
            "lobby".parse::<RoomKey>(),
            Err(RoomKeyError::UnknownFamily("lobby".into()))
        );
    }

    #[test]
    fn test_parse_rejects_non_numeric_id() {
        assert_eq!(
            "user:abc".parse::<RoomKey>(),
            Err(RoomKeyError::InvalidId("abc".into()))
        );
    }

    #[test]
    fn test_parse_rejects_empty_voice_name() {
        assert_eq!(
            "voice:".parse::<RoomKey>(),
            Err(RoomKeyError::InvalidVoiceName)
        );
    }

    #[test]
    fn test_roundtrip() {
        for key in [
            RoomKey::User(9),
            RoomKey::Group(3),
            RoomKey::Channel(12),
            RoomKey::Voice("standup".into()),
        ] {
            let parsed: RoomKey = key.to_string().parse().unwrap();
            assert_eq!(parsed, key);
        }
    }

    #[test]
    fn test_is_voice() {
        assert!(RoomKey::Voice("x".into()).is_voice());
        assert!(!RoomKey::User(1).is_voice());
    }
}

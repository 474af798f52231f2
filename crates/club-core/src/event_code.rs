//! Numeric event codes as the single source of truth for the wire identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifiers of every event kind, incoming and synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCode {
    ClientArrived,
    ClientSat,
    ClientWaiting,
    ClientLeft,
    ClientDeparted,
    ClientPromoted,
    Rejection,
}

impl EventCode {
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::ClientArrived => 1,
            Self::ClientSat => 2,
            Self::ClientWaiting => 3,
            Self::ClientLeft => 4,
            Self::ClientDeparted => 11,
            Self::ClientPromoted => 12,
            Self::Rejection => 13,
        }
    }

    /// Whether this code names a command the club accepts as input.
    pub const fn is_incoming(self) -> bool {
        matches!(
            self,
            Self::ClientArrived | Self::ClientSat | Self::ClientWaiting | Self::ClientLeft
        )
    }
}

impl fmt::Display for EventCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

impl TryFrom<u8> for EventCode {
    type Error = UnknownEventCode;

    fn try_from(code: u8) -> Result<Self, UnknownEventCode> {
        match code {
            1 => Ok(Self::ClientArrived),
            2 => Ok(Self::ClientSat),
            3 => Ok(Self::ClientWaiting),
            4 => Ok(Self::ClientLeft),
            11 => Ok(Self::ClientDeparted),
            12 => Ok(Self::ClientPromoted),
            13 => Ok(Self::Rejection),
            _ => Err(UnknownEventCode(code.to_string())),
        }
    }
}

impl FromStr for EventCode {
    type Err = UnknownEventCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u8>()
            .map_err(|_| UnknownEventCode(s.to_string()))
            .and_then(Self::try_from)
    }
}

impl Serialize for EventCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for EventCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let code = u8::deserialize(deserializer)?;
        Self::try_from(code).map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown event codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEventCode(String);

impl fmt::Display for UnknownEventCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event code: {}", self.0)
    }
}

impl std::error::Error for UnknownEventCode {}

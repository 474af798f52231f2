//! Timestamped club events: incoming commands and the notifications they produce.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clock::ClockValue;
use crate::event_code::EventCode;
use crate::types::{ClientName, TableId};

/// A single entry of the day's event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// When the event happened.
    pub time: ClockValue,
    /// What happened.
    #[serde(flatten)]
    pub kind: EventKind,
}

impl Event {
    pub const fn new(time: ClockValue, kind: EventKind) -> Self {
        Self { time, kind }
    }

    pub const fn code(&self) -> EventCode {
        self.kind.code()
    }
}

/// What an event records.
///
/// The first four variants arrive as input; the last three are synthesized by
/// the club while processing them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// A client walked in.
    Arrive { client: ClientName },
    /// A client asks for a specific table.
    Sit { client: ClientName, table: TableId },
    /// A client asks to wait for a free table.
    Wait { client: ClientName },
    /// A client walks out.
    Leave { client: ClientName },
    /// A client was made to leave: queue overflow or closing time.
    Departure { client: ClientName },
    /// The head of the waiting queue took a table that just became free.
    QueuePromotion { client: ClientName, table: TableId },
    /// A command was rejected.
    Error { code: ErrorCode },
}

impl EventKind {
    pub const fn code(&self) -> EventCode {
        match self {
            Self::Arrive { .. } => EventCode::ClientArrived,
            Self::Sit { .. } => EventCode::ClientSat,
            Self::Wait { .. } => EventCode::ClientWaiting,
            Self::Leave { .. } => EventCode::ClientLeft,
            Self::Departure { .. } => EventCode::ClientDeparted,
            Self::QueuePromotion { .. } => EventCode::ClientPromoted,
            Self::Error { .. } => EventCode::Rejection,
        }
    }

    /// The client this event is about, if any.
    pub const fn client(&self) -> Option<&ClientName> {
        match self {
            Self::Arrive { client }
            | Self::Sit { client, .. }
            | Self::Wait { client }
            | Self::Leave { client }
            | Self::Departure { client }
            | Self::QueuePromotion { client, .. } => Some(client),
            Self::Error { .. } => None,
        }
    }

    pub const fn table(&self) -> Option<TableId> {
        match self {
            Self::Sit { table, .. } | Self::QueuePromotion { table, .. } => Some(*table),
            _ => None,
        }
    }
}

/// Why a command was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Arrival outside opening hours.
    NotOpenYet,
    /// The client is already inside.
    YouShallNotPass,
    /// The client is not inside.
    ClientUnknown,
    /// The table is taken or does not exist.
    PlaceIsBusy,
    /// Waiting was requested while a table is free.
    #[serde(rename = "ICanWaitNoLonger!")]
    ICanWaitNoLonger,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotOpenYet => "NotOpenYet",
            Self::YouShallNotPass => "YouShallNotPass",
            Self::ClientUnknown => "ClientUnknown",
            Self::PlaceIsBusy => "PlaceIsBusy",
            Self::ICanWaitNoLonger => "ICanWaitNoLonger!",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders `HH:MM code [client] [table] [error]`.
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.time, self.code())?;
        if let Some(client) = self.kind.client() {
            write!(f, " {client}")?;
        }
        if let Some(table) = self.kind.table() {
            write!(f, " {table}")?;
        }
        if let EventKind::Error { code } = &self.kind {
            write!(f, " {code}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(name: &str) -> ClientName {
        ClientName::new(name).unwrap()
    }

    fn at(s: &str) -> ClockValue {
        s.parse().unwrap()
    }

    #[test]
    fn display_per_kind() {
        let sit = Event::new(
            at("09:54"),
            EventKind::Sit {
                client: client("client1"),
                table: TableId::new(1),
            },
        );
        assert_eq!(sit.to_string(), "09:54 2 client1 1");

        let departure = Event::new(
            at("19:00"),
            EventKind::Departure {
                client: client("client3"),
            },
        );
        assert_eq!(departure.to_string(), "19:00 11 client3");

        let promotion = Event::new(
            at("12:33"),
            EventKind::QueuePromotion {
                client: client("client4"),
                table: TableId::new(1),
            },
        );
        assert_eq!(promotion.to_string(), "12:33 12 client4 1");

        let error = Event::new(
            at("09:52"),
            EventKind::Error {
                code: ErrorCode::ICanWaitNoLonger,
            },
        );
        assert_eq!(error.to_string(), "09:52 13 ICanWaitNoLonger!");
    }

    #[test]
    fn error_codes_render_wire_strings() {
        assert_eq!(ErrorCode::NotOpenYet.to_string(), "NotOpenYet");
        assert_eq!(ErrorCode::YouShallNotPass.to_string(), "YouShallNotPass");
        assert_eq!(ErrorCode::ClientUnknown.to_string(), "ClientUnknown");
        assert_eq!(ErrorCode::PlaceIsBusy.to_string(), "PlaceIsBusy");
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let event = Event::new(
            at("12:33"),
            EventKind::QueuePromotion {
                client: client("client4"),
                table: TableId::new(1),
            },
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "time": "12:33",
                "type": "queue_promotion",
                "client": "client4",
                "table": 1
            })
        );

        let parsed: Event = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn error_event_serializes_wire_code() {
        let event = Event::new(
            at("09:52"),
            EventKind::Error {
                code: ErrorCode::ICanWaitNoLonger,
            },
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["code"], "ICanWaitNoLonger!");
    }
}

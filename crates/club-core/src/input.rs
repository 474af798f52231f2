//! Parser for the line-oriented day description.
//!
//! # Format
//!
//! ```text
//! 3                  table count
//! 09:00 19:00        opening and closing time
//! 10                 hourly rate
//! 08:48 1 client1    commands: time, code, client, and a table for code 2
//! 09:54 2 client1 1
//! ```
//!
//! Blank command lines are skipped. Commands must not go back in time.

use thiserror::Error;

use crate::club::ClubConfig;
use crate::clock::ClockValue;
use crate::event::{Event, EventKind};
use crate::event_code::EventCode;
use crate::types::{ClientName, TableId, ValidationError};

/// A fatal problem with the input; nothing should be reported for the day.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The input ended before the header was complete.
    #[error("line {line}: missing {what}")]
    Missing { line: usize, what: &'static str },

    /// A line could not be understood.
    #[error("line {line}: {reason}: {text}")]
    Malformed {
        line: usize,
        text: String,
        reason: String,
    },
}

/// A parsed day: its configuration and the commands to replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayInput {
    pub config: ClubConfig,
    pub commands: Vec<Event>,
}

/// Parses a complete day description.
pub fn parse_day(input: &str) -> Result<DayInput, InputError> {
    let mut lines = input.lines().enumerate().map(|(i, text)| (i + 1, text));

    let (line, text) = header_line(&mut lines, 1, "table count")?;
    let table_count = parse_table_count(text).map_err(|r| malformed(line, text, r))?;

    let (line, text) = header_line(&mut lines, 2, "working hours")?;
    let (open, close) = parse_hours(text).map_err(|r| malformed(line, text, r))?;

    let (line, text) = header_line(&mut lines, 3, "hourly rate")?;
    let hourly_rate = parse_positive(text, "hourly rate")
        .map_err(|r| malformed(line, text, r))?;

    let config = ClubConfig::new(table_count, open, close, hourly_rate)
        .map_err(|e| malformed(line, text, e.to_string()))?;

    let mut commands: Vec<Event> = Vec::new();
    for (line, text) in lines {
        if text.trim().is_empty() {
            continue;
        }
        let command = parse_command(text).map_err(|r| malformed(line, text, r))?;
        if let Some(previous) = commands.last() {
            if command.time < previous.time {
                return Err(malformed(
                    line,
                    text,
                    format!("time goes backwards from {}", previous.time),
                ));
            }
        }
        commands.push(command);
    }

    tracing::debug!(
        tables = table_count,
        %open,
        %close,
        hourly_rate,
        commands = commands.len(),
        "parsed day description"
    );
    Ok(DayInput { config, commands })
}

fn header_line<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
    expected: usize,
    what: &'static str,
) -> Result<(usize, &'a str), InputError> {
    lines.next().ok_or(InputError::Missing {
        line: expected,
        what,
    })
}

fn malformed(line: usize, text: &str, reason: impl Into<String>) -> InputError {
    InputError::Malformed {
        line,
        text: text.to_string(),
        reason: reason.into(),
    }
}

fn parse_positive(text: &str, field: &'static str) -> Result<u32, String> {
    let value: u32 = text
        .trim()
        .parse()
        .map_err(|_| format!("expected a positive integer {field}"))?;
    if value == 0 {
        return Err(ValidationError::NotPositive { field }.to_string());
    }
    Ok(value)
}

fn parse_table_count(text: &str) -> Result<u32, String> {
    let count = parse_positive(text, "table count")?;
    if count > ClubConfig::MAX_TABLES {
        return Err(ValidationError::TooLarge {
            field: "table count",
            max: ClubConfig::MAX_TABLES,
        }
        .to_string());
    }
    Ok(count)
}

fn parse_hours(text: &str) -> Result<(ClockValue, ClockValue), String> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let [open, close] = tokens.as_slice() else {
        return Err("expected opening and closing time".to_string());
    };
    let open = open.parse::<ClockValue>().map_err(|e| e.to_string())?;
    let close = close.parse::<ClockValue>().map_err(|e| e.to_string())?;
    if close <= open {
        return Err(ValidationError::ClosesBeforeOpening {
            open: open.to_string(),
            close: close.to_string(),
        }
        .to_string());
    }
    Ok((open, close))
}

fn parse_command(text: &str) -> Result<Event, String> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let [time, code, rest @ ..] = tokens.as_slice() else {
        return Err("expected time and event code".to_string());
    };

    let time = time.parse::<ClockValue>().map_err(|e| e.to_string())?;
    let code = code.parse::<EventCode>().map_err(|e| e.to_string())?;

    let kind = match (code, rest) {
        (EventCode::ClientArrived, [client]) => EventKind::Arrive {
            client: parse_client(client)?,
        },
        (EventCode::ClientSat, [client, table]) => EventKind::Sit {
            client: parse_client(client)?,
            table: parse_table(table)?,
        },
        (EventCode::ClientWaiting, [client]) => EventKind::Wait {
            client: parse_client(client)?,
        },
        (EventCode::ClientLeft, [client]) => EventKind::Leave {
            client: parse_client(client)?,
        },
        (code, _) if !code.is_incoming() => {
            return Err(format!("event code {code} is not accepted as input"));
        }
        (code, _) => return Err(format!("wrong number of fields for event code {code}")),
    };

    Ok(Event::new(time, kind))
}

/// Any integer is a table number; ones below 1 become id 0, which no table
/// has, so the club answers them with `PlaceIsBusy`.
fn parse_table(text: &str) -> Result<TableId, String> {
    let number = text
        .parse::<i32>()
        .map_err(|_| format!("invalid table number {text}"))?;
    Ok(TableId::new(u32::try_from(number).unwrap_or(0)))
}

fn parse_client(text: &str) -> Result<ClientName, String> {
    ClientName::new(text).map_err(|e| e.to_string())
}

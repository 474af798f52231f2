//! Core domain logic for the computer club day simulator.
//!
//! This crate contains the fundamental types and logic for:
//! - Clock values: hours:minutes times and the durations between them
//! - Club state: tables, clients inside, and the waiting queue
//! - Event processing: applying commands and synthesizing their consequences
//! - Closing: settling open sessions and producing the day report
//! - Input: parsing the line-oriented day description

mod closing;
mod processor;

pub mod clock;
pub mod club;
pub mod event;
pub mod event_code;
pub mod input;
pub mod types;

pub use clock::ClockValue;
pub use closing::{DayReport, simulate_day};
pub use club::{Club, ClubConfig, ClubError, InvariantViolation, Table, TableStats};
pub use event::{ErrorCode, Event, EventKind};
pub use event_code::{EventCode, UnknownEventCode};
pub use input::{DayInput, InputError, parse_day};
pub use types::{ClientName, TableId, ValidationError};

//! Club state: tables, the clients inside, and the waiting queue.

use std::collections::{BTreeSet, HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::ClockValue;
use crate::event::Event;
use crate::event_code::EventCode;
use crate::types::{ClientName, TableId, ValidationError};

/// Fixed parameters of a business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClubConfig {
    table_count: u32,
    open: ClockValue,
    close: ClockValue,
    hourly_rate: u32,
}

impl ClubConfig {
    /// Largest accepted table count.
    pub const MAX_TABLES: u32 = 100_000;

    /// Validates positive table count and rate, and `close > open`.
    pub fn new(
        table_count: u32,
        open: ClockValue,
        close: ClockValue,
        hourly_rate: u32,
    ) -> Result<Self, ValidationError> {
        if table_count == 0 {
            return Err(ValidationError::NotPositive {
                field: "table count",
            });
        }
        if table_count > Self::MAX_TABLES {
            return Err(ValidationError::TooLarge {
                field: "table count",
                max: Self::MAX_TABLES,
            });
        }
        if hourly_rate == 0 {
            return Err(ValidationError::NotPositive {
                field: "hourly rate",
            });
        }
        if close <= open {
            return Err(ValidationError::ClosesBeforeOpening {
                open: open.to_string(),
                close: close.to_string(),
            });
        }
        Ok(Self {
            table_count,
            open,
            close,
            hourly_rate,
        })
    }

    pub const fn table_count(&self) -> u32 {
        self.table_count
    }

    pub const fn open(&self) -> ClockValue {
        self.open
    }

    pub const fn close(&self) -> ClockValue {
        self.close
    }

    pub const fn hourly_rate(&self) -> u32 {
        self.hourly_rate
    }

    /// Whether arrivals are accepted at `time`: the half-open `[open, close)`.
    pub fn is_open_at(&self, time: ClockValue) -> bool {
        (self.open..self.close).contains(&time)
    }
}

/// A table and its running totals.
#[derive(Debug, Clone)]
pub struct Table {
    id: TableId,
    occupant: Option<ClientName>,
    occupied_since: ClockValue,
    revenue: u64,
    busy: ClockValue,
}

impl Table {
    const fn new(id: TableId) -> Self {
        Self {
            id,
            occupant: None,
            occupied_since: ClockValue::ZERO,
            revenue: 0,
            busy: ClockValue::ZERO,
        }
    }

    pub const fn id(&self) -> TableId {
        self.id
    }

    pub const fn occupant(&self) -> Option<&ClientName> {
        self.occupant.as_ref()
    }

    pub const fn is_free(&self) -> bool {
        self.occupant.is_none()
    }

    pub const fn revenue(&self) -> u64 {
        self.revenue
    }

    pub const fn busy(&self) -> ClockValue {
        self.busy
    }

    pub(crate) fn occupy(&mut self, client: ClientName, since: ClockValue) {
        self.occupant = Some(client);
        self.occupied_since = since;
    }

    /// Ends the current session at `until`, charging it and adding its raw
    /// length to the busy total. Returns the previous occupant.
    pub(crate) fn vacate(&mut self, until: ClockValue, hourly_rate: u32) -> Option<ClientName> {
        let client = self.occupant.take()?;
        let elapsed = until.elapsed_since(self.occupied_since);
        self.revenue += u64::from(elapsed.billed_hours()) * u64::from(hourly_rate);
        self.busy = self.busy + elapsed;
        Some(client)
    }

    pub fn stats(&self) -> TableStats {
        TableStats {
            id: self.id,
            revenue: self.revenue,
            busy: self.busy,
        }
    }
}

/// Final figures for one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStats {
    pub id: TableId,
    pub revenue: u64,
    pub busy: ClockValue,
}

/// Fatal processing errors. Domain rejections are events, not errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClubError {
    /// A synthesized event kind was submitted as a command.
    #[error("event code {code} is not an accepted command")]
    NotACommand { code: EventCode },
}

/// A broken consistency rule of the club state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("table {table} is occupied by {client}, who is not inside")]
    OccupantAbsent { table: TableId, client: ClientName },

    #[error("seating for {client} points at table {table}, which they do not occupy")]
    SeatingMismatch { client: ClientName, table: TableId },

    #[error("{occupied} occupied tables but {seated} seated clients")]
    SeatingCount { occupied: usize, seated: usize },

    #[error("waiting queue holds {len} clients with only {capacity} tables")]
    QueueOverflow { len: usize, capacity: u32 },

    #[error("{client} is in the waiting queue but not inside")]
    WaitingAbsent { client: ClientName },

    #[error("{client} is both seated and waiting")]
    SeatedAndWaiting { client: ClientName },

    #[error("{client} is in the waiting queue more than once")]
    DuplicateWaiting { client: ClientName },

    #[error("{actual} tables registered, expected {expected}")]
    TableCount { actual: usize, expected: u32 },
}

/// The mutable aggregate for one business day.
#[derive(Debug)]
pub struct Club {
    pub(crate) config: ClubConfig,
    pub(crate) tables: Vec<Table>,
    pub(crate) present: BTreeSet<ClientName>,
    pub(crate) seating: HashMap<ClientName, TableId>,
    pub(crate) queue: VecDeque<ClientName>,
    pub(crate) log: Vec<Event>,
}

impl Club {
    /// Opens a club with tables `1..=table_count`, all free.
    pub fn new(config: ClubConfig) -> Self {
        let tables = (1..=config.table_count())
            .map(|id| Table::new(TableId::new(id)))
            .collect();
        Self {
            config,
            tables,
            present: BTreeSet::new(),
            seating: HashMap::new(),
            queue: VecDeque::new(),
            log: Vec::new(),
        }
    }

    pub const fn config(&self) -> &ClubConfig {
        &self.config
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, id: TableId) -> Option<&Table> {
        id.index(self.config.table_count())
            .and_then(|index| self.tables.get(index))
    }

    pub(crate) fn table_mut(&mut self, id: TableId) -> Option<&mut Table> {
        id.index(self.config.table_count())
            .and_then(|index| self.tables.get_mut(index))
    }

    pub fn is_present(&self, client: &ClientName) -> bool {
        self.present.contains(client)
    }

    /// Clients inside, in name order.
    pub fn present(&self) -> impl Iterator<Item = &ClientName> {
        self.present.iter()
    }

    pub fn table_of(&self, client: &ClientName) -> Option<TableId> {
        self.seating.get(client).copied()
    }

    pub fn is_waiting(&self, client: &ClientName) -> bool {
        self.queue.contains(client)
    }

    /// The waiting queue, head first.
    pub fn waiting(&self) -> impl Iterator<Item = &ClientName> {
        self.queue.iter()
    }

    pub fn free_table_count(&self) -> usize {
        self.tables.iter().filter(|t| t.is_free()).count()
    }

    pub fn log(&self) -> &[Event] {
        &self.log
    }

    pub fn table_stats(&self) -> Vec<TableStats> {
        self.tables.iter().map(Table::stats).collect()
    }

    /// Checks every consistency rule of the club state.
    pub fn verify_invariants(&self) -> Result<(), InvariantViolation> {
        let expected = self.config.table_count();
        if u32::try_from(self.tables.len()).ok() != Some(expected) {
            return Err(InvariantViolation::TableCount {
                actual: self.tables.len(),
                expected,
            });
        }

        let mut occupied = 0;
        for table in &self.tables {
            let Some(client) = table.occupant() else {
                continue;
            };
            occupied += 1;
            if !self.present.contains(client) {
                return Err(InvariantViolation::OccupantAbsent {
                    table: table.id(),
                    client: client.clone(),
                });
            }
            if self.seating.get(client) != Some(&table.id()) {
                return Err(InvariantViolation::SeatingMismatch {
                    client: client.clone(),
                    table: table.id(),
                });
            }
        }
        if occupied != self.seating.len() {
            return Err(InvariantViolation::SeatingCount {
                occupied,
                seated: self.seating.len(),
            });
        }

        if self.queue.len() > self.tables.len() {
            return Err(InvariantViolation::QueueOverflow {
                len: self.queue.len(),
                capacity: expected,
            });
        }

        let mut seen = BTreeSet::new();
        for client in &self.queue {
            if !self.present.contains(client) {
                return Err(InvariantViolation::WaitingAbsent {
                    client: client.clone(),
                });
            }
            if self.seating.contains_key(client) {
                return Err(InvariantViolation::SeatedAndWaiting {
                    client: client.clone(),
                });
            }
            if !seen.insert(client) {
                return Err(InvariantViolation::DuplicateWaiting {
                    client: client.clone(),
                });
            }
        }

        Ok(())
    }
}

//! End-of-day settlement and the final report.

use serde::{Deserialize, Serialize};

use crate::clock::ClockValue;
use crate::club::{Club, ClubConfig, ClubError, TableStats};
use crate::event::{Event, EventKind};

/// Everything the day produced, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayReport {
    /// Opening time.
    pub open: ClockValue,
    /// Closing time.
    pub close: ClockValue,
    /// Every command received, each followed by the events it caused, then
    /// the closing-time departures.
    pub events: Vec<Event>,
    /// Per-table totals in table order.
    pub tables: Vec<TableStats>,
}

impl Club {
    /// Closes the club: everyone still inside leaves at closing time, in name
    /// order, and open sessions are billed up to closing time.
    pub fn close_day(mut self) -> DayReport {
        let close = self.config.close();
        let hourly_rate = self.config.hourly_rate();

        self.queue.clear();
        let remaining = std::mem::take(&mut self.present);
        tracing::debug!(%close, remaining = remaining.len(), "closing");

        for client in remaining {
            let seat = self.seating.remove(&client);
            if let Some(slot) = seat.and_then(|table| self.table_mut(table)) {
                slot.vacate(close, hourly_rate);
            }
            self.log.push(Event::new(close, EventKind::Departure { client }));
        }

        DayReport {
            open: self.config.open(),
            close,
            tables: self.table_stats(),
            events: self.log,
        }
    }
}

/// Runs a whole day: applies `commands` in order, then closes.
pub fn simulate_day(
    config: ClubConfig,
    commands: impl IntoIterator<Item = Event>,
) -> Result<DayReport, ClubError> {
    let mut club = Club::new(config);
    for command in commands {
        club.apply(command)?;
    }
    Ok(club.close_day())
}

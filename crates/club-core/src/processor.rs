//! Applies incoming commands to the club state.
//!
//! Every command is appended to the event log as received, followed by the
//! events it causes. Rejections are recorded as [`EventKind::Error`] entries;
//! only a non-command event kind is a hard error.

use crate::clock::ClockValue;
use crate::club::{Club, ClubError};
use crate::event::{ErrorCode, Event, EventKind};
use crate::types::{ClientName, TableId};

impl Club {
    /// Processes one command and returns the events it synthesized.
    ///
    /// Commands must arrive in non-decreasing time order; this is not checked.
    pub fn apply(&mut self, event: Event) -> Result<Vec<Event>, ClubError> {
        let time = event.time;
        let mut emitted = Vec::new();
        match &event.kind {
            EventKind::Arrive { client } => self.arrive(time, client, &mut emitted),
            EventKind::Sit { client, table } => self.sit(time, client, *table, &mut emitted),
            EventKind::Wait { client } => self.wait(time, client, &mut emitted),
            EventKind::Leave { client } => self.leave(time, client, &mut emitted),
            EventKind::Departure { .. }
            | EventKind::QueuePromotion { .. }
            | EventKind::Error { .. } => {
                return Err(ClubError::NotACommand { code: event.code() });
            }
        }

        self.log.push(event);
        self.log.extend(emitted.iter().cloned());

        debug_assert!(
            self.verify_invariants().is_ok(),
            "club invariants broken: {:?}",
            self.verify_invariants()
        );
        Ok(emitted)
    }

    fn arrive(&mut self, time: ClockValue, client: &ClientName, out: &mut Vec<Event>) {
        if !self.config.is_open_at(time) {
            return reject(time, ErrorCode::NotOpenYet, out);
        }
        if self.is_present(client) {
            return reject(time, ErrorCode::YouShallNotPass, out);
        }
        tracing::debug!(%time, %client, "client arrived");
        self.present.insert(client.clone());
    }

    fn sit(
        &mut self,
        time: ClockValue,
        client: &ClientName,
        table: TableId,
        out: &mut Vec<Event>,
    ) {
        if !self.is_present(client) {
            return reject(time, ErrorCode::ClientUnknown, out);
        }
        let Some(index) = table
            .index(self.config.table_count())
            .filter(|&index| self.tables[index].is_free())
        else {
            return reject(time, ErrorCode::PlaceIsBusy, out);
        };

        self.queue.retain(|waiting| waiting != client);
        if let Some(previous) = self.seating.remove(client) {
            tracing::debug!(
                %time,
                %client,
                from = %previous,
                to = %table,
                "client changed tables"
            );
            self.release_table(previous, time, out);
        }

        self.tables[index].occupy(client.clone(), time);
        self.seating.insert(client.clone(), table);
        tracing::debug!(%time, %client, %table, "client seated");
    }

    fn wait(&mut self, time: ClockValue, client: &ClientName, out: &mut Vec<Event>) {
        if !self.is_present(client) {
            return reject(time, ErrorCode::ClientUnknown, out);
        }
        if self.free_table_count() > 0 {
            return reject(time, ErrorCode::ICanWaitNoLonger, out);
        }
        if self.seating.contains_key(client) || self.is_waiting(client) {
            tracing::debug!(%time, %client, "client already seated or waiting");
            return;
        }

        if self.queue.len() >= self.tables.len() {
            tracing::debug!(%time, %client, "waiting queue full, client sent away");
            self.present.remove(client);
            out.push(Event::new(
                time,
                EventKind::Departure {
                    client: client.clone(),
                },
            ));
            return;
        }

        tracing::debug!(%time, %client, position = self.queue.len() + 1, "client queued");
        self.queue.push_back(client.clone());
    }

    fn leave(&mut self, time: ClockValue, client: &ClientName, out: &mut Vec<Event>) {
        if !self.is_present(client) {
            return reject(time, ErrorCode::ClientUnknown, out);
        }
        if let Some(table) = self.seating.remove(client) {
            self.release_table(table, time, out);
        } else {
            self.queue.retain(|waiting| waiting != client);
        }
        self.present.remove(client);
        tracing::debug!(%time, %client, "client left");
    }

    /// Bills and frees `table`, then hands it to the head of the queue.
    fn release_table(&mut self, table: TableId, time: ClockValue, out: &mut Vec<Event>) {
        let hourly_rate = self.config.hourly_rate();
        let Some(slot) = table
            .index(self.config.table_count())
            .and_then(|index| self.tables.get_mut(index))
        else {
            return;
        };
        slot.vacate(time, hourly_rate);

        let Some(next) = self.queue.pop_front() else {
            return;
        };
        slot.occupy(next.clone(), time);
        self.seating.insert(next.clone(), table);
        tracing::debug!(%time, client = %next, %table, "client promoted from queue");
        out.push(Event::new(
            time,
            EventKind::QueuePromotion {
                client: next,
                table,
            },
        ));
    }
}

fn reject(time: ClockValue, code: ErrorCode, out: &mut Vec<Event>) {
    tracing::debug!(%time, %code, "command rejected");
    out.push(Event::new(time, EventKind::Error { code }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::ClubConfig;

    fn at(s: &str) -> ClockValue {
        s.parse().unwrap()
    }

    fn name(s: &str) -> ClientName {
        ClientName::new(s).unwrap()
    }

    fn club(tables: u32) -> Club {
        Club::new(ClubConfig::new(tables, at("09:00"), at("19:00"), 10).unwrap())
    }

    fn arrive(time: &str, client: &str) -> Event {
        Event::new(
            at(time),
            EventKind::Arrive {
                client: name(client),
            },
        )
    }

    fn sit(time: &str, client: &str, table: u32) -> Event {
        Event::new(
            at(time),
            EventKind::Sit {
                client: name(client),
                table: TableId::new(table),
            },
        )
    }

    fn wait(time: &str, client: &str) -> Event {
        Event::new(
            at(time),
            EventKind::Wait {
                client: name(client),
            },
        )
    }

    fn leave(time: &str, client: &str) -> Event {
        Event::new(
            at(time),
            EventKind::Leave {
                client: name(client),
            },
        )
    }

    fn error(time: &str, code: ErrorCode) -> Event {
        Event::new(at(time), EventKind::Error { code })
    }

    #[test]
    fn arrival_before_opening_is_rejected() {
        let mut club = club(1);
        let out = club.apply(arrive("08:48", "client1")).unwrap();
        assert_eq!(out, [error("08:48", ErrorCode::NotOpenYet)]);
        assert!(!club.is_present(&name("client1")));
    }

    #[test]
    fn arrival_at_closing_time_is_rejected() {
        let mut club = club(1);
        let out = club.apply(arrive("19:00", "late")).unwrap();
        assert_eq!(out, [error("19:00", ErrorCode::NotOpenYet)]);
    }

    #[test]
    fn arrival_at_opening_time_is_accepted() {
        let mut club = club(1);
        assert!(club.apply(arrive("09:00", "early")).unwrap().is_empty());
        assert!(club.is_present(&name("early")));
    }

    #[test]
    fn double_arrival_is_rejected() {
        let mut club = club(1);
        club.apply(arrive("10:00", "a")).unwrap();
        let out = club.apply(arrive("10:05", "a")).unwrap();
        assert_eq!(out, [error("10:05", ErrorCode::YouShallNotPass)]);
    }

    #[test]
    fn sit_requires_presence() {
        let mut club = club(1);
        let out = club.apply(sit("10:00", "nobody", 1)).unwrap();
        assert_eq!(out, [error("10:00", ErrorCode::ClientUnknown)]);
    }

    #[test]
    fn sit_rejects_busy_and_missing_tables() {
        let mut club = club(2);
        club.apply(arrive("10:00", "a")).unwrap();
        club.apply(arrive("10:01", "b")).unwrap();
        club.apply(sit("10:02", "a", 1)).unwrap();

        let out = club.apply(sit("10:03", "b", 1)).unwrap();
        assert_eq!(out, [error("10:03", ErrorCode::PlaceIsBusy)]);
        let out = club.apply(sit("10:04", "b", 0)).unwrap();
        assert_eq!(out, [error("10:04", ErrorCode::PlaceIsBusy)]);
        let out = club.apply(sit("10:05", "b", 3)).unwrap();
        assert_eq!(out, [error("10:05", ErrorCode::PlaceIsBusy)]);
        let out = club.apply(sit("10:06", "a", 1)).unwrap();
        assert_eq!(out, [error("10:06", ErrorCode::PlaceIsBusy)]);
    }

    #[test]
    fn changing_tables_bills_the_previous_one() {
        let mut club = club(2);
        club.apply(arrive("10:00", "a")).unwrap();
        club.apply(sit("10:00", "a", 1)).unwrap();
        assert!(club.apply(sit("11:30", "a", 2)).unwrap().is_empty());

        let first = club.table(TableId::new(1)).unwrap();
        assert!(first.is_free());
        assert_eq!(first.revenue(), 20);
        assert_eq!(first.busy(), at("01:30"));
        assert_eq!(club.table_of(&name("a")), Some(TableId::new(2)));
    }

    #[test]
    fn wait_is_rejected_while_a_table_is_free() {
        let mut club = club(2);
        club.apply(arrive("10:00", "a")).unwrap();
        club.apply(sit("10:00", "a", 1)).unwrap();
        club.apply(arrive("10:10", "b")).unwrap();
        let out = club.apply(wait("10:11", "b")).unwrap();
        assert_eq!(out, [error("10:11", ErrorCode::ICanWaitNoLonger)]);
        assert!(!club.is_waiting(&name("b")));
    }

    #[test]
    fn wait_requires_presence() {
        let mut club = club(1);
        let out = club.apply(wait("10:00", "ghost")).unwrap();
        assert_eq!(out, [error("10:00", ErrorCode::ClientUnknown)]);
    }

    #[test]
    fn seated_client_waiting_keeps_their_table() {
        let mut club = club(1);
        club.apply(arrive("09:41", "client1")).unwrap();
        club.apply(sit("09:48", "client1", 1)).unwrap();
        assert!(club.apply(wait("09:52", "client1")).unwrap().is_empty());
        assert_eq!(club.table_of(&name("client1")), Some(TableId::new(1)));
        assert!(!club.is_waiting(&name("client1")));
    }

    #[test]
    fn queued_client_is_promoted_when_table_frees() {
        let mut club = club(1);
        club.apply(arrive("10:00", "a")).unwrap();
        club.apply(sit("10:00", "a", 1)).unwrap();
        club.apply(arrive("10:30", "b")).unwrap();
        assert!(club.apply(wait("10:31", "b")).unwrap().is_empty());
        assert!(club.is_waiting(&name("b")));

        let out = club.apply(leave("11:15", "a")).unwrap();
        assert_eq!(
            out,
            [Event::new(
                at("11:15"),
                EventKind::QueuePromotion {
                    client: name("b"),
                    table: TableId::new(1)
                }
            )]
        );
        assert_eq!(club.table_of(&name("b")), Some(TableId::new(1)));
        assert!(!club.is_present(&name("a")));

        let table = club.table(TableId::new(1)).unwrap();
        assert_eq!(table.revenue(), 20);
        assert_eq!(table.busy(), at("01:15"));
    }

    #[test]
    fn full_queue_sends_client_away() {
        let mut club = club(1);
        club.apply(arrive("10:00", "a")).unwrap();
        club.apply(sit("10:00", "a", 1)).unwrap();
        club.apply(arrive("10:01", "b")).unwrap();
        club.apply(wait("10:02", "b")).unwrap();
        club.apply(arrive("10:03", "c")).unwrap();

        let out = club.apply(wait("10:04", "c")).unwrap();
        let departure = Event::new(
            at("10:04"),
            EventKind::Departure {
                client: name("c"),
            },
        );
        assert_eq!(out, [departure]);
        assert!(!club.is_present(&name("c")));
        assert_eq!(club.waiting().count(), 1);
    }

    #[test]
    fn waiting_client_leaving_drops_out_of_queue() {
        let mut club = club(1);
        club.apply(arrive("10:00", "a")).unwrap();
        club.apply(sit("10:00", "a", 1)).unwrap();
        club.apply(arrive("10:01", "b")).unwrap();
        club.apply(wait("10:02", "b")).unwrap();

        assert!(club.apply(leave("10:30", "b")).unwrap().is_empty());
        assert_eq!(club.waiting().count(), 0);

        assert!(club.apply(leave("11:00", "a")).unwrap().is_empty());
        assert_eq!(club.free_table_count(), 1);
    }

    #[test]
    fn leave_requires_presence() {
        let mut club = club(1);
        let out = club.apply(leave("10:00", "ghost")).unwrap();
        assert_eq!(out, [error("10:00", ErrorCode::ClientUnknown)]);
    }

    #[test]
    fn unseated_client_leaving_bills_nothing() {
        let mut club = club(1);
        club.apply(arrive("10:00", "a")).unwrap();
        club.apply(leave("12:00", "a")).unwrap();
        assert_eq!(club.table(TableId::new(1)).unwrap().revenue(), 0);
    }

    #[test]
    fn outgoing_kinds_are_not_commands() {
        let mut club = club(1);
        let departure = Event::new(
            at("10:00"),
            EventKind::Departure {
                client: name("a"),
            },
        );
        let err = club.apply(departure).unwrap_err();
        assert_eq!(
            err,
            ClubError::NotACommand {
                code: crate::EventCode::ClientDeparted
            }
        );
        assert!(club.log().is_empty());
    }

    #[test]
    fn log_keeps_command_before_its_consequences() {
        let mut club = club(1);
        club.apply(arrive("08:48", "client1")).unwrap();
        club.apply(arrive("09:41", "client1")).unwrap();
        let codes: Vec<u8> = club.log().iter().map(|e| e.code().as_u8()).collect();
        assert_eq!(codes, [1, 13, 1]);
    }

    #[test]
    fn revenue_only_grows_in_rate_multiples() {
        let mut club = club(2);
        let commands = [
            arrive("09:10", "a"),
            sit("09:10", "a", 1),
            arrive("09:20", "b"),
            sit("09:20", "b", 2),
            sit("10:45", "a", 2),
            leave("11:00", "b"),
            sit("11:01", "a", 2),
            arrive("12:00", "c"),
            sit("12:00", "c", 1),
            leave("12:59", "c"),
        ];

        let mut previous: Vec<u64> = vec![0; 2];
        for command in commands {
            club.apply(command).unwrap();
            club.verify_invariants().unwrap();
            for (table, before) in club.tables().iter().zip(previous.iter_mut()) {
                assert!(table.revenue() >= *before);
                assert_eq!((table.revenue() - *before) % 10, 0);
                *before = table.revenue();
            }
        }
    }

    #[test]
    fn invariants_hold_across_a_busy_day() {
        let mut club = club(3);
        let names = ["a", "b", "c", "d", "e", "f", "g", "h"];
        let mut seed: u32 = 0x2545_f491;
        let mut next = |bound: u32| {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            seed % bound
        };

        for minute in 0..600 {
            let time = ClockValue::from_minutes(i64::from(8 * 60 + minute));
            let client = name(names[next(8) as usize]);
            let kind = match next(4) {
                0 => EventKind::Arrive { client },
                1 => EventKind::Sit {
                    client,
                    table: TableId::new(next(5)),
                },
                2 => EventKind::Wait { client },
                _ => EventKind::Leave { client },
            };
            club.apply(Event::new(time, kind)).unwrap();

            club.verify_invariants().unwrap();
            assert!(club.waiting().count() <= 3);
            if club.free_table_count() > 0 {
                assert_eq!(club.waiting().count(), 0);
            }
        }
    }
}

//! [`ReservationBook`] definitions.

use std::collections::{BTreeMap, HashSet};

use common::DateTimeOf;

use crate::domain::{court, reservation, Reservation};

/// Locally known [`Reservation`]s keyed by their IDs, with the ones of the
/// authenticated user flagged.
///
/// Every mutation goes through this type, so the "mine" view can never
/// diverge from the availability one.
#[derive(Clone, Debug, Default)]
pub struct ReservationBook {
    /// All the known [`Reservation`]s.
    all: BTreeMap<reservation::Id, Reservation>,

    /// IDs of the [`Reservation`]s made by the authenticated user.
    mine: HashSet<reservation::Id>,
}

impl ReservationBook {
    /// Replaces the whole contents of this [`ReservationBook`].
    pub fn reset(
        &mut self,
        all: impl IntoIterator<Item = Reservation>,
        mine: impl IntoIterator<Item = Reservation>,
    ) {
        self.all.clear();
        self.mine.clear();
        for r in all {
            drop(self.all.insert(r.id, r));
        }
        for r in mine {
            self.insert(r, true);
        }
    }

    /// Adds the provided [`Reservation`], optionally flagging it as the user's
    /// own.
    pub fn insert(&mut self, reservation: Reservation, mine: bool) {
        if mine {
            drop(self.mine.insert(reservation.id));
        }
        drop(self.all.insert(reservation.id, reservation));
    }

    /// Replaces the stored [`Reservation`] having the same ID.
    ///
    /// Returns `false` if no such [`Reservation`] is known.
    pub fn replace(&mut self, reservation: Reservation) -> bool {
        match self.all.get_mut(&reservation.id) {
            Some(r) => {
                *r = reservation;
                true
            }
            None => false,
        }
    }

    /// Removes the [`Reservation`] with the provided ID.
    pub fn remove(&mut self, id: reservation::Id) -> Option<Reservation> {
        drop(self.mine.remove(&id));
        self.all.remove(&id)
    }

    /// Returns the [`Reservation`] with the provided ID, if known.
    #[must_use]
    pub fn get(&self, id: reservation::Id) -> Option<&Reservation> {
        self.all.get(&id)
    }

    /// Indicates whether the [`Reservation`] with the provided ID belongs to
    /// the authenticated user.
    #[must_use]
    pub fn is_mine(&self, id: reservation::Id) -> bool {
        self.mine.contains(&id)
    }

    /// Iterates over all the known [`Reservation`]s.
    pub fn iter(&self) -> impl Iterator<Item = &Reservation> + '_ {
        self.all.values()
    }

    /// Returns the [`Reservation`]s of the authenticated user ordered by their
    /// start time.
    #[must_use]
    pub fn mine(&self) -> Vec<&Reservation> {
        let mut mine = self
            .all
            .values()
            .filter(|r| self.mine.contains(&r.id))
            .collect::<Vec<_>>();
        mine.sort_by_key(|r| (r.start_time, r.id));
        mine
    }

    /// Counts the not yet finalized [`Reservation`]s of the authenticated
    /// user.
    #[must_use]
    pub fn active_mine_count<Of: ?Sized>(&self, now: DateTimeOf<Of>) -> usize {
        self.mine
            .iter()
            .filter_map(|id| self.all.get(id))
            .filter(|r| !r.is_finalized(now))
            .count()
    }

    /// Returns the [`Reservation`] occupying the provided court at the
    /// provided instant, ignoring the `except`ed one.
    #[must_use]
    pub fn conflict(
        &self,
        court_id: court::Id,
        at: reservation::StartDateTime,
        except: Option<reservation::Id>,
    ) -> Option<&Reservation> {
        self.all
            .values()
            .filter(|r| Some(r.id) != except)
            .find(|r| r.occupies(court_id, at))
    }

    /// Returns the number of known [`Reservation`]s.
    #[must_use]
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Indicates whether no [`Reservation`]s are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use common::DateTime;
    use serde_json::json;

    use crate::domain::Reservation;

    use super::ReservationBook;

    fn reservation(id: i64, court: i64, at: &str) -> Reservation {
        serde_json::from_value(json!({
            "id": id,
            "court": { "id": court, "name": format!("Quadra {court}") },
            "startTime": at,
        }))
        .unwrap()
    }

    #[test]
    fn keeps_mine_in_sync_with_all() {
        let mut book = ReservationBook::default();
        book.reset(
            [
                reservation(1, 1, "2024-06-15T10:00:00.000Z"),
                reservation(2, 1, "2024-06-15T11:00:00.000Z"),
            ],
            [reservation(2, 1, "2024-06-15T11:00:00.000Z")],
        );

        assert_eq!(book.len(), 2);
        assert!(book.is_mine(2.into()));
        assert!(!book.is_mine(1.into()));

        drop(book.remove(2.into()));
        assert!(book.mine().is_empty());
        assert!(!book.is_mine(2.into()));
    }

    #[test]
    fn detects_conflicts_except_the_edited_one() {
        let mut book = ReservationBook::default();
        let r = reservation(1, 3, "2024-06-15T10:00:00.000Z");
        let at = r.start_time;
        book.insert(r, true);

        assert!(book.conflict(3.into(), at, None).is_some());
        assert!(book.conflict(4.into(), at, None).is_none());
        assert!(book.conflict(3.into(), at, Some(1.into())).is_none());
    }

    #[test]
    fn counts_only_active_reservations() {
        let mut book = ReservationBook::default();
        book.insert(reservation(1, 1, "2024-06-15T10:00:00.000Z"), true);
        book.insert(reservation(2, 1, "2024-06-15T12:00:00.000Z"), true);
        book.insert(reservation(3, 2, "2024-06-15T12:00:00.000Z"), false);

        let now = DateTime::from_rfc3339("2024-06-15T11:00:00Z").unwrap();
        assert_eq!(book.active_mine_count(now), 1);
        assert_eq!(book.active_mine_count(now - Duration::from_secs(7200)), 2);
    }
}

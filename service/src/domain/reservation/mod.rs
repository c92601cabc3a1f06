//! [`Reservation`] definitions.

pub mod slot;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

use crate::domain::{court, user, Court};

pub use self::slot::Slot;

/// Booking of a [`Court`] for one [`Slot`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    /// ID of this [`Reservation`].
    pub id: Id,

    /// [`Court`] being reserved.
    pub court: Court,

    /// [`User`] who made this [`Reservation`], if the server disclosed it.
    ///
    /// [`User`]: crate::domain::User
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<user::Ref>,

    /// [`DateTime`] this [`Reservation`] starts at.
    #[serde(with = "common::datetime::serde::iso8601")]
    pub start_time: StartDateTime,
}

impl Reservation {
    /// Indicates whether this [`Reservation`] has already started, and so is
    /// read-only.
    #[must_use]
    pub fn is_finalized<Of: ?Sized>(&self, now: DateTimeOf<Of>) -> bool {
        self.start_time < now.coerce()
    }

    /// Indicates whether this [`Reservation`] occupies the provided [`Court`]
    /// at the provided instant.
    #[must_use]
    pub fn occupies(&self, court_id: court::Id, at: StartDateTime) -> bool {
        self.court.id == court_id && self.start_time == at
    }
}

/// ID of a [`Reservation`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(transparent)]
pub struct Id(i64);

/// [`DateTime`] when a [`Reservation`] starts.
pub type StartDateTime = DateTimeOf<(Reservation, unit::Start)>;

/// Payload of a [`Reservation`] to be created.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct New {
    /// ID of the [`Court`] to reserve.
    pub court_id: court::Id,

    /// [`DateTime`] the new [`Reservation`] starts at.
    #[serde(with = "common::datetime::serde::iso8601")]
    pub start_time: StartDateTime,
}

/// Rescheduling of an existing [`Reservation`].
///
/// Only the start time may change, the [`Court`] stays the same.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    /// ID of the [`Reservation`] to reschedule.
    #[serde(skip)]
    pub id: Id,

    /// New [`DateTime`] the [`Reservation`] starts at.
    #[serde(with = "common::datetime::serde::iso8601")]
    pub start_time: StartDateTime,
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use common::{datetime::parse_date, DateTime};
    use serde_json::json;

    use super::{New, Reservation, Slot};

    #[test]
    fn serializes_new_reservation_in_wire_format() {
        let date = parse_date("2024-06-15").unwrap();
        let new = New {
            court_id: 3.into(),
            start_time: "10:00".parse::<Slot>().unwrap().at(date),
        };

        assert_eq!(
            serde_json::to_value(new).unwrap(),
            json!({ "courtId": 3, "startTime": "2024-06-15T10:00:00.000Z" }),
        );
    }

    #[test]
    fn finalizes_once_started() {
        let r: Reservation = serde_json::from_value(json!({
            "id": 1,
            "court": { "id": 3, "name": "Quadra 3" },
            "user": { "id": 7 },
            "startTime": "2024-06-15T10:00:00.000Z",
        }))
        .unwrap();

        let start: DateTime = r.start_time.coerce();
        assert!(!r.is_finalized(start - Duration::from_secs(1)));
        assert!(!r.is_finalized(start));
        assert!(r.is_finalized(start + Duration::from_secs(1)));
        assert!(r.occupies(3.into(), r.start_time));
        assert!(!r.occupies(4.into(), r.start_time));
    }
}

//! [`Tournament`] definitions.

pub mod registration;

use common::{datetime, Date, DateTime};
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::user::Gender;

pub use self::registration::Registration;

/// Sports tournament organized by the club.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    /// ID of this [`Tournament`].
    pub id: Id,

    /// Display name of this [`Tournament`].
    pub name: String,

    /// [`Date`] this [`Tournament`] takes place.
    #[serde(with = "lenient_date")]
    pub date: Date,

    /// Kind of this [`Tournament`] (sport, format).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Categories participants may register into.
    ///
    /// Empty if this [`Tournament`] doesn't split participants by category.
    #[serde(default)]
    pub categories: Vec<String>,

    /// Indicator whether new [`Registration`]s are accepted.
    #[serde(default)]
    pub is_registration_open: bool,

    /// Indicator whether this [`Tournament`] is published.
    #[serde(default)]
    pub is_active: bool,

    /// Free-form status of this [`Tournament`] (`"finalizado"`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Maximum number of [`Registration`]s, if limited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,

    /// Maximum number of [`Registration`]s per [`Gender`], if limited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_participants_by_gender: Option<GenderCaps>,

    /// [`Registration`]s of this [`Tournament`] known to the client.
    #[serde(default)]
    pub registrations: Vec<Registration>,

    /// Place this [`Tournament`] is held at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Time of the day this [`Tournament`] starts at, as announced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    /// Description of this [`Tournament`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Tournament {
    /// [`Tournament::status`] of a [`Tournament`] which has ended.
    pub const FINALIZED: &'static str = "finalizado";

    /// Indicates whether this [`Tournament`] has already taken place relative
    /// to the provided `today`, or was explicitly finalized.
    #[must_use]
    pub fn is_past(&self, today: Date) -> bool {
        self.date < today || self.status.as_deref() == Some(Self::FINALIZED)
    }

    /// Indicates whether this [`Tournament`] is published and still ahead of
    /// (or on) the provided `today`.
    #[must_use]
    pub fn is_upcoming(&self, today: Date) -> bool {
        self.is_active && self.date >= today
    }

    /// Indicates whether this [`Tournament`] accepts no more [`Registration`]s
    /// because [`Tournament::max_participants`] is reached.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.max_participants
            .is_some_and(|max| max > 0 && self.participants() >= max)
    }

    /// Returns the number of [`Registration`]s of this [`Tournament`].
    #[must_use]
    pub fn participants(&self) -> u32 {
        u32::try_from(self.registrations.len()).unwrap_or(u32::MAX)
    }

    /// Returns the number of [`Registration`]s of the provided [`Gender`].
    #[must_use]
    pub fn participants_of(&self, gender: Gender) -> u32 {
        let count = self
            .registrations
            .iter()
            .filter(|r| r.gender == Some(gender))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

/// ID of a [`Tournament`].
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

/// Lightweight reference to a [`Tournament`] embedded into other records.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Ref {
    /// ID of the referenced [`Tournament`].
    pub id: Id,

    /// Name of the referenced [`Tournament`], if the server provided it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Per-[`Gender`] participant caps of a [`Tournament`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GenderCaps {
    /// Maximum number of [`Gender::Male`] participants.
    pub male: u32,

    /// Maximum number of [`Gender::Female`] participants.
    pub female: u32,
}

impl GenderCaps {
    /// Returns the cap for the provided [`Gender`].
    #[must_use]
    pub fn of(self, gender: Gender) -> u32 {
        match gender {
            Gender::Male => self.male,
            Gender::Female => self.female,
        }
    }
}

/// [`Date`] (de)serialization accepting both a bare `YYYY-MM-DD` and a full
/// RFC 3339 date and time.
mod lenient_date {
    use super::{datetime, Date, DateTime, Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(date)
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error as _;

        let s = String::deserialize(deserializer)?;
        datetime::parse_date(&s)
            .or_else(|_| DateTime::from_rfc3339(&s).map(|dt| dt.date()))
            .map_err(D::Error::custom)
    }
}

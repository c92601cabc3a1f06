//! [`Slot`] definitions.

use std::{fmt, str::FromStr};

use common::{Date, DateTimeOf};
use derive_more::{Display, Error};

/// One-hour bookable interval of a day, identified by its starting hour.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Slot(u8);

impl Slot {
    /// Earliest bookable [`Slot`] (`08:00`).
    pub const FIRST: Self = Self(8);

    /// Latest bookable [`Slot`] (`21:00`).
    pub const LAST: Self = Self(21);

    /// Creates a new [`Slot`] starting at the provided `hour`, if it's
    /// bookable.
    #[must_use]
    pub fn new(hour: u8) -> Option<Self> {
        (Self::FIRST.0..=Self::LAST.0)
            .contains(&hour)
            .then_some(Self(hour))
    }

    /// Returns all the bookable [`Slot`]s of a day in order.
    ///
    /// The list is the same for every court and date.
    pub fn all() -> impl ExactSizeIterator<Item = Self> + Clone {
        (Self::FIRST.0..=Self::LAST.0).map(Self)
    }

    /// Returns the hour this [`Slot`] starts at.
    #[must_use]
    pub fn hour(self) -> u8 {
        self.0
    }

    /// Returns the instant this [`Slot`] starts at on the provided [`Date`].
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn at<Of: ?Sized>(self, date: Date) -> DateTimeOf<Of> {
        DateTimeOf::at_hour(date, self.0)
            .unwrap_or_else(|| unreachable!("`Slot` hour is always valid"))
    }

    /// Returns the [`Slot`] the provided instant starts, if it's bookable.
    #[must_use]
    pub fn of<Of: ?Sized>(dt: DateTimeOf<Of>) -> Option<Self> {
        dt.is_whole_hour().then(|| Self::new(dt.hour())).flatten()
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

impl FromStr for Slot {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hour = s.strip_suffix(":00").unwrap_or(s);
        hour.parse::<u8>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| ParseError(s.to_owned()))
    }
}

/// Error of parsing a [`Slot`].
#[derive(Clone, Debug, Display, Error)]
#[display("`{_0}` is not a bookable slot (08:00..21:00)")]
pub struct ParseError(#[error(not(source))] String);

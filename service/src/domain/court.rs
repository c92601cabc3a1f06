//! [`Court`] definitions.

use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

/// Sports court of the club which can be reserved.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Court {
    /// ID of this [`Court`].
    pub id: Id,

    /// Display name of this [`Court`].
    #[serde(default)]
    pub name: String,
}

/// ID of a [`Court`].
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

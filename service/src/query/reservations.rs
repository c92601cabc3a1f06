//! [`Query`] collection related to [`Reservation`]s.

use common::operations::By;

use crate::{domain::Reservation, infra::api};
#[cfg(doc)]
use crate::Query;

use super::ApiQuery;

/// Queries the [`Reservation`]s of all the courts.
pub type All = ApiQuery<By<Vec<Reservation>, ()>>;

/// Queries the [`Reservation`]s of the authenticated user.
pub type Mine = ApiQuery<By<Vec<Reservation>, api::Mine>>;

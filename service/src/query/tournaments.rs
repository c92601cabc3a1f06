//! [`Query`] collection related to multiple [`Tournament`]s.

use common::operations::By;

use crate::domain::Tournament;
#[cfg(doc)]
use crate::Query;

use super::ApiQuery;

/// Queries all the [`Tournament`]s.
pub type All = ApiQuery<By<Vec<Tournament>, ()>>;

//! [`Query`] collection related to [`Court`]s.

use common::operations::By;

use crate::domain::Court;
#[cfg(doc)]
use crate::Query;

use super::ApiQuery;

/// Queries all the [`Court`]s.
pub type All = ApiQuery<By<Vec<Court>, ()>>;

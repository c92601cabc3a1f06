//! [`Query`] collection related to a single [`Tournament`].

use common::operations::By;

use crate::{
    domain::{tournament, Tournament},
    infra::api,
};
#[cfg(doc)]
use crate::Query;

use super::ApiQuery;

/// Queries a [`Tournament`] by its [`tournament::Id`].
pub type ById = ApiQuery<By<Tournament, tournament::Id>>;

/// Queries the next scheduled [`Tournament`].
///
/// Fails with `404 Not Found` if nothing is scheduled.
pub type Next = ApiQuery<By<Tournament, api::Next>>;

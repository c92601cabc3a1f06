//! [`Query`] collection related to tournament [`Registration`]s.

use common::operations::By;

use crate::{
    domain::{tournament, Registration},
    infra::api,
};
#[cfg(doc)]
use crate::Query;

use super::ApiQuery;

/// Queries the [`Registration`]s of the authenticated user.
pub type Mine = ApiQuery<By<Vec<Registration>, api::Mine>>;

/// Queries the [`Registration`]s of a [`Tournament`] by its
/// [`tournament::Id`].
///
/// [`Tournament`]: crate::domain::Tournament
pub type ByTournament = ApiQuery<By<Vec<Registration>, tournament::Id>>;

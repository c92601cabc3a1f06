//! [`Query`] collection related to a single [`User`].

use common::operations::By;

use crate::{
    domain::{user, User},
    infra::api,
};
#[cfg(doc)]
use crate::Query;

use super::ApiQuery;

/// Queries a [`User`] by its [`user::Id`].
pub type ById = ApiQuery<By<User, user::Id>>;

/// Queries the profile of the authenticated [`User`].
pub type Me = ApiQuery<By<User, api::Mine>>;

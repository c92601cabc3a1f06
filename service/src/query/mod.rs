//! [`Query`] definition.

pub mod courts;
pub mod registrations;
pub mod reservations;
pub mod tournament;
pub mod tournaments;
pub mod user;

use std::convert::Infallible;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    command::{Command, Logout},
    infra::{api, Api},
    Service,
};

/// [`Query`] of the [`Service`].
pub use common::Handler as Query;

/// [`Query`] [`Select`]ing a `T`ype from an [`Api`].
///
/// A `401 Unauthorized` response terminates the current session.
#[derive(Clone, Copy, Debug)]
#[expect(clippy::module_name_repetitions, reason = "more readable")]
pub struct ApiQuery<T>(T);

impl<W, B> ApiQuery<By<W, B>> {
    /// Creates a new [`ApiQuery`] selecting a `W` by the provided `B`.
    #[must_use]
    pub fn by(by: B) -> Self {
        Self(By::new(by))
    }
}

impl<W> ApiQuery<By<W, ()>> {
    /// Creates a new [`ApiQuery`] selecting all the `W`s.
    #[must_use]
    pub fn all() -> Self {
        Self::by(())
    }
}

impl<A, S, W, B> Query<ApiQuery<By<W, B>>> for Service<A, S>
where
    A: Api<Select<By<W, B>>, Ok = W, Err = Traced<api::Error>>,
    Self: Command<Logout, Ok = (), Err = Infallible>,
{
    type Ok = W;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        ApiQuery(by): ApiQuery<By<W, B>>,
    ) -> Result<Self::Ok, Self::Err> {
        let res = self.api().execute(Select(by)).await;
        self.expel_if_unauthorized(&res).await;
        res.map_err(tracerr::wrap!())
    }
}

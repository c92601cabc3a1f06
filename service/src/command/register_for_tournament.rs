//! [`Command`] for registering into a [`Tournament`].

use std::convert::Infallible;

use common::operations::Insert;
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::Tournament;
use crate::{
    command::{CheckSession, Logout},
    domain::{tournament::registration, Registration},
    infra::{api, Api},
    Service,
};

use super::Command;

/// [`Command`] for registering the authenticated user into a [`Tournament`].
#[derive(Clone, Debug, From)]
pub struct RegisterForTournament {
    /// Validated [`registration::Form`] payload.
    pub registration: registration::New,
}

impl<A, S> Command<RegisterForTournament> for Service<A, S>
where
    A: Api<
        Insert<registration::New>,
        Ok = Registration,
        Err = Traced<api::Error>,
    >,
    Self: Command<CheckSession, Ok = bool, Err = Infallible>
        + Command<Logout, Ok = (), Err = Infallible>,
{
    type Ok = Registration;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RegisterForTournament,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RegisterForTournament { registration } = cmd;
        let tournament_id = registration.tournament_id;

        if !self.is_authenticated().await {
            return Err(tracerr::new!(E::Unauthenticated));
        }

        let res = self.api().execute(Insert(registration)).await;
        self.expel_if_unauthorized(&res).await;
        let registration = res.map_err(tracerr::map_from_and_wrap!(=> E))?;
        log::info!(
            "created `Registration(id: {})` for `Tournament(id: \
             {tournament_id})`",
            registration.id,
        );

        Ok(registration)
    }
}

/// Error of [`RegisterForTournament`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Api`] error.
    #[display("`Api` operation failed: {_0}")]
    Api(api::Error),

    /// No valid session exists.
    #[display("Not authenticated")]
    Unauthenticated,
}

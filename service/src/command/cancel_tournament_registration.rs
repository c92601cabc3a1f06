//! [`Command`] for cancelling a [`Registration`].

use std::convert::Infallible;

use common::operations::Delete;
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::Registration;
use crate::{
    command::{CheckSession, Logout},
    domain::tournament::registration,
    infra::{api, Api},
    Service,
};

use super::Command;

/// [`Command`] for cancelling a tournament [`Registration`].
#[derive(Clone, Copy, Debug, From)]
pub struct CancelTournamentRegistration {
    /// ID of the [`Registration`] to cancel.
    pub id: registration::Id,
}

impl<A, S> Command<CancelTournamentRegistration> for Service<A, S>
where
    A: Api<Delete<registration::Id>, Ok = (), Err = Traced<api::Error>>,
    Self: Command<CheckSession, Ok = bool, Err = Infallible>
        + Command<Logout, Ok = (), Err = Infallible>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CancelTournamentRegistration,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CancelTournamentRegistration { id } = cmd;

        if !self.is_authenticated().await {
            return Err(tracerr::new!(E::Unauthenticated));
        }

        let res = self.api().execute(Delete(id)).await;
        self.expel_if_unauthorized(&res).await;
        res.map_err(tracerr::map_from_and_wrap!(=> E))?;
        log::info!("cancelled `Registration(id: {id})`");

        Ok(())
    }
}

/// Error of [`CancelTournamentRegistration`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Api`] error.
    #[display("`Api` operation failed: {_0}")]
    Api(api::Error),

    /// No valid session exists.
    #[display("Not authenticated")]
    Unauthenticated,
}

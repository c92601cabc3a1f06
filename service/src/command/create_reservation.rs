//! [`Command`] for creating a new [`Reservation`].

use std::convert::Infallible;

use common::operations::Insert;
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::{reservation::StartDateTime, Court, Slot};
use crate::{
    command::{CheckSession, Logout},
    domain::{court, reservation, Reservation},
    infra::{api, Api},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Reservation`] of a [`Court`].
#[derive(Clone, Copy, Debug)]
pub struct CreateReservation {
    /// ID of the [`Court`] to reserve.
    pub court_id: court::Id,

    /// [`StartDateTime`] of the reserved [`Slot`].
    pub start_time: reservation::StartDateTime,
}

impl<A, S> Command<CreateReservation> for Service<A, S>
where
    A: Api<
        Insert<reservation::New>,
        Ok = Reservation,
        Err = Traced<api::Error>,
    >,
    Self: Command<CheckSession, Ok = bool, Err = Infallible>
        + Command<Logout, Ok = (), Err = Infallible>,
{
    type Ok = Reservation;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateReservation,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateReservation {
            court_id,
            start_time,
        } = cmd;

        if !self.is_authenticated().await {
            return Err(tracerr::new!(E::Unauthenticated));
        }
        if reservation::Slot::of(start_time).is_none() {
            return Err(tracerr::new!(E::NotASlot));
        }

        let res = self
            .api()
            .execute(Insert(reservation::New {
                court_id,
                start_time,
            }))
            .await;
        self.expel_if_unauthorized(&res).await;
        let reservation = res.map_err(tracerr::map_from_and_wrap!(=> E))?;
        log::info!(
            "created `Reservation(id: {})` of `Court(id: {court_id})` at {}",
            reservation.id,
            reservation.start_time.to_iso8601(),
        );

        Ok(reservation)
    }
}

/// Error of [`CreateReservation`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Api`] error.
    #[display("`Api` operation failed: {_0}")]
    Api(api::Error),

    /// No valid session exists.
    #[display("Not authenticated")]
    Unauthenticated,

    /// [`StartDateTime`] doesn't start a bookable [`Slot`].
    #[display("Start time is not a bookable slot")]
    NotASlot,
}

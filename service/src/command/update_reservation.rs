//! [`Command`] for rescheduling an existing [`Reservation`].

use std::convert::Infallible;

use common::operations::Update;
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::{reservation::StartDateTime, Slot};
use crate::{
    command::{CheckSession, Logout},
    domain::{reservation, Reservation},
    infra::{api, Api},
    Service,
};

use super::Command;

/// [`Command`] for moving an existing [`Reservation`] to another [`Slot`] of
/// the same court.
#[derive(Clone, Copy, Debug)]
pub struct UpdateReservation {
    /// ID of the [`Reservation`] to reschedule.
    pub id: reservation::Id,

    /// New [`StartDateTime`] of the [`Reservation`].
    pub start_time: reservation::StartDateTime,
}

impl<A, S> Command<UpdateReservation> for Service<A, S>
where
    A: Api<
        Update<reservation::Change>,
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
        cmd: UpdateReservation,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateReservation { id, start_time } = cmd;

        if !self.is_authenticated().await {
            return Err(tracerr::new!(E::Unauthenticated));
        }
        if reservation::Slot::of(start_time).is_none() {
            return Err(tracerr::new!(E::NotASlot));
        }

        let res = self
            .api()
            .execute(Update(reservation::Change { id, start_time }))
            .await;
        self.expel_if_unauthorized(&res).await;
        let reservation = res.map_err(tracerr::map_from_and_wrap!(=> E))?;
        log::info!(
            "rescheduled `Reservation(id: {id})` to {}",
            reservation.start_time.to_iso8601(),
        );

        Ok(reservation)
    }
}

/// Error of [`UpdateReservation`] [`Command`] execution.
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

//! [`Command`] definition.

pub mod cancel_reservation;
pub mod cancel_tournament_registration;
pub mod check_session;
pub mod create_reservation;
pub mod login;
pub mod logout;
pub mod register_for_tournament;
pub mod register_user;
pub mod restore_session;
pub mod update_reservation;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    cancel_reservation::CancelReservation,
    cancel_tournament_registration::CancelTournamentRegistration,
    check_session::CheckSession, create_reservation::CreateReservation,
    login::Login, logout::Logout,
    register_for_tournament::RegisterForTournament,
    register_user::RegisterUser, restore_session::RestoreSession,
    update_reservation::UpdateReservation,
};

//! Presentation state of the client screens.
//!
//! Views own the data a screen renders and translate user actions into
//! [`Command`]s and [`Query`]s of the [`Service`].
//!
//! [`Command`]: crate::Command
//! [`Query`]: crate::Query
//! [`Service`]: crate::Service

pub mod message;
pub mod scheduler;
pub mod tournaments;

pub use self::{
    message::{AsMessage, Message},
    scheduler::Scheduler,
    tournaments::TournamentBoard,
};

/// Source of user confirmations for destructive actions.
pub trait Confirm {
    /// Asks the user the provided `question`, returning whether they agreed.
    fn confirm(&self, question: &str) -> bool;
}

impl Confirm for bool {
    fn confirm(&self, _: &str) -> bool {
        *self
    }
}

/// Request to navigate to the login screen.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Redirect {
    /// Path of the screen to navigate to.
    pub to: &'static str,

    /// Path of the screen to return to once logged in.
    pub from: &'static str,
}

impl Redirect {
    /// Path of the login screen.
    pub const LOGIN: &'static str = "/login";

    /// Creates a new [`Redirect`] to the login screen, returning to `from`.
    #[must_use]
    pub fn to_login(from: &'static str) -> Self {
        Self {
            to: Self::LOGIN,
            from,
        }
    }
}

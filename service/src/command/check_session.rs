//! [`Command`] for checking the current [`Session`] validity.

use std::convert::Infallible;

use common::DateTime;
use tracing as log;

#[cfg(doc)]
use crate::domain::Session;
use crate::{command::Logout, Service};

use super::Command;

/// [`Command`] for checking whether the current [`Session`] is still valid.
///
/// An absent or expired [`Session`] is [`Logout`]ed as a side effect.
#[derive(Clone, Copy, Debug, Default)]
pub struct CheckSession;

impl<A, S> Command<CheckSession> for Service<A, S>
where
    Self: Command<Logout, Ok = (), Err = Infallible>,
{
    type Ok = bool;
    type Err = Infallible;

    async fn execute(&self, _: CheckSession) -> Result<Self::Ok, Self::Err> {
        let valid = self
            .state()
            .read()
            .await
            .session
            .as_ref()
            .map(|s| s.is_valid_at(DateTime::now()));

        match valid {
            Some(true) => Ok(true),
            Some(false) => {
                log::info!("session expired");
                self.logout().await;
                Ok(false)
            }
            None => {
                self.logout().await;
                Ok(false)
            }
        }
    }
}

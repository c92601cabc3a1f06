//! [`Command`] for terminating the current [`Session`].

use std::convert::Infallible;

use common::operations::{Delete, Update};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::Session;
use crate::{
    infra::{
        api::{self, Authorization},
        storage::{self, Key},
        Api, Storage,
    },
    Service,
};

use super::Command;

/// [`Command`] for terminating the current [`Session`].
///
/// Clears the persisted token and profile along with the default
/// `Authorization` of the [`Api`] calls. Idempotent and infallible.
#[derive(Clone, Copy, Debug, Default)]
pub struct Logout;

impl<A, S> Command<Logout> for Service<A, S>
where
    A: Api<Update<Authorization>, Ok = (), Err = Traced<api::Error>>,
    S: Storage<Delete<Key>, Ok = (), Err = Traced<storage::Error>>,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(&self, _: Logout) -> Result<Self::Ok, Self::Err> {
        let previous = {
            let mut state = self.state().write().await;
            state.user = None;
            state.session.take()
        };

        if let Err(e) = self.api().execute(Update(Authorization(None))).await {
            log::error!("failed to reset `Api` authorization: {e}");
        }
        for key in [Key::Token, Key::User] {
            if let Err(e) = self.storage().execute(Delete(key)).await {
                log::error!("failed to remove `{key}` from `Storage`: {e}");
            }
        }

        if let Some(session) = previous {
            log::info!("`User(id: {})` logged out", session.user_id);
        }
        Ok(())
    }
}

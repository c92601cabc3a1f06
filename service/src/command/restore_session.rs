//! [`Command`] for resuming a persisted [`Session`].

use std::convert::Infallible;

use common::{
    operations::{By, Insert, Select, Update},
    DateTime,
};
use tracerr::Traced;
use tracing as log;

use crate::{
    command::Logout,
    domain::{Session, User},
    infra::{
        api::{self, Authorization},
        storage::{self, Key},
        Api, Storage,
    },
    query::{self, Query},
    Service,
};

use super::Command;

/// [`Command`] for resuming the [`Session`] persisted by a previous run.
///
/// Fails open: whatever goes wrong, the [`Service`] ends up logged out and
/// [`None`] is returned.
#[derive(Clone, Copy, Debug, Default)]
pub struct RestoreSession;

impl<A, S> Command<RestoreSession> for Service<A, S>
where
    A: Api<Update<Authorization>, Ok = (), Err = Traced<api::Error>>,
    S: Storage<
            Select<By<Option<String>, Key>>,
            Ok = Option<String>,
            Err = Traced<storage::Error>,
        > + Storage<Insert<(Key, String)>, Ok = (), Err = Traced<storage::Error>>,
    Self: Command<Logout, Ok = (), Err = Infallible>
        + Query<query::user::ById, Ok = User, Err = Traced<api::Error>>,
{
    type Ok = Option<User>;
    type Err = Infallible;

    async fn execute(
        &self,
        _: RestoreSession,
    ) -> Result<Self::Ok, Self::Err> {
        let token = match self.storage().execute(Select(By::new(Key::Token))).await
        {
            Ok(Some(token)) => token,
            Ok(None) => {
                self.logout().await;
                return Ok(None);
            }
            Err(e) => {
                log::error!("failed to read persisted session: {e}");
                self.logout().await;
                return Ok(None);
            }
        };

        let session = match Session::decode(token.into()) {
            Ok(s) if s.is_valid_at(DateTime::now()) => s,
            Ok(_) => {
                log::info!("persisted session has expired");
                self.logout().await;
                return Ok(None);
            }
            Err(e) => {
                log::warn!("persisted session is unusable: {e}");
                self.logout().await;
                return Ok(None);
            }
        };

        if let Err(e) = self
            .api()
            .execute(Update(Authorization(Some(session.token.clone()))))
            .await
        {
            log::error!("failed to set `Api` authorization: {e}");
            self.logout().await;
            return Ok(None);
        }

        let user = match self
            .execute(query::user::ById::by(session.user_id))
            .await
        {
            Ok(user) => user,
            Err(e) => {
                log::warn!("failed to load `User(id: {})`: {e}", session.user_id);
                self.logout().await;
                return Ok(None);
            }
        };

        match serde_json::to_string(&user) {
            Ok(profile) => {
                if let Err(e) =
                    self.storage().execute(Insert((Key::User, profile))).await
                {
                    log::error!("failed to persist `User` profile: {e}");
                }
            }
            Err(e) => log::error!("failed to encode `User` profile: {e}"),
        }

        {
            let mut state = self.state().write().await;
            state.session = Some(session);
            state.user = Some(user.clone());
        }
        log::debug!("restored session of `User(id: {})`", user.id);

        Ok(Some(user))
    }
}

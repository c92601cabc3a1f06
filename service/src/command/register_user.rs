//! [`Command`] for registering a new [`User`] account.

use common::operations::Insert;
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret as _, SecretBox};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::user::{Email, Name, Password};
use crate::{
    domain::{user, User},
    infra::{
        api::{self, SignUp},
        Api,
    },
    Service,
};

use super::Command;

/// [`Command`] for registering a new [`User`] account.
///
/// Doesn't log in: the new [`User`] has to [`Login`] afterwards.
///
/// [`Login`]: super::Login
#[derive(Debug)]
pub struct RegisterUser {
    /// [`Name`] of a new [`User`].
    pub name: user::Name,

    /// [`Email`] of a new [`User`].
    pub email: user::Email,

    /// [`Password`] of a new [`User`].
    pub password: SecretBox<user::Password>,

    /// Repeated [`Password`] of a new [`User`].
    pub confirmation: SecretBox<user::Password>,
}

impl<A, S> Command<RegisterUser> for Service<A, S>
where
    A: Api<Insert<SignUp>, Ok = User, Err = Traced<api::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: RegisterUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RegisterUser {
            name,
            email,
            password,
            confirmation,
        } = cmd;

        if password.expose_secret() != confirmation.expose_secret() {
            return Err(tracerr::new!(E::PasswordMismatch));
        }

        let user = self
            .api()
            .execute(Insert(SignUp {
                name,
                email,
                password,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        log::info!("registered `User(id: {})`", user.id);

        Ok(user)
    }
}

/// Error of [`RegisterUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Api`] error.
    #[display("`Api` operation failed: {_0}")]
    Api(api::Error),

    /// [`Password`] and its confirmation differ.
    #[display("Password confirmation doesn't match")]
    PasswordMismatch,
}

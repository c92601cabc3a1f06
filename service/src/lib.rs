//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod view;

use std::{convert::Infallible, sync::Arc};

use secrecy::SecretBox;
use smart_default::SmartDefault;
use tokio::sync::RwLock;
use tracerr::Traced;
use tracing as log;

use crate::{
    command::{CheckSession, Login, Logout},
    domain::{
        user::{self, session},
        Session, User,
    },
    infra::api,
    view::AsMessage,
};
#[cfg(doc)]
use crate::infra::{Api, Storage};

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Maximum number of simultaneously active reservations of a [`User`].
    #[default(4)]
    pub reservation_limit: usize,
}

/// State of the current [`Session`], shared by all the clones of a
/// [`Service`].
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    /// Current [`Session`], if authenticated.
    pub session: Option<Session>,

    /// Profile of the authenticated [`User`], once loaded.
    pub user: Option<User>,

    /// User-facing message of the last failed login attempt.
    pub last_error: Option<String>,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<A, S> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Api`] gateway of this [`Service`].
    api: A,

    /// [`Storage`] persisting the [`Session`] of this [`Service`].
    storage: S,

    /// [`SessionState`] of this [`Service`].
    state: Arc<RwLock<SessionState>>,
}

impl<A, S> Service<A, S> {
    /// Creates a new logged out [`Service`] with the provided parameters.
    ///
    /// Use [`command::RestoreSession`] to resume a persisted [`Session`].
    #[must_use]
    pub fn new(config: Config, api: A, storage: S) -> Self {
        Self {
            config,
            api,
            storage,
            state: Arc::new(RwLock::new(SessionState::default())),
        }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Api`] gateway of this [`Service`].
    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Returns [`Storage`] of this [`Service`].
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the access [`session::Token`] of the current [`Session`], if
    /// any.
    pub async fn token(&self) -> Option<session::Token> {
        self.state.read().await.session.as_ref().map(|s| s.token.clone())
    }

    /// Returns the profile of the authenticated [`User`], if loaded.
    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    /// Returns ID of the authenticated [`User`], if loaded.
    pub async fn user_id(&self) -> Option<user::Id> {
        self.state.read().await.user.as_ref().map(|u| u.id)
    }

    /// Checks whether the authenticated [`User`] has the provided
    /// [`user::Role`].
    ///
    /// Always `false` if no profile is loaded.
    pub async fn has_role(&self, role: &user::Role) -> bool {
        self.state
            .read()
            .await
            .user
            .as_ref()
            .is_some_and(|u| u.has_role(role))
    }

    /// Returns the message of the last failed login attempt, if any.
    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.last_error.clone()
    }

    /// Returns the shared [`SessionState`] of this [`Service`].
    pub(crate) fn state(&self) -> &RwLock<SessionState> {
        &self.state
    }

    /// Checks whether a valid [`Session`] exists, invalidating the expired
    /// one as a side effect.
    pub async fn is_authenticated(&self) -> bool
    where
        Self: Command<CheckSession, Ok = bool, Err = Infallible>,
    {
        self.execute(CheckSession)
            .await
            .unwrap_or_else(|e| match e {})
    }

    /// Logs in with the provided credentials.
    ///
    /// Never fails: on failure, `false` is returned and the reason is
    /// available via [`Service::last_error()`].
    pub async fn login(
        &self,
        email: user::Email,
        password: SecretBox<user::Password>,
    ) -> bool
    where
        Self: Command<Login, Err = Traced<command::login::ExecutionError>>,
    {
        self.try_login(Login::ByCredentials { email, password }).await
    }

    /// Logs in with the provided Google Identity Services `credential`.
    ///
    /// Never fails: on failure, `false` is returned and the reason is
    /// available via [`Service::last_error()`].
    pub async fn google_login(&self, credential: impl Into<String>) -> bool
    where
        Self: Command<Login, Err = Traced<command::login::ExecutionError>>,
    {
        self.try_login(Login::ByGoogle(api::GoogleCredential {
            credential: credential.into(),
        }))
        .await
    }

    /// Executes the provided [`Login`], recording its failure.
    async fn try_login(&self, cmd: Login) -> bool
    where
        Self: Command<Login, Err = Traced<command::login::ExecutionError>>,
    {
        match self.execute(cmd).await {
            Ok(_) => true,
            Err(e) => {
                log::warn!("login failed: {e}");
                self.state.write().await.last_error =
                    Some(e.as_message().to_string());
                false
            }
        }
    }

    /// Terminates the current [`Session`], if any.
    pub async fn logout(&self)
    where
        Self: Command<Logout, Ok = (), Err = Infallible>,
    {
        self.execute(Logout).await.unwrap_or_else(|e| match e {});
    }

    /// Terminates the current [`Session`] if the provided `result` says the
    /// server doesn't accept it anymore.
    pub(crate) async fn expel_if_unauthorized<T>(
        &self,
        result: &Result<T, Traced<api::Error>>,
    ) where
        Self: Command<Logout, Ok = (), Err = Infallible>,
    {
        if let Err(e) = result {
            if e.as_ref().is_unauthorized() {
                log::warn!("session rejected by the server, logging out");
                self.logout().await;
            }
        }
    }
}

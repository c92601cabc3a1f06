//! [`Command`] for establishing a new [`Session`].

use std::convert::Infallible;

use common::operations::{Insert, Perform, Update};
use derive_more::{Display, Error, From};
use secrecy::SecretBox;
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::user::{session::Token, Email, Password};
use crate::{
    domain::{
        user::{self, session},
        Session, User,
    },
    infra::{
        api::{self, Authenticated, Authorization, Credentials, GoogleCredential},
        storage::{self, Key},
        Api, Storage,
    },
    Service,
};

use super::{Command, Logout};

/// [`Command`] for establishing a new [`Session`].
#[derive(Debug, From)]
pub enum Login {
    /// Log in with [`User`] credentials.
    ByCredentials {
        /// [`Email`] of a [`User`].
        email: user::Email,

        /// [`Password`] of a [`User`].
        password: SecretBox<user::Password>,
    },

    /// Log in with a credential issued by Google Identity Services.
    ByGoogle(GoogleCredential),
}

/// Output of [`Login`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Established [`Session`].
    pub session: Session,

    /// Profile of the logged in [`User`].
    pub user: User,
}

impl<A, S> Command<Login> for Service<A, S>
where
    A: Api<
            Perform<Credentials>,
            Ok = Authenticated,
            Err = Traced<api::Error>,
        > + Api<
            Perform<GoogleCredential>,
            Ok = Authenticated,
            Err = Traced<api::Error>,
        > + Api<Update<Authorization>, Ok = (), Err = Traced<api::Error>>,
    S: Storage<Insert<(Key, String)>, Ok = (), Err = Traced<storage::Error>>,
    Self: Command<Logout, Ok = (), Err = Infallible>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: Login) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let Authenticated { access_token, user } = match cmd {
            Login::ByCredentials { email, password } => {
                self.api()
                    .execute(Perform(Credentials { email, password }))
                    .await
            }
            Login::ByGoogle(credential) => {
                self.api().execute(Perform(credential)).await
            }
        }
        .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let session = Session::decode(access_token)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let profile = serde_json::to_string(&user)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let persisted: Result<(), Traced<E>> = async {
            self.api()
                .execute(Update(Authorization(Some(session.token.clone()))))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            self.storage()
                .execute(Insert((Key::Token, session.token.to_string())))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            self.storage()
                .execute(Insert((Key::User, profile)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
        }
        .await;
        if let Err(e) = persisted {
            self.logout().await;
            return Err(e);
        }

        {
            let mut state = self.state().write().await;
            state.session = Some(session.clone());
            state.user = Some(user.clone());
            state.last_error = None;
        }
        log::info!("`User(id: {})` logged in", user.id);

        Ok(Output { session, user })
    }
}

/// Error of [`Login`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Api`] error.
    #[display("`Api` operation failed: {_0}")]
    Api(api::Error),

    /// [`Storage`] error.
    #[display("`Storage` operation failed: {_0}")]
    Storage(storage::Error),

    /// Issued [`Token`] cannot be decoded.
    #[display("Issued token is unusable: {_0}")]
    Token(session::DecodeError),

    /// [`User`] profile cannot be persisted.
    #[display("Failed to encode `User` profile: {_0}")]
    Encode(serde_json::Error),
}

#[cfg(test)]
mod tests {
    use std::io;

    use common::operations::{Delete, Insert};
    use secrecy::SecretBox;
    use serde_json::json;
    use tracerr::Traced;

    use crate::{
        infra::{
            api::fake::{self, Fake},
            storage::{self, Key, Memory, Storage},
        },
        query, Config, Query as _, Service,
    };

    /// [`Memory`] storage refusing to persist [`Key::User`].
    #[derive(Clone, Debug, Default)]
    struct ReadOnlyProfile(Memory);

    impl Storage<Insert<(Key, String)>> for ReadOnlyProfile {
        type Ok = ();
        type Err = Traced<storage::Error>;

        async fn execute(
            &self,
            Insert((key, value)): Insert<(Key, String)>,
        ) -> Result<Self::Ok, Self::Err> {
            if key == Key::User {
                return Err(tracerr::new!(storage::Error::Io(io::Error::other(
                    "disk full"
                ))));
            }
            self.0.execute(Insert((key, value))).await
        }
    }

    impl Storage<Delete<Key>> for ReadOnlyProfile {
        type Ok = ();
        type Err = Traced<storage::Error>;

        async fn execute(
            &self,
            op: Delete<Key>,
        ) -> Result<Self::Ok, Self::Err> {
            self.0.execute(op).await
        }
    }

    #[tokio::test]
    async fn persists_session_and_authorizes_calls() {
        let fake = Fake::default();
        let svc = fake::logged_in(&fake, fake::member(7, "Maria", None)).await;

        assert!(svc.is_authenticated().await);
        assert!(svc.last_error().await.is_none());
        assert!(svc.has_role(&"user".into()).await);
        assert!(!svc.has_role(&"admin".into()).await);

        let token = svc.token().await.unwrap();
        let stored = svc.storage().snapshot().await;
        assert_eq!(stored[&Key::Token], token.to_string());
        assert!(stored[&Key::User].contains("Maria"));

        let me = svc.execute(query::user::Me::by(crate::infra::api::Mine)).await;
        assert_eq!(me.unwrap().name.to_string(), "Maria");
        let last = fake.state().calls.last().cloned().unwrap();
        assert_eq!(last.endpoint, "GET users/me");
        assert_eq!(last.auth, Some(token));
    }

    #[tokio::test]
    async fn records_failure_message() {
        let fake = Fake::default();
        let svc = Service::new(Config::default(), fake.clone(), Memory::new());

        let ok = svc
            .login(
                "maria@aabb.example".parse().unwrap(),
                SecretBox::new(Box::new("wrong".into())),
            )
            .await;

        assert!(!ok);
        assert_eq!(svc.last_error().await.as_deref(), Some("Invalid credentials"));
        assert!(!svc.is_authenticated().await);
        assert!(svc.storage().snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn leaves_nothing_persisted_when_profile_cannot_be_stored() {
        let fake = Fake::default();
        let _ = fake::logged_in(&fake, fake::member(7, "Maria", None)).await;
        let storage = ReadOnlyProfile::default();
        let svc = Service::new(Config::default(), fake.clone(), storage.clone());

        let ok = svc
            .login(
                "member7@aabb.example".parse().unwrap(),
                SecretBox::new(Box::new("secret".into())),
            )
            .await;

        assert!(!ok);
        assert!(svc.token().await.is_none());
        assert!(svc.current_user().await.is_none());
        assert!(storage.0.snapshot().await.is_empty());
        assert!(svc.last_error().await.is_some());

        _ = svc.execute(query::courts::All::all()).await;
        let last = fake.state().calls.last().cloned().unwrap();
        assert_eq!(last.auth, None);
    }

    #[tokio::test]
    async fn logs_in_with_google_credential() {
        let fake = Fake::default();
        let me = fake::member(7, "Maria", None);
        let _ = fake::logged_in(&fake, me).await;
        let svc = Service::new(Config::default(), fake.clone(), Memory::new());

        assert!(svc.google_login("google-issued").await);

        let last = fake.state().calls.last().cloned().unwrap();
        assert_eq!(last.endpoint, "POST auth/google");
        assert_eq!(last.body, Some(json!({ "credential": "google-issued" })));
        assert_eq!(svc.user_id().await, Some(7.into()));
    }
}

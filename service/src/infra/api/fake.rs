//! In-memory [`Api`] imitating the REST server, for tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use common::{
    operations::{By, Delete, Insert, Perform, Select, Update},
    DateTime,
};
use secrecy::{ExposeSecret as _, SecretBox};
use serde_json::{json, Value};
use tracerr::Traced;

use crate::{
    domain::{
        court, reservation,
        tournament::{self, registration},
        user::{self, session},
        Court, Registration, Reservation, Tournament, User,
    },
    infra::{
        api::{
            self, Authenticated, Authorization, Credentials, GoogleCredential,
            Mine, Next, SignUp,
        },
        storage::Memory,
        Api,
    },
    Config, Service,
};

/// Request received by a [`Fake`] server.
#[derive(Clone, Debug)]
pub(crate) struct Call {
    /// Method and path of the request, like `POST reservations`.
    pub(crate) endpoint: String,

    /// `Authorization: Bearer` token the request carried.
    pub(crate) auth: Option<session::Token>,

    /// JSON body of the request.
    pub(crate) body: Option<Value>,
}

/// Data of a [`Fake`] server.
#[derive(Debug, Default)]
pub(crate) struct State {
    pub(crate) courts: Vec<Court>,
    pub(crate) reservations: Vec<Reservation>,
    pub(crate) tournaments: Vec<Tournament>,
    pub(crate) registrations: Vec<Registration>,
    pub(crate) users: Vec<User>,

    /// [`User`] the server considers authenticated.
    pub(crate) me: Option<user::Id>,

    /// Response to successful logins.
    pub(crate) issued: Option<Authenticated>,

    /// Indicator whether created [`Registration`]s omit their
    /// [`Tournament`].
    pub(crate) terse_registrations: bool,

    /// Forced failures by endpoint.
    pub(crate) failures: HashMap<String, api::Status>,

    /// Received requests.
    pub(crate) calls: Vec<Call>,

    /// Default `Authorization` token currently installed.
    token: Option<session::Token>,

    /// Last assigned ID.
    last_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id + 1000
    }

    fn me(&self) -> Result<user::Id, api::Status> {
        match (&self.token, self.me) {
            (Some(_), Some(id)) => Ok(id),
            _ => Err(api::Status::new(401).with_message("Unauthorized")),
        }
    }
}

/// In-memory [`Api`] server.
#[derive(Clone, Debug, Default)]
pub(crate) struct Fake(Arc<Mutex<State>>);

impl Fake {
    /// Returns exclusive access to the [`State`] of this [`Fake`] server.
    pub(crate) fn state(&self) -> MutexGuard<'_, State> {
        self.0.lock().unwrap()
    }

    /// Returns endpoints of all the received requests.
    pub(crate) fn endpoints(&self) -> Vec<String> {
        self.state().calls.iter().map(|c| c.endpoint.clone()).collect()
    }

    /// Makes the provided `endpoint` fail with the provided `status`.
    pub(crate) fn fail(&self, endpoint: &str, status: api::Status) {
        drop(self.state().failures.insert(endpoint.to_owned(), status));
    }

    /// Serves a single request.
    fn serve<T>(
        &self,
        endpoint: String,
        body: Option<Value>,
        handle: impl FnOnce(&mut State) -> Result<T, api::Status>,
    ) -> Result<T, Traced<api::Error>> {
        let mut state = self.state();
        let auth = state.token.clone();
        state.calls.push(Call {
            endpoint: endpoint.clone(),
            auth,
            body,
        });
        if let Some(status) = state.failures.get(&endpoint).cloned() {
            return Err(tracerr::new!(api::Error::Status(status)));
        }
        handle(&mut state).map_err(|s| tracerr::new!(api::Error::Status(s)))
    }
}

/// Creates a new club member [`User`].
pub(crate) fn member(id: i64, name: &str, gender: Option<user::Gender>) -> User {
    User {
        id: id.into(),
        name: user::Name::new(name).unwrap(),
        email: user::Email::new(format!("member{id}@aabb.example")).unwrap(),
        roles: vec!["user".into()],
        gender,
    }
}

/// Creates a new [`Service`] over the provided [`Fake`] server, logged in as
/// the provided [`User`].
pub(crate) async fn logged_in(fake: &Fake, me: User) -> Service<Fake, Memory> {
    let token = session::tests::token(
        json!(i64::from(me.id)),
        DateTime::now() + Duration::from_secs(3600),
    );
    {
        let mut state = fake.state();
        state.me = Some(me.id);
        state.users.push(me.clone());
        state.issued = Some(Authenticated {
            access_token: token,
            user: me.clone(),
        });
    }

    let svc = Service::new(Config::default(), fake.clone(), Memory::new());
    assert!(
        svc.login(
            me.email,
            SecretBox::new(Box::new("secret".into())),
        )
        .await,
    );
    svc
}

fn not_found() -> api::Status {
    api::Status::new(404).with_message("Not found")
}

fn taken() -> api::Status {
    api::Status::new(409).with_message("Slot already taken")
}

impl Api<Perform<Credentials>> for Fake {
    type Ok = Authenticated;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Perform(creds): Perform<Credentials>,
    ) -> Result<Self::Ok, Self::Err> {
        let body = json!({
            "email": creds.email,
            "password": creds.password.expose_secret().as_ref(),
        });
        self.serve("POST auth/login".into(), Some(body), |s| {
            s.issued.clone().ok_or_else(|| {
                api::Status::new(401).with_message("Invalid credentials")
            })
        })
    }
}

impl Api<Perform<GoogleCredential>> for Fake {
    type Ok = Authenticated;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Perform(credential): Perform<GoogleCredential>,
    ) -> Result<Self::Ok, Self::Err> {
        let body = json!({ "credential": credential.credential });
        self.serve("POST auth/google".into(), Some(body), |s| {
            s.issued.clone().ok_or_else(|| api::Status::new(401))
        })
    }
}

impl Api<Insert<SignUp>> for Fake {
    type Ok = User;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Insert(sign_up): Insert<SignUp>,
    ) -> Result<Self::Ok, Self::Err> {
        let body = json!({ "name": sign_up.name, "email": sign_up.email });
        self.serve("POST auth/register".into(), Some(body), |s| {
            if s.users.iter().any(|u| u.email == sign_up.email) {
                return Err(api::Status::new(409)
                    .with_message("Email already registered"));
            }
            let user = User {
                id: s.next_id().into(),
                name: sign_up.name,
                email: sign_up.email,
                roles: vec![],
                gender: None,
            };
            s.users.push(user.clone());
            Ok(user)
        })
    }
}

impl Api<Update<Authorization>> for Fake {
    type Ok = ();
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Update(Authorization(token)): Update<Authorization>,
    ) -> Result<Self::Ok, Self::Err> {
        self.state().token = token;
        Ok(())
    }
}

impl Api<Select<By<User, user::Id>>> for Fake {
    type Ok = User;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<User, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.serve(format!("GET users/{id}"), None, |s| {
            s.users.iter().find(|u| u.id == id).cloned().ok_or_else(not_found)
        })
    }
}

impl Api<Select<By<User, Mine>>> for Fake {
    type Ok = User;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        _: Select<By<User, Mine>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.serve("GET users/me".into(), None, |s| {
            let me = s.me()?;
            s.users.iter().find(|u| u.id == me).cloned().ok_or_else(not_found)
        })
    }
}

impl Api<Select<By<Vec<Court>, ()>>> for Fake {
    type Ok = Vec<Court>;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Court>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.serve("GET courts".into(), None, |s| Ok(s.courts.clone()))
    }
}

impl Api<Select<By<Vec<Reservation>, ()>>> for Fake {
    type Ok = Vec<Reservation>;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Reservation>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.serve("GET reservations".into(), None, |s| {
            _ = s.me()?;
            Ok(s.reservations.clone())
        })
    }
}

impl Api<Select<By<Vec<Reservation>, Mine>>> for Fake {
    type Ok = Vec<Reservation>;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Reservation>, Mine>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.serve("GET reservations/me".into(), None, |s| {
            let me = s.me()?;
            Ok(s.reservations
                .iter()
                .filter(|r| r.user.as_ref().is_some_and(|u| u.id == me))
                .cloned()
                .collect())
        })
    }
}

impl Api<Insert<reservation::New>> for Fake {
    type Ok = Reservation;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Insert(new): Insert<reservation::New>,
    ) -> Result<Self::Ok, Self::Err> {
        let body = serde_json::to_value(new).ok();
        self.serve("POST reservations".into(), body, |s| {
            let me = s.me()?;
            if s.reservations
                .iter()
                .any(|r| r.occupies(new.court_id, new.start_time))
            {
                return Err(taken());
            }
            let court = court_of(s, new.court_id);
            let created = Reservation {
                id: s.next_id().into(),
                court,
                user: Some(user::Ref { id: me, name: None }),
                start_time: new.start_time,
            };
            s.reservations.push(created.clone());
            Ok(created)
        })
    }
}

fn court_of(s: &State, id: court::Id) -> Court {
    s.courts.iter().find(|c| c.id == id).cloned().unwrap_or(Court {
        id,
        name: String::new(),
    })
}

impl Api<Update<reservation::Change>> for Fake {
    type Ok = Reservation;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Update(change): Update<reservation::Change>,
    ) -> Result<Self::Ok, Self::Err> {
        let body = serde_json::to_value(change).ok();
        self.serve(format!("PUT reservations/{}", change.id), body, |s| {
            _ = s.me()?;
            let court_id = s
                .reservations
                .iter()
                .find(|r| r.id == change.id)
                .map(|r| r.court.id)
                .ok_or_else(not_found)?;
            if s.reservations.iter().any(|r| {
                r.id != change.id && r.occupies(court_id, change.start_time)
            }) {
                return Err(taken());
            }
            let updated = s
                .reservations
                .iter_mut()
                .find(|r| r.id == change.id)
                .ok_or_else(not_found)?;
            updated.start_time = change.start_time;
            Ok(updated.clone())
        })
    }
}

impl Api<Delete<reservation::Id>> for Fake {
    type Ok = ();
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Delete(id): Delete<reservation::Id>,
    ) -> Result<Self::Ok, Self::Err> {
        self.serve(format!("DELETE reservations/{id}"), None, |s| {
            _ = s.me()?;
            let before = s.reservations.len();
            s.reservations.retain(|r| r.id != id);
            (s.reservations.len() < before).then_some(()).ok_or_else(not_found)
        })
    }
}

impl Api<Select<By<Vec<Tournament>, ()>>> for Fake {
    type Ok = Vec<Tournament>;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Tournament>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.serve("GET tournaments".into(), None, |s| Ok(s.tournaments.clone()))
    }
}

impl Api<Select<By<Tournament, tournament::Id>>> for Fake {
    type Ok = Tournament;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Tournament, tournament::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.serve(format!("GET tournaments/{id}"), None, |s| {
            s.tournaments
                .iter()
                .find(|t| t.id == id)
                .cloned()
                .ok_or_else(not_found)
        })
    }
}

impl Api<Select<By<Tournament, Next>>> for Fake {
    type Ok = Tournament;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        _: Select<By<Tournament, Next>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.serve("GET tournaments/next".into(), None, |s| {
            s.tournaments
                .iter()
                .filter(|t| t.is_active)
                .min_by_key(|t| t.date)
                .cloned()
                .ok_or_else(not_found)
        })
    }
}

impl Api<Select<By<Vec<Registration>, Mine>>> for Fake {
    type Ok = Vec<Registration>;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Registration>, Mine>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.serve(
            "GET tournament-registrations/my-registrations".into(),
            None,
            |s| {
                let me = s.me()?;
                Ok(s.registrations
                    .iter()
                    .filter(|r| r.is_by(me))
                    .cloned()
                    .collect())
            },
        )
    }
}

impl Api<Select<By<Vec<Registration>, tournament::Id>>> for Fake {
    type Ok = Vec<Registration>;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Registration>, tournament::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.serve(
            format!("GET tournament-registrations/tournament/{id}"),
            None,
            |s| {
                Ok(s.registrations
                    .iter()
                    .filter(|r| r.tournament_id() == Some(id))
                    .cloned()
                    .collect())
            },
        )
    }
}

impl Api<Insert<registration::New>> for Fake {
    type Ok = Registration;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Insert(new): Insert<registration::New>,
    ) -> Result<Self::Ok, Self::Err> {
        let body = serde_json::to_value(&new).ok();
        self.serve("POST tournament-registrations".into(), body, |s| {
            let me = s.me()?;
            let name = s
                .tournaments
                .iter()
                .find(|t| t.id == new.tournament_id)
                .map(|t| t.name.clone())
                .ok_or_else(not_found)?;
            if s.registrations.iter().any(|r| {
                r.is_by(me) && r.tournament_id() == Some(new.tournament_id)
            }) {
                return Err(api::Status::new(400)
                    .with_message("Already registered"));
            }
            let created = Registration {
                id: s.next_id().into(),
                tournament: (!s.terse_registrations).then(|| tournament::Ref {
                    id: new.tournament_id,
                    name: Some(name),
                }),
                tournament_id: None,
                user: Some(user::Ref { id: me, name: None }),
                category: new.category,
                gender: Some(new.gender),
                partner_email: Some(new.partner_email),
            };
            s.registrations.push(created.clone());
            Ok(created)
        })
    }
}

impl Api<Delete<registration::Id>> for Fake {
    type Ok = ();
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Delete(id): Delete<registration::Id>,
    ) -> Result<Self::Ok, Self::Err> {
        self.serve(format!("DELETE tournament-registrations/{id}"), None, |s| {
            _ = s.me()?;
            let before = s.registrations.len();
            s.registrations.retain(|r| r.id != id);
            (s.registrations.len() < before)
                .then_some(())
                .ok_or_else(not_found)
        })
    }
}

//! [`TournamentBoard`] view of the club tournaments.

use std::convert::Infallible;

use common::Date;
use tracerr::Traced;
use tracing as log;

use crate::{
    command::{
        self, CancelTournamentRegistration, CheckSession, Logout,
        RegisterForTournament,
    },
    domain::{
        tournament::{
            self,
            registration::{self, Form, FormErrors},
        },
        user::{self, Gender},
        Registration, Tournament, User,
    },
    infra::api,
    query,
    view::{AsMessage, Confirm, Message, Redirect},
    Command, Query, Service,
};

/// Path of the [`TournamentBoard`] screen.
pub const PATH: &str = "/torneios";

/// Action a user may take on a [`Tournament`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Affordance {
    /// User may register.
    Register,

    /// User is registered and may cancel the [`Registration`].
    Cancel(registration::Id),

    /// Maximum number of participants is reached.
    Full,

    /// Registrations are not accepted.
    Closed,

    /// User has to log in to register.
    LoginRequired,

    /// Nothing can be done anymore.
    None,
}

/// Registered participants of a [`Gender`] compared to its cap.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Progress {
    /// [`Gender`] of the participants.
    pub gender: Gender,

    /// Number of registered participants.
    pub registered: u32,

    /// Maximum number of participants.
    pub cap: u32,
}

/// Screen of the club tournaments and the registrations into them.
#[derive(Debug)]
pub struct TournamentBoard<A, S> {
    /// [`Service`] performing the actions.
    svc: Service<A, S>,

    /// Known [`Tournament`]s.
    tournaments: Vec<Tournament>,

    /// [`Registration`]s of the authenticated user.
    my_registrations: Vec<Registration>,

    /// ID of the opened [`Tournament`].
    active: Option<tournament::Id>,

    /// ID of the next scheduled [`Tournament`].
    next: Option<tournament::Id>,

    /// Registration [`Form`] of the opened [`Tournament`].
    form: Form,

    /// Validation errors of the [`Form`].
    form_errors: FormErrors,

    /// Indicator whether a network action is in progress.
    loading: bool,

    /// Message of the last failed action.
    error: Option<Message>,

    /// Message of the last successful action.
    notice: Option<Message>,

    /// Pending navigation to the login screen.
    redirect: Option<Redirect>,
}

impl<A, S> TournamentBoard<A, S> {
    /// Creates a new empty [`TournamentBoard`].
    #[must_use]
    pub fn new(svc: Service<A, S>) -> Self {
        Self {
            svc,
            tournaments: vec![],
            my_registrations: vec![],
            active: None,
            next: None,
            form: Form::default(),
            form_errors: FormErrors::default(),
            loading: false,
            error: None,
            notice: None,
            redirect: None,
        }
    }

    /// Returns the [`Service`] of this [`TournamentBoard`].
    #[must_use]
    pub fn service(&self) -> &Service<A, S> {
        &self.svc
    }

    /// Returns all the known [`Tournament`]s.
    #[must_use]
    pub fn tournaments(&self) -> &[Tournament] {
        &self.tournaments
    }

    /// Returns the [`Registration`]s of the authenticated user.
    #[must_use]
    pub fn my_registrations(&self) -> &[Registration] {
        &self.my_registrations
    }

    /// Returns the [`Tournament`] with the provided ID, if known.
    #[must_use]
    pub fn tournament(&self, id: tournament::Id) -> Option<&Tournament> {
        self.tournaments.iter().find(|t| t.id == id)
    }

    /// Returns the opened [`Tournament`], if any.
    #[must_use]
    pub fn active(&self) -> Option<&Tournament> {
        self.tournament(self.active?)
    }

    /// Returns the next scheduled [`Tournament`], if loaded and any.
    #[must_use]
    pub fn next(&self) -> Option<&Tournament> {
        self.tournament(self.next?)
    }

    /// Returns the registration [`Form`] of the opened [`Tournament`].
    #[must_use]
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Returns the registration [`Form`] of the opened [`Tournament`] for
    /// editing.
    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    /// Returns the validation errors of the registration [`Form`].
    #[must_use]
    pub fn form_errors(&self) -> &FormErrors {
        &self.form_errors
    }

    /// Indicates whether a network action is in progress.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns the message of the last failed action.
    #[must_use]
    pub fn error(&self) -> Option<&Message> {
        self.error.as_ref()
    }

    /// Returns the message of the last successful action.
    #[must_use]
    pub fn notice(&self) -> Option<&Message> {
        self.notice.as_ref()
    }

    /// Returns the pending [`Redirect`] to the login screen, if any.
    #[must_use]
    pub fn redirect(&self) -> Option<Redirect> {
        self.redirect
    }

    /// Returns the published [`Tournament`]s taking place `today` or later.
    #[must_use]
    pub fn upcoming(&self, today: Date) -> Vec<&Tournament> {
        self.tournaments
            .iter()
            .filter(|t| t.is_upcoming(today))
            .collect()
    }

    /// Returns the [`Tournament`]s which have already taken place.
    #[must_use]
    pub fn past(&self, today: Date) -> Vec<&Tournament> {
        self.tournaments.iter().filter(|t| t.is_past(today)).collect()
    }

    /// Returns the [`Registration`] of the authenticated user into the
    /// [`Tournament`] with the provided ID, if any.
    #[must_use]
    pub fn my_registration(
        &self,
        id: tournament::Id,
    ) -> Option<&Registration> {
        self.my_registrations
            .iter()
            .find(|r| r.tournament_id() == Some(id))
    }

    /// Returns names of the participants of the [`Tournament`] with the
    /// provided ID.
    #[must_use]
    pub fn participant_names(
        &self,
        id: tournament::Id,
        current: Option<&User>,
    ) -> Vec<String> {
        self.tournament(id)
            .map(|t| {
                t.registrations
                    .iter()
                    .map(|r| r.display_name(current))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the per-[`Gender`] [`Progress`] of the opened [`Tournament`].
    ///
    /// Empty if the [`Tournament`] doesn't cap participants by [`Gender`].
    #[must_use]
    pub fn gender_progress(&self) -> Vec<Progress> {
        let Some(t) = self.active() else {
            return vec![];
        };
        let Some(caps) = t.max_participants_by_gender else {
            return vec![];
        };
        [Gender::Male, Gender::Female]
            .into_iter()
            .map(|gender| Progress {
                gender,
                registered: t.participants_of(gender),
                cap: caps.of(gender),
            })
            .collect()
    }

    /// Returns the [`Affordance`] the authenticated user has on the
    /// [`Tournament`] with the provided ID.
    pub async fn affordance(&self, id: tournament::Id, today: Date) -> Affordance
    where
        Service<A, S>: Command<CheckSession, Ok = bool, Err = Infallible>,
    {
        let Some(t) = self.tournament(id) else {
            return Affordance::None;
        };
        let past = t.is_past(today);

        if let Some(r) = self.my_registration(id) {
            return if past {
                Affordance::None
            } else {
                Affordance::Cancel(r.id)
            };
        }
        if past {
            Affordance::None
        } else if !t.is_registration_open {
            Affordance::Closed
        } else if t.is_full() {
            Affordance::Full
        } else if !self.svc.is_authenticated().await {
            Affordance::LoginRequired
        } else {
            Affordance::Register
        }
    }

    /// Reloads the [`Tournament`]s, and the [`Registration`]s of the
    /// authenticated user, if any.
    pub async fn refresh(&mut self) -> bool
    where
        Service<A, S>: Query<
                query::tournaments::All,
                Ok = Vec<Tournament>,
                Err = Traced<api::Error>,
            > + Query<
                query::registrations::Mine,
                Ok = Vec<Registration>,
                Err = Traced<api::Error>,
            > + Command<CheckSession, Ok = bool, Err = Infallible>
            + Command<Logout, Ok = (), Err = Infallible>,
    {
        self.loading = true;
        let res = if self.svc.is_authenticated().await {
            futures::try_join!(
                self.svc.execute(query::tournaments::All::all()),
                self.svc.execute(query::registrations::Mine::by(api::Mine)),
            )
        } else {
            self.svc
                .execute(query::tournaments::All::all())
                .await
                .map(|all| (all, vec![]))
        };
        self.loading = false;

        match res {
            Ok((tournaments, mine)) => {
                self.tournaments = tournaments;
                self.my_registrations = mine;
                self.error = None;
                true
            }
            Err(e) => self.fail(&e, "Failed to load the tournaments"),
        }
    }

    /// Opens the [`Tournament`] with the provided ID, prefilling its
    /// registration [`Form`] for the authenticated user.
    pub async fn open(&mut self, id: tournament::Id) -> bool {
        if self.tournament(id).is_none() {
            return self.reject("Tournament not found.");
        }
        let me = self.svc.current_user().await;
        self.active = Some(id);
        self.form = Form::for_user(me.as_ref());
        self.form_errors = FormErrors::default();
        self.error = None;
        true
    }

    /// Loads the details and the [`Registration`]s of the [`Tournament`]
    /// with the provided ID, opening it.
    pub async fn load_details(&mut self, id: tournament::Id) -> bool
    where
        Service<A, S>: Query<
                query::tournament::ById,
                Ok = Tournament,
                Err = Traced<api::Error>,
            > + Query<
                query::registrations::ByTournament,
                Ok = Vec<Registration>,
                Err = Traced<api::Error>,
            >,
    {
        self.loading = true;
        let res = futures::try_join!(
            self.svc.execute(query::tournament::ById::by(id)),
            self.svc.execute(query::registrations::ByTournament::by(id)),
        );
        self.loading = false;

        match res {
            Ok((mut tournament, registrations)) => {
                tournament.registrations = registrations;
                match self.tournaments.iter_mut().find(|t| t.id == id) {
                    Some(t) => *t = tournament,
                    None => self.tournaments.push(tournament),
                }
                self.open(id).await
            }
            Err(e) => self.fail(&e, "Failed to load the tournament"),
        }
    }

    /// Loads the next scheduled [`Tournament`].
    ///
    /// Nothing being scheduled is not a failure: [`TournamentBoard::next()`]
    /// just returns [`None`] then.
    pub async fn load_next(&mut self) -> bool
    where
        Service<A, S>: Query<
            query::tournament::Next,
            Ok = Tournament,
            Err = Traced<api::Error>,
        >,
    {
        self.loading = true;
        let res = self
            .svc
            .execute(query::tournament::Next::by(api::Next))
            .await;
        self.loading = false;

        match res {
            Ok(tournament) => {
                self.next = Some(tournament.id);
                match self.tournaments.iter_mut().find(|t| t.id == tournament.id)
                {
                    Some(t) => *t = tournament,
                    None => self.tournaments.push(tournament),
                }
                self.error = None;
                true
            }
            Err(e) if e.as_ref().status() == Some(404) => {
                self.next = None;
                self.error = None;
                true
            }
            Err(e) => self.fail(&e, "Failed to load the next tournament"),
        }
    }

    /// Registers the authenticated user into the opened [`Tournament`] with
    /// the filled in [`Form`].
    pub async fn submit_registration(&mut self) -> bool
    where
        Service<A, S>: Command<
                RegisterForTournament,
                Ok = Registration,
                Err = Traced<command::register_for_tournament::ExecutionError>,
            > + Command<CheckSession, Ok = bool, Err = Infallible>,
    {
        let Some(t) = self.active() else {
            return self.reject("Please, select a tournament.");
        };
        if self.my_registration(t.id).is_some() {
            return self
                .reject("You are already registered for this tournament.");
        }
        if !t.is_registration_open {
            return self
                .reject("Registrations for this tournament are closed.");
        }
        if t.is_full() {
            return self.reject(
                "This tournament has reached the maximum number of \
                 participants.",
            );
        }
        let new = match self.form.validate(t) {
            Ok(new) => new,
            Err(errors) => {
                self.form_errors = errors;
                return self.reject("Please, fix the highlighted fields.");
            }
        };
        self.form_errors = FormErrors::default();

        if !self.svc.is_authenticated().await {
            self.redirect = Some(Redirect::to_login(PATH));
            return self.reject(
                "You need to be logged in to register for a tournament.",
            );
        }

        self.loading = true;
        let res = self
            .svc
            .execute(RegisterForTournament { registration: new })
            .await;
        self.loading = false;

        match res {
            Ok(mut created) => {
                if created.tournament_id().is_none() {
                    created.tournament_id = self.active;
                }
                let me = self.svc.current_user().await;
                if let Some(me) = &me {
                    let user = created.user.get_or_insert_with(|| user::Ref {
                        id: me.id,
                        name: None,
                    });
                    if user.id == me.id && user.name.is_none() {
                        user.name = Some(me.name.to_string());
                    }
                }
                if let Some(t) = self
                    .active
                    .and_then(|id| self.tournaments.iter_mut().find(|t| t.id == id))
                {
                    if !t.registrations.iter().any(|r| r.id == created.id) {
                        t.registrations.push(created.clone());
                    }
                }
                self.my_registrations.push(created);
                self.form = Form::for_user(me.as_ref());
                self.succeed("Registration completed.")
            }
            Err(e) => self.fail(&e, "Failed to register"),
        }
    }

    /// Cancels the [`Registration`] of the authenticated user into the
    /// opened [`Tournament`], once the user confirms it.
    ///
    /// Declining the confirmation is not a failure, but returns `false`.
    pub async fn cancel_registration(
        &mut self,
        today: Date,
        confirm: &impl Confirm,
    ) -> bool
    where
        Service<A, S>: Command<
            CancelTournamentRegistration,
            Ok = (),
            Err = Traced<
                command::cancel_tournament_registration::ExecutionError,
            >,
        >,
    {
        let Some(t) = self.active() else {
            return self.reject("Please, select a tournament.");
        };
        if t.is_past(today) {
            return self.reject("This tournament has already taken place.");
        }
        let Some(id) = self.my_registration(t.id).map(|r| r.id) else {
            return self.reject("You are not registered for this tournament.");
        };
        if !confirm.confirm("Do you really want to cancel your registration?")
        {
            return false;
        }

        self.loading = true;
        let res = self
            .svc
            .execute(CancelTournamentRegistration { id })
            .await;
        self.loading = false;

        match res {
            Ok(()) => {
                self.my_registrations.retain(|r| r.id != id);
                for t in &mut self.tournaments {
                    t.registrations.retain(|r| r.id != id);
                }
                self.succeed("Registration cancelled.")
            }
            Err(e) => self.fail(&e, "Failed to cancel the registration"),
        }
    }

    /// Records a locally rejected action.
    fn reject(&mut self, msg: impl Into<Message>) -> bool {
        self.error = Some(msg.into());
        self.notice = None;
        false
    }

    /// Records a successful action.
    fn succeed(&mut self, msg: &'static str) -> bool {
        self.error = None;
        self.notice = Some(msg.into());
        true
    }

    /// Records a failed action, requesting a [`Redirect`] to the login screen
    /// if the session is gone.
    fn fail(&mut self, err: &impl AsMessage, action: &str) -> bool {
        if err.is_unauthorized() {
            self.redirect = Some(Redirect::to_login(PATH));
        }
        log::warn!("{action}: {}", err.as_message());
        self.reject(err.as_message())
    }
}

#[cfg(test)]
mod tests {
    use common::{datetime::parse_date, Date};
    use serde_json::{json, Value};

    use crate::{
        domain::{
            tournament::registration::Field,
            user::Gender,
            Registration, Tournament,
        },
        infra::{
            api::{
                self,
                fake::{self, Fake},
            },
            storage::Memory,
        },
        view::Redirect,
        Config, Service,
    };

    use super::{Affordance, Progress, TournamentBoard};

    fn today() -> Date {
        parse_date("2024-06-15").unwrap()
    }

    fn tournament(id: i64, extra: Value) -> Tournament {
        let mut base = json!({
            "id": id,
            "name": format!("Torneio {id}"),
            "date": "2024-06-20",
            "isActive": true,
            "isRegistrationOpen": true,
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object())
        {
            base.extend(extra.clone());
        }
        serde_json::from_value(base).unwrap()
    }

    fn registration(id: i64, tournament: i64, user: i64) -> Registration {
        serde_json::from_value(json!({
            "id": id,
            "tournamentId": tournament,
            "user": { "id": user },
            "gender": "male",
            "partnerEmail": "parceiro@aabb.com",
        }))
        .unwrap()
    }

    fn seed(fake: &Fake, tournaments: Vec<Tournament>, regs: Vec<Registration>) {
        let mut state = fake.state();
        state.tournaments = tournaments;
        state.registrations = regs;
    }

    async fn board(fake: &Fake) -> TournamentBoard<Fake, Memory> {
        let me = fake::member(7, "Maria", Some(Gender::Female));
        let svc = fake::logged_in(fake, me).await;
        let mut board = TournamentBoard::new(svc);
        assert!(board.refresh().await);
        board
    }

    fn ids(all: &[&Tournament]) -> Vec<i64> {
        all.iter().map(|t| i64::from(t.id)).collect()
    }

    #[tokio::test]
    async fn splits_upcoming_and_past_for_guests() {
        let fake = Fake::default();
        seed(
            &fake,
            vec![
                tournament(1, json!({})),
                tournament(2, json!({ "date": "2024-06-01" })),
                tournament(
                    3,
                    json!({ "status": "finalizado", "isActive": false }),
                ),
            ],
            vec![],
        );
        let svc = Service::new(Config::default(), fake.clone(), Memory::new());
        let mut board = TournamentBoard::new(svc);

        assert!(board.refresh().await);
        assert_eq!(fake.endpoints(), ["GET tournaments"]);
        assert_eq!(ids(&board.upcoming(today())), [1]);
        assert_eq!(ids(&board.past(today())), [2, 3]);
        assert_eq!(
            board.affordance(1.into(), today()).await,
            Affordance::LoginRequired,
        );
    }

    #[tokio::test]
    async fn offers_matching_affordances() {
        let fake = Fake::default();
        seed(
            &fake,
            vec![
                tournament(1, json!({})),
                tournament(2, json!({ "date": "2024-06-01" })),
                tournament(4, json!({ "isRegistrationOpen": false })),
                tournament(5, json!({
                    "maxParticipants": 1,
                    "registrations": [{ "id": 50, "user": { "id": 8 } }],
                })),
                tournament(6, json!({})),
                tournament(7, json!({ "status": "finalizado" })),
            ],
            vec![registration(60, 6, 7), registration(70, 7, 7)],
        );
        let board = board(&fake).await;

        assert_eq!(board.my_registrations().len(), 2);
        assert_eq!(board.affordance(1.into(), today()).await, Affordance::Register);
        assert_eq!(board.affordance(2.into(), today()).await, Affordance::None);
        assert_eq!(board.affordance(4.into(), today()).await, Affordance::Closed);
        assert_eq!(board.affordance(5.into(), today()).await, Affordance::Full);
        assert_eq!(board.affordance(6.into(), today()).await, Affordance::Cancel(60.into()));
        assert_eq!(board.affordance(7.into(), today()).await, Affordance::None);
        assert_eq!(board.affordance(99.into(), today()).await, Affordance::None);
    }

    #[tokio::test]
    async fn validates_form_before_registering() {
        let fake = Fake::default();
        seed(
            &fake,
            vec![tournament(1, json!({ "categories": ["A", "B"] }))],
            vec![],
        );
        let mut board = board(&fake).await;

        assert!(board.open(1.into()).await);
        assert_eq!(board.form().gender, Some(Gender::Female));

        board.form_mut().category = Some("C".into());
        board.form_mut().partner_email = "bad".into();
        assert!(!board.submit_registration().await);
        assert!(board.form_errors().get(Field::Category).is_some());
        assert!(board.form_errors().get(Field::PartnerEmail).is_some());
        assert!(board.form_errors().get(Field::Gender).is_none());
        assert!(!fake.endpoints().contains(&"POST tournament-registrations".into()));

        board.form_mut().category = Some("A".into());
        board.form_mut().partner_email = "ana@aabb.com".into();
        assert!(board.submit_registration().await);
        assert!(board.form_errors().is_empty());

        let post = fake
            .state()
            .calls
            .iter()
            .find(|c| c.endpoint == "POST tournament-registrations")
            .cloned()
            .unwrap();
        assert_eq!(
            post.body,
            Some(json!({
                "tournamentId": 1,
                "category": "A",
                "gender": "female",
                "partnerEmail": "ana@aabb.com",
            })),
        );

        assert_eq!(board.my_registrations().len(), 1);
        assert_eq!(board.active().unwrap().registrations.len(), 1);
        assert_eq!(board.participant_names(1.into(), None), ["Maria"]);
        assert!(matches!(
            board.affordance(1.into(), today()).await,
            Affordance::Cancel(_),
        ));
    }

    #[tokio::test]
    async fn guards_against_double_registration() {
        let fake = Fake::default();
        seed(&fake, vec![tournament(1, json!({}))], vec![registration(10, 1, 7)]);
        let mut board = board(&fake).await;

        assert!(board.open(1.into()).await);
        board.form_mut().partner_email = "ana@aabb.com".into();
        assert!(!board.submit_registration().await);
        assert_eq!(
            board.error().map(ToString::to_string).as_deref(),
            Some("You are already registered for this tournament."),
        );
        assert!(!fake.endpoints().contains(&"POST tournament-registrations".into()));
    }

    #[tokio::test]
    async fn keeps_guarding_when_server_omits_tournament() {
        let fake = Fake::default();
        seed(&fake, vec![tournament(1, json!({}))], vec![]);
        fake.state().terse_registrations = true;
        let mut board = board(&fake).await;

        assert!(board.open(1.into()).await);
        board.form_mut().partner_email = "ana@aabb.com".into();
        assert!(board.submit_registration().await);
        assert!(board.my_registration(1.into()).is_some());

        board.form_mut().partner_email = "ana@aabb.com".into();
        assert!(!board.submit_registration().await);
        assert_eq!(
            board.error().map(ToString::to_string).as_deref(),
            Some("You are already registered for this tournament."),
        );
        let posts = fake
            .endpoints()
            .into_iter()
            .filter(|e| e == "POST tournament-registrations")
            .count();
        assert_eq!(posts, 1);
    }

    #[tokio::test]
    async fn rejects_full_tournaments_locally() {
        let fake = Fake::default();
        seed(
            &fake,
            vec![tournament(1, json!({
                "maxParticipants": 1,
                "registrations": [{ "id": 50, "user": { "id": 8 } }],
            }))],
            vec![],
        );
        let mut board = board(&fake).await;

        assert!(board.open(1.into()).await);
        board.form_mut().partner_email = "ana@aabb.com".into();
        assert!(!board.submit_registration().await);
        assert!(!fake.endpoints().contains(&"POST tournament-registrations".into()));
    }

    #[tokio::test]
    async fn cancels_registration_everywhere_once_confirmed() {
        let fake = Fake::default();
        let mine = registration(10, 1, 7);
        seed(
            &fake,
            vec![tournament(1, json!({
                "registrations": [
                    serde_json::to_value(&mine).unwrap(),
                    { "id": 11, "user": { "id": 8, "name": "Joana" } },
                ],
            }))],
            vec![mine],
        );
        let mut board = board(&fake).await;
        assert!(board.open(1.into()).await);

        assert!(!board.cancel_registration(today(), &false).await);
        assert!(board.error().is_none());
        assert!(!fake
            .endpoints()
            .contains(&"DELETE tournament-registrations/10".into()));

        assert!(board.cancel_registration(today(), &true).await);
        assert!(board.my_registrations().is_empty());
        assert_eq!(board.participant_names(1.into(), None), ["Joana"]);
        assert_eq!(
            board.affordance(1.into(), today()).await,
            Affordance::Register,
        );
    }

    #[tokio::test]
    async fn loads_details_with_registrations() {
        let fake = Fake::default();
        seed(
            &fake,
            vec![tournament(1, json!({
                "maxParticipantsByGender": { "male": 8, "female": 8 },
            }))],
            vec![registration(10, 1, 8), registration(11, 1, 9)],
        );
        let mut board = board(&fake).await;

        assert!(board.load_details(1.into()).await);
        assert_eq!(board.active().map(|t| i64::from(t.id)), Some(1));
        assert_eq!(board.active().unwrap().participants(), 2);
        assert_eq!(
            board.gender_progress(),
            [
                Progress {
                    gender: Gender::Male,
                    registered: 2,
                    cap: 8,
                },
                Progress {
                    gender: Gender::Female,
                    registered: 0,
                    cap: 8,
                },
            ],
        );
        assert_eq!(
            board.participant_names(1.into(), None),
            ["parceiro", "parceiro"],
        );
    }

    #[tokio::test]
    async fn loads_next_tournament_if_scheduled() {
        let fake = Fake::default();
        seed(
            &fake,
            vec![
                tournament(1, json!({ "date": "2024-07-01" })),
                tournament(2, json!({})),
            ],
            vec![],
        );
        let mut board = board(&fake).await;

        assert!(board.load_next().await);
        assert_eq!(board.next().map(|t| i64::from(t.id)), Some(2));
        assert_eq!(fake.endpoints().last().map(String::as_str), Some("GET tournaments/next"));

        fake.state().tournaments.clear();
        assert!(board.load_next().await);
        assert!(board.next().is_none());
        assert!(board.error().is_none());

        fake.fail("GET tournaments/next", api::Status::new(500));
        assert!(!board.load_next().await);
        assert!(board.error().is_some());
    }

    #[tokio::test]
    async fn redirects_to_login_on_unauthorized() {
        let fake = Fake::default();
        seed(&fake, vec![tournament(1, json!({}))], vec![]);
        let mut board = board(&fake).await;
        fake.fail("POST tournament-registrations", api::Status::new(401));

        assert!(board.open(1.into()).await);
        board.form_mut().partner_email = "ana@aabb.com".into();
        assert!(!board.submit_registration().await);
        assert_eq!(
            board.redirect(),
            Some(Redirect {
                to: "/login",
                from: "/torneios",
            }),
        );
        assert!(!board.service().is_authenticated().await);
    }
}

//! [`Scheduler`] view of the courts reservations.

mod book;

use std::{convert::Infallible, iter};

use common::{Date, DateTime};
use tracerr::Traced;
use tracing as log;

use crate::{
    command::{
        self, CancelReservation, CheckSession, CreateReservation, Logout,
        UpdateReservation,
    },
    domain::{court, reservation, Court, Reservation, Slot},
    infra::api,
    query,
    view::{AsMessage, Confirm, Message, Redirect},
    Command, Query, Service,
};

pub use self::book::ReservationBook;

/// Stage of the reservation form of a [`Scheduler`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Mode {
    /// No reservation is being composed.
    #[default]
    Browsing,

    /// New [`Reservation`] is being composed.
    Composing,

    /// Existing [`Reservation`] is being rescheduled.
    ///
    /// Its [`Court`] cannot be changed.
    Editing(reservation::Id),
}

/// Occupation of a [`Slot`] in an agenda.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SlotStatus {
    /// Nobody reserved the [`Slot`].
    Available,

    /// [`Slot`] is reserved by the authenticated user.
    Mine,

    /// [`Slot`] is reserved by somebody else.
    Other,
}

/// All the [`Slot`]s of a [`Court`] on some day.
#[derive(Clone, Debug)]
pub struct CourtAgenda<'a> {
    /// [`Court`] this agenda is of.
    pub court: &'a Court,

    /// [`Slot`]s of the day in order with their [`SlotStatus`].
    pub slots: Vec<(Slot, SlotStatus)>,
}

/// Usage of the active reservations quota of a user.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Quota {
    /// Number of not yet finalized [`Reservation`]s.
    pub active: usize,

    /// Maximum number of active [`Reservation`]s.
    pub limit: usize,
}

impl Quota {
    /// Indicates whether no more [`Reservation`]s can be made.
    #[must_use]
    pub fn is_reached(self) -> bool {
        self.active >= self.limit
    }
}

/// Screen of the courts reservations of the authenticated user.
#[derive(Debug)]
pub struct Scheduler<A, S> {
    /// [`Service`] performing the actions.
    svc: Service<A, S>,

    /// Known [`Court`]s.
    courts: Vec<Court>,

    /// Known [`Reservation`]s.
    book: ReservationBook,

    /// Current [`Mode`] of the form.
    mode: Mode,

    /// [`Court`] selected in the form.
    court: Option<court::Id>,

    /// [`Date`] selected in the form.
    date: Date,

    /// [`Slot`] selected in the form.
    slot: Option<Slot>,

    /// Indicator whether a network action is in progress.
    loading: bool,

    /// Message of the last failed action.
    error: Option<Message>,

    /// Message of the last successful action.
    notice: Option<Message>,

    /// Pending navigation to the login screen.
    redirect: Option<Redirect>,
}

/// Path of the [`Scheduler`] screen.
pub const PATH: &str = "/reservas";

/// Number of days, today included, a [`Reservation`] can be made for.
pub const DAYS_AHEAD: usize = 7;

/// Returns the [`Date`]s a [`Reservation`] can be made for, starting from
/// `today`.
#[must_use]
pub fn upcoming_days(today: Date) -> Vec<Date> {
    iter::successors(Some(today), |d| d.next_day())
        .take(DAYS_AHEAD)
        .collect()
}

impl<A, S> Scheduler<A, S> {
    /// Creates a new empty [`Scheduler`] showing the provided [`Date`].
    #[must_use]
    pub fn new(svc: Service<A, S>, today: Date) -> Self {
        Self {
            svc,
            courts: vec![],
            book: ReservationBook::default(),
            mode: Mode::Browsing,
            court: None,
            date: today,
            slot: None,
            loading: false,
            error: None,
            notice: None,
            redirect: None,
        }
    }

    /// Returns the [`Service`] of this [`Scheduler`].
    #[must_use]
    pub fn service(&self) -> &Service<A, S> {
        &self.svc
    }

    /// Returns the known [`Court`]s.
    #[must_use]
    pub fn courts(&self) -> &[Court] {
        &self.courts
    }

    /// Returns the known [`Reservation`]s.
    #[must_use]
    pub fn book(&self) -> &ReservationBook {
        &self.book
    }

    /// Returns the current [`Mode`] of the form.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the [`Court`] selected in the form.
    #[must_use]
    pub fn court(&self) -> Option<court::Id> {
        self.court
    }

    /// Returns the [`Date`] selected in the form.
    #[must_use]
    pub fn date(&self) -> Date {
        self.date
    }

    /// Returns the [`Slot`] selected in the form.
    #[must_use]
    pub fn slot(&self) -> Option<Slot> {
        self.slot
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

    /// Returns the [`Reservation`]s of the authenticated user ordered by their
    /// start time.
    #[must_use]
    pub fn my_reservations(&self) -> Vec<&Reservation> {
        self.book.mine()
    }

    /// Returns the [`Quota`] usage of the authenticated user at `now`.
    #[must_use]
    pub fn quota(&self, now: DateTime) -> Quota {
        Quota {
            active: self.book.active_mine_count(now),
            limit: self.svc.config().reservation_limit,
        }
    }

    /// Selects the [`Court`] to reserve, starting a new [`Reservation`].
    ///
    /// Rejected while rescheduling, since the [`Court`] of an existing
    /// [`Reservation`] cannot change.
    pub fn select_court(&mut self, id: court::Id) -> bool {
        if matches!(self.mode, Mode::Editing(_)) {
            return self.reject("The court of a reservation cannot be changed.");
        }
        if !self.courts.is_empty() && !self.courts.iter().any(|c| c.id == id) {
            return self.reject("Unknown court.");
        }
        self.court = Some(id);
        self.slot = None;
        self.mode = Mode::Composing;
        self.error = None;
        true
    }

    /// Selects the [`Date`] to reserve at, clearing the selected [`Slot`].
    pub fn select_date(&mut self, date: Date) {
        self.date = date;
        self.slot = None;
    }

    /// Selects the [`Slot`] to reserve, if it's available.
    pub fn select_slot(&mut self, slot: Slot) -> bool {
        let Some(court) = self.court else {
            return self.reject("Please, select a court first.");
        };
        if !self.is_available(court, self.date, slot) {
            return self.reject("This time slot is already taken.");
        }
        self.slot = Some(slot);
        self.error = None;
        true
    }

    /// Starts rescheduling the [`Reservation`] with the provided ID.
    ///
    /// Only the own not yet finalized [`Reservation`]s can be rescheduled.
    pub fn begin_edit(&mut self, id: reservation::Id, now: DateTime) -> bool {
        let Some(r) = self.book.get(id) else {
            return self.reject("Reservation not found.");
        };
        if !self.book.is_mine(id) {
            return self.reject("You can only change your own reservations.");
        }
        if r.is_finalized(now) {
            return self.reject("Finalized reservations cannot be changed.");
        }

        self.court = Some(r.court.id);
        self.date = r.start_time.date();
        self.slot = Slot::of(r.start_time);
        self.mode = Mode::Editing(id);
        self.error = None;
        true
    }

    /// Abandons the form, returning to [`Mode::Browsing`].
    pub fn cancel_form(&mut self) {
        self.mode = Mode::Browsing;
        self.court = None;
        self.slot = None;
        self.error = None;
    }

    /// Indicates whether the provided [`Slot`] of the provided [`Court`] is
    /// free on the provided [`Date`].
    ///
    /// The [`Reservation`] being rescheduled doesn't occupy its own [`Slot`].
    #[must_use]
    pub fn is_available(&self, court: court::Id, date: Date, slot: Slot) -> bool {
        let editing = match self.mode {
            Mode::Editing(id) => Some(id),
            Mode::Browsing | Mode::Composing => None,
        };
        self.book.conflict(court, slot.at(date), editing).is_none()
    }

    /// Returns the occupation of every [`Slot`] of every [`Court`] on the
    /// provided [`Date`].
    #[must_use]
    pub fn agenda(&self, date: Date) -> Vec<CourtAgenda<'_>> {
        self.courts
            .iter()
            .map(|court| CourtAgenda {
                court,
                slots: Slot::all()
                    .map(|slot| {
                        let status = match self.book.conflict(
                            court.id,
                            slot.at(date),
                            None,
                        ) {
                            None => SlotStatus::Available,
                            Some(r) if self.book.is_mine(r.id) => SlotStatus::Mine,
                            Some(_) => SlotStatus::Other,
                        };
                        (slot, status)
                    })
                    .collect(),
            })
            .collect()
    }

    /// Reloads the [`Court`]s and [`Reservation`]s.
    pub async fn refresh(&mut self) -> bool
    where
        Service<A, S>: Query<
                query::reservations::Mine,
                Ok = Vec<Reservation>,
                Err = Traced<api::Error>,
            > + Query<
                query::reservations::All,
                Ok = Vec<Reservation>,
                Err = Traced<api::Error>,
            > + Query<query::courts::All, Ok = Vec<Court>, Err = Traced<api::Error>>
            + Command<CheckSession, Ok = bool, Err = Infallible>
            + Command<Logout, Ok = (), Err = Infallible>,
    {
        if !self.svc.is_authenticated().await {
            self.redirect = Some(Redirect::to_login(PATH));
            return self.reject(
                "You need to be logged in to access this page.",
            );
        }

        self.loading = true;
        let res = futures::try_join!(
            self.svc.execute(query::reservations::Mine::by(api::Mine)),
            self.svc.execute(query::reservations::All::all()),
            self.svc.execute(query::courts::All::all()),
        );
        self.loading = false;

        match res {
            Ok((mine, all, courts)) => {
                self.book.reset(all, mine);
                self.courts = courts;
                self.error = None;
                true
            }
            Err(e) => {
                log::error!("failed to load reservations: {e}");
                self.fail(&e, "Failed to load the reservations")
            }
        }
    }

    /// Submits the form, either creating a new [`Reservation`] or
    /// rescheduling the edited one.
    ///
    /// Conflicts with the locally known [`Reservation`]s and an exhausted
    /// [`Quota`] are rejected without reaching the server.
    pub async fn submit(&mut self, now: DateTime) -> bool
    where
        Service<A, S>: Command<
                CreateReservation,
                Ok = Reservation,
                Err = Traced<command::create_reservation::ExecutionError>,
            > + Command<
                UpdateReservation,
                Ok = Reservation,
                Err = Traced<command::update_reservation::ExecutionError>,
            >,
    {
        match self.mode {
            Mode::Browsing => {
                self.reject("Please, select a court and a time slot.")
            }
            Mode::Composing => self.create(now).await,
            Mode::Editing(id) => self.update(id).await,
        }
    }

    /// Creates a new [`Reservation`] out of the form.
    async fn create(&mut self, now: DateTime) -> bool
    where
        Service<A, S>: Command<
            CreateReservation,
            Ok = Reservation,
            Err = Traced<command::create_reservation::ExecutionError>,
        >,
    {
        let (Some(court_id), Some(slot)) = (self.court, self.slot) else {
            return self.reject("Please, select a court and a time slot.");
        };
        let quota = self.quota(now);
        if quota.is_reached() {
            return self.reject(format!(
                "You've reached the limit of {} active reservations.",
                quota.limit,
            ));
        }
        let start_time = slot.at(self.date);
        if self.book.conflict(court_id, start_time, None).is_some() {
            return self.reject("This time slot is already taken.");
        }

        self.loading = true;
        let res = self
            .svc
            .execute(CreateReservation {
                court_id,
                start_time,
            })
            .await;
        self.loading = false;

        match res {
            Ok(created) => {
                self.book.insert(created, true);
                self.cancel_form();
                self.succeed("Reservation created.")
            }
            Err(e) => self.fail(&e, "Failed to create the reservation"),
        }
    }

    /// Reschedules the edited [`Reservation`] to the form's [`Slot`].
    async fn update(&mut self, id: reservation::Id) -> bool
    where
        Service<A, S>: Command<
            UpdateReservation,
            Ok = Reservation,
            Err = Traced<command::update_reservation::ExecutionError>,
        >,
    {
        let (Some(court_id), Some(slot)) = (self.court, self.slot) else {
            return self.reject("Please, select a time slot.");
        };
        let start_time = slot.at(self.date);
        if self.book.conflict(court_id, start_time, Some(id)).is_some() {
            return self.reject("This time slot is already taken.");
        }

        self.loading = true;
        let res = self
            .svc
            .execute(UpdateReservation { id, start_time })
            .await;
        self.loading = false;

        match res {
            Ok(updated) => {
                if !self.book.replace(updated.clone()) {
                    self.book.insert(updated, true);
                }
                self.cancel_form();
                self.succeed("Reservation updated.")
            }
            Err(e) => self.fail(&e, "Failed to update the reservation"),
        }
    }

    /// Cancels the own [`Reservation`] with the provided ID, once the user
    /// confirms it.
    ///
    /// Declining the confirmation is not a failure, but returns `false`.
    pub async fn cancel_reservation(
        &mut self,
        id: reservation::Id,
        now: DateTime,
        confirm: &impl Confirm,
    ) -> bool
    where
        Service<A, S>: Command<
            CancelReservation,
            Ok = (),
            Err = Traced<command::cancel_reservation::ExecutionError>,
        >,
    {
        let Some(r) = self.book.get(id) else {
            return self.reject("Reservation not found.");
        };
        if !self.book.is_mine(id) {
            return self.reject("You can only cancel your own reservations.");
        }
        if r.is_finalized(now) {
            return self.reject("Finalized reservations cannot be cancelled.");
        }
        if !confirm.confirm("Do you really want to cancel this reservation?") {
            return false;
        }

        self.loading = true;
        let res = self.svc.execute(CancelReservation { id }).await;
        self.loading = false;

        match res {
            Ok(()) => {
                drop(self.book.remove(id));
                if self.mode == Mode::Editing(id) {
                    self.cancel_form();
                }
                self.succeed("Reservation cancelled.")
            }
            Err(e) => self.fail(&e, "Failed to cancel the reservation"),
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

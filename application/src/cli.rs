//! Execution of the [`Command`]s against the [`Service`].

use std::io::{self, BufRead as _, Write as _};

use common::DateTime;
use secrecy::SecretBox;
use service::{
    command::RegisterUser,
    domain::{user, Tournament},
    query,
    view::{
        scheduler::{self, SlotStatus},
        tournaments::Affordance,
        AsMessage as _, Confirm, Message, Redirect, Scheduler,
        TournamentBoard,
    },
    Command as _, Query as _,
};
use tracing as log;

use crate::{args::Command, Service};

/// [`Confirm`]ation asked interactively on the terminal.
#[derive(Clone, Copy, Debug)]
pub struct Prompt {
    /// Indicator whether every question is answered positively without
    /// asking.
    pub assume_yes: bool,
}

impl Confirm for Prompt {
    fn confirm(&self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        print!("{question} [y/N] ");
        if let Err(e) = io::stdout().flush() {
            log::warn!("failed to flush stdout: {e}");
        }
        let mut answer = String::new();
        if let Err(e) = io::stdin().lock().read_line(&mut answer) {
            log::warn!("failed to read the answer: {e}");
            return false;
        }
        matches!(answer.trim(), "y" | "Y" | "yes" | "s" | "sim")
    }
}

/// Runs the provided [`Command`] against the provided [`Service`] at `now`.
///
/// # Errors
///
/// With a user-facing [`Message`] if the [`Command`] fails.
pub async fn run(
    cmd: Command,
    svc: Service,
    now: DateTime,
) -> Result<(), Message> {
    let today = now.date();
    match cmd {
        Command::Login { email, password } => login(&svc, email, password).await,
        Command::GoogleLogin { credential } => {
            if !svc.google_login(credential).await {
                return Err(last_error(&svc).await);
            }
            whoami(&svc).await
        }
        Command::Logout => {
            svc.logout().await;
            println!("Logged out.");
            Ok(())
        }
        Command::Register {
            name,
            email,
            password,
            confirmation,
        } => {
            let user = svc
                .execute(RegisterUser {
                    name: user::Name::new(name).ok_or("Invalid name.")?,
                    email: user::Email::new(email).ok_or("Invalid email.")?,
                    password: password_of(password)?,
                    confirmation: password_of(confirmation)?,
                })
                .await
                .map_err(|e| e.as_message())?;
            println!("Registered {} <{}>, you can log in now.", user.name, user.email);
            Ok(())
        }
        Command::Whoami => whoami(&svc).await,
        Command::Courts => {
            let courts = svc
                .execute(query::courts::All::all())
                .await
                .map_err(|e| e.as_message())?;
            for c in courts {
                println!("{}\t{}", c.id, c.name);
            }
            Ok(())
        }
        Command::Reservations => {
            let mut view = Scheduler::new(svc, today);
            ensure(view.refresh().await, view.error(), view.redirect())?;

            let quota = view.quota(now);
            println!("Active reservations: {}/{}", quota.active, quota.limit);
            for r in view.my_reservations() {
                println!(
                    "#{}\t{}\t{}{}",
                    r.id,
                    r.court.name,
                    r.start_time.to_rfc3339(),
                    if r.is_finalized(now) { "\t(finalized)" } else { "" },
                );
            }
            Ok(())
        }
        Command::Agenda { date } => {
            let date = date.unwrap_or(today);
            let mut view = Scheduler::new(svc, date);
            ensure(view.refresh().await, view.error(), view.redirect())?;

            println!("{date}  (. free, * mine, x taken)");
            for row in view.agenda(date) {
                let slots = row
                    .slots
                    .iter()
                    .map(|(slot, status)| {
                        let mark = match status {
                            SlotStatus::Available => '.',
                            SlotStatus::Mine => '*',
                            SlotStatus::Other => 'x',
                        };
                        format!("{slot} {mark}")
                    })
                    .collect::<Vec<_>>()
                    .join("  ");
                println!("#{} {}\t{slots}", row.court.id, row.court.name);
            }
            Ok(())
        }
        Command::Book { court, date, slot } => {
            if !scheduler::upcoming_days(today).contains(&date) {
                return Err(format!(
                    "Reservations can only be made for the next {} days.",
                    scheduler::DAYS_AHEAD,
                )
                .into());
            }
            let mut view = Scheduler::new(svc, date);
            ensure(view.refresh().await, view.error(), view.redirect())?;
            ensure(view.select_court(court), view.error(), None)?;
            ensure(view.select_slot(slot), view.error(), None)?;
            ensure(view.submit(now).await, view.error(), view.redirect())?;
            notice(view.notice());
            Ok(())
        }
        Command::Reschedule { id, date, slot } => {
            let mut view = Scheduler::new(svc, date);
            ensure(view.refresh().await, view.error(), view.redirect())?;
            ensure(view.begin_edit(id, now), view.error(), None)?;
            view.select_date(date);
            ensure(view.select_slot(slot), view.error(), None)?;
            ensure(view.submit(now).await, view.error(), view.redirect())?;
            notice(view.notice());
            Ok(())
        }
        Command::Cancel { id, yes } => {
            let mut view = Scheduler::new(svc, today);
            ensure(view.refresh().await, view.error(), view.redirect())?;
            let done = view
                .cancel_reservation(id, now, &Prompt { assume_yes: yes })
                .await;
            if !done && view.error().is_none() {
                println!("Nothing was cancelled.");
                return Ok(());
            }
            ensure(done, view.error(), view.redirect())?;
            notice(view.notice());
            Ok(())
        }
        Command::Tournaments => {
            let mut board = TournamentBoard::new(svc);
            ensure(board.refresh().await, board.error(), board.redirect())?;

            println!("Upcoming:");
            for t in board.upcoming(today) {
                let affordance = board.affordance(t.id, today).await;
                println!("  {}", summary(t, affordance));
            }
            println!("Past:");
            for t in board.past(today) {
                println!("  {}", summary(t, Affordance::None));
            }
            Ok(())
        }
        Command::NextTournament => {
            let mut board = TournamentBoard::new(svc);
            ensure(board.load_next().await, board.error(), board.redirect())?;
            match board.next() {
                Some(t) => {
                    let affordance = board.affordance(t.id, today).await;
                    println!("{}", summary(t, affordance));
                }
                None => println!("No tournament is scheduled."),
            }
            Ok(())
        }
        Command::Tournament { id } => {
            let mut board = TournamentBoard::new(svc);
            ensure(board.refresh().await, board.error(), board.redirect())?;
            ensure(board.load_details(id).await, board.error(), board.redirect())?;
            let Some(t) = board.active() else {
                return Err("Tournament not found.".into());
            };

            println!("{}", summary(t, board.affordance(id, today).await));
            for line in [&t.kind, &t.location, &t.time, &t.description]
                .into_iter()
                .flatten()
            {
                println!("  {line}");
            }
            if !t.categories.is_empty() {
                println!("  Categories: {}", t.categories.join(", "));
            }
            match t.max_participants {
                Some(max) if max > 0 => {
                    println!("  Participants: {}/{max}", t.participants());
                }
                Some(_) | None => println!("  Participants: {}", t.participants()),
            }
            for p in board.gender_progress() {
                println!("    {}: {}/{}", p.gender, p.registered, p.cap);
            }
            let me = board.service().current_user().await;
            for name in board.participant_names(id, me.as_ref()) {
                println!("    - {name}");
            }
            Ok(())
        }
        Command::Enroll {
            id,
            partner,
            gender,
            category,
        } => {
            let mut board = TournamentBoard::new(svc);
            ensure(board.refresh().await, board.error(), board.redirect())?;
            ensure(board.load_details(id).await, board.error(), board.redirect())?;

            let form = board.form_mut();
            if gender.is_some() {
                form.gender = gender;
            }
            form.category = category;
            form.partner_email = partner;

            if !board.submit_registration().await {
                let fields = board
                    .form_errors()
                    .iter()
                    .map(|(_, msg)| msg)
                    .collect::<Vec<_>>();
                if !fields.is_empty() {
                    return Err(fields.join("; ").into());
                }
                ensure(false, board.error(), board.redirect())?;
            }
            notice(board.notice());
            Ok(())
        }
        Command::Withdraw { id, yes } => {
            let mut board = TournamentBoard::new(svc);
            ensure(board.refresh().await, board.error(), board.redirect())?;
            ensure(board.open(id).await, board.error(), None)?;
            let done = board
                .cancel_registration(today, &Prompt { assume_yes: yes })
                .await;
            if !done && board.error().is_none() {
                println!("Nothing was cancelled.");
                return Ok(());
            }
            ensure(done, board.error(), board.redirect())?;
            notice(board.notice());
            Ok(())
        }
    }
}

/// Logs in with the provided credentials and shows the profile.
async fn login(
    svc: &Service,
    email: String,
    password: String,
) -> Result<(), Message> {
    let email = user::Email::new(email).ok_or("Invalid email.")?;
    if !svc.login(email, password_of(password)?).await {
        return Err(last_error(svc).await);
    }
    whoami(svc).await
}

/// Shows the profile of the logged in member.
async fn whoami(svc: &Service) -> Result<(), Message> {
    if !svc.is_authenticated().await {
        return Err("You are not logged in.".into());
    }
    let me = svc
        .execute(query::user::Me::by(service::infra::api::Mine))
        .await
        .map_err(|e| e.as_message())?;

    println!("{} <{}>", me.name, me.email);
    if let Some(gender) = me.gender {
        println!("  gender: {gender}");
    }
    if !me.roles.is_empty() {
        let roles = me.roles.iter().map(ToString::to_string).collect::<Vec<_>>();
        println!("  roles: {}", roles.join(", "));
    }
    Ok(())
}

/// Returns the [`Message`] of the last failed login.
async fn last_error(svc: &Service) -> Message {
    svc.last_error()
        .await
        .map_or(Message::UNEXPECTED, Message::from)
}

/// Wraps the provided raw `password`, if it's valid.
fn password_of(password: String) -> Result<SecretBox<user::Password>, Message> {
    user::Password::new(password)
        .map(|p| SecretBox::new(Box::new(p)))
        .ok_or_else(|| "Invalid password.".into())
}

/// Turns the outcome of a view action into a [`Result`].
fn ensure(
    ok: bool,
    error: Option<&Message>,
    redirect: Option<Redirect>,
) -> Result<(), Message> {
    if ok {
        return Ok(());
    }
    let msg = error.cloned().unwrap_or(Message::UNEXPECTED);
    Err(match redirect {
        Some(_) => msg.context("Log in with `aabb-reservas login` first"),
        None => msg,
    })
}

/// Prints the provided notice, if any.
fn notice(msg: Option<&Message>) {
    if let Some(msg) = msg {
        println!("{msg}");
    }
}

/// Returns a one-line summary of the provided [`Tournament`].
fn summary(t: &Tournament, affordance: Affordance) -> String {
    let hint = match affordance {
        Affordance::Register => " [registrations open]".to_owned(),
        Affordance::Cancel(id) => format!(" [registered #{id}]"),
        Affordance::Full => " [full]".to_owned(),
        Affordance::Closed => " [registrations closed]".to_owned(),
        Affordance::LoginRequired => " [log in to register]".to_owned(),
        Affordance::None => String::new(),
    };
    format!("#{} {} ({}){hint}", t.id, t.name, t.date)
}

#[cfg(test)]
mod tests {
    use service::view::{Message, Redirect};

    use super::ensure;

    #[test]
    fn explains_required_login() {
        let msg = Message::new("Session expired or unauthorized.");

        assert!(ensure(true, None, None).is_ok());
        assert_eq!(ensure(false, None, None), Err(Message::UNEXPECTED));
        assert_eq!(
            ensure(false, Some(&msg), Some(Redirect::to_login("/reservas")))
                .unwrap_err()
                .to_string(),
            "Log in with `aabb-reservas login` first: Session expired or \
             unauthorized.",
        );
    }
}

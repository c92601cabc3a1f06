//! [`Args`] definitions.

use clap::{Parser, Subcommand};
use common::{datetime::parse_date, Date};
use service::domain::{court, reservation, tournament, user::Gender, Slot};

/// Client of the AABB Jandaia do Sul courts reservations and tournaments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,

    /// [`Command`] to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

/// Action to perform.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Logs in with an email and a password.
    Login {
        /// Email of the account.
        email: String,

        /// Password of the account.
        #[arg(short, long)]
        password: String,
    },

    /// Logs in with a credential issued by Google Identity Services.
    GoogleLogin {
        /// Issued credential.
        credential: String,
    },

    /// Terminates the current session.
    Logout,

    /// Creates a new account.
    Register {
        /// Full name of the member.
        name: String,

        /// Email of the member.
        email: String,

        /// Password of the account.
        #[arg(short, long)]
        password: String,

        /// Repeated password of the account.
        #[arg(long)]
        confirmation: String,
    },

    /// Shows the profile of the logged in member.
    Whoami,

    /// Lists the courts.
    Courts,

    /// Lists own reservations.
    Reservations,

    /// Shows the occupation of every court on a day.
    Agenda {
        /// Day to show, today if omitted.
        #[arg(short, long, value_parser = parse_date)]
        date: Option<Date>,
    },

    /// Reserves a court.
    Book {
        /// ID of the court.
        court: court::Id,

        /// Day of the reservation (`YYYY-MM-DD`).
        #[arg(value_parser = parse_date)]
        date: Date,

        /// Starting hour of the reservation (`08:00`..`21:00`).
        slot: Slot,
    },

    /// Moves an own reservation to another day or hour.
    Reschedule {
        /// ID of the reservation.
        id: reservation::Id,

        /// New day of the reservation (`YYYY-MM-DD`).
        #[arg(value_parser = parse_date)]
        date: Date,

        /// New starting hour of the reservation.
        slot: Slot,
    },

    /// Cancels an own reservation.
    Cancel {
        /// ID of the reservation.
        id: reservation::Id,

        /// Doesn't ask for a confirmation.
        #[arg(short, long)]
        yes: bool,
    },

    /// Lists the tournaments.
    Tournaments,

    /// Shows the next scheduled tournament.
    NextTournament,

    /// Shows the details of a tournament.
    Tournament {
        /// ID of the tournament.
        id: tournament::Id,
    },

    /// Registers into a tournament.
    Enroll {
        /// ID of the tournament.
        id: tournament::Id,

        /// Email of the partner.
        #[arg(short, long)]
        partner: String,

        /// Gender of the participant, the profile one if omitted.
        #[arg(short, long)]
        gender: Option<Gender>,

        /// Category to compete in.
        #[arg(short = 'k', long)]
        category: Option<String>,
    },

    /// Cancels the registration into a tournament.
    Withdraw {
        /// ID of the tournament.
        id: tournament::Id,

        /// Doesn't ask for a confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}


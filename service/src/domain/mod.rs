//! Domain definitions.

pub mod court;
pub mod reservation;
pub mod tournament;
pub mod user;

pub use self::{
    court::Court,
    reservation::{Reservation, Slot},
    tournament::{Registration, Tournament},
    user::{Session, User},
};

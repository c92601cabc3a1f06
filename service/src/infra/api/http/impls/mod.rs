//! [`Api`] implementations.
//!
//! [`Api`]: crate::infra::Api

mod auth;
mod court;
mod reservation;
mod tournament;
mod user;

//! User-facing [`Message`] definitions.

use std::borrow::Cow;

use derive_more::{AsRef, Display};
use tracerr::Traced;

use crate::{command, infra::api};

/// Short user-facing message describing an outcome.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct Message(Cow<'static, str>);

impl Message {
    /// [`Message`] for failures nothing more specific can be said about.
    pub const UNEXPECTED: Self = Self(Cow::Borrowed(
        "An unexpected error occurred. Please, try again.",
    ));

    /// Creates a new [`Message`] with the provided text.
    #[must_use]
    pub fn new(text: impl Into<Cow<'static, str>>) -> Self {
        Self(text.into())
    }

    /// Prefixes this [`Message`] with the provided context.
    #[must_use]
    pub fn context(self, prefix: &str) -> Self {
        Self(format!("{prefix}: {self}").into())
    }
}

impl From<&'static str> for Message {
    fn from(text: &'static str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// Helper trait for converting failures into [`Message`]s.
pub trait AsMessage {
    /// Tries to convert the failure into a [`Message`].
    ///
    /// [`None`] is returned if nothing meaningful can be shown to a user.
    fn try_as_message(&self) -> Option<Message>;

    /// Converts the failure into a [`Message`].
    fn as_message(&self) -> Message {
        self.try_as_message().unwrap_or(Message::UNEXPECTED)
    }

    /// Indicates whether the failure means that the user has to log in
    /// (again).
    fn is_unauthorized(&self) -> bool {
        false
    }
}

impl<E: AsMessage> AsMessage for Traced<E> {
    fn try_as_message(&self) -> Option<Message> {
        self.as_ref().try_as_message()
    }

    fn is_unauthorized(&self) -> bool {
        self.as_ref().is_unauthorized()
    }
}

impl AsMessage for api::Error {
    fn try_as_message(&self) -> Option<Message> {
        if let Some(msg) = self.server_message() {
            return Some(Message::new(msg.to_owned()));
        }
        Some(
            match self.status()? {
                400 => "Invalid request. Check the data and try again.",
                401 => "Session expired or unauthorized.",
                403 => "You are not allowed to perform this operation.",
                404 => "Resource not found.",
                _ => return None,
            }
            .into(),
        )
    }

    fn is_unauthorized(&self) -> bool {
        Self::is_unauthorized(self)
    }
}

impl AsMessage for command::login::ExecutionError {
    fn try_as_message(&self) -> Option<Message> {
        match self {
            Self::Api(e) => Some(e.server_message().map_or_else(
                || "Login failed. Check your credentials.".into(),
                |m| Message::new(m.to_owned()),
            )),
            Self::Storage(_) | Self::Token(_) | Self::Encode(_) => None,
        }
    }
}

impl AsMessage for command::register_user::ExecutionError {
    fn try_as_message(&self) -> Option<Message> {
        match self {
            Self::Api(e) => Some(e.server_message().map_or_else(
                || "Failed to register the user.".into(),
                |m| Message::new(m.to_owned()),
            )),
            Self::PasswordMismatch => Some(
                "Passwords don't match. Check them and try again.".into(),
            ),
        }
    }
}

/// [`Message`] of a missing or expired session.
const LOGIN_REQUIRED: &str = "You need to be logged in to access this page.";

impl AsMessage for command::create_reservation::ExecutionError {
    fn try_as_message(&self) -> Option<Message> {
        Some(match self {
            Self::Api(e) => {
                e.as_message().context("Failed to create the reservation")
            }
            Self::Unauthenticated => LOGIN_REQUIRED.into(),
            Self::NotASlot => "Please, select a court and a time slot.".into(),
        })
    }

    fn is_unauthorized(&self) -> bool {
        match self {
            Self::Api(e) => e.is_unauthorized(),
            Self::Unauthenticated => true,
            Self::NotASlot => false,
        }
    }
}

impl AsMessage for command::update_reservation::ExecutionError {
    fn try_as_message(&self) -> Option<Message> {
        Some(match self {
            Self::Api(e) => {
                e.as_message().context("Failed to update the reservation")
            }
            Self::Unauthenticated => LOGIN_REQUIRED.into(),
            Self::NotASlot => "Please, select a time slot.".into(),
        })
    }

    fn is_unauthorized(&self) -> bool {
        match self {
            Self::Api(e) => e.is_unauthorized(),
            Self::Unauthenticated => true,
            Self::NotASlot => false,
        }
    }
}

impl AsMessage for command::cancel_reservation::ExecutionError {
    fn try_as_message(&self) -> Option<Message> {
        Some(match self {
            Self::Api(e) => {
                e.as_message().context("Failed to cancel the reservation")
            }
            Self::Unauthenticated => LOGIN_REQUIRED.into(),
        })
    }

    fn is_unauthorized(&self) -> bool {
        match self {
            Self::Api(e) => e.is_unauthorized(),
            Self::Unauthenticated => true,
        }
    }
}

impl AsMessage for command::register_for_tournament::ExecutionError {
    fn try_as_message(&self) -> Option<Message> {
        Some(match self {
            Self::Api(e) => e.server_message().map_or_else(
                || "Failed to register. Please, try again.".into(),
                |m| Message::new(m.to_owned()),
            ),
            Self::Unauthenticated => {
                "You need to be logged in to register for a tournament.".into()
            }
        })
    }

    fn is_unauthorized(&self) -> bool {
        match self {
            Self::Api(e) => e.is_unauthorized(),
            Self::Unauthenticated => true,
        }
    }
}

impl AsMessage for command::cancel_tournament_registration::ExecutionError {
    fn try_as_message(&self) -> Option<Message> {
        Some(match self {
            Self::Api(e) => {
                e.as_message().context("Failed to cancel the registration")
            }
            Self::Unauthenticated => LOGIN_REQUIRED.into(),
        })
    }

    fn is_unauthorized(&self) -> bool {
        match self {
            Self::Api(e) => e.is_unauthorized(),
            Self::Unauthenticated => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{command, infra::api};

    use super::{AsMessage as _, Message};

    #[test]
    fn maps_statuses() {
        let msg = |code| api::Error::Status(api::Status::new(code)).as_message();

        assert_eq!(msg(400).as_ref(), "Invalid request. Check the data and try again.");
        assert_eq!(msg(403).as_ref(), "You are not allowed to perform this operation.");
        assert_eq!(msg(404).as_ref(), "Resource not found.");
        assert_eq!(msg(500), Message::UNEXPECTED);
        assert!(api::Error::Status(api::Status::new(401)).is_unauthorized());
    }

    #[test]
    fn prefers_server_messages() {
        let e = api::Error::Status(
            api::Status::new(409).with_message("Horário já reservado"),
        );
        assert_eq!(e.as_message().as_ref(), "Horário já reservado");

        let e = command::create_reservation::ExecutionError::Api(e);
        assert_eq!(
            e.as_message().as_ref(),
            "Failed to create the reservation: Horário já reservado",
        );
        assert!(!e.is_unauthorized());
    }

    #[test]
    fn treats_missing_session_as_unauthorized() {
        let e = command::cancel_reservation::ExecutionError::Unauthenticated;
        assert!(e.is_unauthorized());

        let e = command::login::ExecutionError::Api(api::Error::Status(
            api::Status::new(401),
        ));
        assert_eq!(
            e.as_message().as_ref(),
            "Login failed. Check your credentials.",
        );
        assert!(!e.is_unauthorized());
    }
}

//! [`Api`] gateway definitions.

#[cfg(test)]
pub(crate) mod fake;
#[cfg(feature = "http")]
pub mod http;

use derive_more::{Display, Error as StdError, From};
use secrecy::SecretBox;
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use common::operations::{Perform, Select, Update};

use crate::domain::{
    user::{self, session},
    User,
};

#[cfg(feature = "http")]
pub use self::http::Http;

/// Remote REST API operation.
pub use common::Handler as Api;

/// Selector of the records owned by the authenticated [`User`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Mine;

/// Selector of the next scheduled record.
#[derive(Clone, Copy, Debug, Default)]
pub struct Next;

/// Default `Authorization: Bearer` [`session::Token`] of the [`Api`] calls,
/// [`Update`]d on every login and logout.
#[derive(Clone, Debug, Default, From)]
pub struct Authorization(pub Option<session::Token>);

/// Email and password of a [`User`] to [`Perform`] a login with.
#[derive(Debug)]
pub struct Credentials {
    /// [`user::Email`] of the [`User`].
    pub email: user::Email,

    /// [`user::Password`] of the [`User`].
    pub password: SecretBox<user::Password>,
}

/// Credential issued by Google Identity Services to [`Perform`] a login with.
#[derive(Clone, Debug, From, Serialize)]
pub struct GoogleCredential {
    /// Opaque credential string.
    pub credential: String,
}

/// Data of a new [`User`] account.
#[derive(Debug)]
pub struct SignUp {
    /// [`user::Name`] of the new [`User`].
    pub name: user::Name,

    /// [`user::Email`] of the new [`User`].
    pub email: user::Email,

    /// [`user::Password`] of the new [`User`].
    pub password: SecretBox<user::Password>,
}

/// Successful authentication response.
#[derive(Clone, Debug, Deserialize)]
pub struct Authenticated {
    /// Issued access [`session::Token`].
    pub access_token: session::Token,

    /// Profile of the authenticated [`User`].
    pub user: User,
}

/// [`Api`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Server responded with a non-successful [`Status`].
    #[display("API responded with {_0}")]
    Status(Status),

    #[cfg(feature = "http")]
    /// Request couldn't be delivered or its response couldn't be read.
    #[display("HTTP request failed: {_0}")]
    Transport(reqwest::Error),

    /// Response body is malformed.
    #[display("Malformed API response: {_0}")]
    Decode(serde_json::Error),

    #[cfg(feature = "http")]
    /// Endpoint URL cannot be built.
    #[display("Invalid API URL: {_0}")]
    Url(url::ParseError),
}

impl Error {
    /// Returns the HTTP status code of this [`Error`], if the server responded.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(s) => Some(s.code),
            #[cfg(feature = "http")]
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            #[cfg(feature = "http")]
            Self::Url(_) => None,
            Self::Decode(_) => None,
        }
    }

    /// Indicates whether this [`Error`] means that the [`session::Token`] is
    /// missing, expired or revoked.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Returns the message the server provided along the failure, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status(s) => s.message.as_deref(),
            #[cfg(feature = "http")]
            Self::Transport(_) | Self::Url(_) => None,
            Self::Decode(_) => None,
        }
    }
}

/// Non-successful HTTP status with the message the server explained it with.
#[derive(Clone, Debug, Display, Eq, PartialEq, StdError)]
#[display("`{code}`{}", message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct Status {
    /// HTTP status code.
    pub code: u16,

    /// Message from the response body, if any.
    pub message: Option<String>,
}

impl Status {
    /// Creates a new [`Status`] without a message.
    #[must_use]
    pub fn new(code: u16) -> Self {
        Self {
            code,
            message: None,
        }
    }

    /// Attaches the provided `message` to this [`Status`].
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

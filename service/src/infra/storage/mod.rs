//! [`Storage`]-related implementations.

pub mod file;
pub mod memory;

use derive_more::{Display, Error as StdError, From};

pub use self::{file::File, memory::Memory};

/// Persistent client-side key/value storage operation.
pub use common::Handler as Storage;

/// Well-known [`Storage`] key.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Key {
    /// Access token of the current session.
    #[display("token")]
    Token,

    /// Cached profile of the authenticated user.
    #[display("user")]
    User,
}

/// [`Storage`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// I/O operation failed.
    #[display("Storage I/O failed: {_0}")]
    Io(std::io::Error),

    /// Stored data is malformed.
    #[display("Malformed storage data: {_0}")]
    Json(serde_json::Error),
}

/// The closed set of failure kinds returned by every fallible cask
/// operation.
///
/// Errors deliberately carry no payload: human-readable detail goes to the
/// [`log`](https://docs.rs/log) sink at the point of failure, never into the
/// returned value. This keeps the kinds cheap to compare and to propagate
/// across the package-record boundary.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// The stream could not be read, or the data read does not match what
    /// was expected (wrong type tag, wrong key, short payload, …).
    #[error("can't read from stream, or unexpected data in stream")]
    CantRead,

    /// The stream could not be written to.
    #[error("can't write to stream")]
    CantWrite,

    /// Stored data is corrupted: a digest mismatch, an impossible size, or
    /// a semantic inconsistency between chunks.
    #[error("corrupted data")]
    Corrupted,

    /// An object is invalid, or an operation was applied to an object in an
    /// invalid state.
    #[error("invalid object or operation")]
    Invalid,

    /// An invalid parameter was passed to a method.
    #[error("invalid parameter")]
    InvalidParam,

    /// The requested object does not exist.
    #[error("not found")]
    NotFound,

    /// The object has not been initialized yet.
    #[error("not initialized")]
    NotInitialized,

    /// The object has already been initialized.
    #[error("already initialized")]
    AlreadyInitialized,

    /// Catch-all for failures crossing the package-dispatch boundary.
    #[error("undefined error")]
    Undefined,
}

pub type Result<T> = std::result::Result<T, Error>;

//! Unified error type.

/// The error type returned by paramconv's fallible operations.
///
/// Rejected requests (malformed JSON, failed binding) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// infrastructure failures: binding to a port, accepting a connection, or
/// configuring the process twice.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// [`config::init`](crate::config::init) was called more than once.
    #[error("process-wide config is already set")]
    ConfigAlreadySet,
}

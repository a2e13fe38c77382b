use thiserror::Error;

/// Every failure is fatal for the run: the error propagates to main, gets
/// logged, and the process exits. The next scheduled invocation retries the
/// whole reconciliation from scratch.
#[derive(Clone, Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("HTTP transport error: {0}")]
    Transport(Box<str>),

    // used when a request completed but the returned JSON is nonsense
    #[error("received erroneous JSON: {0}")]
    Json(Box<str>),

    #[error("could not authenticate - check again your username and password")]
    Auth,

    #[error("domain {0} is not owned by this account")]
    NotOwned(Box<str>),

    #[error("Hover rejected the record update: {0}")]
    Update(Box<str>),

    #[error("bad configuration: {0}")]
    Config(Box<str>),

    #[error("unable to read or write the config file: {0}")]
    Persistence(Box<str>),
}

use thiserror::Error;

/// Errors raised while signing a request.
///
/// These are detected before any network call is attempted.
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("consumer key is empty")]
    MissingConsumerKey,
    #[error("consumer secret is empty")]
    MissingConsumerSecret,
    #[error("signing key rejected: {0}")]
    InvalidKey(String),
}

/// Errors raised by the HTTP transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[cfg(feature = "reqwest")]
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} responded with status {status}")]
    Status { status: u16, url: String },
    #[error("failed to read response: {0}")]
    Io(#[from] std::io::Error),
}

/// Top level error of every client operation.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Signing(#[from] SigningError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("unrecognized response shape: {0}")]
    UnrecognizedResponseShape(String),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[test]
fn test_signing_error_converts() {
    let err: Error = SigningError::MissingConsumerSecret.into();
    assert!(matches!(err, Error::Signing(SigningError::MissingConsumerSecret)));
    assert_eq!(err.to_string(), "consumer secret is empty");
}

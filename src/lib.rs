//! Withings API thin client.
//!
//! Signs every request with OAuth 1.0a (HMAC-SHA1), issues it as a GET and
//! hands back the raw response headers and body.
//!
//! ```no_run
//! use withings_api::{Client, Credentials, Params};
//!
//! # fn main() -> withings_api::Result<()> {
//! let client = Client::new(Credentials::new("ck", "cs", "token", "token_secret"))?;
//! let res = client.get_sleep_summary(
//!     Params::new().with("startdate", "1").with("enddate", "2"),
//! )?;
//! println!("{}", res.body());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod credentials;
pub mod endpoint;
pub mod error;
pub mod oauth;
pub mod parameters;
pub mod request;
pub mod response;
pub mod transport;

pub use client::{Client, ClientConfig};
pub use credentials::Credentials;
pub use endpoint::Endpoint;
pub use error::{Error, Result, SigningError, TransportError};
pub use parameters::{ParamValue, Params};
pub use response::Response;
pub use transport::{Transport, TransportResponse};

pub use http::HeaderMap;

#[cfg(feature = "reqwest")]
pub use transport::HttpTransport;

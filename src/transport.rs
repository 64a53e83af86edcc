use http::HeaderMap;
use std::fs::File;
use std::io::{Cursor, Read};
use url::Url;

use crate::error::TransportError;

/// What a [`Transport`] hands back for one GET.
///
/// The body has not been read yet in any of the variants.
pub enum TransportResponse {
    /// A live connection; the body is read off the wire.
    Live {
        status: u16,
        headers: HeaderMap,
        body: Box<dyn Read + Send>,
    },
    /// A fetched resource held in memory, with its header metadata.
    Buffered {
        status: u16,
        meta: HeaderMap,
        buffer: Cursor<Vec<u8>>,
    },
    /// A fetched resource spooled to a temporary file, with its header
    /// metadata. The file is read from its current position.
    Spooled {
        status: u16,
        meta: HeaderMap,
        file: File,
    },
    /// Anything else; carries a description of what was received.
    Other(String),
}

impl TransportResponse {
    pub fn buffered(status: u16, meta: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
        TransportResponse::Buffered {
            status,
            meta,
            buffer: Cursor::new(body.into()),
        }
    }

    pub fn spooled(status: u16, meta: HeaderMap, file: File) -> Self {
        TransportResponse::Spooled { status, meta, file }
    }
}

/// Performs the HTTP GET of a fully built request URL.
///
/// Redirects, TLS and timeouts are the implementation's business.
pub trait Transport {
    fn get(&self, url: &Url) -> Result<TransportResponse, TransportError>;
}

#[cfg(feature = "reqwest")]
pub use self::blocking::HttpTransport;

#[cfg(feature = "reqwest")]
mod blocking {
    use std::time::Duration;
    use url::Url;

    use super::{Transport, TransportResponse};
    use crate::error::TransportError;

    /// Blocking `reqwest` transport over rustls.
    ///
    /// Follows redirects. Statuses outside 2xx are reported as
    /// [`TransportError::Status`].
    #[derive(Clone, Debug)]
    pub struct HttpTransport {
        client: reqwest::blocking::Client,
    }

    impl HttpTransport {
        pub fn new(
            timeout: Option<Duration>,
            user_agent: Option<&str>,
        ) -> Result<Self, TransportError> {
            let mut builder = reqwest::blocking::Client::builder();
            if let Some(timeout) = timeout {
                builder = builder.timeout(timeout);
            }
            if let Some(user_agent) = user_agent {
                builder = builder.user_agent(user_agent.to_string());
            }
            Ok(HttpTransport {
                client: builder.build()?,
            })
        }
    }

    impl Transport for HttpTransport {
        fn get(&self, url: &Url) -> Result<TransportResponse, TransportError> {
            let response = self.client.get(url.clone()).send()?;
            let status = response.status();
            if !status.is_success() {
                let mut url = response.url().clone();
                url.set_query(None);
                return Err(TransportError::Status {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }
            let headers = response.headers().clone();
            Ok(TransportResponse::Live {
                status: status.as_u16(),
                headers,
                body: Box::new(response),
            })
        }
    }
}

#[test]
fn test_repeated_headers_stay_separate() {
    use http::header::{HeaderValue, CONTENT_TYPE, SET_COOKIE};

    let mut meta = HeaderMap::new();
    meta.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    meta.append(
        SET_COOKIE,
        HeaderValue::from_static("a=1; Expires=Wed, 21 Oct 2026 07:28:00 GMT"),
    );
    meta.append(SET_COOKIE, HeaderValue::from_static("b=2"));

    let res = TransportResponse::buffered(200, meta, "{}");
    let meta = match res {
        TransportResponse::Buffered { meta, .. } => meta,
        _ => panic!("expected a buffered response"),
    };
    assert_eq!(meta.get("Content-Type").unwrap(), "application/json");
    let cookies = meta
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(
        cookies,
        vec!["a=1; Expires=Wed, 21 Oct 2026 07:28:00 GMT", "b=2"]
    );
}

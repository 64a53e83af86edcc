use http::HeaderMap;
use std::io::Read;

use crate::error::{Error, TransportError};
use crate::transport::TransportResponse;

/// A HTTP response with its body fully read.
///
/// Headers and body are fixed at construction; accessors never touch the
/// transport again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    status: u16,
    headers: HeaderMap,
    body: String,
}

impl Response {
    /// Normalize whatever the transport returned, consuming its body.
    ///
    /// Fails with [`Error::UnrecognizedResponseShape`] for
    /// [`TransportResponse::Other`].
    pub fn from_transport(res: TransportResponse) -> Result<Response, Error> {
        let (status, headers, body) = match res {
            TransportResponse::Live {
                status,
                headers,
                body,
            } => (status, headers, read_body(body)?),
            TransportResponse::Buffered {
                status,
                meta,
                buffer,
            } => (status, meta, read_body(buffer)?),
            TransportResponse::Spooled { status, meta, file } => {
                (status, meta, read_body(file)?)
            }
            TransportResponse::Other(kind) => {
                return Err(Error::UnrecognizedResponseShape(kind));
            }
        };
        tracing::trace!(status, len = body.len(), "read response body");
        Ok(Response {
            status,
            headers,
            body,
        })
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body text; invalid UTF-8 is replaced.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn into_body(self) -> String {
        self.body
    }
}

fn read_body(mut reader: impl Read) -> Result<String, TransportError> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

#[cfg(test)]
const FIXTURE_BODY: &str = r#"{"status":0,"body":{"series":[]}}"#;

#[cfg(test)]
fn fixture_headers() -> HeaderMap {
    use http::header::{HeaderValue, CONTENT_TYPE};

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert("x-request-id", HeaderValue::from_static("abc"));
    headers
}

#[cfg(test)]
fn assert_fixture(response: &Response) {
    for _ in 0..2 {
        assert_eq!(response.body(), FIXTURE_BODY);
        assert_eq!(response.headers(), &fixture_headers());
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            "application/json"
        );
        assert_eq!(response.status(), 200);
    }
}

#[test]
fn test_live() {
    let res = TransportResponse::Live {
        status: 200,
        headers: fixture_headers(),
        body: Box::new(std::io::Cursor::new(FIXTURE_BODY.as_bytes().to_vec())),
    };
    assert_fixture(&Response::from_transport(res).unwrap());
}

#[test]
fn test_buffered() {
    let res = TransportResponse::buffered(200, fixture_headers(), FIXTURE_BODY);
    assert_fixture(&Response::from_transport(res).unwrap());
}

#[test]
fn test_spooled() {
    use std::io::{Seek, SeekFrom, Write};

    let mut file = tempfile::tempfile().unwrap();
    file.write_all(FIXTURE_BODY.as_bytes()).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();
    let res = TransportResponse::spooled(200, fixture_headers(), file);
    assert_fixture(&Response::from_transport(res).unwrap());
}

#[test]
fn test_unrecognized_shape() {
    let res = TransportResponse::Other("ftp listing".to_string());
    let err = Response::from_transport(res).unwrap_err();
    assert!(matches!(err, Error::UnrecognizedResponseShape(ref kind) if kind == "ftp listing"));
}

#[test]
fn test_invalid_utf8_is_replaced() {
    let res = TransportResponse::buffered(200, HeaderMap::new(), vec![b'o', b'k', 0xff]);
    let response = Response::from_transport(res).unwrap();
    assert_eq!(response.body(), "ok\u{fffd}");
}

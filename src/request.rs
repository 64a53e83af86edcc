use std::collections::BTreeMap;
use url::form_urlencoded;
use url::Url;

use crate::credentials::Credentials;
use crate::error::SigningError;
use crate::oauth::OAuthSigner;
use crate::parameters::Params;

/// Signed request parameters, sorted ascending by key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedQuery {
    pairs: Vec<(String, String)>,
}

impl SignedQuery {
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// `application/x-www-form-urlencoded` rendering of the pairs.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    /// `resource_url?query`.
    pub fn to_url(&self, resource_url: &Url) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}?{}",
            resource_url.as_str(),
            self.to_query_string()
        ))
    }
}

/// Returns authenticated parameters.
///
/// Signed attributes form the base and `params` override them on a shared
/// key; the merged entries are sorted by key. An overridden `oauth_*`
/// attribute is signed with the caller's value, so what is sent is what was
/// signed.
pub fn authenticated(
    http_method: &str,
    url: &Url,
    params: &Params,
    credentials: &Credentials,
) -> Result<SignedQuery, SigningError> {
    let signed = OAuthSigner::new(credentials).sign(http_method, url, params)?;
    let mut merged = signed.into_iter().collect::<BTreeMap<String, String>>();
    merged.extend(
        params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string())),
    );
    Ok(SignedQuery {
        pairs: merged.into_iter().collect(),
    })
}

#[cfg(test)]
fn sleep_url() -> Url {
    Url::parse("https://wbsapi.withings.net/v2/sleep").unwrap()
}

#[test]
fn test_every_key_once_and_sorted() {
    let credentials = Credentials::new("ck", "cs", "tk", "ts");
    let params = Params::new()
        .with("startdate", "1")
        .with("enddate", "2")
        .with("action", "getsummary");
    let query = authenticated("GET", &sleep_url(), &params, &credentials).unwrap();

    let keys = query
        .pairs()
        .iter()
        .map(|(k, _)| k.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        keys,
        vec![
            "action",
            "enddate",
            "oauth_consumer_key",
            "oauth_nonce",
            "oauth_signature",
            "oauth_signature_method",
            "oauth_timestamp",
            "oauth_token",
            "oauth_version",
            "startdate",
        ]
    );
    assert_eq!(query.get("action"), Some("getsummary"));
    assert_eq!(query.get("startdate"), Some("1"));
    assert_eq!(query.get("enddate"), Some("2"));
}

#[test]
fn test_params_override_signed_attributes() {
    let credentials = Credentials::new("ck", "cs", "tk", "ts");
    let params = Params::new().with("oauth_version", "2.0");
    let query = authenticated("GET", &sleep_url(), &params, &credentials).unwrap();
    assert_eq!(query.get("oauth_version"), Some("2.0"));
    assert_eq!(
        query
            .pairs()
            .iter()
            .filter(|(k, _)| k == "oauth_version")
            .count(),
        1
    );
}

#[test]
fn test_overridden_attribute_is_what_gets_signed() {
    let credentials = Credentials::new("ck", "cs", "tk", "ts");
    let sign = |params: &Params| {
        OAuthSigner::new(&credentials)
            .oauth_nonce("nonce")
            .oauth_timestamp(1_318_622_958)
            .sign("GET", &sleep_url(), params)
            .unwrap()
    };

    let overridden = sign(&Params::new().with("oauth_version", "2.0"));
    assert_eq!(overridden.get("oauth_version"), Some("2.0"));

    // restating the default must not change the base string
    let restated = sign(&Params::new().with("oauth_version", "1.0"));
    let plain = sign(&Params::new());
    assert_eq!(restated.signature(), plain.signature());
    assert_ne!(overridden.signature(), plain.signature());
}

#[test]
fn test_successive_calls_differ_only_in_values() {
    let credentials = Credentials::new("ck", "cs", "tk", "ts");
    let params = Params::new().with("action", "get");
    let first = authenticated("GET", &sleep_url(), &params, &credentials).unwrap();
    let second = authenticated("GET", &sleep_url(), &params, &credentials).unwrap();

    let keys = |q: &SignedQuery| q.pairs().iter().map(|(k, _)| k.clone()).collect::<Vec<_>>();
    assert_eq!(keys(&first), keys(&second));
    assert_ne!(first.get("oauth_signature"), second.get("oauth_signature"));
}

#[test]
fn test_query_string_and_url() {
    let query = SignedQuery {
        pairs: vec![
            ("action".to_string(), "getmeas".to_string()),
            ("note".to_string(), "a b&c".to_string()),
        ],
    };
    assert_eq!(query.to_query_string(), "action=getmeas&note=a+b%26c");
    let url = query
        .to_url(&Url::parse("https://wbsapi.withings.net/measure").unwrap())
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://wbsapi.withings.net/measure?action=getmeas&note=a+b%26c"
    );
}

#[test]
fn test_malformed_credentials_fail_to_sign() {
    let credentials = Credentials::new("ck", "", "tk", "ts");
    let err = authenticated("GET", &sleep_url(), &Params::new(), &credentials).unwrap_err();
    assert!(matches!(err, SigningError::MissingConsumerSecret));
}

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet};
use sha1::Sha1;
use std::borrow::Cow;
use std::collections::BTreeMap;
use url::Url;
use uuid::Uuid;

use crate::credentials::Credentials;
use crate::error::SigningError;
use crate::parameters::Params;

type HmacSha1 = Hmac<Sha1>;

// https://tools.ietf.org/html/rfc5849#section-3.6
// * ALPHA, DIGIT, '-', '.', '_', '~' MUST NOT be encoded.
// * All other characters MUST be encoded.
// * The two hexadecimal characters used to represent encoded
//   characters MUST be uppercase.
const TARGETS_FOR_PARAMS: &AsciiSet = &percent_encoding::NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const DEFAULT_SIGNATURE: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

pub const OAUTH_PARAM_KEY_CONSUMER_KEY: &str = "oauth_consumer_key";
pub const OAUTH_PARAM_KEY_NONCE: &str = "oauth_nonce";
pub const OAUTH_PARAM_KEY_SIGNATURE: &str = "oauth_signature";
pub const OAUTH_PARAM_KEY_SIGNATURE_METHOD: &str = "oauth_signature_method";
pub const OAUTH_PARAM_KEY_TIMESTAMP: &str = "oauth_timestamp";
pub const OAUTH_PARAM_KEY_TOKEN: &str = "oauth_token";
pub const OAUTH_PARAM_KEY_VERSION: &str = "oauth_version";

fn encode(s: &str) -> Cow<'_, str> {
    utf8_percent_encode(s, TARGETS_FOR_PARAMS).into()
}

/// The `oauth_*` attributes produced by signing one request, keyed by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedAttributes {
    attributes: BTreeMap<String, String>,
}

impl SignedAttributes {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// The base64 encoded HMAC-SHA1 signature.
    pub fn signature(&self) -> &str {
        self.get(OAUTH_PARAM_KEY_SIGNATURE).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl IntoIterator for SignedAttributes {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.into_iter()
    }
}

/// OAuth 1.0a HMAC-SHA1 signer.
///
/// A fresh nonce and timestamp are generated for every call to
/// [`OAuthSigner::sign`] unless pinned with [`OAuthSigner::oauth_nonce`] or
/// [`OAuthSigner::oauth_timestamp`].
pub struct OAuthSigner<'a> {
    credentials: &'a Credentials,
    oauth_nonce: Option<String>,
    oauth_timestamp: Option<i64>,
}

impl<'a> OAuthSigner<'a> {
    pub fn new(credentials: &'a Credentials) -> Self {
        OAuthSigner {
            credentials,
            oauth_nonce: None,
            oauth_timestamp: None,
        }
    }

    pub fn oauth_nonce(&mut self, nonce: impl Into<String>) -> &mut OAuthSigner<'a> {
        self.oauth_nonce = Some(nonce.into());
        self
    }

    pub fn oauth_timestamp(&mut self, timestamp: i64) -> &mut OAuthSigner<'a> {
        self.oauth_timestamp = Some(timestamp);
        self
    }

    /// Sign a request.
    ///
    /// # Parameters
    /// - http_method: HTTP method, ex)"GET", "POST", ...
    /// - url: resource URL; any query or fragment is ignored.
    /// - params: request parameters, not encoded.
    /// # Returns
    /// all `oauth_*` attributes including `oauth_signature`.
    pub fn sign(
        &self,
        http_method: &str,
        url: &Url,
        params: &Params,
    ) -> Result<SignedAttributes, SigningError> {
        let credentials = self.credentials;
        if credentials.consumer_key().is_empty() {
            return Err(SigningError::MissingConsumerKey);
        }
        if credentials.consumer_secret().is_empty() {
            return Err(SigningError::MissingConsumerSecret);
        }

        let nonce = self
            .oauth_nonce
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());
        let timestamp = self
            .oauth_timestamp
            .unwrap_or_else(|| Utc::now().timestamp());

        let mut attributes = BTreeMap::new();
        attributes.insert(
            OAUTH_PARAM_KEY_CONSUMER_KEY.to_string(),
            credentials.consumer_key().to_string(),
        );
        attributes.insert(OAUTH_PARAM_KEY_NONCE.to_string(), nonce);
        attributes.insert(
            OAUTH_PARAM_KEY_SIGNATURE_METHOD.to_string(),
            DEFAULT_SIGNATURE.to_string(),
        );
        attributes.insert(OAUTH_PARAM_KEY_TIMESTAMP.to_string(), timestamp.to_string());
        attributes.insert(OAUTH_PARAM_KEY_VERSION.to_string(), OAUTH_VERSION.to_string());
        if !credentials.token().is_empty() {
            attributes.insert(
                OAUTH_PARAM_KEY_TOKEN.to_string(),
                credentials.token().to_string(),
            );
        }

        // caller supplied oauth_* values replace the generated ones
        for (k, v) in params.iter() {
            if let Some(slot) = attributes.get_mut(k) {
                *slot = v.to_string();
            }
        }

        let base_str = signature_base_string(http_method, url, &attributes, params);
        tracing::trace!(len = base_str.len(), "built signature base string");

        // create sign key
        let sign_key = format!(
            "{}&{}",
            encode(credentials.consumer_secret()),
            encode(credentials.token_secret())
        );

        let mut mac = HmacSha1::new_from_slice(sign_key.as_bytes())
            .map_err(|e| SigningError::InvalidKey(e.to_string()))?;
        mac.update(base_str.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());
        attributes.insert(OAUTH_PARAM_KEY_SIGNATURE.to_string(), signature);

        Ok(SignedAttributes { attributes })
    }
}

/// `METHOD&url&params`, every part percent encoded.
fn signature_base_string(
    http_method: &str,
    url: &Url,
    attributes: &BTreeMap<String, String>,
    params: &Params,
) -> String {
    let mut endpoint = url.clone();
    endpoint.set_query(None);
    endpoint.set_fragment(None);

    let mut pairs = attributes
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .chain(params.iter().filter(|(k, _)| !attributes.contains_key(*k)))
        .map(|(k, v)| (encode(k), encode(v)))
        .collect::<Vec<(Cow<str>, Cow<str>)>>();

    // then, alphabetic sort by key
    pairs.sort();

    let param_str = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<String>>()
        .join("&");

    let http_method = http_method.to_ascii_uppercase();
    format!(
        "{}&{}&{}",
        encode(&http_method),
        encode(endpoint.as_str()),
        encode(&param_str)
    )
}

#[test]
fn test_signing() {
    // https://developer.twitter.com/ja/docs/basics/authentication/guides/creating-a-signature
    let endpoint = Url::parse("https://api.twitter.com/1.1/statuses/update.json").unwrap();
    let credentials = Credentials::new(
        "xvz1evFS4wEEPTGEFPHBog",
        "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
        "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
        "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
    );
    let params = Params::new()
        .with("include_entities", "true")
        .with(
            "status",
            "Hello Ladies + Gentlemen, a signed OAuth request!",
        );
    let signed = OAuthSigner::new(&credentials)
        .oauth_nonce("kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg")
        .oauth_timestamp(1_318_622_958)
        .sign("post", &endpoint, &params)
        .unwrap();
    assert_eq!(signed.signature(), "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
    assert_eq!(signed.get("oauth_timestamp"), Some("1318622958"));
    assert_eq!(signed.get("oauth_signature_method"), Some("HMAC-SHA1"));
    assert_eq!(signed.get("oauth_version"), Some("1.0"));
}

#[test]
fn test_signed_attributes_exclude_params() {
    let credentials = Credentials::new("ck", "cs", "tk", "ts");
    let url = Url::parse("https://wbsapi.withings.net/v2/sleep").unwrap();
    let params = Params::new().with("action", "getsummary");
    let signed = OAuthSigner::new(&credentials)
        .sign("GET", &url, &params)
        .unwrap();
    let keys = signed.iter().map(|(k, _)| k).collect::<Vec<_>>();
    assert_eq!(
        keys,
        vec![
            "oauth_consumer_key",
            "oauth_nonce",
            "oauth_signature",
            "oauth_signature_method",
            "oauth_timestamp",
            "oauth_token",
            "oauth_version",
        ]
    );
}

#[test]
fn test_empty_token_is_omitted() {
    let credentials = Credentials::new("ck", "cs", "", "");
    let url = Url::parse("https://wbsapi.withings.net/measure").unwrap();
    let signed = OAuthSigner::new(&credentials)
        .sign("GET", &url, &Params::new())
        .unwrap();
    assert_eq!(signed.get("oauth_token"), None);
    assert!(!signed.signature().is_empty());
}

#[test]
fn test_fresh_nonce_per_call() {
    let credentials = Credentials::new("ck", "cs", "tk", "ts");
    let url = Url::parse("https://wbsapi.withings.net/measure").unwrap();
    let signer = OAuthSigner::new(&credentials);
    let first = signer.sign("GET", &url, &Params::new()).unwrap();
    let second = signer.sign("GET", &url, &Params::new()).unwrap();
    assert_ne!(first.get("oauth_nonce"), second.get("oauth_nonce"));
    assert_ne!(first.signature(), second.signature());
}

#[test]
fn test_missing_consumer_secret() {
    let credentials = Credentials::new("ck", "", "tk", "ts");
    let url = Url::parse("https://wbsapi.withings.net/measure").unwrap();
    let err = OAuthSigner::new(&credentials)
        .sign("GET", &url, &Params::new())
        .unwrap_err();
    assert!(matches!(err, SigningError::MissingConsumerSecret));
}

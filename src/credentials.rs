use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// OAuth credentials bound to a client for its whole lifetime.
///
/// Secrets are redacted from `Debug` output.
#[derive(Clone, Debug, Deserialize)]
pub struct Credentials {
    consumer_key: String,
    consumer_secret: SecretString,
    #[serde(default)]
    token: String,
    #[serde(default = "empty_secret")]
    token_secret: SecretString,
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

impl Credentials {
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        token: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Self {
        Credentials {
            consumer_key: consumer_key.into(),
            consumer_secret: SecretString::from(consumer_secret.into()),
            token: token.into(),
            token_secret: SecretString::from(token_secret.into()),
        }
    }

    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    pub fn consumer_secret(&self) -> &str {
        self.consumer_secret.expose_secret()
    }

    /// Access token; empty for two-legged requests.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn token_secret(&self) -> &str {
        self.token_secret.expose_secret()
    }
}

#[test]
fn test_debug_redacts_secrets() {
    let creds = Credentials::new("ck", "cs-value", "tk", "ts-value");
    let printed = format!("{:?}", creds);
    assert!(printed.contains("ck"));
    assert!(!printed.contains("cs-value"));
    assert!(!printed.contains("ts-value"));
    assert_eq!(creds.consumer_secret(), "cs-value");
    assert_eq!(creds.token_secret(), "ts-value");
}

#[test]
fn test_deserialize_two_legged() {
    let creds: Credentials =
        serde_json::from_str(r#"{"consumer_key":"ck","consumer_secret":"cs"}"#).unwrap();
    assert_eq!(creds.consumer_key(), "ck");
    assert_eq!(creds.consumer_secret(), "cs");
    assert_eq!(creds.token(), "");
    assert_eq!(creds.token_secret(), "");
}

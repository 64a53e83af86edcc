use std::cell::RefCell;

use httpmock::prelude::*;
use url::Url;
use withings_api::{
    Client, ClientConfig, Credentials, Endpoint, Error, HeaderMap, Params, SigningError, Transport,
    TransportError, TransportResponse,
};

/// Records every requested URL and answers with a canned body.
#[derive(Default)]
struct Recorder {
    urls: RefCell<Vec<Url>>,
}

impl Transport for Recorder {
    fn get(&self, url: &Url) -> Result<TransportResponse, TransportError> {
        self.urls.borrow_mut().push(url.clone());
        let mut meta = HeaderMap::new();
        meta.insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("application/json"),
        );
        Ok(TransportResponse::buffered(200, meta, r#"{"status":0}"#))
    }
}

fn credentials() -> Credentials {
    Credentials::new("consumer", "consumer-secret", "token", "token-secret")
}

fn recording_client() -> Client<Recorder> {
    Client::with_transport(
        credentials(),
        Url::parse("https://wbsapi.withings.net").unwrap(),
        Recorder::default(),
    )
}

fn resource(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

fn query(url: &Url) -> Vec<(String, String)> {
    url.query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[test]
fn test_facade_fixes_url_and_action() {
    type Call = fn(&Client<Recorder>, Params) -> withings_api::Result<withings_api::Response>;
    let calls: [(Call, &str, &str); 6] = [
        (Client::get_activity_measures, "https://wbsapi.withings.net/v2/measure", "getactivity"),
        (Client::get_body_measures, "https://wbsapi.withings.net/measure", "getmeas"),
        (Client::get_intraday_activity, "https://wbsapi.withings.net/v2/measure", "getintradayactivity"),
        (Client::get_sleep_measures, "https://wbsapi.withings.net/v2/sleep", "get"),
        (Client::get_sleep_summary, "https://wbsapi.withings.net/v2/sleep", "getsummary"),
        (Client::get_workouts, "https://wbsapi.withings.net/v2/measure", "getworkouts"),
    ];

    let client = recording_client();
    for (call, url, action) in calls.iter() {
        let res = call(&client, Params::new()).unwrap();
        assert_eq!(res.body(), r#"{"status":0}"#);

        let requested = client.transport().urls.borrow().last().cloned().unwrap();
        assert_eq!(resource(&requested), *url);
        let pairs = query(&requested);
        let actions = pairs
            .iter()
            .filter(|(k, _)| k == "action")
            .map(|(_, v)| v.as_str())
            .collect::<Vec<_>>();
        assert_eq!(actions, vec![*action]);
    }
    assert_eq!(client.transport().urls.borrow().len(), Endpoint::ALL.len());
}

#[test]
fn test_sleep_summary_query_is_signed_and_sorted() {
    let client = recording_client();
    client
        .get_sleep_summary(Params::new().with("startdate", "1").with("enddate", "2"))
        .unwrap();

    let requested = client.transport().urls.borrow()[0].clone();
    assert_eq!(resource(&requested), "https://wbsapi.withings.net/v2/sleep");

    let pairs = query(&requested);
    let keys = pairs.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>();
    let mut sorted = keys.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(keys, sorted);

    let value = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };
    assert_eq!(value("action"), Some("getsummary"));
    assert_eq!(value("startdate"), Some("1"));
    assert_eq!(value("enddate"), Some("2"));
    assert_eq!(value("oauth_consumer_key"), Some("consumer"));
    assert_eq!(value("oauth_token"), Some("token"));
    assert_eq!(value("oauth_signature_method"), Some("HMAC-SHA1"));
    assert!(value("oauth_signature").is_some());
    assert!(value("oauth_nonce").is_some());
    assert!(value("oauth_timestamp").is_some());
}

#[test]
fn test_caller_action_is_replaced() {
    let client = recording_client();
    client
        .get_workouts(Params::new().with("action", "getmeas"))
        .unwrap();
    let requested = client.transport().urls.borrow()[0].clone();
    let actions = query(&requested)
        .into_iter()
        .filter(|(k, _)| k == "action")
        .map(|(_, v)| v)
        .collect::<Vec<_>>();
    assert_eq!(actions, vec!["getworkouts".to_string()]);
}

#[test]
fn test_signing_failure_skips_network() {
    let client = Client::with_transport(
        Credentials::new("consumer", "", "token", "token-secret"),
        Url::parse("https://wbsapi.withings.net").unwrap(),
        Recorder::default(),
    );
    let err = client.get_body_measures(Params::new()).unwrap_err();
    assert!(matches!(
        err,
        Error::Signing(SigningError::MissingConsumerSecret)
    ));
    assert!(client.transport().urls.borrow().is_empty());
}

#[test]
fn test_http_transport_round_trip() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/sleep")
            .query_param("action", "getsummary")
            .query_param("startdate", "1")
            .query_param("enddate", "2")
            .query_param("oauth_consumer_key", "consumer")
            .query_param_exists("oauth_signature");
        then.status(200)
            .header("Content-Type", "application/json")
            .body(r#"{"status":0,"body":{"series":[]}}"#);
    });

    let config = ClientConfig::default()
        .api_base(Url::parse(&server.base_url()).unwrap())
        .user_agent("withings-api-tests");
    let client = Client::with_config(credentials(), config).unwrap();
    let res = client
        .get_sleep_summary(Params::new().with("startdate", 1).with("enddate", 2))
        .unwrap();

    mock.assert();
    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "application/json"
    );
    assert_eq!(res.headers().get("Content-Type").unwrap(), "application/json");
    assert_eq!(res.body(), r#"{"status":0,"body":{"series":[]}}"#);
}

#[test]
fn test_http_error_status_propagates() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/measure");
        then.status(503).body("unavailable");
    });

    let config = ClientConfig::default().api_base(Url::parse(&server.base_url()).unwrap());
    let client = Client::with_config(credentials(), config).unwrap();
    let err = client.get_body_measures(Params::new()).unwrap_err();

    mock.assert();
    assert!(matches!(
        err,
        Error::Transport(TransportError::Status { status: 503, .. })
    ));
}

use url::Url;

pub const DEFAULT_API_BASE: &str = "https://wbsapi.withings.net";

/// Documented Withings API operations.
///
/// Each one is a GET on a fixed resource with a fixed `action` parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// Measure - Get Activity Measures
    ActivityMeasures,
    /// Measure - Get Body Measures
    BodyMeasures,
    /// Measure - Get Intraday Activity
    IntradayActivity,
    /// Measure - Get Sleep Measures
    SleepMeasures,
    /// Measure - Get Sleep Summary
    SleepSummary,
    /// Measure - Get Workouts
    Workouts,
}

impl Endpoint {
    pub const ALL: [Endpoint; 6] = [
        Endpoint::ActivityMeasures,
        Endpoint::BodyMeasures,
        Endpoint::IntradayActivity,
        Endpoint::SleepMeasures,
        Endpoint::SleepSummary,
        Endpoint::Workouts,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::BodyMeasures => "/measure",
            Endpoint::SleepMeasures | Endpoint::SleepSummary => "/v2/sleep",
            Endpoint::ActivityMeasures | Endpoint::IntradayActivity | Endpoint::Workouts => {
                "/v2/measure"
            }
        }
    }

    pub fn action(self) -> &'static str {
        match self {
            Endpoint::ActivityMeasures => "getactivity",
            Endpoint::BodyMeasures => "getmeas",
            Endpoint::IntradayActivity => "getintradayactivity",
            Endpoint::SleepMeasures => "get",
            Endpoint::SleepSummary => "getsummary",
            Endpoint::Workouts => "getworkouts",
        }
    }

    /// Resource URL under `api_base`.
    pub fn url(self, api_base: &Url) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}{}",
            api_base.as_str().trim_end_matches('/'),
            self.path()
        ))
    }
}

#[test]
fn test_default_resource_urls() {
    let base = Url::parse(DEFAULT_API_BASE).unwrap();
    let table = [
        (Endpoint::ActivityMeasures, "https://wbsapi.withings.net/v2/measure", "getactivity"),
        (Endpoint::BodyMeasures, "https://wbsapi.withings.net/measure", "getmeas"),
        (Endpoint::IntradayActivity, "https://wbsapi.withings.net/v2/measure", "getintradayactivity"),
        (Endpoint::SleepMeasures, "https://wbsapi.withings.net/v2/sleep", "get"),
        (Endpoint::SleepSummary, "https://wbsapi.withings.net/v2/sleep", "getsummary"),
        (Endpoint::Workouts, "https://wbsapi.withings.net/v2/measure", "getworkouts"),
    ];
    for (endpoint, url, action) in table.iter() {
        assert_eq!(endpoint.url(&base).unwrap().as_str(), *url);
        assert_eq!(endpoint.action(), *action);
    }
}

#[test]
fn test_base_with_path_prefix() {
    let base = Url::parse("http://127.0.0.1:8080/proxy/").unwrap();
    assert_eq!(
        Endpoint::SleepSummary.url(&base).unwrap().as_str(),
        "http://127.0.0.1:8080/proxy/v2/sleep"
    );
}

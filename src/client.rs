use std::time::Duration;
use url::Url;

use crate::credentials::Credentials;
use crate::endpoint::{Endpoint, DEFAULT_API_BASE};
use crate::error::Result;
use crate::parameters::Params;
use crate::request;
use crate::response::Response;
use crate::transport::Transport;

#[cfg(feature = "reqwest")]
use crate::transport::HttpTransport;

/// Client settings. The defaults talk to the production API.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_base: Url,
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_base: default_api_base(),
            timeout: None,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    pub fn api_base(mut self, api_base: Url) -> Self {
        self.api_base = api_base;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

fn default_api_base() -> Url {
    Url::parse(DEFAULT_API_BASE).expect("DEFAULT_API_BASE is a valid url")
}

/// Withings API client.
///
/// Every call is signed with the credentials given at construction.
pub struct Client<T> {
    credentials: Credentials,
    api_base: Url,
    transport: T,
}

#[cfg(feature = "reqwest")]
impl Client<HttpTransport> {
    pub fn new(credentials: Credentials) -> Result<Self> {
        Client::with_config(credentials, ClientConfig::default())
    }

    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout, config.user_agent.as_deref())?;
        Ok(Client {
            credentials,
            api_base: config.api_base,
            transport,
        })
    }
}

impl<T: Transport> Client<T> {
    /// Build a client over a caller supplied transport.
    pub fn with_transport(credentials: Credentials, api_base: Url, transport: T) -> Self {
        Client {
            credentials,
            api_base,
            transport,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Measure - Get Activity Measures
    /// {https://oauth.withings.com/api/doc#api-Measure-get_activity}
    pub fn get_activity_measures(&self, params: Params) -> Result<Response> {
        self.call(Endpoint::ActivityMeasures, params)
    }

    /// Measure - Get Body Measures
    /// {https://oauth.withings.com/api/doc#api-Measure-get_measure}
    pub fn get_body_measures(&self, params: Params) -> Result<Response> {
        self.call(Endpoint::BodyMeasures, params)
    }

    /// Measure - Get Intraday Activity
    /// {https://oauth.withings.com/api/doc#api-Measure-get_intraday_measure}
    pub fn get_intraday_activity(&self, params: Params) -> Result<Response> {
        self.call(Endpoint::IntradayActivity, params)
    }

    /// Measure - Get Sleep Measures
    /// {https://oauth.withings.com/api/doc#api-Measure-get_sleep}
    pub fn get_sleep_measures(&self, params: Params) -> Result<Response> {
        self.call(Endpoint::SleepMeasures, params)
    }

    /// Measure - Get Sleep Summary
    /// {https://oauth.withings.com/api/doc#api-Measure-get_sleep_summary}
    pub fn get_sleep_summary(&self, params: Params) -> Result<Response> {
        self.call(Endpoint::SleepSummary, params)
    }

    /// Measure - Get Workouts
    /// {https://oauth.withings.com/api/doc#api-Measure-get_workouts}
    pub fn get_workouts(&self, params: Params) -> Result<Response> {
        self.call(Endpoint::Workouts, params)
    }

    fn call(&self, endpoint: Endpoint, params: Params) -> Result<Response> {
        let resource_url = endpoint.url(&self.api_base)?;
        // the fixed action wins over a caller supplied one
        let params = params.with("action", endpoint.action());
        tracing::debug!(action = endpoint.action(), url = %resource_url, "calling withings api");
        self.get(&resource_url, &params)
    }

    /// Calls a Withings API using GET method.
    fn get(&self, resource_url: &Url, params: &Params) -> Result<Response> {
        let query = request::authenticated("GET", resource_url, params, &self.credentials)?;
        let url = query.to_url(resource_url)?;
        let res = self.transport.get(&url)?;
        Response::from_transport(res)
    }
}

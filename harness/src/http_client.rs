use crate::{
    config::Config,
    error::Error,
    request::{RequestBody, RequestDescriptor},
    response::ApiResponse,
    util,
};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::{blocking, Method};
use serde_json::Value;
use std::{
    fmt::Display,
    time::{Duration, Instant},
};
use tracing::{debug, error, info, warn};

type ReqwestClient = blocking::Client;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

lazy_static! {
    static ref ABSOLUTE_URL: Regex = Regex::new(r"(?i)^https?://").unwrap();
}

/// Builder used to build an HttpClient instance
#[derive(Debug, Clone, Default)]
pub struct HttpClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    http_client: Option<ReqwestClient>,
}

impl HttpClientBuilder {
    /// Create a new HttpClientBuilder instance.
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: None,
            http_client: None,
        }
    }

    /// Take the base URL and timeout from `config`.
    pub fn with_config(self, config: &Config) -> Self {
        self.with_base_url(config.api_base_url())
            .with_timeout(config.api_timeout())
    }

    /// Use the given base URL for every relative path.
    ///
    /// # Arguments
    /// `base_url` - scheme, host and optional prefix, e.g. `http://127.0.0.1:5000`.
    ///
    /// # Returns
    /// This builder.
    pub fn with_base_url<T: Into<String>>(mut self, base_url: T) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Apply `timeout` to every request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use the given blocking reqwest client instead of building one. Its cookie
    /// and connection settings are kept as they are.
    ///
    /// # Arguments
    /// `client` - a pre-configured blocking reqwest client.
    ///
    /// # Returns
    /// This builder.
    pub fn with_http_client(mut self, client: ReqwestClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Consume the builder and create an HttpClient using all of the previously
    /// configured values or their defaults.
    pub fn build(mut self) -> Result<HttpClient, Error> {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let session = match self.http_client.take() {
            Some(client) => client,
            None => ReqwestClient::builder()
                .cookie_store(true)
                .timeout(timeout)
                .build()
                .map_err(Error::ClientBuild)?,
        };

        Ok(HttpClient {
            session,
            timeout,
            base_url: self
                .base_url
                .take()
                .unwrap_or_else(|| String::from(DEFAULT_BASE_URL))
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

/// Blocking HTTP client bound to a base URL.
///
/// One instance owns one session: cookies and kept-alive connections persist
/// across calls. Non-2xx responses are returned, not raised; use
/// [`ApiResponse::error_for_status`] for strict handling.
#[derive(Debug, Clone)]
pub struct HttpClient {
    session: ReqwestClient,
    base_url: String,
    timeout: Duration,
}

impl HttpClient {
    /// Create an HttpClient from `api.base_url` and `api.timeout`.
    pub fn new(config: &Config) -> Result<Self, Error> {
        HttpClientBuilder::new().with_config(config).build()
    }

    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolves `path` against the base URL unless it is already absolute.
    pub fn build_url(&self, path: &str) -> String {
        if ABSOLUTE_URL.is_match(path) {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    pub fn get<S: Into<String>>(&self, path: S) -> RequestBuilder<'_> {
        self.start(Method::GET, path)
    }

    pub fn post<S: Into<String>>(&self, path: S) -> RequestBuilder<'_> {
        self.start(Method::POST, path)
    }

    pub fn put<S: Into<String>>(&self, path: S) -> RequestBuilder<'_> {
        self.start(Method::PUT, path)
    }

    pub fn delete<S: Into<String>>(&self, path: S) -> RequestBuilder<'_> {
        self.start(Method::DELETE, path)
    }

    fn start<S: Into<String>>(&self, method: Method, path: S) -> RequestBuilder<'_> {
        RequestBuilder {
            client: self,
            descriptor: RequestDescriptor::new(method, path),
        }
    }

    /// Sends one request and logs both directions.
    ///
    /// Timeouts, connection failures and other transport errors are logged at
    /// error level and returned without retrying.
    pub fn request(&self, descriptor: RequestDescriptor) -> Result<ApiResponse, Error> {
        let url = self.build_url(&descriptor.path);
        Self::log_request(&descriptor, &url);

        let mut builder = self
            .session
            .request(descriptor.method.clone(), url.as_str())
            .timeout(self.timeout);

        if !descriptor.params.is_empty() {
            builder = builder.query(&descriptor.params);
        }
        builder = match &descriptor.body {
            RequestBody::None => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => builder.form(fields),
        };
        for (name, value) in &descriptor.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let started = Instant::now();
        let response = builder.send().map_err(|e| Self::transport_error(e, &url))?;
        let elapsed = started.elapsed();

        let status_code = response.status().as_u16();
        let headers = util::extract_headers(response.headers());
        let body = response
            .bytes()
            .map_err(|e| Self::transport_error(e, &url))?
            .to_vec();

        let response = ApiResponse {
            url,
            status_code,
            headers,
            body,
            elapsed,
        };
        Self::log_response(&response);

        if !response.is_success() {
            warn!(
                "Request failed: {} - {}",
                response.status_code,
                util::truncate(&response.text(), 200)
            );
        }

        Ok(response)
    }

    fn transport_error(source: reqwest::Error, url: &str) -> Error {
        let url = url.to_string();
        if source.is_timeout() {
            error!("Request timed out: {}", url);
            Error::Timeout { url, source }
        } else if source.is_connect() {
            error!("Connection failed: {}", url);
            Error::Connection { url, source }
        } else {
            error!("Request error: {}", source);
            Error::Transport { url, source }
        }
    }

    fn log_request(descriptor: &RequestDescriptor, url: &str) {
        info!("[request] {} {}", descriptor.method, url);
        match &descriptor.body {
            RequestBody::Json(value) => debug!("[request body] {}", pretty(value)),
            RequestBody::Form(fields) => debug!("[request body] {:?}", fields),
            RequestBody::None => {}
        }
        if !descriptor.params.is_empty() {
            debug!("[request params] {:?}", descriptor.params);
        }
    }

    fn log_response(response: &ApiResponse) {
        info!("[response] status: {}", response.status_code);
        match response.json_value() {
            Ok(value) => debug!("[response body] {}", pretty(&value)),
            Err(_) => debug!("[response body] {}", util::truncate(&response.text(), 500)),
        }
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// A request under construction against a particular [`HttpClient`].
#[derive(Debug)]
pub struct RequestBuilder<'a> {
    client: &'a HttpClient,
    descriptor: RequestDescriptor,
}

impl<'a> RequestBuilder<'a> {
    pub fn query<K: Into<String>, V: Display>(mut self, key: K, value: V) -> Self {
        self.descriptor = self.descriptor.query(key, value);
        self
    }

    pub fn json<V: Into<Value>>(mut self, value: V) -> Self {
        self.descriptor = self.descriptor.json(value);
        self
    }

    pub fn form<K: Into<String>, V: Display, I: IntoIterator<Item = (K, V)>>(
        mut self,
        fields: I,
    ) -> Self {
        self.descriptor = self.descriptor.form(fields);
        self
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.descriptor = self.descriptor.header(name, value);
        self
    }

    pub fn descriptor(&self) -> &RequestDescriptor {
        &self.descriptor
    }

    pub fn send(self) -> Result<ApiResponse, Error> {
        self.client.request(self.descriptor)
    }
}

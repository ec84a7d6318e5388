use crate::{
    config::Config,
    error::Error,
    http_client::HttpClient,
    logging::{self, ConsoleSink},
    mock::MockServer,
};
use lazy_static::lazy_static;
use std::time::Instant;
use tracing::{error, info, warn};

const SEPARATOR_WIDTH: usize = 60;

lazy_static! {
    static ref TEST_SESSION: TestSession = TestSession::new();
}

/// Process-wide state shared by every test: the discovered config and the
/// installed log subscriber.
struct TestSession {
    config: Config,
}

impl TestSession {
    fn new() -> Self {
        let (config, load_error) = match Config::discover() {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some(e)),
        };

        let logging_error = logging::init(&config, ConsoleSink::Captured).err();

        info!("{}", "=".repeat(SEPARATOR_WIDTH));
        info!("Test session started");
        info!("{}", "=".repeat(SEPARATOR_WIDTH));

        if let Some(e) = load_error {
            warn!("Falling back to the default config: {}", e);
        }
        if let Some(e) = logging_error {
            warn!("Couldn't set up the log file: {}", e);
        }

        Self { config }
    }
}

/// Everything a single test runs against: its own mock server and a config
/// pointing at it.
#[derive(Debug)]
pub struct TestContext {
    name: String,
    config: Config,
    mock_server: MockServer,
    started: Instant,
}

impl TestContext {
    /// Starts a mock server on a free port and points `api.base_url` at it.
    ///
    /// # Arguments
    /// `name` - the test name used in the log separators.
    /// `configure` - applied to the config last, so it may override the base URL.
    ///
    /// # Returns
    /// A context that should be closed with [`TestContext::finish`].
    pub fn start(name: &str, configure: Option<fn(&mut Config)>) -> Result<Self, Error> {
        let mut config = TEST_SESSION.config.clone();
        let mock_server = MockServer::start("127.0.0.1:0")?;
        config.set("api.base_url", mock_server.base_url());

        if let Some(configure) = configure {
            configure(&mut config);
        }

        info!("{}", "-".repeat(SEPARATOR_WIDTH));
        info!("Starting test: {}", name);

        Ok(Self {
            name: name.to_string(),
            config,
            mock_server,
            started: Instant::now(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A fresh client (and so a fresh cookie session) for the configured API.
    pub fn client(&self) -> Result<HttpClient, Error> {
        HttpClient::new(&self.config)
    }

    pub fn mock_server(&self) -> &MockServer {
        &self.mock_server
    }

    /// Logs the outcome and stops the mock server.
    pub fn finish(self, passed: bool) {
        let elapsed = self.started.elapsed().as_secs_f64();
        if passed {
            info!("Test passed: {} ({:.2}s)", self.name, elapsed);
        } else {
            error!("Test failed: {} ({:.2}s)", self.name, elapsed);
        }
        info!("{}", "-".repeat(SEPARATOR_WIDTH));
    }
}

/// How a test body reports success, so the outcome can be logged whatever the
/// test returns.
pub trait TestOutcome {
    fn passed(&self) -> bool;
}

impl TestOutcome for () {
    fn passed(&self) -> bool {
        true
    }
}

impl<T, E> TestOutcome for Result<T, E> {
    fn passed(&self) -> bool {
        self.is_ok()
    }
}

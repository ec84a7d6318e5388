use crate::{error::Error, json_path, util};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::{
    env, fs,
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::debug;

pub const CONFIG_ENV: &str = "APIHARNESS_CONFIG";
pub const CONFIG_PATH: &str = "config/config.yaml";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT_SECS: f64 = 30.0;
const MAX_TIMEOUT_SECS: f64 = 86_400.0;
const DEFAULT_LOG_LEVEL: &str = "INFO";
const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_REPORT_DIR: &str = "report";
const DEFAULT_MOCK_HOST: &str = "127.0.0.1";
const DEFAULT_MOCK_PORT: u16 = 5000;

/// Nested key-value settings with dotted-key lookup.
#[derive(Debug, Clone)]
pub struct Config {
    data: Value,
    root_dir: Option<PathBuf>,
}

impl Config {
    /// Parses a YAML document. An empty document yields an empty config.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, Error> {
        let data: Option<Value> = serde_yaml::from_str(yaml)?;

        Ok(Self {
            data: data.unwrap_or_else(|| Value::Object(Map::new())),
            root_dir: None,
        })
    }

    /// Loads the YAML file at `path`.
    ///
    /// The project root used for relative directories is the parent of the
    /// file's `config/` directory when there is one, else the file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let mut config = Self::from_yaml_str(&fs::read_to_string(path)?)?;
        config.root_dir = path.parent().map(|dir| {
            if dir.file_name().map_or(false, |name| name == "config") {
                dir.parent().unwrap_or(dir).to_path_buf()
            } else {
                dir.to_path_buf()
            }
        });

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Finds the config the way the harness binaries and tests do: the
    /// `APIHARNESS_CONFIG` variable, then `config/config.yaml` in the working
    /// directory or any ancestor, then the built-in defaults.
    pub fn discover() -> Result<Self, Error> {
        if let Some(path) = env::var_os(CONFIG_ENV) {
            return Self::load(PathBuf::from(path));
        }

        match util::find_upwards(CONFIG_PATH) {
            Some(path) => Self::load(path),
            None => {
                debug!("No {} found, using defaults", CONFIG_PATH);
                Ok(Self::default())
            }
        }
    }

    /// Raw value at `key`, if every segment resolves through mappings.
    pub fn get(&self, key: &str) -> Option<&Value> {
        json_path::lookup_in_objects(&self.data, key)
    }

    /// Value at `key` converted to `T`, or `default` when it's absent or of the
    /// wrong shape.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or(default)
    }

    /// Sets `key`, replacing any non-mapping intermediate with a mapping.
    pub fn set<V: Into<Value>>(&mut self, key: &str, value: V) {
        let mut segments = key.split('.').peekable();
        let mut current = &mut self.data;

        while let Some(segment) = segments.next() {
            if !current.is_object() {
                *current = Value::Object(Map::new());
            }
            let map = match current.as_object_mut() {
                Some(map) => map,
                None => return,
            };

            if segments.peek().is_none() {
                map.insert(segment.to_string(), value.into());
                return;
            }

            current = map
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
    }

    pub fn api_base_url(&self) -> String {
        self.get_or("api.base_url", DEFAULT_BASE_URL.to_string())
    }

    /// Request timeout, capped at one day. Non-positive values mean the default.
    pub fn api_timeout(&self) -> Duration {
        let seconds = self.get_or("api.timeout", DEFAULT_TIMEOUT_SECS);
        if seconds.is_finite() && seconds > 0.0 {
            Duration::from_secs_f64(seconds.min(MAX_TIMEOUT_SECS))
        } else {
            Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS)
        }
    }

    pub fn log_level(&self) -> String {
        self.get_or("log.level", DEFAULT_LOG_LEVEL.to_string())
    }

    pub fn log_dir(&self) -> PathBuf {
        self.resolve(self.get_or("log.dir", DEFAULT_LOG_DIR.to_string()))
    }

    pub fn report_dir(&self) -> PathBuf {
        self.resolve(self.get_or("report.dir", DEFAULT_REPORT_DIR.to_string()))
    }

    /// Listen address for the standalone mock server.
    pub fn mock_address(&self) -> Result<SocketAddr, Error> {
        let host = self.get_or("mock.host", DEFAULT_MOCK_HOST.to_string());
        let port = self.get_or("mock.port", DEFAULT_MOCK_PORT);

        format!("{}:{}", host, port).parse().map_err(|_| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid mock address {}:{}", host, port),
            ))
        })
    }

    fn resolve(&self, dir: String) -> PathBuf {
        let dir = PathBuf::from(dir);
        match &self.root_dir {
            Some(root) if dir.is_relative() => root.join(dir),
            _ => dir,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: Value::Object(Map::new()),
            root_dir: None,
        }
    }
}

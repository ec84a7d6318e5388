use crate::{error::Error, util};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{collections::HashMap, time::Duration};

/// A received response. The body is kept raw; parsing happens on demand.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub url: String,
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    /// Time from sending the request until the response head arrived.
    pub elapsed: Duration,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into()
    }

    pub fn json_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Turns a non-2xx response into [`Error::Status`].
    pub fn error_for_status(self) -> Result<Self, Error> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::Status {
                url: self.url.clone(),
                status: self.status_code,
                body: util::truncate(&self.text(), 200).to_string(),
            })
        }
    }
}

#[cfg(test)]
pub(crate) fn stub(status_code: u16, body: &str, elapsed: Duration) -> ApiResponse {
    ApiResponse {
        url: "http://127.0.0.1:5000/stub".to_string(),
        status_code,
        headers: HashMap::new(),
        body: body.as_bytes().to_vec(),
        elapsed,
    }
}

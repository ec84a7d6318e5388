use reqwest::Method;
use serde_json::Value;
use std::fmt::Display;

/// Body attached to an outgoing request. At most one kind per request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    None,
    Json(Value),
    Form(Vec<(String, String)>),
}

impl Default for RequestBody {
    fn default() -> Self {
        RequestBody::None
    }
}

/// Everything needed to issue one request. Built per call and consumed by
/// [`HttpClient::request`](crate::HttpClient::request).
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub body: RequestBody,
    pub headers: Vec<(String, String)>,
}

impl RequestDescriptor {
    pub fn new<S: Into<String>>(method: Method, path: S) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            body: RequestBody::None,
            headers: Vec::new(),
        }
    }

    pub fn query<K: Into<String>, V: Display>(mut self, key: K, value: V) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Sends `value` as `application/json`, replacing any previous body.
    pub fn json<V: Into<Value>>(mut self, value: V) -> Self {
        self.body = RequestBody::Json(value.into());
        self
    }

    /// Sends `fields` form-encoded, replacing any previous body.
    pub fn form<K: Into<String>, V: Display, I: IntoIterator<Item = (K, V)>>(
        mut self,
        fields: I,
    ) -> Self {
        self.body = RequestBody::Form(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        );
        self
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn last_body_wins() {
        let request = RequestDescriptor::new(Method::POST, "/api/user/add")
            .form(vec![("username", "u1")])
            .json(json!({ "username": "u1" }));

        assert_eq!(request.body, RequestBody::Json(json!({ "username": "u1" })));
    }

    #[test]
    fn query_values_are_stringified() {
        let request = RequestDescriptor::new(Method::GET, "/api/message/list")
            .query("page", 2)
            .query("page_size", 5);

        assert_eq!(
            request.params,
            vec![
                ("page".to_string(), "2".to_string()),
                ("page_size".to_string(), "5".to_string())
            ]
        );
    }
}

//! Endpoint logic of the mock API.
//!
//! Routing is a pure function of the store and the request so it can be
//! exercised without a socket; [`super::server`] only moves bytes.

use super::store::{MockStore, NewMessage, NewUser, StoreError};
use crate::{
    data::{RequestData, ResponseData},
    envelope::Envelope,
    util,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use tracing::{debug, info};

pub const USER_INFO: &str = "/api/user/info";
pub const USER_ADD: &str = "/api/user/add";
pub const MESSAGE_LIST: &str = "/api/message/list";
pub const MESSAGE_SEND: &str = "/api/message/send";
pub const HEALTH: &str = "/health";

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Debug)]
struct Reply {
    status_code: u16,
    body: Value,
}

impl Reply {
    fn ok<T: Serialize>(envelope: Envelope<T>) -> Self {
        Self::new(200, envelope)
    }

    fn error<S: Into<String>>(status_code: u16, message: S) -> Self {
        Self::new(status_code, Envelope::<Value>::error(status_code, message))
    }

    fn new<T: Serialize>(status_code: u16, envelope: Envelope<T>) -> Self {
        Self {
            status_code,
            body: serde_json::to_value(envelope).unwrap_or(Value::Null),
        }
    }

    fn into_response_data(self) -> ResponseData {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        ResponseData {
            status_code: self.status_code,
            headers,
            body: self.body.to_string(),
        }
    }
}

/// Answers one request against `store`.
pub fn dispatch(store: &mut MockStore, request: &RequestData) -> ResponseData {
    let reply = route(store, request);
    info!("{} {} -> {}", request.method, request.uri, reply.status_code);

    reply.into_response_data()
}

fn route(store: &mut MockStore, request: &RequestData) -> Reply {
    let method = request.method.as_str();

    match (request.path(), method) {
        (USER_INFO, "GET") => user_info(store, request),
        (USER_ADD, "POST") => add_user(store, request),
        (MESSAGE_LIST, "GET") => message_list(store, request),
        (MESSAGE_SEND, "POST") => send_message(store, request),
        (HEALTH, "GET") => health(),
        (USER_INFO, _) | (USER_ADD, _) | (MESSAGE_LIST, _) | (MESSAGE_SEND, _) | (HEALTH, _) => {
            Reply::error(405, "method not allowed")
        }
        (path, _) => Reply::error(404, format!("not found: {}", path)),
    }
}

fn user_info(store: &mut MockStore, request: &RequestData) -> Reply {
    let params = query_params(request);
    let user_id = match query_int(&params, "user_id").filter(|id| *id != 0) {
        Some(user_id) => user_id,
        None => return Reply::error(400, "invalid parameter: user_id must not be empty"),
    };

    Reply::ok(Envelope::success(store.user_info(user_id)))
}

fn add_user(store: &mut MockStore, request: &RequestData) -> Reply {
    let body = match json_object(request) {
        Ok(body) => body,
        Err(reply) => return reply,
    };

    let username = match non_empty_string(&body, "username") {
        Some(username) => username,
        None => return Reply::error(400, "invalid parameter: username must not be empty"),
    };
    let email = match non_empty_string(&body, "email") {
        Some(email) => email,
        None => return Reply::error(400, "invalid parameter: email must not be empty"),
    };
    if !email.contains('@') {
        return Reply::error(400, "invalid parameter: email format is invalid");
    }
    let age = match body.get("age") {
        None | Some(Value::Null) => None,
        Some(value) => match value.as_i64() {
            Some(age) => Some(age),
            None => return Reply::error(400, "invalid parameter: age must be an integer"),
        },
    };

    match store.add_user(NewUser {
        username,
        email,
        age,
    }) {
        Ok(user) => Reply::ok(Envelope::with_message(
            200,
            "user created successfully",
            json!({
                "user_id": user.user_id,
                "username": user.username,
                "email": user.email,
            }),
        )),
        Err(StoreError::DuplicateUsername(username)) => {
            debug!("Rejected duplicate username {}", username);
            Reply::error(409, "user already exists")
        }
    }
}

fn message_list(store: &mut MockStore, request: &RequestData) -> Reply {
    let params = query_params(request);
    let page = query_int(&params, "page").unwrap_or(DEFAULT_PAGE);
    let page_size = query_int(&params, "page_size").unwrap_or(DEFAULT_PAGE_SIZE);

    Reply::ok(Envelope::success(store.list_messages(page, page_size)))
}

fn send_message(store: &mut MockStore, request: &RequestData) -> Reply {
    let body = match json_object(request) {
        Ok(body) => body,
        Err(reply) => return reply,
    };

    let receiver_id = match body.get("receiver_id") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => None,
        Some(value) => match value.as_i64() {
            Some(0) => None,
            Some(id) => Some(id),
            None => {
                return Reply::error(400, "invalid parameter: receiver_id must be an integer")
            }
        },
    };
    let receiver_id = match receiver_id {
        Some(receiver_id) => receiver_id,
        None => return Reply::error(400, "invalid parameter: receiver_id must not be empty"),
    };
    let content = match non_empty_string(&body, "content") {
        Some(content) => content,
        None => return Reply::error(400, "invalid parameter: content must not be empty"),
    };
    let title = match body.get("title") {
        None | Some(Value::Null) => None,
        Some(Value::String(title)) => Some(title.clone()),
        Some(_) => return Reply::error(400, "invalid parameter: title must be a string"),
    };

    let message = store.send_message(NewMessage {
        receiver_id,
        content,
        title,
    });

    Reply::ok(Envelope::with_message(
        200,
        "message sent successfully",
        json!({ "message_id": message.message_id }),
    ))
}

fn health() -> Reply {
    Reply::ok(Envelope::success(json!({
        "status": "ok",
        "timestamp": util::current_time(),
    })))
}

fn query_params(request: &RequestData) -> Vec<(String, String)> {
    serde_urlencoded::from_str(request.query()).unwrap_or_default()
}

// First occurrence wins; values that aren't integers count as absent.
fn query_int(params: &[(String, String)], key: &str) -> Option<i64> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .and_then(|(_, v)| v.trim().parse().ok())
}

fn json_object(request: &RequestData) -> Result<Map<String, Value>, Reply> {
    if request.body.trim().is_empty() {
        return Err(Reply::error(400, "request body must not be empty"));
    }

    let value: Value = serde_json::from_str(&request.body)
        .map_err(|_| Reply::error(400, "request body must be valid JSON"))?;

    match value {
        Value::Object(map) if map.is_empty() => {
            Err(Reply::error(400, "request body must not be empty"))
        }
        Value::Object(map) => Ok(map),
        Value::Null => Err(Reply::error(400, "request body must not be empty")),
        _ => Err(Reply::error(400, "request body must be a JSON object")),
    }
}

fn non_empty_string(body: &Map<String, Value>, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(String::from)
}

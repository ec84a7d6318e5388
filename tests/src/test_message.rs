use crate::TestResult;
use apiharness::{
    assertion::{assert_json_contains, assert_response_time, assert_status_code},
    harness_test,
    mock::DEFAULT_TITLE,
    util, TestContext,
};
use apiharness_api::MessageApi;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

const TEST_DATA_PATH: &str = "config/test_data.yaml";

#[derive(Deserialize, Debug)]
struct TestData {
    send_message_cases: Vec<Value>,
}

fn message_api(context: &TestContext) -> Result<MessageApi, apiharness_api::Error> {
    MessageApi::new(context.config())
}

#[harness_test]
fn get_message_list_success(context: &TestContext) -> TestResult {
    let api = message_api(context)?;

    let response = api.client().get("/api/message/list").send()?;

    assert_status_code(&response, 200)?;
    assert_json_contains(&response, "code", Some(&json!(200)))?;
    assert_json_contains(&response, "data.total", Some(&json!(25)))?;
    assert_json_contains(&response, "data.messages", None)?;
    Ok(())
}

#[harness_test]
fn get_message_list_with_pagination(context: &TestContext) -> TestResult {
    let api = message_api(context)?;

    let response = api
        .client()
        .get("/api/message/list")
        .query("page", 1)
        .query("page_size", 5)
        .send()?;

    assert_status_code(&response, 200)?;
    let body = response.json_value()?;
    assert_eq!(body["data"]["page"], json!(1));
    assert_eq!(body["data"]["page_size"], json!(5));
    assert_eq!(body["data"]["messages"].as_array().map(Vec::len), Some(5));
    Ok(())
}

#[harness_test]
fn get_message_list_page2(context: &TestContext) -> TestResult {
    let page = message_api(context)?
        .get_message_list(2, 10)?
        .data
        .ok_or("no page in the response")?;

    assert_eq!(page.page, 2);
    assert_eq!(page.messages.len(), 10);
    assert_eq!(page.messages[0].message_id, 11);
    Ok(())
}

#[harness_test]
fn get_message_list_past_the_end(context: &TestContext) -> TestResult {
    let page = message_api(context)?
        .get_message_list(100, 10)?
        .data
        .ok_or("no page in the response")?;

    assert_eq!(page.total, 25);
    assert!(page.messages.is_empty());
    Ok(())
}

#[harness_test]
fn get_message_list_structure(context: &TestContext) -> TestResult {
    let api = message_api(context)?;

    let response = api.client().get("/api/message/list").send()?;

    assert_status_code(&response, 200)?;
    for key in &["total", "page", "page_size", "messages"] {
        assert_json_contains(&response, &format!("data.{}", key), None)?;
    }
    for key in &[
        "message_id",
        "title",
        "content",
        "sender_id",
        "receiver_id",
        "created_at",
    ] {
        assert_json_contains(&response, &format!("data.messages.0.{}", key), None)?;
    }
    Ok(())
}

#[harness_test]
fn send_message_success(context: &TestContext) -> TestResult {
    let api = message_api(context)?;

    let response = api
        .client()
        .post("/api/message/send")
        .json(json!({
            "receiver_id": 1002,
            "content": "This is a test message",
            "title": "Test title"
        }))
        .send()?;

    assert_status_code(&response, 200)?;
    assert_json_contains(&response, "code", Some(&json!(200)))?;
    assert_json_contains(&response, "message", Some(&json!("message sent successfully")))?;
    assert_json_contains(&response, "data.message_id", None)?;
    Ok(())
}

#[harness_test]
fn send_message_missing_fields(context: &TestContext) -> TestResult {
    let api = message_api(context)?;
    let cases = vec![
        (json!({ "content": "message content" }), "receiver_id"),
        (json!({ "receiver_id": 1002 }), "content"),
    ];

    for (payload, missing) in cases {
        let response = api.client().post("/api/message/send").json(payload).send()?;

        assert_status_code(&response, 400)?;
        assert_json_contains(&response, "code", Some(&json!(400)))?;
        assert_json_contains(
            &response,
            "message",
            Some(&json!(format!("invalid parameter: {} must not be empty", missing))),
        )?;
    }
    Ok(())
}

#[harness_test]
fn send_message_without_title(context: &TestContext) -> TestResult {
    let sent = message_api(context)?
        .send_message(1002, "hi", None)?
        .data
        .ok_or("no message in the response")?;

    let store = context.mock_server().store();
    let store = store.lock().unwrap();
    let stored = store
        .messages()
        .iter()
        .find(|message| message.message_id == sent.message_id)
        .ok_or("message wasn't stored")?;
    assert_eq!(stored.title, DEFAULT_TITLE);
    Ok(())
}

#[harness_test]
fn send_message_response_time(context: &TestContext) -> TestResult {
    let api = message_api(context)?;

    let response = api
        .client()
        .post("/api/message/send")
        .json(json!({ "receiver_id": 1002, "content": "performance test message" }))
        .send()?;

    assert_status_code(&response, 200)?;
    assert_response_time(&response, 1.0)?;
    Ok(())
}

#[harness_test]
fn get_message_list_after_send(context: &TestContext) -> TestResult {
    let api = message_api(context)?;
    let total = api
        .get_message_list(1, 10)?
        .data
        .ok_or("no page in the response")?
        .total;

    let message_id = api
        .send_message(1003, "check message", Some("check title"))?
        .data
        .ok_or("no message in the response")?
        .message_id;
    assert_eq!(message_id, total as u64 + 1);

    let last_page = (total as i64) / 10 + 1;
    let page = api
        .get_message_list(last_page, 10)?
        .data
        .ok_or("no page in the response")?;
    assert!(page
        .messages
        .iter()
        .any(|message| message.message_id == message_id && message.title == "check title"));
    Ok(())
}

#[harness_test]
fn send_message_param(context: &TestContext) -> TestResult {
    let path = util::find_upwards(TEST_DATA_PATH).ok_or("config/test_data.yaml not found")?;
    let test_data: TestData = util::load_yaml(path)?;
    let api = message_api(context)?;

    assert!(!test_data.send_message_cases.is_empty());
    for case in test_data.send_message_cases {
        info!("Sending case {}", case);
        let response = api.client().post("/api/message/send").json(case).send()?;

        assert_status_code(&response, 200)?;
        assert_json_contains(&response, "code", Some(&json!(200)))?;
        assert_json_contains(&response, "message", Some(&json!("message sent successfully")))?;
        assert_json_contains(&response, "data.message_id", None)?;

        let body = response.json_value()?;
        assert!(
            body["data"]["message_id"].is_u64(),
            "message_id should be an integer"
        );
    }
    Ok(())
}

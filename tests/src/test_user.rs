use crate::TestResult;
use apiharness::{
    assertion::{
        assert_json_contains, assert_json_equal, assert_response_time, assert_status_code,
        assert_success,
    },
    harness_test, Config, TestContext,
};
use apiharness_api::UserApi;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn user_api(context: &TestContext) -> Result<UserApi, apiharness_api::Error> {
    UserApi::new(context.config())
}

fn use_one_second_timeout(config: &mut Config) {
    config.set("api.timeout", 1);
}

#[harness_test]
fn get_user_info_success(context: &TestContext) -> TestResult {
    let api = user_api(context)?;

    let response = api
        .client()
        .get("/api/user/info")
        .query("user_id", 1001)
        .send()?;

    assert_status_code(&response, 200)?;
    assert_json_contains(&response, "code", Some(&json!(200)))?;
    assert_json_contains(&response, "message", Some(&json!("success")))?;
    assert_json_contains(&response, "data.user_id", Some(&json!(1001)))?;
    assert_json_contains(&response, "data.username", None)?;
    assert_json_contains(&response, "data.email", None)?;
    Ok(())
}

#[harness_test]
fn get_user_info_missing_param(context: &TestContext) -> TestResult {
    let api = user_api(context)?;

    let response = api.client().get("/api/user/info").send()?;

    assert_status_code(&response, 400)?;
    assert_json_equal(&response, &json!({ "code": 400, "data": null }))?;
    assert_json_contains(
        &response,
        "message",
        Some(&json!("invalid parameter: user_id must not be empty")),
    )?;
    Ok(())
}

#[harness_test]
fn add_user_success(context: &TestContext) -> TestResult {
    let api = user_api(context)?;

    let response = api
        .client()
        .post("/api/user/add")
        .json(json!({
            "username": "test_user_001",
            "email": "test001@example.com",
            "age": 25
        }))
        .send()?;

    assert_success(&response)?;
    assert_json_contains(&response, "code", Some(&json!(200)))?;
    assert_json_contains(&response, "message", Some(&json!("user created successfully")))?;
    assert_json_contains(&response, "data.user_id", None)?;
    assert_json_contains(&response, "data.username", Some(&json!("test_user_001")))?;
    Ok(())
}

#[harness_test]
fn add_user_invalid_payloads(context: &TestContext) -> TestResult {
    let api = user_api(context)?;
    let payloads = vec![
        json!({ "email": "test@example.com" }),
        json!({ "username": "test_user" }),
        json!({ "username": "test_user", "email": "invalid_email" }),
    ];

    for payload in payloads {
        let response = api.client().post("/api/user/add").json(payload).send()?;

        assert_status_code(&response, 400)?;
        assert_json_contains(&response, "code", Some(&json!(400)))?;
        assert_json_contains(&response, "message", None)?;
    }

    assert!(context.mock_server().store().lock().unwrap().users().is_empty());
    Ok(())
}

#[harness_test]
fn add_user_duplicate_username(context: &TestContext) -> TestResult {
    let api = user_api(context)?;
    api.add_user("duplicate_user", "dup1@example.com", None)?;

    let response = api
        .client()
        .post("/api/user/add")
        .json(json!({ "username": "duplicate_user", "email": "dup2@example.com" }))
        .send()?;

    assert_status_code(&response, 409)?;
    assert_json_equal(
        &response,
        &json!({ "code": 409, "message": "user already exists" }),
    )?;
    Ok(())
}

#[harness_test]
fn add_user_with_optional_age(context: &TestContext) -> TestResult {
    let api = user_api(context)?;

    let created = api
        .add_user("user_with_age", "age@example.com", Some(30))?
        .data
        .ok_or("no user in the response")?;
    let user = api
        .get_user_info(created.user_id)?
        .data
        .ok_or("no user in the response")?;

    assert_eq!(user.age, Some(30));
    Ok(())
}

#[harness_test]
fn get_user_info_response_structure(context: &TestContext) -> TestResult {
    let api = user_api(context)?;

    let response = api
        .client()
        .get("/api/user/info")
        .query("user_id", 1001)
        .send()?;

    assert_status_code(&response, 200)?;
    let body = response.json_value()?;
    for key in &["code", "message", "data"] {
        assert!(body.get(key).is_some(), "missing {}", key);
    }
    let user = &body["data"];
    assert!(user["user_id"].is_i64());
    assert!(user["username"].is_string());
    assert!(user["email"].is_string());
    Ok(())
}

#[harness_test]
fn missing_nested_field_is_reported_by_full_key(context: &TestContext) -> TestResult {
    let api = user_api(context)?;

    let response = api
        .client()
        .get("/api/user/info")
        .query("user_id", 1001)
        .send()?;
    let error = assert_json_contains(&response, "data.user.name", None).unwrap_err();

    assert_eq!(error.message(), "field does not exist: data.user.name");
    Ok(())
}

#[harness_test(use_one_second_timeout)]
fn add_user_response_time(context: &TestContext) -> TestResult {
    let api = user_api(context)?;

    let response = api
        .client()
        .post("/api/user/add")
        .json(json!({ "username": "performance_test", "email": "perf@example.com" }))
        .send()?;

    assert_status_code(&response, 200)?;
    assert_response_time(&response, 1.0)?;
    Ok(())
}

#[harness_test]
fn strict_facade_raises_on_missing_routes(context: &TestContext) -> TestResult {
    let api = user_api(context)?;

    let error = api.delete_user(1001).unwrap_err();

    assert_eq!(error.status(), Some(404));
    let response = api.client().delete("/api/user/1001").send()?;
    assert_status_code(&response, 404)?;
    assert_json_contains(&response, "data", Some(&Value::Null))?;
    Ok(())
}

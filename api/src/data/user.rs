use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct UserInfo {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub age: Option<i64>,
    pub created_at: Option<String>,
}

/// What the add-user endpoint echoes back.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CreatedUser {
    pub user_id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub(crate) struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
}

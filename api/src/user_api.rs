use crate::{
    data::user::{CreatedUser, NewUser, UserInfo},
    error::Error,
    strict,
};
use apiharness::{Config, Envelope, HttpClient};
use serde_json::Value;
use tracing::info;

const USER_INFO_PATH: &str = "/api/user/info";
const USER_ADD_PATH: &str = "/api/user/add";
const USER_PATH: &str = "/api/user";

/// Facade over the user endpoints.
#[derive(Debug, Clone)]
pub struct UserApi {
    client: HttpClient,
}

impl UserApi {
    /// Create a UserApi with a client built from `api.base_url` and `api.timeout`.
    pub fn new(config: &Config) -> Result<Self, Error> {
        Ok(Self::with_client(HttpClient::new(config)?))
    }

    pub fn with_client(client: HttpClient) -> Self {
        Self { client }
    }

    /// The raw client, for requests the facade doesn't cover.
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Gets a user by id.
    ///
    /// # Arguments
    /// `user_id` - the id to look up.
    ///
    /// # Returns
    /// The response envelope with the user record.
    pub fn get_user_info(&self, user_id: i64) -> Result<Envelope<UserInfo>, Error> {
        info!("Getting user info: user_id={}", user_id);
        let response = self
            .client
            .get(USER_INFO_PATH)
            .query("user_id", user_id)
            .send()?;

        strict(response)
    }

    /// Creates a user. `age` is left out of the request when it is `None`.
    ///
    /// # Arguments
    /// `username` - must be unique.
    /// `email` - must contain an `@`.
    /// `age` - optional age.
    ///
    /// # Returns
    /// The response envelope with the id the user was stored under.
    pub fn add_user(
        &self,
        username: &str,
        email: &str,
        age: Option<i64>,
    ) -> Result<Envelope<CreatedUser>, Error> {
        info!("Adding user: username={}, email={}", username, email);
        let body = serde_json::to_value(NewUser {
            username,
            email,
            age,
        })?;
        let response = self.client.post(USER_ADD_PATH).json(body).send()?;

        strict(response)
    }

    /// Sends `fields` (e.g. `username`, `email`, `age`) as the new values for the user.
    pub fn update_user(&self, user_id: i64, fields: Value) -> Result<Envelope, Error> {
        info!("Updating user: user_id={}, data={}", user_id, fields);
        let response = self
            .client
            .put(format!("{}/{}", USER_PATH, user_id))
            .json(fields)
            .send()?;

        strict(response)
    }

    pub fn delete_user(&self, user_id: i64) -> Result<Envelope, Error> {
        info!("Deleting user: user_id={}", user_id);
        let response = self
            .client
            .delete(format!("{}/{}", USER_PATH, user_id))
            .send()?;

        strict(response)
    }
}

//! Per-resource facades over the harness HTTP client.
//!
//! Unlike the raw client, every facade call is strict: a non-2xx response
//! becomes an [`Error`] carrying the status and a body excerpt.

pub mod data;
mod error;
mod message_api;
mod user_api;

pub use error::Error;
pub use message_api::MessageApi;
pub use user_api::UserApi;

use apiharness::{ApiResponse, Envelope};
use serde::de::DeserializeOwned;

fn strict<T: DeserializeOwned>(response: ApiResponse) -> Result<Envelope<T>, Error> {
    let response = response.error_for_status()?;
    Ok(serde_json::from_slice(&response.body)?)
}

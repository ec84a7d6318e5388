//! In-memory stand-in for the backend API.
//!
//! [`MockStore`] holds the state, [`dispatch`] answers a request against it and
//! [`MockServer`] serves it over HTTP.

mod router;
mod server;
mod store;

pub use router::{dispatch, HEALTH, MESSAGE_LIST, MESSAGE_SEND, USER_ADD, USER_INFO};
pub use server::MockServer;
pub use store::{
    MessagePage, MessageRecord, MockStore, NewMessage, NewUser, SharedStore, StoreError,
    UserRecord, DEFAULT_TITLE, SEED_MESSAGE_COUNT, SIMULATED_SENDER_ID,
};

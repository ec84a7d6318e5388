use crate::util;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{
    convert::TryFrom,
    sync::{Arc, Mutex},
};
use thiserror::Error;

pub const SEED_MESSAGE_COUNT: u64 = 25;
pub const DEFAULT_TITLE: &str = "Untitled";
pub const SIMULATED_SENDER_ID: i64 = 1001;

const ID_ATTEMPTS: usize = 100;

pub type SharedStore = Arc<Mutex<MockStore>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub age: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub message_id: u64,
    pub title: String,
    pub content: String,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub age: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub receiver_id: i64,
    pub content: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessagePage {
    pub total: usize,
    pub page: i64,
    pub page_size: i64,
    pub messages: Vec<MessageRecord>,
}

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("user already exists: {0}")]
    DuplicateUsername(String),
}

/// In-memory state behind the mock API: users and messages, both in
/// insertion order. Nothing is persisted.
#[derive(Debug)]
pub struct MockStore {
    users: Vec<UserRecord>,
    messages: Vec<MessageRecord>,
    seeded: bool,
    rng: StdRng,
}

impl MockStore {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// A store whose generated ids, ages and seed messages are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            users: Vec::new(),
            messages: Vec::new(),
            seeded: false,
            rng,
        }
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn messages(&self) -> &[MessageRecord] {
        &self.messages
    }

    pub fn find_user(&self, user_id: i64) -> Option<&UserRecord> {
        self.users.iter().find(|user| user.user_id == user_id)
    }

    /// The stored user, or a generated stand-in for ids nobody added.
    pub fn user_info(&mut self, user_id: i64) -> UserRecord {
        match self.find_user(user_id) {
            Some(user) => user.clone(),
            None => self.synthesize_user(user_id),
        }
    }

    fn synthesize_user(&mut self, user_id: i64) -> UserRecord {
        UserRecord {
            user_id,
            username: format!("user_{}", user_id),
            email: format!("user_{}@example.com", user_id),
            age: self.rng.gen_range(18..=60),
            created_at: util::current_time(),
        }
    }

    /// Stores a user under a fresh random id. Usernames are unique.
    pub fn add_user(&mut self, new_user: NewUser) -> Result<UserRecord, StoreError> {
        if self
            .users
            .iter()
            .any(|user| user.username == new_user.username)
        {
            return Err(StoreError::DuplicateUsername(new_user.username));
        }

        let user = UserRecord {
            user_id: self.next_user_id(),
            username: new_user.username,
            email: new_user.email,
            age: new_user.age.unwrap_or(0),
            created_at: util::current_time(),
        };
        self.users.push(user.clone());

        Ok(user)
    }

    // Random ids in 1000..=9999, re-rolled on collision so a new user never
    // replaces a stored one.
    fn next_user_id(&mut self) -> i64 {
        for _ in 0..ID_ATTEMPTS {
            let candidate = self.rng.gen_range(1000..=9999);
            if self.find_user(candidate).is_none() {
                return candidate;
            }
        }

        self.users
            .iter()
            .map(|user| user.user_id)
            .max()
            .map_or(1000, |max| max + 1)
    }

    /// One page of messages, seeding the collection on the first call if it
    /// is still empty. Pages past the end are empty.
    pub fn list_messages(&mut self, page: i64, page_size: i64) -> MessagePage {
        if !self.seeded {
            self.seeded = true;
            if self.messages.is_empty() {
                self.seed_messages();
            }
        }

        let messages = if page < 1 || page_size < 1 {
            Vec::new()
        } else {
            let start = (page as u64 - 1).saturating_mul(page_size as u64);
            self.messages
                .iter()
                .skip(usize::try_from(start).unwrap_or(usize::MAX))
                .take(page_size as usize)
                .cloned()
                .collect()
        };

        MessagePage {
            total: self.messages.len(),
            page,
            page_size,
            messages,
        }
    }

    fn seed_messages(&mut self) {
        for i in 1..=SEED_MESSAGE_COUNT {
            let message = MessageRecord {
                message_id: i,
                title: format!("Message title {}", i),
                content: format!("This is the content of message {}", i),
                sender_id: self.rng.gen_range(1000..=1005),
                receiver_id: self.rng.gen_range(1006..=1010),
                created_at: util::current_time(),
            };
            self.messages.push(message);
        }
    }

    /// Appends a message with id `len + 1` from the simulated sender.
    pub fn send_message(&mut self, new_message: NewMessage) -> MessageRecord {
        let message = MessageRecord {
            message_id: self.messages.len() as u64 + 1,
            title: new_message
                .title
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            content: new_message.content,
            sender_id: SIMULATED_SENDER_ID,
            receiver_id: new_message.receiver_id,
            created_at: util::current_time(),
        };
        self.messages.push(message.clone());

        message
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

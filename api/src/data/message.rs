use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub message_id: u64,
    pub title: String,
    pub content: String,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub created_at: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct MessagePage {
    pub total: usize,
    pub page: i64,
    pub page_size: i64,
    pub messages: Vec<Message>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub message_id: u64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub(crate) struct NewMessage<'a> {
    pub receiver_id: i64,
    pub content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
}

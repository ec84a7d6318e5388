use crate::{
    data::message::{MessagePage, NewMessage, SentMessage},
    error::Error,
    strict,
};
use apiharness::{Config, Envelope, HttpClient};
use tracing::info;

const MESSAGE_LIST_PATH: &str = "/api/message/list";
const MESSAGE_SEND_PATH: &str = "/api/message/send";

/// Facade over the message endpoints.
#[derive(Debug, Clone)]
pub struct MessageApi {
    client: HttpClient,
}

impl MessageApi {
    /// Create a MessageApi with a client built from `api.base_url` and `api.timeout`.
    pub fn new(config: &Config) -> Result<Self, Error> {
        Ok(Self::with_client(HttpClient::new(config)?))
    }

    pub fn with_client(client: HttpClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Gets one page of messages.
    ///
    /// # Arguments
    /// `page` - page number, starting at 1.
    /// `page_size` - messages per page.
    ///
    /// # Returns
    /// The response envelope with the total count and the page itself.
    pub fn get_message_list(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<Envelope<MessagePage>, Error> {
        info!("Getting message list: page={}, page_size={}", page, page_size);
        let response = self
            .client
            .get(MESSAGE_LIST_PATH)
            .query("page", page)
            .query("page_size", page_size)
            .send()?;

        strict(response)
    }

    /// Sends a message. An empty or missing `title` is left out of the request.
    pub fn send_message(
        &self,
        receiver_id: i64,
        content: &str,
        title: Option<&str>,
    ) -> Result<Envelope<SentMessage>, Error> {
        info!(
            "Sending message: receiver_id={}, title={:?}",
            receiver_id, title
        );
        let body = serde_json::to_value(NewMessage {
            receiver_id,
            content,
            title: title.filter(|title| !title.is_empty()),
        })?;
        let response = self.client.post(MESSAGE_SEND_PATH).json(body).send()?;

        strict(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiharness::mock::{MockServer, MockStore, DEFAULT_TITLE};
    use pretty_assertions::assert_eq;

    fn message_api(server: &MockServer) -> MessageApi {
        let client = HttpClient::builder()
            .with_base_url(server.base_url())
            .build()
            .unwrap();

        MessageApi::with_client(client)
    }

    #[test]
    fn first_page_of_seeded_messages() {
        let server = MockServer::start_with_store("127.0.0.1:0", MockStore::with_seed(3)).unwrap();

        let page = message_api(&server)
            .get_message_list(1, 5)
            .unwrap()
            .data
            .unwrap();

        assert_eq!(page.total, 25);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 5);
        assert_eq!(page.messages.len(), 5);
        assert_eq!(page.messages[0].title, "Message title 1");
    }

    #[test]
    fn sent_message_shows_up_on_its_page() {
        let server = MockServer::start("127.0.0.1:0").unwrap();
        let api = message_api(&server);
        api.get_message_list(1, 10).unwrap();

        let sent = api.send_message(1002, "x", Some("t")).unwrap();
        assert_eq!(sent.message, "message sent successfully");
        let message_id = sent.data.unwrap().message_id;
        assert_eq!(message_id, 26);

        let page = api.get_message_list(3, 10).unwrap().data.unwrap();
        let message = page
            .messages
            .iter()
            .find(|message| message.message_id == message_id)
            .unwrap();
        assert_eq!(message.content, "x");
        assert_eq!(message.title, "t");
        assert_eq!(message.receiver_id, 1002);
    }

    #[test]
    fn empty_title_falls_back_to_the_default() {
        let server = MockServer::start("127.0.0.1:0").unwrap();
        let api = message_api(&server);

        api.send_message(1002, "hi", Some("")).unwrap();
        api.send_message(1002, "hi again", None).unwrap();

        let store = server.store();
        let store = store.lock().unwrap();
        assert!(store
            .messages()
            .iter()
            .all(|message| message.title == DEFAULT_TITLE));
    }

    #[test]
    fn empty_content_is_rejected() {
        let server = MockServer::start("127.0.0.1:0").unwrap();

        let error = message_api(&server)
            .send_message(1002, "", None)
            .unwrap_err();

        assert_eq!(error.status(), Some(400));
        assert!(server.store().lock().unwrap().messages().is_empty());
    }
}

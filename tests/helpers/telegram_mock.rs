//! Mock Telegram API server.
//!
//! A wiremock server that answers Bot API calls with canned success
//! responses and records everything it received, so suites can assert on
//! the messages the handlers actually sent.

use serde_json::{json, Value};
use teloxide::Bot;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_BOT_TOKEN: &str = "12345:test_token";

pub struct TelegramMockServer {
    pub server: MockServer,
}

impl TelegramMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// A bot wired to this server instead of the live API.
    pub fn bot(&self) -> Bot {
        Bot::new(TEST_BOT_TOKEN).set_api_url(self.server.uri().parse().expect("mock server url"))
    }

    /// Method-name casing differs between client versions; match loosely.
    fn method_pattern(method_name: &str) -> String {
        format!("(?i)^/bot{}/{}$", TEST_BOT_TOKEN, method_name)
    }

    async fn mount(&self, method_name: &str, result: Value) {
        Mock::given(method("POST"))
            .and(path_regex(Self::method_pattern(method_name)))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": result })),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn mock_send_message(&self) {
        self.mount("sendMessage", message_result(None)).await;
    }

    pub async fn mock_edit_message_text(&self) {
        self.mount("editMessageText", message_result(None)).await;
    }

    pub async fn mock_answer_callback_query(&self) {
        self.mount("answerCallbackQuery", json!(true)).await;
    }

    pub async fn mock_delete_message(&self) {
        self.mount("deleteMessage", json!(true)).await;
    }

    pub async fn mock_send_document(&self) {
        self.mount("sendDocument", message_result(Some("export"))).await;
    }

    /// The endpoints most handler paths touch.
    pub async fn mock_common(&self) {
        self.mock_send_message().await;
        self.mock_edit_message_text().await;
        self.mock_answer_callback_query().await;
        self.mock_delete_message().await;
    }

    /// Bodies of every request made to one API method, oldest first.
    pub async fn requests_to(&self, method_name: &str) -> Vec<Value> {
        let wanted = format!("/bot{}/{}", TEST_BOT_TOKEN, method_name).to_lowercase();
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path().to_lowercase() == wanted)
            .map(|request| serde_json::from_slice(&request.body).unwrap_or(Value::Null))
            .collect()
    }

    /// Text payloads pushed through sendMessage, oldest first.
    pub async fn sent_texts(&self) -> Vec<String> {
        self.requests_to("sendMessage")
            .await
            .iter()
            .filter_map(|body| body.get("text").and_then(Value::as_str))
            .map(str::to_string)
            .collect()
    }
}

fn message_result(document: Option<&str>) -> Value {
    let mut message = json!({
        "message_id": 600,
        "date": 1700000000,
        "chat": {"id": 1, "type": "private", "first_name": "Test"},
        "from": {"id": 12345, "is_bot": true, "first_name": "chatwarden", "username": "chatwarden_bot"},
        "text": "ok"
    });
    if let Some(name) = document {
        let object = message.as_object_mut().expect("message template");
        object.remove("text");
        object.insert(
            "document".to_string(),
            json!({"file_id": name, "file_unique_id": name, "file_name": format!("{name}.json"), "file_size": 1}),
        );
    }
    message
}

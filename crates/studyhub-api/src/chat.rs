//! AI chat endpoint

use serde::Serialize;

use crate::client::ApiClient;
use crate::envelope::Fetched;
use crate::Result;

#[derive(Serialize)]
struct ChatRequest<'a, H: Serialize> {
    message: &'a str,
    history: &'a [H],
}

impl ApiClient {
    /// Send a message with prior turns (`{role, content}` items) and return
    /// the assistant's reply
    pub async fn send_chat<H: Serialize>(
        &self,
        message: &str,
        history: &[H],
    ) -> Result<Fetched<String>> {
        let envelope = self
            .post("/api/chat/send", &ChatRequest { message, history })
            .await?;
        Ok(envelope.field("response"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Serialize)]
    struct Turn {
        role: &'static str,
        content: &'static str,
    }

    #[tokio::test]
    async fn test_send_chat_with_history() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat/send"))
            .and(body_json(serde_json::json!({
                "message": "and 3+3?",
                "history": [
                    {"role": "user", "content": "2+2?"},
                    {"role": "assistant", "content": "4"}
                ]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"success": true, "response": "6"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(Url::parse(&server.uri()).unwrap()).unwrap();
        let history = [
            Turn {
                role: "user",
                content: "2+2?",
            },
            Turn {
                role: "assistant",
                content: "4",
            },
        ];

        let reply = client.send_chat("and 3+3?", &history).await.unwrap();
        assert_eq!(reply, Fetched::Ready("6".to_string()));
    }

    #[tokio::test]
    async fn test_missing_response_is_placeholder() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat/send"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(Url::parse(&server.uri()).unwrap()).unwrap();
        let reply = client.send_chat::<Turn>("hello", &[]).await.unwrap();
        assert!(!reply.is_ready());
    }
}

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::{FeedRelayError, Result};
use crate::config::HttpConfig;
use crate::delivery::{Channel, OutgoingMessage, Photo};

const PARSE_MODE: &str = "MarkdownV2";

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    description: Option<String>,
}

/// Telegram Bot API channel
pub struct TelegramChannel {
    client: Client,
    token: String,
    api_base: String,
}

impl TelegramChannel {
    pub fn new(
        http: &HttpConfig,
        token: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(http.timeout())
            .timeout(http.timeout())
            .user_agent(http.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            token: token.into(),
            api_base: api_base.into(),
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_base.trim_end_matches('/'),
            self.token,
            method
        )
    }

    fn reply_markup(message: &OutgoingMessage) -> Option<Value> {
        message.button.as_ref().map(|button| {
            json!({
                "inline_keyboard": [[{ "text": button.label, "url": button.url }]]
            })
        })
    }

    /// Both the HTTP status and the `ok` flag must report success.
    async fn check(method: &str, response: Response) -> Result<()> {
        let status = response.status();
        let body: Option<ApiResponse> = response.json().await.ok();

        match body {
            Some(body) if status.is_success() && body.ok => Ok(()),
            Some(body) => Err(FeedRelayError::Delivery(format!(
                "{} failed with {}: {}",
                method,
                status,
                body.description.unwrap_or_default()
            ))),
            None => Err(FeedRelayError::Delivery(format!(
                "{} failed with {}: unreadable response",
                method, status
            ))),
        }
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    async fn send_text(&self, message: &OutgoingMessage) -> Result<()> {
        let mut payload = json!({
            "chat_id": message.chat_id,
            "text": message.body,
            "parse_mode": PARSE_MODE,
            "disable_notification": message.silent,
        });
        if let Some(markup) = Self::reply_markup(message) {
            payload["reply_markup"] = markup;
        }

        // The request URL carries the bot token, keep it out of errors
        let response = self
            .client
            .post(self.endpoint("sendMessage"))
            .json(&payload)
            .send()
            .await
            .map_err(|e| e.without_url())?;

        Self::check("sendMessage", response).await
    }

    async fn send_photo(&self, message: &OutgoingMessage, photo: &Photo) -> Result<()> {
        let part = Part::bytes(photo.bytes.clone()).file_name(photo.file_name.clone());

        let mut form = Form::new()
            .text("chat_id", message.chat_id.clone())
            .text("caption", message.body.clone())
            .text("parse_mode", PARSE_MODE)
            .text("disable_notification", message.silent.to_string())
            .part("photo", part);
        if let Some(markup) = Self::reply_markup(message) {
            form = form.text("reply_markup", markup.to_string());
        }

        let response = self
            .client
            .post(self.endpoint("sendPhoto"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| e.without_url())?;

        Self::check("sendPhoto", response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::Button;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn message() -> OutgoingMessage {
        OutgoingMessage {
            chat_id: "@news".into(),
            body: "📰 *Title*\n\nBody\n".into(),
            button: Some(Button {
                label: "Lasīt".into(),
                url: "https://e/article".into(),
            }),
            silent: true,
        }
    }

    fn accepted() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}}))
    }

    fn channel(server: &MockServer) -> TelegramChannel {
        TelegramChannel::new(&HttpConfig::default(), "123:abc", server.uri()).unwrap()
    }

    #[tokio::test]
    async fn test_send_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_partial_json(json!({
                "chat_id": "@news",
                "text": "📰 *Title*\n\nBody\n",
                "parse_mode": "MarkdownV2",
                "disable_notification": true,
                "reply_markup": {
                    "inline_keyboard": [[{ "text": "Lasīt", "url": "https://e/article" }]]
                }
            })))
            .respond_with(accepted())
            .expect(1)
            .mount(&server)
            .await;

        channel(&server).send_text(&message()).await.unwrap();
    }

    #[tokio::test]
    async fn test_api_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: can't parse entities"
            })))
            .mount(&server)
            .await;

        let err = channel(&server).send_text(&message()).await.unwrap_err();
        assert!(matches!(err, FeedRelayError::Delivery(_)));
        assert!(err.to_string().contains("can't parse entities"));
    }

    #[tokio::test]
    async fn test_not_ok_with_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": false})))
            .mount(&server)
            .await;

        assert!(channel(&server).send_text(&message()).await.is_err());
    }

    #[tokio::test]
    async fn test_send_photo_uploads_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendPhoto"))
            .respond_with(accepted())
            .expect(1)
            .mount(&server)
            .await;

        let photo = Photo {
            bytes: b"image-bytes".to_vec(),
            file_name: "0123abcd.jpg".into(),
        };
        channel(&server)
            .send_photo(&message(), &photo)
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("filename=\"0123abcd.jpg\""));
        assert!(body.contains("image-bytes"));
        assert!(body.contains("MarkdownV2"));
        assert!(body.contains("inline_keyboard"));
    }

    #[tokio::test]
    async fn test_transport_error_hides_token() {
        let channel =
            TelegramChannel::new(&HttpConfig::default(), "123:secret", "http://127.0.0.1:9")
                .unwrap();
        let err = channel.send_text(&message()).await.unwrap_err();
        assert!(!err.to_string().contains("secret"));
    }
}

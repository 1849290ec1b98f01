//! Outgoing Bot API calls.

use std::future::Future;

use teloxide::{
  Bot, RequestError,
  payloads::SendMessageSetters as _,
  prelude::Requester,
  types::{CallbackQueryId, ChatId, InlineKeyboardMarkup},
};

/// What the dispatcher needs to talk back to users.
pub trait Messenger: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn send_message(
    &self,
    chat_id: ChatId,
    text: String,
    keyboard: Option<InlineKeyboardMarkup>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Stop the client-side spinner on a pressed button.
  fn answer_callback_query(
    &self,
    id: CallbackQueryId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

impl Messenger for Bot {
  type Error = RequestError;

  async fn send_message(
    &self,
    chat_id: ChatId,
    text: String,
    keyboard: Option<InlineKeyboardMarkup>,
  ) -> Result<(), RequestError> {
    let request = Requester::send_message(self, chat_id, text);
    match keyboard {
      Some(kb) => request.reply_markup(kb).await?,
      None => request.await?,
    };
    Ok(())
  }

  async fn answer_callback_query(&self, id: CallbackQueryId) -> Result<(), RequestError> {
    Requester::answer_callback_query(self, id).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use teloxide::types::InlineKeyboardButton;
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path_regex},
  };

  use super::*;

  const SEND_MESSAGE: &str = r"(?i)^/bot123:abc/sendmessage$";

  fn bot(server: &MockServer) -> Bot {
    let url = url::Url::parse(&server.uri()).unwrap();
    Bot::new("123:abc").set_api_url(url)
  }

  fn sent_message() -> serde_json::Value {
    json!({
      "ok": true,
      "result": {
        "message_id": 1,
        "date": 1700000000,
        "chat": {"id": 42, "type": "private", "first_name": "T"},
        "text": "hello"
      }
    })
  }

  #[tokio::test]
  async fn send_message_posts_chat_text_and_keyboard() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path_regex(SEND_MESSAGE))
      .and(body_partial_json(json!({
        "chat_id": 42,
        "text": "hello",
        "reply_markup": {"inline_keyboard": [[{"text": "Go", "callback_data": "go"}]]}
      })))
      .respond_with(ResponseTemplate::new(200).set_body_json(sent_message()))
      .expect(1)
      .mount(&server)
      .await;

    let kb = InlineKeyboardMarkup::new([[InlineKeyboardButton::callback("Go", "go")]]);
    Messenger::send_message(&bot(&server), ChatId(42), "hello".into(), Some(kb))
      .await
      .unwrap();
  }

  #[tokio::test]
  async fn plain_message_has_no_markup() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path_regex(SEND_MESSAGE))
      .and(body_partial_json(json!({"chat_id": 42, "text": "hello"})))
      .respond_with(ResponseTemplate::new(200).set_body_json(sent_message()))
      .expect(1)
      .mount(&server)
      .await;

    Messenger::send_message(&bot(&server), ChatId(42), "hello".into(), None)
      .await
      .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("reply_markup").is_none());
  }

  #[tokio::test]
  async fn api_refusal_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path_regex(SEND_MESSAGE))
      .respond_with(ResponseTemplate::new(400).set_body_json(json!({
        "ok": false,
        "error_code": 400,
        "description": "Bad Request: chat not found"
      })))
      .mount(&server)
      .await;

    let res = Messenger::send_message(&bot(&server), ChatId(1), "x".into(), None).await;
    assert!(matches!(res, Err(RequestError::Api(_))), "got: {res:?}");
  }
}

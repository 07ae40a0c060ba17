mod common;

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use common::{MockChatProvider, spawn_app, spawn_app_with};
use florist_server::chatbot::provider::{APOLOGY_MESSAGE, ChatError};

fn transcript() -> Value {
    json!({
        "messages": [
            { "role": "user", "content": "Здравствуйте! Нужен букет маме на 8 марта" },
            { "role": "assistant", "content": "Какие цвета она любит?" },
            { "role": "user", "content": "Розовые, бюджет 3 тыс" }
        ]
    })
}

/// Payloads of the `data:` lines of an SSE body, in order.
fn sse_data(body: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(body)
        .lines()
        .filter_map(|line| line.strip_prefix("data: ").or_else(|| line.strip_prefix("data:")))
        .map(|data| data.trim().to_string())
        .collect()
}

#[tokio::test]
async fn chat_returns_reply_with_sentiment() {
    let app = spawn_app_with(MockChatProvider::answering("Подойдут розовые пионы.")).await;

    let (status, body) = app.post("/api/chatbot/chat", transcript()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Подойдут розовые пионы.");
    assert_eq!(body["sentiment"]["rating"], 5);
}

#[tokio::test]
async fn chat_apologizes_when_provider_fails() {
    let app = spawn_app_with(MockChatProvider::failing()).await;

    let (status, body) = app.post("/api/chatbot/chat", transcript()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], APOLOGY_MESSAGE);
    assert_eq!(body["sentiment"]["rating"], 3);
    assert_eq!(body["sentiment"]["confidence"], 0.5);
}

#[tokio::test]
async fn sentiment_failure_falls_back_to_neutral() {
    let provider = MockChatProvider {
        sentiment: None,
        ..MockChatProvider::answering("Хорошо!")
    };
    let app = spawn_app_with(provider).await;

    let (_, body) = app.post("/api/chatbot/chat", transcript()).await;
    assert_eq!(body["message"], "Хорошо!");
    assert_eq!(body["sentiment"]["rating"], 3);
}

#[tokio::test]
async fn empty_conversation_is_rejected() {
    let app = spawn_app().await;
    let (status, body) = app
        .post("/api/chatbot/chat", json!({ "messages": [] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let (status, _) = app
        .request_raw(
            Method::POST,
            "/api/chatbot/chat/stream",
            None,
            Some(json!({ "messages": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stream_relays_chunks_then_done() {
    let provider = MockChatProvider {
        chunks: Some(vec![Ok("Розовые ".to_string()), Ok("тюльпаны".to_string())]),
        ..MockChatProvider::answering("unused")
    };
    let app = spawn_app_with(provider).await;

    let (status, body) = app
        .request_raw(Method::POST, "/api/chatbot/chat/stream", None, Some(transcript()))
        .await;
    assert_eq!(status, StatusCode::OK);

    let events = sse_data(&body);
    assert_eq!(events.len(), 3);
    let first: Value = serde_json::from_str(&events[0]).unwrap();
    let second: Value = serde_json::from_str(&events[1]).unwrap();
    assert_eq!(first["content"], "Розовые ");
    assert_eq!(second["content"], "тюльпаны");
    assert_eq!(events[2], "[DONE]");
}

#[tokio::test]
async fn stream_error_becomes_apology() {
    let provider = MockChatProvider {
        chunks: Some(vec![
            Ok("Секунду".to_string()),
            Err(ChatError::Transport("connection reset".to_string())),
            Ok("never sent".to_string()),
        ]),
        ..MockChatProvider::answering("unused")
    };
    let app = spawn_app_with(provider).await;

    let (_, body) = app
        .request_raw(Method::POST, "/api/chatbot/chat/stream", None, Some(transcript()))
        .await;
    let events = sse_data(&body);
    assert_eq!(events.len(), 3);
    let apology: Value = serde_json::from_str(&events[1]).unwrap();
    assert_eq!(apology["content"], APOLOGY_MESSAGE);
    assert_eq!(events[2], "[DONE]");

    let app = spawn_app_with(MockChatProvider::failing()).await;
    let (status, body) = app
        .request_raw(Method::POST, "/api/chatbot/chat/stream", None, Some(transcript()))
        .await;
    assert_eq!(status, StatusCode::OK);
    let events = sse_data(&body);
    assert_eq!(events.len(), 2);
    assert!(events[0].contains("Извините"));
}

#[tokio::test]
async fn recommendation_uses_provider_or_apologizes() {
    let request = json!({ "occasion": "свадьба", "budget": "5000" });

    let app = spawn_app_with(MockChatProvider::answering("Белые розы")).await;
    let (status, body) = app.post("/api/chatbot/recommend", request.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recommendation"], "Белые розы (свадьба)");

    let app = spawn_app_with(MockChatProvider::failing()).await;
    let (_, body) = app.post("/api/chatbot/recommend", request).await;
    assert_eq!(body["recommendation"], APOLOGY_MESSAGE);
}

#[tokio::test]
async fn analyze_summarizes_user_turns() {
    let app = spawn_app_with(MockChatProvider::failing()).await;

    let (status, body) = app.post("/api/chatbot/analyze", transcript()).await;
    assert_eq!(status, StatusCode::OK);
    let summary = body["summary"].as_str().unwrap();
    assert!(summary.contains("маме"));
    assert!(summary.contains("8 марта"));
    assert!(summary.contains("розовые"));
    assert!(summary.contains("3000 руб."));

    let (_, body) = app
        .post(
            "/api/chatbot/analyze",
            json!({ "messages": [{ "role": "user", "content": "Добрый день" }] }),
        )
        .await;
    assert_eq!(
        body["summary"],
        "Здравствуйте! Хочу получить консультацию по выбору букета. Пожалуйста, перезвоните мне."
    );
}

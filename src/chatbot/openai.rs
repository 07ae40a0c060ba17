//! Chat client for OpenAI-compatible `chat/completions` endpoints.

use std::time::Duration;

use async_trait::async_trait;
use futures::{future, stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::provider::{
    ChatError, ChatMessage, ChatProvider, ChatStream, RecommendationRequest, Sentiment,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const FLORIST_SYSTEM_PROMPT: &str = "Ты дружелюбный консультант цветочной мастерской. \
Помогай посетителям подобрать букет: уточняй, кому он предназначен, по какому поводу, \
какие цветы и оттенки нравятся и какой бюджет. Отвечай кратко, по-русски, без markdown. \
Если клиент готов к заказу, предложи оставить заявку на обратный звонок.";

const SENTIMENT_PROMPT: &str = "Оцени настроение клиента цветочного магазина по его сообщению. \
Ответь только JSON-объектом вида {\"rating\": <целое от 1 до 5>, \"confidence\": <число от 0 до 1>}.";

const RECOMMENDATION_PROMPT: &str = "Ты опытный флорист. Предложи 2-3 варианта букета с \
кратким описанием состава и примерной стоимостью в рублях. Отвечай по-русски, без markdown.";

/// Request body for the completions endpoint
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

/// Event decoded from the provider's server-sent event stream.
#[derive(Debug, PartialEq)]
pub enum StreamEvent {
    Delta(String),
    Done,
}

/// Incremental decoder for `data:` lines of an SSE byte stream.
///
/// Bytes are buffered until a full line is available, so multi-byte UTF-8
/// characters split across network chunks decode correctly.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim();
            let Some(data) = line.strip_prefix("data:") else {
                continue; // comments, keep-alives and event names
            };
            let data = data.trim();
            if data == "[DONE]" {
                events.push(StreamEvent::Done);
                continue;
            }
            match serde_json::from_str::<StreamChunk>(data) {
                Ok(chunk) => events.extend(
                    chunk
                        .choices
                        .into_iter()
                        .filter_map(|c| c.delta.content)
                        .filter(|c| !c.is_empty())
                        .map(StreamEvent::Delta),
                ),
                Err(e) => debug!(error = %e, "Skipping undecodable stream line."),
            }
        }
        events
    }
}

/// OpenAI-compatible chat client
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(
        api_key: Option<String>,
        base_url: Option<String>,
        model: Option<String>,
    ) -> Result<Self, ChatError> {
        let http = Client::builder()
            .connect_timeout(Self::CONNECT_TIMEOUT)
            .user_agent(concat!("florist-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    fn with_system_prompt(prompt: &str, messages: &[ChatMessage]) -> Vec<ChatMessage> {
        std::iter::once(ChatMessage::system(prompt))
            .chain(messages.iter().cloned())
            .collect()
    }

    async fn send(
        &self,
        messages: Vec<ChatMessage>,
        temperature: f32,
        stream: bool,
    ) -> Result<reqwest::Response, ChatError> {
        let api_key = self.api_key.as_deref().ok_or(ChatError::MissingApiKey)?;
        let request = CompletionRequest {
            model: &self.model,
            messages,
            temperature,
            stream,
        };

        let res = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Chat provider returned an error status.");
            return Err(ChatError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(res)
    }

    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        temperature: f32,
    ) -> Result<String, ChatError> {
        let res = self.send(messages, temperature, false).await?;
        let body: CompletionResponse = res
            .json()
            .await
            .map_err(|e| ChatError::Serde(e.to_string()))?;
        body.choices
            .into_iter()
            .find_map(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(ChatError::EmptyResponse)
    }
}

#[async_trait]
impl ChatProvider for OpenAiClient {
    async fn get_chat_response(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        self.complete(Self::with_system_prompt(FLORIST_SYSTEM_PROMPT, messages), 0.7)
            .await
    }

    async fn get_chat_stream_response(
        &self,
        messages: &[ChatMessage],
    ) -> Result<ChatStream, ChatError> {
        let res = self
            .send(
                Self::with_system_prompt(FLORIST_SYSTEM_PROMPT, messages),
                0.7,
                true,
            )
            .await?;

        let chunks = res
            .bytes_stream()
            .scan((SseDecoder::default(), false), |(decoder, done), chunk| {
                if *done {
                    return future::ready(None);
                }
                let items: Vec<Result<String, ChatError>> = match chunk {
                    Ok(bytes) => {
                        let mut items = Vec::new();
                        for event in decoder.push(&bytes) {
                            match event {
                                StreamEvent::Delta(text) => items.push(Ok(text)),
                                StreamEvent::Done => {
                                    *done = true;
                                    break;
                                }
                            }
                        }
                        items
                    }
                    Err(e) => {
                        *done = true;
                        vec![Err(ChatError::Transport(e.to_string()))]
                    }
                };
                future::ready(Some(stream::iter(items)))
            })
            .flatten()
            .boxed();
        Ok(chunks)
    }

    async fn analyze_sentiment(&self, text: &str) -> Result<Sentiment, ChatError> {
        let reply = self
            .complete(
                vec![ChatMessage::system(SENTIMENT_PROMPT), ChatMessage::user(text)],
                0.0,
            )
            .await?;
        Sentiment::parse_reply(&reply)
    }

    async fn generate_flower_recommendation(
        &self,
        request: &RecommendationRequest,
    ) -> Result<String, ChatError> {
        let mut prompt = String::from("Подбери букет.");
        if let Some(occasion) = request.occasion.as_deref() {
            prompt.push_str(&format!(" Повод: {occasion}."));
        }
        if let Some(recipient) = request.recipient.as_deref() {
            prompt.push_str(&format!(" Для кого: {recipient}."));
        }
        if let Some(preferences) = request.preferences.as_deref() {
            prompt.push_str(&format!(" Пожелания: {preferences}."));
        }
        if let Some(budget) = request.budget.as_deref() {
            prompt.push_str(&format!(" Бюджет: {budget}."));
        }
        self.complete(
            vec![
                ChatMessage::system(RECOMMENDATION_PROMPT),
                ChatMessage::user(prompt),
            ],
            0.8,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoder_joins_utf8_split_across_chunks() {
        let line = "data: {\"choices\":[{\"delta\":{\"content\":\"Розы\"}}]}\n\n";
        let bytes = line.as_bytes();
        // split inside the two-byte encoding of 'Р'
        let split = line.find('Р').unwrap() + 1;
        let mut decoder = SseDecoder::default();
        assert!(decoder.push(&bytes[..split]).is_empty());
        assert_eq!(
            decoder.push(&bytes[split..]),
            vec![StreamEvent::Delta("Розы".to_string())]
        );
    }

    #[test]
    fn decoder_reports_done_and_skips_noise() {
        let mut decoder = SseDecoder::default();
        let events = decoder.push(
            b": keep-alive\n\ndata: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\ndata: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\n\ndata: [DONE]\n\n",
        );
        assert_eq!(
            events,
            vec![StreamEvent::Delta("ok".to_string()), StreamEvent::Done]
        );
    }

    #[test]
    fn system_prompt_goes_first() {
        let messages = OpenAiClient::with_system_prompt("prompt", &[ChatMessage::user("Привет")]);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], ChatMessage::system("prompt"));
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let client = OpenAiClient::new(Some("  ".to_string()), None, None).unwrap();
        let err = client
            .get_chat_response(&[ChatMessage::user("Привет")])
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::MissingApiKey));
    }
}

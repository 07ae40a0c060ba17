use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// Reply shown to visitors whenever the AI provider fails.
pub const APOLOGY_MESSAGE: &str = "Извините, сейчас я не могу ответить. Пожалуйста, попробуйте ещё раз чуть позже или оставьте заявку на обратный звонок, и наш флорист свяжется с вами.";

#[derive(Debug, Clone, Error)]
pub enum ChatError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("json error: {0}")]
    Serde(String),
    #[error("missing api key: OPENAI_API_KEY is not configured")]
    MissingApiKey,
    #[error("provider returned an empty reply")]
    EmptyResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Visitor mood on a 1..=5 scale with the model's confidence in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub rating: u8,
    pub confidence: f32,
}

impl Default for Sentiment {
    fn default() -> Self {
        Self {
            rating: 3,
            confidence: 0.5,
        }
    }
}

impl Sentiment {
    /// Parses the first JSON object found in a model reply and clamps it to range.
    pub fn parse_reply(reply: &str) -> Result<Self, ChatError> {
        #[derive(Deserialize)]
        struct Raw {
            rating: f64,
            confidence: f64,
        }

        let start = reply.find('{').ok_or(ChatError::EmptyResponse)?;
        let end = reply.rfind('}').ok_or(ChatError::EmptyResponse)?;
        if end < start {
            return Err(ChatError::EmptyResponse);
        }
        let raw: Raw = serde_json::from_str(&reply[start..=end])
            .map_err(|e| ChatError::Serde(e.to_string()))?;
        Ok(Self {
            rating: raw.rating.round().clamp(1.0, 5.0) as u8,
            confidence: raw.confidence.clamp(0.0, 1.0) as f32,
        })
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendationRequest {
    #[validate(length(max = 255))]
    pub occasion: Option<String>,
    #[validate(length(max = 255))]
    pub recipient: Option<String>,
    #[validate(length(max = 1000))]
    pub preferences: Option<String>,
    #[validate(length(max = 64))]
    pub budget: Option<String>,
}

/// Text chunks of an assistant reply in arrival order.
pub type ChatStream = BoxStream<'static, Result<String, ChatError>>;

/// The AI capability the chatbot routes depend on.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn get_chat_response(&self, messages: &[ChatMessage]) -> Result<String, ChatError>;

    async fn get_chat_stream_response(
        &self,
        messages: &[ChatMessage],
    ) -> Result<ChatStream, ChatError>;

    async fn analyze_sentiment(&self, text: &str) -> Result<Sentiment, ChatError>;

    async fn generate_flower_recommendation(
        &self,
        request: &RecommendationRequest,
    ) -> Result<String, ChatError>;
}

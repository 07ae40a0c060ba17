use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::chatbot::provider::{ChatMessage, Sentiment};

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(max = 100))]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub sentiment: Sentiment,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommendation: String,
}

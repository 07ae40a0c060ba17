//! Chat assistant endpoints.
//!
//! Provider failures never reach the visitor as errors: they are logged and
//! replaced by [`APOLOGY_MESSAGE`], including in the middle of a stream.

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, KeepAliveStream, Sse},
    routing::post,
    Json, Router,
};
use futures::stream::{self, BoxStream, StreamExt};
use serde_json::json;
use std::{convert::Infallible, future, sync::Arc};
use tracing::{debug, warn};

use crate::chatbot::provider::{
    ChatMessage, ChatRole, ChatStream, RecommendationRequest, Sentiment, APOLOGY_MESSAGE,
};
use crate::chatbot::summarizer;
use crate::web::error::AppError;
use crate::web::extract::ValidatedJson;
use crate::web::middleware::i18n::tr;
use crate::web::models::chatbot_models::{
    AnalyzeResponse, ChatRequest, ChatResponse, RecommendationResponse,
};
use crate::web::AppState;

/// Marker sent as the last event of every chat stream.
pub const STREAM_DONE: &str = "[DONE]";

fn ensure_messages(messages: &[ChatMessage]) -> Result<(), AppError> {
    if messages.is_empty() {
        return Err(AppError::InvalidInput(tr("errors.empty_messages")));
    }
    Ok(())
}

fn content_event(content: &str) -> Event {
    Event::default().data(json!({ "content": content }).to_string())
}

async fn chat_handler(
    State(app_state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    ensure_messages(&payload.messages)?;
    let provider = &app_state.chat_provider;

    let message = match provider.get_chat_response(&payload.messages).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(error = %e, "Chat provider failed, answering with apology.");
            return Ok(Json(ChatResponse {
                message: APOLOGY_MESSAGE.to_string(),
                sentiment: Sentiment::default(),
            }));
        }
    };

    let last_user_turn = payload
        .messages
        .iter()
        .rev()
        .find(|m| m.role == ChatRole::User);
    let sentiment = match last_user_turn {
        Some(turn) => provider
            .analyze_sentiment(&turn.content)
            .await
            .unwrap_or_else(|e| {
                debug!(error = %e, "Sentiment analysis failed, using neutral default.");
                Sentiment::default()
            }),
        None => Sentiment::default(),
    };

    Ok(Json(ChatResponse { message, sentiment }))
}

async fn chat_stream_handler(
    State(app_state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<ChatRequest>,
) -> Result<Sse<KeepAliveStream<BoxStream<'static, Result<Event, Infallible>>>>, AppError> {
    ensure_messages(&payload.messages)?;

    let chunks: ChatStream = match app_state
        .chat_provider
        .get_chat_stream_response(&payload.messages)
        .await
    {
        Ok(chunks) => chunks,
        Err(e) => stream::once(future::ready(Err(e))).boxed(),
    };

    let events = chunks
        .scan(false, |failed, chunk| {
            if *failed {
                return future::ready(None);
            }
            let event = match chunk {
                Ok(text) => content_event(&text),
                Err(e) => {
                    warn!(error = %e, "Chat stream failed, sending apology.");
                    *failed = true;
                    content_event(APOLOGY_MESSAGE)
                }
            };
            future::ready(Some(event))
        })
        .chain(stream::once(future::ready(
            Event::default().data(STREAM_DONE),
        )))
        .map(Ok::<_, Infallible>)
        .boxed();

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

async fn recommend_handler(
    State(app_state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<RecommendationRequest>,
) -> Json<RecommendationResponse> {
    let recommendation = app_state
        .chat_provider
        .generate_flower_recommendation(&payload)
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "Recommendation failed, answering with apology.");
            APOLOGY_MESSAGE.to_string()
        });
    Json(RecommendationResponse { recommendation })
}

/// Summarizes the visitor's side of the conversation for the callback form.
async fn analyze_handler(
    ValidatedJson(payload): ValidatedJson<ChatRequest>,
) -> Json<AnalyzeResponse> {
    Json(AnalyzeResponse {
        summary: summarizer::summarize(&payload.messages),
    })
}

pub fn create_chatbot_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/chat/stream", post(chat_stream_handler))
        .route("/recommend", post(recommend_handler))
        .route("/analyze", post(analyze_handler))
}

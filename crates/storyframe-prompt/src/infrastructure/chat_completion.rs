//! OpenAI-compatible chat completions enricher.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use storyframe_core::enrichment::{EnrichmentContext, EnrichmentField, Enricher};
use storyframe_core::error::StoryboardError;
use tracing::{debug, error, instrument};

const MAX_TOKENS: u32 = 200;
const TEMPERATURE: f32 = 0.4;

/// Connection settings for the chat completions backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCompletionConfig {
    /// Base URL, without the `/v1/chat/completions` path.
    pub base_url: String,
    /// Model name sent with every request.
    pub model: String,
    /// Optional bearer token.
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

fn instruction(context: &EnrichmentContext) -> String {
    let task = match context.field {
        EnrichmentField::Narration => {
            "Polish this storyboard narration excerpt. Keep its meaning, names and length."
        }
        EnrichmentField::VisualIdea => {
            "Rewrite this storyboard visual idea as one vivid line. Keep the framing and names."
        }
    };
    format!(
        "{task} Answer in language '{}' with the rewritten text only. \
         Scene: {}. Visual style: {}. Tone: {}.",
        context.language.code(),
        context.scene_title,
        context.visual_style.as_str(),
        context.tone.as_str(),
    )
}

fn build_request(model: &str, text: &str, context: &EnrichmentContext) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_owned(),
        messages: vec![
            ChatMessage {
                role: "system",
                content: instruction(context),
            },
            ChatMessage {
                role: "user",
                content: text.to_owned(),
            },
        ],
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
    }
}

fn extract_reply(response: ChatCompletionResponse) -> Result<String, StoryboardError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_owned())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| StoryboardError::Enrichment("empty completion".to_owned()))
}

/// Enricher backed by a chat completions endpoint.
#[derive(Debug, Clone)]
pub struct ChatCompletionEnricher {
    config: ChatCompletionConfig,
    client: reqwest::Client,
}

impl ChatCompletionEnricher {
    /// Creates an enricher for the given backend.
    #[must_use]
    pub fn new(config: ChatCompletionConfig) -> Self {
        debug!(base_url = %config.base_url, model = %config.model, "creating chat completion enricher");
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Backend configuration.
    #[must_use]
    pub fn config(&self) -> &ChatCompletionConfig {
        &self.config
    }
}

#[async_trait]
impl Enricher for ChatCompletionEnricher {
    #[instrument(skip(self, text, context), fields(beat_id = %context.beat_id, field = context.field.as_str()))]
    async fn enrich(
        &self,
        text: &str,
        context: &EnrichmentContext,
    ) -> Result<String, StoryboardError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let request = build_request(&self.config.model, text, context);

        let mut builder = self.client.post(&url).json(&request);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await.map_err(|e| {
            error!(error = %e, "enrichment request failed");
            StoryboardError::Enrichment(format!("request failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoryboardError::Enrichment(format!(
                "backend returned {status}"
            )));
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| StoryboardError::Enrichment(format!("unreadable completion: {e}")))?;
        extract_reply(body)
    }
}

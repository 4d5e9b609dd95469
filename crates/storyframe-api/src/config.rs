//! Server configuration read from the environment.

use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use storyframe_core::config::{PipelineConfig, PipelineTuning};
use storyframe_core::enrichment::{Enricher, TemplateEnricher};
use storyframe_prompt::infrastructure::chat_completion::{
    ChatCompletionConfig, ChatCompletionEnricher,
};

use crate::error::AppError;

const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Everything `main` needs to start the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Pipeline tuning, enrichment timeout and concurrency cap.
    pub pipeline: PipelineConfig,
    /// Chat completions backend, when `ENRICHMENT_BASE_URL` is set.
    pub enrichment: Option<ChatCompletionConfig>,
    /// OTLP collector endpoint, when span export is enabled.
    pub otlp_endpoint: Option<String>,
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} is invalid: {e}"))),
        None => Ok(default),
    }
}

fn non_blank(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

impl ServerConfig {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable or the tuning file is invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable or the tuning file is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = non_blank(&lookup, "HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = parse_or(&lookup, "PORT", 3000)?;

        let timeout_ms: u64 = parse_or(&lookup, "ENRICHMENT_TIMEOUT_MS", 2500)?;
        if timeout_ms == 0 {
            return Err(AppError::Config("ENRICHMENT_TIMEOUT_MS must be positive".to_owned()));
        }
        let compose_concurrency: usize = parse_or(&lookup, "COMPOSE_CONCURRENCY", 4)?;
        if compose_concurrency == 0 {
            return Err(AppError::Config("COMPOSE_CONCURRENCY must be positive".to_owned()));
        }

        let tuning = match non_blank(&lookup, "STORYFRAME_TUNING") {
            Some(path) => {
                let source = std::fs::read_to_string(&path)
                    .map_err(|e| AppError::Config(format!("cannot read {path}: {e}")))?;
                PipelineTuning::from_yaml_str(&source)
                    .map_err(|e| AppError::Config(e.to_string()))?
            }
            None => PipelineTuning::default(),
        };

        let enrichment = non_blank(&lookup, "ENRICHMENT_BASE_URL").map(|base_url| {
            ChatCompletionConfig {
                base_url,
                model: non_blank(&lookup, "ENRICHMENT_MODEL")
                    .unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
                api_key: non_blank(&lookup, "ENRICHMENT_API_KEY"),
            }
        });

        Ok(Self {
            host,
            port,
            pipeline: PipelineConfig {
                tuning,
                enrichment_timeout: Duration::from_millis(timeout_ms),
                compose_concurrency,
            },
            enrichment,
            otlp_endpoint: non_blank(&lookup, "OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }

    /// Builds the enricher: the chat completions backend when configured,
    /// otherwise the deterministic template enricher.
    #[must_use]
    pub fn enricher(&self) -> Arc<dyn Enricher> {
        match &self.enrichment {
            Some(config) => Arc::new(ChatCompletionEnricher::new(config.clone())),
            None => Arc::new(TemplateEnricher),
        }
    }
}

pub mod prompt;
pub mod providers;
pub mod sanitize;

use crate::config::LlmConfig;
use async_trait::async_trait;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum LlmError {
    ConnectionError(String),
    ResponseError(String),
    ConfigError(String),
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmError::ConnectionError(msg) => write!(f, "LLM connection error: {}", msg),
            LlmError::ResponseError(msg) => write!(f, "LLM response error: {}", msg),
            LlmError::ConfigError(msg) => write!(f, "LLM configuration error: {}", msg),
        }
    }
}

impl Error for LlmError {}

/// Turns a natural-language question into raw completion text that should
/// contain a SQL statement. No validation happens here; the sanitizer and
/// the executor deal with whatever comes back.
#[async_trait]
pub trait SqlGenerator: Send + Sync {
    async fn generate_sql(&self, question: &str) -> Result<String, LlmError>;
}

pub struct LlmManager {
    generator: Box<dyn SqlGenerator + Send + Sync>,
}

impl LlmManager {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let generator: Box<dyn SqlGenerator + Send + Sync> = match config.backend.as_str() {
            "gemini" => Box::new(providers::gemini::GeminiProvider::new(config)?),
            "ollama" => Box::new(providers::ollama::OllamaProvider::new(config)?),
            _ => {
                return Err(LlmError::ConfigError(format!(
                    "Unsupported LLM backend: {}",
                    config.backend
                )))
            }
        };

        Ok(Self { generator })
    }

    /// Wrap an existing generator. Lets tests stub the model out.
    pub fn from_generator(generator: Box<dyn SqlGenerator + Send + Sync>) -> Self {
        Self { generator }
    }

    pub async fn generate_sql(&self, question: &str) -> Result<String, LlmError> {
        self.generator.generate_sql(question).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;

    struct Echo;

    #[async_trait]
    impl SqlGenerator for Echo {
        async fn generate_sql(&self, question: &str) -> Result<String, LlmError> {
            Ok(format!("-- {}", question))
        }
    }

    #[test]
    fn unsupported_backend_is_a_config_error() {
        let config = LlmConfig {
            backend: "palm".to_string(),
            model: "whatever".to_string(),
            api_key: None,
            api_url: None,
            timeout_secs: 60,
        };
        assert!(matches!(
            LlmManager::new(&config),
            Err(LlmError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn from_generator_dispatches() {
        let manager = LlmManager::from_generator(Box::new(Echo));
        let out = manager.generate_sql("hello").await.unwrap();
        assert_eq!(out, "-- hello");
    }
}

//! Runtime configuration.
//!
//! Values come from `INCIDENTDESK_*` environment variables, optionally
//! seeded from a `.env` file by the binary. Every field has a default so an
//! empty environment yields a usable configuration.

use crate::error::AppError;
use crate::fs_manager::PortablePathManager;
use crate::models::ReplySettings;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use validator::{Validate, ValidationError};

pub const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_ZERO_SHOT_MODEL: &str = "typeform/distilbert-base-uncased-mnli";
pub const DEFAULT_SENTIMENT_MODEL: &str = "cardiffnlp/twitter-roberta-base-sentiment";
pub const DEFAULT_REPLY_MODEL: &str = "google/flan-t5-small";

/// Which implementation serves zero-shot classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroShotBackend {
    /// Remote NLI model behind the inference service.
    Http,
    /// Local sentence embeddings ranked by cosine similarity.
    Embedding,
}

impl FromStr for ZeroShotBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" | "remote" => Ok(ZeroShotBackend::Http),
            "embedding" | "local" => Ok(ZeroShotBackend::Embedding),
            other => Err(AppError::Config(format!(
                "Unknown zero-shot backend '{}', expected 'http' or 'embedding'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_deadlines"))]
pub struct AppConfig {
    pub db_path: PathBuf,
    #[validate(url)]
    pub inference_url: String,
    pub inference_token: Option<String>,
    #[validate(length(min = 1))]
    pub zero_shot_model: String,
    #[validate(length(min = 1))]
    pub sentiment_model: String,
    #[validate(length(min = 1))]
    pub reply_model: String,
    pub zero_shot_backend: ZeroShotBackend,
    /// Per capability call.
    #[validate(range(min = 1, max = 600))]
    pub request_timeout_secs: u64,
    /// Whole `analyze` call, all stages included. Must exceed the three
    /// sequential capability calls so they always degrade before it fires.
    #[validate(range(min = 1, max = 3600))]
    pub analysis_timeout_secs: u64,
    #[validate(nested)]
    pub reply: ReplySettings,
    /// When set, a sentiment failure aborts the analysis instead of
    /// degrading to Neutral.
    pub sentiment_required: bool,
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PortablePathManager::default_db_path(),
            inference_url: DEFAULT_INFERENCE_URL.to_string(),
            inference_token: None,
            zero_shot_model: DEFAULT_ZERO_SHOT_MODEL.to_string(),
            sentiment_model: DEFAULT_SENTIMENT_MODEL.to_string(),
            reply_model: DEFAULT_REPLY_MODEL.to_string(),
            zero_shot_backend: ZeroShotBackend::Http,
            request_timeout_secs: 60,
            analysis_timeout_secs: 200,
            reply: ReplySettings::default(),
            sentiment_required: false,
            log_json: false,
        }
    }
}

impl AppConfig {
    /// Builds the configuration from the process environment and validates it.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let config = Self {
            db_path: env::var("INCIDENTDESK_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            inference_url: env_string("INCIDENTDESK_INFERENCE_URL", defaults.inference_url),
            inference_token: env::var("INCIDENTDESK_INFERENCE_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            zero_shot_model: env_string("INCIDENTDESK_ZERO_SHOT_MODEL", defaults.zero_shot_model),
            sentiment_model: env_string("INCIDENTDESK_SENTIMENT_MODEL", defaults.sentiment_model),
            reply_model: env_string("INCIDENTDESK_REPLY_MODEL", defaults.reply_model),
            zero_shot_backend: env_parse(
                "INCIDENTDESK_ZERO_SHOT_BACKEND",
                defaults.zero_shot_backend,
            )?,
            request_timeout_secs: env_parse(
                "INCIDENTDESK_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
            analysis_timeout_secs: env_parse(
                "INCIDENTDESK_ANALYSIS_TIMEOUT_SECS",
                defaults.analysis_timeout_secs,
            )?,
            reply: ReplySettings {
                max_length: env_parse("INCIDENTDESK_REPLY_MAX_LENGTH", defaults.reply.max_length)?,
                repetition_penalty: env_parse(
                    "INCIDENTDESK_REPLY_REPETITION_PENALTY",
                    defaults.reply.repetition_penalty,
                )?,
                no_repeat_ngram_size: env_parse(
                    "INCIDENTDESK_REPLY_NO_REPEAT_NGRAM",
                    defaults.reply.no_repeat_ngram_size,
                )?,
                max_chars: env_parse("INCIDENTDESK_REPLY_MAX_CHARS", defaults.reply.max_chars)?,
            },
            sentiment_required: env_flag(
                "INCIDENTDESK_SENTIMENT_REQUIRED",
                defaults.sentiment_required,
            )?,
            log_json: env_flag("INCIDENTDESK_LOG_JSON", defaults.log_json)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_secs)
    }
}

/// Capability calls run sequentially; at most three per analysis.
const CAPABILITY_CALLS_PER_ANALYSIS: u64 = 3;

fn validate_deadlines(config: &AppConfig) -> Result<(), ValidationError> {
    let worst_case = config
        .request_timeout_secs
        .saturating_mul(CAPABILITY_CALLS_PER_ANALYSIS);
    if config.analysis_timeout_secs <= worst_case {
        let mut err = ValidationError::new("analysis_timeout");
        err.message = Some(
            format!(
                "analysis timeout ({}s) must exceed {} x request timeout ({}s)",
                config.analysis_timeout_secs,
                CAPABILITY_CALLS_PER_ANALYSIS,
                config.request_timeout_secs
            )
            .into(),
        );
        return Err(err);
    }
    Ok(())
}

fn env_string(key: &str, default: String) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(default)
}

fn env_parse<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{} = '{}': {}", key, raw, e))),
        _ => Ok(default),
    }
}

fn env_flag(key: &str, default: bool) -> Result<bool, AppError> {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "" => Ok(default),
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(AppError::Config(format!(
                "{} = '{}' is not a boolean",
                key, other
            ))),
        },
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KEYS: &[&str] = &[
        "INCIDENTDESK_DB_PATH",
        "INCIDENTDESK_INFERENCE_URL",
        "INCIDENTDESK_INFERENCE_TOKEN",
        "INCIDENTDESK_ZERO_SHOT_MODEL",
        "INCIDENTDESK_SENTIMENT_MODEL",
        "INCIDENTDESK_REPLY_MODEL",
        "INCIDENTDESK_ZERO_SHOT_BACKEND",
        "INCIDENTDESK_REQUEST_TIMEOUT_SECS",
        "INCIDENTDESK_ANALYSIS_TIMEOUT_SECS",
        "INCIDENTDESK_REPLY_MAX_LENGTH",
        "INCIDENTDESK_REPLY_REPETITION_PENALTY",
        "INCIDENTDESK_REPLY_NO_REPEAT_NGRAM",
        "INCIDENTDESK_REPLY_MAX_CHARS",
        "INCIDENTDESK_SENTIMENT_REQUIRED",
        "INCIDENTDESK_LOG_JSON",
    ];

    fn cleared() -> Vec<(&'static str, Option<&'static str>)> {
        ALL_KEYS.iter().map(|k| (*k, None)).collect()
    }

    #[test]
    fn test_defaults_from_empty_environment() {
        temp_env::with_vars(cleared(), || {
            let config = AppConfig::from_env().expect("defaults should be valid");
            assert_eq!(config.inference_url, DEFAULT_INFERENCE_URL);
            assert_eq!(config.zero_shot_model, DEFAULT_ZERO_SHOT_MODEL);
            assert_eq!(config.zero_shot_backend, ZeroShotBackend::Http);
            assert_eq!(config.reply, ReplySettings::default());
            assert!(config.inference_token.is_none());
            assert!(!config.sentiment_required);
        });
    }

    #[test]
    fn test_overrides_are_applied() {
        let mut vars = cleared();
        vars.extend([
            ("INCIDENTDESK_INFERENCE_URL", Some("http://localhost:9000")),
            ("INCIDENTDESK_INFERENCE_TOKEN", Some("secret")),
            ("INCIDENTDESK_ZERO_SHOT_BACKEND", Some("embedding")),
            ("INCIDENTDESK_REPLY_MAX_LENGTH", Some("120")),
            ("INCIDENTDESK_SENTIMENT_REQUIRED", Some("yes")),
        ]);
        temp_env::with_vars(vars, || {
            let config = AppConfig::from_env().expect("overrides should be valid");
            assert_eq!(config.inference_url, "http://localhost:9000");
            assert_eq!(config.inference_token.as_deref(), Some("secret"));
            assert_eq!(config.zero_shot_backend, ZeroShotBackend::Embedding);
            assert_eq!(config.reply.max_length, 120);
            assert!(config.sentiment_required);
        });
    }

    #[test]
    fn test_unparseable_number_is_config_error() {
        let mut vars = cleared();
        vars.push(("INCIDENTDESK_REQUEST_TIMEOUT_SECS", Some("soon")));
        temp_env::with_vars(vars, || {
            let err = AppConfig::from_env().unwrap_err();
            assert!(matches!(err, AppError::Config(_)));
        });
    }

    #[test]
    fn test_out_of_range_value_fails_validation() {
        let mut vars = cleared();
        vars.push(("INCIDENTDESK_REPLY_MAX_LENGTH", Some("2")));
        temp_env::with_vars(vars, || {
            let err = AppConfig::from_env().unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        });
    }

    #[test]
    fn test_default_deadline_exceeds_capability_calls() {
        let config = AppConfig::default();
        assert!(config.analysis_timeout_secs > 3 * config.request_timeout_secs);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_analysis_deadline_must_exceed_capability_calls() {
        let mut vars = cleared();
        vars.extend([
            ("INCIDENTDESK_REQUEST_TIMEOUT_SECS", Some("1")),
            ("INCIDENTDESK_ANALYSIS_TIMEOUT_SECS", Some("3")),
        ]);
        temp_env::with_vars(vars, || {
            let err = AppConfig::from_env().unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        });

        let mut vars = cleared();
        vars.extend([
            ("INCIDENTDESK_REQUEST_TIMEOUT_SECS", Some("1")),
            ("INCIDENTDESK_ANALYSIS_TIMEOUT_SECS", Some("4")),
        ]);
        temp_env::with_vars(vars, || {
            assert!(AppConfig::from_env().is_ok());
        });
    }

    #[test]
    fn test_invalid_url_fails_validation() {
        let mut vars = cleared();
        vars.push(("INCIDENTDESK_INFERENCE_URL", Some("not a url")));
        temp_env::with_vars(vars, || {
            assert!(AppConfig::from_env().is_err());
        });
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        assert!("gpu".parse::<ZeroShotBackend>().is_err());
        assert_eq!("LOCAL".parse::<ZeroShotBackend>().unwrap(), ZeroShotBackend::Embedding);
    }
}

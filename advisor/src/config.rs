use std::env;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
pub const DEFAULT_GENERATION_MODEL: &str = "HuggingFaceH4/zephyr-7b-beta";
/// The handbook is expected at this path in the working directory.
pub const DEFAULT_PDF_PATH: &str = "corporate_security_policy.pdf";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Process configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_token: String,
    pub api_base: String,
    pub embedding_model: String,
    pub generation_model: String,
    pub pdf_path: String,
    pub bind_addr: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_token =
            env::var("HF_API_TOKEN").map_err(|_| ConfigError::MissingVar("HF_API_TOKEN"))?;

        Ok(Self {
            api_token,
            api_base: env::var("HF_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            embedding_model: env::var("ADVISOR_EMBEDDING_MODEL")
                .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string()),
            generation_model: env::var("ADVISOR_GENERATION_MODEL")
                .unwrap_or_else(|_| DEFAULT_GENERATION_MODEL.to_string()),
            pdf_path: env::var("ADVISOR_PDF_PATH").unwrap_or_else(|_| DEFAULT_PDF_PATH.to_string()),
            bind_addr: env::var("ADVISOR_BIND_ADDR")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        })
    }
}

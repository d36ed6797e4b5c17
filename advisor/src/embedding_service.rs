use reqwest::Client;

use crate::config::Settings;
use crate::error::EmbeddingError;
use crate::models::EmbeddingRequest;

/// Client for the hosted feature-extraction endpoint. The model decides the
/// output dimensionality; this service only checks that the response lines
/// up with the inputs.
pub struct EmbeddingService {
    client: Client,
    base_url: String,
    api_token: String,
    model: String,
}

impl EmbeddingService {
    pub fn new(settings: &Settings) -> Self {
        Self::with_base_url(
            &settings.api_base,
            &settings.api_token,
            &settings.embedding_model,
        )
    }

    /// The base URL is injectable so tests can point at a local mock server.
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_token: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_token: api_token.into(),
            model: model.into(),
        }
    }

    /// Embed a batch of texts, preserving input order: the vector at index i
    /// corresponds to the text at index i.
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let url = format!(
            "{}/pipeline/feature-extraction/{}",
            self.base_url, self.model
        );
        let request = EmbeddingRequest {
            inputs: texts.to_vec(),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(EmbeddingError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let vectors: Vec<Vec<f32>> = response.json().await?;
        if vectors.len() != texts.len() {
            return Err(EmbeddingError::Shape {
                expected: texts.len(),
                actual: vectors.len(),
            });
        }

        Ok(vectors)
    }

    /// Embed a single query string.
    pub async fn embed_query(&self, query: &str) -> Result<Vec<f32>, EmbeddingError> {
        let batch = [query.to_string()];
        let mut vectors = self.embed(&batch).await?;
        Ok(vectors.remove(0))
    }
}

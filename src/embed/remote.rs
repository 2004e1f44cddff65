//! Remote embedding backend (OpenAI-compatible `/embeddings` endpoint)

use super::Embedder;
use crate::config::{api_key_from_env, RemoteEmbeddingConfig};
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const RETRIES: usize = 2;

#[derive(Debug, Clone, Serialize)]
struct EmbedRequest {
    model: String,
    input: Vec<String>,
}

/// Response shapes seen across OpenAI-compatible backends
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum EmbedResponse {
    Data { data: Vec<EmbeddingData> },
    Embeddings { embeddings: Vec<Vec<f32>> },
}

#[derive(Debug, Clone, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl EmbedResponse {
    fn into_embeddings(self) -> Vec<Vec<f32>> {
        match self {
            EmbedResponse::Data { data } => data.into_iter().map(|d| d.embedding).collect(),
            EmbedResponse::Embeddings { embeddings } => embeddings,
        }
    }
}

/// HTTP embedding backend
pub struct RemoteEmbedder {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
    id: String,
    dimension: usize,
}

impl RemoteEmbedder {
    pub fn new(config: &RemoteEmbeddingConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let endpoint = join_endpoint(&base_url, "embeddings")?;
        let api_key = api_key_from_env(&config.api_key_env)?;

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
            model: config.model.clone(),
            id: format!("remote:{}", config.model),
            dimension: config.dimension,
        })
    }

    fn validate_dimensions(&self, embeddings: &[Vec<f32>]) -> Result<()> {
        if let Some(mismatch) = embeddings.iter().find(|v| v.len() != self.dimension) {
            return Err(Error::Embedding(format!(
                "Embedding dimension mismatch for model '{}': expected {}, got {}",
                self.model,
                self.dimension,
                mismatch.len()
            )));
        }
        Ok(())
    }

    async fn send_with_retry(&self, request: &EmbedRequest) -> Result<EmbedResponse> {
        let mut last_err: Option<Error> = None;

        for attempt in 0..=RETRIES {
            let result = self
                .client
                .post(self.endpoint.clone())
                .bearer_auth(&self.api_key)
                .json(request)
                .send()
                .await;

            match result {
                Ok(response) => match response.error_for_status() {
                    Ok(ok) => return Ok(ok.json::<EmbedResponse>().await?),
                    Err(e) => last_err = Some(Error::Embedding(e.to_string())),
                },
                Err(e) => last_err = Some(Error::Embedding(e.to_string())),
            }

            if attempt < RETRIES {
                tokio::time::sleep(Duration::from_millis(200 * (attempt + 1) as u64)).await;
            }
        }

        Err(last_err
            .unwrap_or_else(|| Error::Embedding("Embedding request failed".to_string())))
    }
}

#[async_trait]
impl Embedder for RemoteEmbedder {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let expected = texts.len();
        let request = EmbedRequest {
            model: self.model.clone(),
            input: texts,
        };

        let embeddings = self.send_with_retry(&request).await?.into_embeddings();
        if embeddings.len() != expected {
            return Err(Error::Embedding(format!(
                "Provider returned {} vectors for {} inputs",
                embeddings.len(),
                expected
            )));
        }
        self.validate_dimensions(&embeddings)?;
        Ok(embeddings)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Join a path onto the base URL, tolerating a missing trailing slash
fn join_endpoint(base: &Url, path: &str) -> Result<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        base.set_path(&format!("{}/", base.path()));
    }
    base.join(path)
        .map_err(|e| Error::Config(format!("Invalid embedding base URL: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_endpoint_with_and_without_slash() {
        let base = Url::parse("https://api.example.com/v1").unwrap();
        assert_eq!(
            join_endpoint(&base, "embeddings").unwrap().as_str(),
            "https://api.example.com/v1/embeddings"
        );

        let base = Url::parse("https://api.example.com/v1/").unwrap();
        assert_eq!(
            join_endpoint(&base, "embeddings").unwrap().as_str(),
            "https://api.example.com/v1/embeddings"
        );
    }

    #[test]
    fn test_response_shapes() {
        let data: EmbedResponse =
            serde_json::from_str(r#"{"data": [{"embedding": [1.0, 2.0]}]}"#).unwrap();
        assert_eq!(data.into_embeddings(), vec![vec![1.0, 2.0]]);

        let flat: EmbedResponse =
            serde_json::from_str(r#"{"embeddings": [[3.0, 4.0]]}"#).unwrap();
        assert_eq!(flat.into_embeddings(), vec![vec![3.0, 4.0]]);
    }
}

use crate::error::{AppError, Capability};
use crate::services::traits::{GenerationParams, LabelScore, SentimentOutput};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info};
use url::Url;

/// Client for a Hugging Face style inference service.
///
/// Every model is reached at `POST {base_url}/models/{model_id}` with a
/// `{"inputs": ..., "parameters": {...}}` body.
#[derive(Clone)]
pub struct HttpInferenceClient {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
    request_timeout: Duration,
}

impl HttpInferenceClient {
    pub fn new(
        base_url: &str,
        auth_token: Option<String>,
        request_timeout: Duration,
    ) -> Result<Self, AppError> {
        let parsed = Url::parse(base_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "Inference URL must be http(s), got '{}'",
                base_url
            )));
        }

        info!("Inference client targeting {}", parsed);

        Ok(Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
            request_timeout,
        })
    }

    fn model_endpoint(&self, model: &str) -> String {
        format!("{}/models/{}", self.base_url, model)
    }

    fn build_request(&self, model: &str, payload: &Value) -> reqwest::RequestBuilder {
        let request = self.client.post(self.model_endpoint(model)).json(payload);
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn post(
        &self,
        capability: Capability,
        model: &str,
        payload: &Value,
    ) -> Result<Value, AppError> {
        debug!("POST {} ({})", self.model_endpoint(model), capability);

        let res = timeout(self.request_timeout, self.build_request(model, payload).send())
            .await
            .map_err(|_| {
                AppError::unavailable(
                    capability,
                    format!("no response within {}s", self.request_timeout.as_secs()),
                )
            })?
            .map_err(|e| AppError::unavailable(capability, e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::unavailable(
                capability,
                format!("request failed with status {}: {}", status, body),
            ));
        }

        res.json::<Value>()
            .await
            .map_err(|e| AppError::unavailable(capability, format!("invalid JSON body: {}", e)))
    }

    pub async fn zero_shot(
        &self,
        model: &str,
        text: &str,
        candidate_labels: &[&str],
        multi_label: bool,
    ) -> Result<Vec<LabelScore>, AppError> {
        let payload = json!({
            "inputs": text,
            "parameters": {
                "candidate_labels": candidate_labels,
                "multi_label": multi_label,
            }
        });
        let body = self.post(Capability::ZeroShot, model, &payload).await?;
        parse_zero_shot(body)
    }

    pub async fn sentiment(&self, model: &str, text: &str) -> Result<SentimentOutput, AppError> {
        let payload = json!({ "inputs": text });
        let body = self.post(Capability::Sentiment, model, &payload).await?;
        parse_sentiment(body)
    }

    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, AppError> {
        let payload = json!({
            "inputs": prompt,
            "parameters": params,
            "options": { "wait_for_model": true }
        });
        let body = self.post(Capability::Generation, model, &payload).await?;
        parse_generation(body)
    }
}

// --- Response shapes ---

#[derive(Deserialize)]
#[serde(untagged)]
enum ZeroShotResponse {
    Columns { labels: Vec<String>, scores: Vec<f32> },
    Ranked(Vec<LabelScore>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SentimentResponse {
    Nested(Vec<Vec<SentimentOutput>>),
    Flat(Vec<SentimentOutput>),
    Single(SentimentOutput),
}

#[derive(Deserialize)]
struct GeneratedText {
    generated_text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GenerationResponse {
    List(Vec<GeneratedText>),
    Single(GeneratedText),
}

fn malformed(capability: Capability, err: serde_json::Error) -> AppError {
    AppError::unavailable(capability, format!("unexpected response shape: {}", err))
}

/// Ranked labels, best first.
pub fn parse_zero_shot(body: Value) -> Result<Vec<LabelScore>, AppError> {
    let response: ZeroShotResponse =
        serde_json::from_value(body).map_err(|e| malformed(Capability::ZeroShot, e))?;

    let mut ranked = match response {
        ZeroShotResponse::Columns { labels, scores } => {
            if labels.len() != scores.len() {
                return Err(AppError::unavailable(
                    Capability::ZeroShot,
                    format!("{} labels but {} scores", labels.len(), scores.len()),
                ));
            }
            labels
                .into_iter()
                .zip(scores)
                .map(|(label, score)| LabelScore { label, score })
                .collect::<Vec<_>>()
        }
        ZeroShotResponse::Ranked(ranked) => ranked,
    };

    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    Ok(ranked)
}

/// Highest-scoring sentiment label.
pub fn parse_sentiment(body: Value) -> Result<SentimentOutput, AppError> {
    let response: SentimentResponse =
        serde_json::from_value(body).map_err(|e| malformed(Capability::Sentiment, e))?;

    let candidates = match response {
        SentimentResponse::Nested(nested) => nested.into_iter().flatten().collect(),
        SentimentResponse::Flat(flat) => flat,
        SentimentResponse::Single(single) => vec![single],
    };

    candidates
        .into_iter()
        .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
        .ok_or_else(|| AppError::unavailable(Capability::Sentiment, "empty response"))
}

/// Generated text of the first sequence.
pub fn parse_generation(body: Value) -> Result<String, AppError> {
    let response: GenerationResponse =
        serde_json::from_value(body).map_err(|e| malformed(Capability::Generation, e))?;

    match response {
        GenerationResponse::List(list) => list
            .into_iter()
            .next()
            .map(|g| g.generated_text)
            .ok_or_else(|| AppError::unavailable(Capability::Generation, "empty response")),
        GenerationResponse::Single(single) => Ok(single.generated_text),
    }
}

//! 競品擷取：呼叫 OpenAI 相容的 chat completions 端點，
//! 並把模型回傳的 JSON 解析成競品 URL 清單。

use crate::config::AppConfig;
use crate::domain::model::{CompetitorCandidate, ExtractedCandidates};
use crate::domain::ports::CompetitorSource;
use crate::utils::error::{Result, ScoutError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// 模型應該使用的欄位名稱
pub const COMPETITORS_KEY: &str = "competitors";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    response_format: ResponseFormat,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

fn count_word(count: usize) -> String {
    match count {
        1 => "one".to_string(),
        2 => "two".to_string(),
        3 => "three".to_string(),
        4 => "four".to_string(),
        5 => "five".to_string(),
        n => n.to_string(),
    }
}

/// 固定的 system 指令；要求的競品數量與設定一致
pub fn build_system_prompt(competitor_count: usize) -> String {
    format!(
        "You are market research expert.\n\n\
         Your task is to analyse the competition for the app described by the user.\n\n\
         Step-by-step task:\n\
         1. Analyse the app description thoroughly\n\
         2. Answer {} competitor URLs\n\n\
         Answer in JSON format, as an object with a \"{}\" array. \
         Only include URLs. Don't add any comments in your answer.",
        count_word(competitor_count),
        COMPETITORS_KEY
    )
}

/// 解析模型輸出。優先使用 `competitors` 陣列，否則退而使用物件的第一個欄位。
pub fn parse_competitors(content: &str) -> Result<ExtractedCandidates> {
    let value: Value =
        serde_json::from_str(content.trim()).map_err(|e| ScoutError::InvalidModelOutput {
            message: format!("model output is not valid JSON: {}", e),
        })?;

    let Value::Object(fields) = value else {
        return Err(ScoutError::InvalidModelOutput {
            message: "model output is not a JSON object".to_string(),
        });
    };

    if let Some(list) = fields.get(COMPETITORS_KEY).filter(|v| v.is_array()) {
        return candidate_list(COMPETITORS_KEY, list).map(ExtractedCandidates::Named);
    }

    // serde_json 開了 preserve_order，第一個欄位就是模型輸出的第一個欄位
    let (key, first) = fields
        .iter()
        .next()
        .ok_or_else(|| ScoutError::InvalidModelOutput {
            message: "model output object has no fields".to_string(),
        })?;

    candidate_list(key, first).map(|candidates| ExtractedCandidates::Fallback {
        key: key.clone(),
        candidates,
    })
}

fn candidate_list(key: &str, value: &Value) -> Result<Vec<CompetitorCandidate>> {
    let Value::Array(items) = value else {
        return Err(ScoutError::InvalidModelOutput {
            message: format!("field '{}' is not a list", key),
        });
    };

    let candidates: Vec<CompetitorCandidate> = items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if candidates.is_empty() && !items.is_empty() {
        return Err(ScoutError::InvalidModelOutput {
            message: format!("field '{}' contains no URL strings", key),
        });
    }
    if candidates.len() < items.len() {
        tracing::debug!(
            "Skipped {} non-string entries in '{}'",
            items.len() - candidates.len(),
            key
        );
    }

    Ok(candidates)
}

pub struct OpenAiExtractor {
    client: Client,
    config: Arc<AppConfig>,
    system_prompt: String,
}

impl OpenAiExtractor {
    pub fn new(config: Arc<AppConfig>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.openai_timeout_seconds))
            .build()
            .map_err(|e| ScoutError::ConfigError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            system_prompt: build_system_prompt(config.competitor_count),
            config,
        })
    }

    /// 送出一次 completion 請求並取回模型的文字內容
    async fn request_completion(&self, description: &str) -> Result<String> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: description,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: self.config.temperature,
        };

        let mut request = self.client.post(&self.config.openai_endpoint).json(&body);
        if let Some(key) = &self.config.openai_api_key {
            request = request.bearer_auth(key);
        }

        tracing::debug!("Making completion request to: {}", self.config.openai_endpoint);
        let response = request.send().await.map_err(|e| ScoutError::UpstreamModel {
            message: e.to_string(),
        })?;

        let status = response.status();
        tracing::debug!("Completion response status: {}", status);

        let text = response.text().await.map_err(|e| ScoutError::UpstreamModel {
            message: e.to_string(),
        })?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(ScoutError::UpstreamModel {
                message: format!("{}: {}", status, detail),
            });
        }

        let completion: ChatResponse =
            serde_json::from_str(&text).map_err(|e| ScoutError::InvalidModelOutput {
                message: format!("unexpected completion payload: {}", e),
            })?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ScoutError::InvalidModelOutput {
                message: "completion contained no message content".to_string(),
            })
    }
}

#[async_trait]
impl CompetitorSource for OpenAiExtractor {
    async fn extract_competitors(&self, description: &str) -> Result<ExtractedCandidates> {
        let content = self.request_completion(description).await?;
        tracing::debug!("Model output: {}", content);
        parse_competitors(&content)
    }
}

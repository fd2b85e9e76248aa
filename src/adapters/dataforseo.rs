//! 關鍵字查詢：DataForSEO Labs 的 ranked keywords（live）端點。
//!
//! 任何失敗都不往外傳，記錄日誌後以 `KeywordLookup::Degraded` 回傳，
//! 一個網域查不到不能拖垮整次掃描。

use crate::config::AppConfig;
use crate::domain::model::{Domain, KeywordList, KeywordLookup, MAX_KEYWORDS};
use crate::domain::ports::KeywordSource;
use crate::utils::error::{Result, ScoutError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// 錯誤訊息中保留的回應本體長度上限
const MAX_LOGGED_BODY: usize = 2000;
const TASK_OK: u32 = 20000;

#[derive(Debug, Serialize)]
struct RankedKeywordsTask<'a> {
    target: &'a str,
    language_name: &'a str,
    location_name: &'a str,
    load_rank_absolute: bool,
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct RankedKeywordsResponse {
    tasks: Option<Vec<Task>>,
}

#[derive(Debug, Deserialize)]
struct Task {
    status_code: Option<u32>,
    status_message: Option<String>,
    result: Option<Vec<TaskResult>>,
}

// 項目保持未定型：單筆形狀不對時只略過該筆，不讓整份回應解析失敗
#[derive(Debug, Deserialize)]
struct TaskResult {
    items: Option<Vec<Value>>,
}

fn truncate_body(body: &str) -> &str {
    match body.char_indices().nth(MAX_LOGGED_BODY) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

/// 從 `tasks[0].result[0].items[*].keyword_data.keyword` 取出關鍵字，最多 `limit` 筆
pub fn parse_ranked_keywords(body: &str, limit: usize) -> std::result::Result<KeywordList, String> {
    let response: RankedKeywordsResponse =
        serde_json::from_str(body).map_err(|e| format!("malformed JSON: {}", e))?;

    let task = response
        .tasks
        .and_then(|tasks| tasks.into_iter().next())
        .ok_or("response has no tasks")?;

    if let Some(code) = task.status_code {
        if code != TASK_OK {
            return Err(format!(
                "task failed with status {}: {}",
                code,
                task.status_message.unwrap_or_default()
            ));
        }
    }

    let items = task
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or("task has no result")?
        .items
        .ok_or("result has no items")?;

    Ok(items
        .into_iter()
        .filter_map(|item| {
            item.get("keyword_data")
                .and_then(|data| data.get("keyword"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .take(limit.min(MAX_KEYWORDS))
        .collect())
}

pub struct DataForSeoClient {
    client: Client,
    config: Arc<AppConfig>,
}

impl DataForSeoClient {
    pub fn new(config: Arc<AppConfig>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.dataforseo_timeout_seconds))
            .build()
            .map_err(|e| ScoutError::ConfigError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    fn lookup_error(domain: &Domain, message: String) -> ScoutError {
        ScoutError::KeywordLookup {
            domain: domain.to_string(),
            message,
        }
    }

    /// 單次查詢，不重試；錯誤訊息中附上（截斷後的）原始回應
    pub async fn lookup(&self, domain: &Domain) -> Result<KeywordList> {
        let payload = [RankedKeywordsTask {
            target: domain.as_str(),
            language_name: &self.config.language_name,
            location_name: &self.config.location_name,
            load_rank_absolute: true,
            limit: self.config.keyword_limit.min(MAX_KEYWORDS),
        }];

        // 缺少帳密時照樣送出，讓上游回 401
        let login = self.config.dataforseo_login.as_deref().unwrap_or_default();
        let password = self.config.dataforseo_password.as_deref().unwrap_or_default();

        let response = self
            .client
            .post(&self.config.dataforseo_endpoint)
            .basic_auth(login, Some(password))
            .json(&payload)
            .send()
            .await
            .map_err(|e| Self::lookup_error(domain, format!("request error: {}", e)))?;

        let status = response.status();
        tracing::info!("DataForSEO status for {}: {}", domain, status);

        let body = response
            .text()
            .await
            .map_err(|e| Self::lookup_error(domain, format!("failed to read body: {}", e)))?;
        tracing::debug!("DataForSEO response for {}: {}", domain, body);

        if !status.is_success() {
            return Err(Self::lookup_error(
                domain,
                format!("HTTP {}, response: {}", status, truncate_body(&body)),
            ));
        }

        parse_ranked_keywords(&body, self.config.keyword_limit).map_err(|reason| {
            Self::lookup_error(
                domain,
                format!("{}, response: {}", reason, truncate_body(&body)),
            )
        })
    }
}

#[async_trait]
impl KeywordSource for DataForSeoClient {
    async fn fetch_keywords(&self, domain: &Domain) -> KeywordLookup {
        match self.lookup(domain).await {
            Ok(keywords) => {
                tracing::debug!("Fetched {} keywords for {}", keywords.len(), domain);
                KeywordLookup::Found(keywords)
            }
            Err(e) => {
                tracing::error!("DataForSEO error: {}", e);
                KeywordLookup::Degraded {
                    reason: e.to_string(),
                }
            }
        }
    }
}

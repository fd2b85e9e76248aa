#[cfg(feature = "cli")]
pub mod cli;
pub mod file;

use crate::domain::model::MAX_KEYWORDS;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_socket_address,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_DATAFORSEO_ENDPOINT: &str =
    "https://api.dataforseo.com/v3/dataforseo_labs/google/ranked_keywords/live";
/// 關鍵字服務回應常常很慢，逾時不得低於此值
pub const MIN_DATAFORSEO_TIMEOUT_SECONDS: u64 = 20;

/// 啟動時建立一次、之後唯讀共享的靜態設定
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub bind_address: String,

    pub openai_api_key: Option<String>,
    pub openai_endpoint: String,
    pub model: String,
    pub temperature: f64,
    pub competitor_count: usize,
    pub openai_timeout_seconds: u64,

    pub dataforseo_login: Option<String>,
    pub dataforseo_password: Option<String>,
    pub dataforseo_endpoint: String,
    pub language_name: String,
    pub location_name: String,
    pub keyword_limit: usize,
    pub dataforseo_timeout_seconds: u64,

    pub concurrent_requests: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            openai_api_key: None,
            openai_endpoint: DEFAULT_OPENAI_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.3,
            competitor_count: 2,
            openai_timeout_seconds: 60,
            dataforseo_login: None,
            dataforseo_password: None,
            dataforseo_endpoint: DEFAULT_DATAFORSEO_ENDPOINT.to_string(),
            language_name: "English".to_string(),
            location_name: "United States".to_string(),
            keyword_limit: MAX_KEYWORDS,
            dataforseo_timeout_seconds: MIN_DATAFORSEO_TIMEOUT_SECONDS,
            concurrent_requests: 5,
        }
    }
}

// 手動實作，避免把金鑰印進日誌
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn mask(secret: &Option<String>) -> &'static str {
            if secret.is_some() {
                "<set>"
            } else {
                "<missing>"
            }
        }

        f.debug_struct("AppConfig")
            .field("bind_address", &self.bind_address)
            .field("openai_api_key", &mask(&self.openai_api_key))
            .field("openai_endpoint", &self.openai_endpoint)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("competitor_count", &self.competitor_count)
            .field("openai_timeout_seconds", &self.openai_timeout_seconds)
            .field("dataforseo_login", &mask(&self.dataforseo_login))
            .field("dataforseo_password", &mask(&self.dataforseo_password))
            .field("dataforseo_endpoint", &self.dataforseo_endpoint)
            .field("language_name", &self.language_name)
            .field("location_name", &self.location_name)
            .field("keyword_limit", &self.keyword_limit)
            .field("dataforseo_timeout_seconds", &self.dataforseo_timeout_seconds)
            .field("concurrent_requests", &self.concurrent_requests)
            .finish()
    }
}

impl AppConfig {
    /// 缺少金鑰不會讓服務啟動失敗，只會在對應的上游呼叫回傳驗證錯誤
    pub fn warn_missing_credentials(&self) {
        if self.openai_api_key.is_none() {
            tracing::warn!("⚠️ OPENAI_API_KEY is not set, competitor extraction will be rejected upstream");
        }
        if self.dataforseo_login.is_none() || self.dataforseo_password.is_none() {
            tracing::warn!(
                "⚠️ DATAFORSEO_LOGIN / DATAFORSEO_PASSWORD not set, keyword lookups will return empty lists"
            );
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_socket_address("bind_address", &self.bind_address)?;

        validate_url("openai_endpoint", &self.openai_endpoint)?;
        validate_non_empty_string("model", &self.model)?;
        validate_range("temperature", self.temperature, 0.0, 2.0)?;
        validate_range("competitor_count", self.competitor_count, 1, 10)?;
        validate_positive_number("openai_timeout_seconds", self.openai_timeout_seconds as usize, 1)?;

        validate_url("dataforseo_endpoint", &self.dataforseo_endpoint)?;
        validate_non_empty_string("language_name", &self.language_name)?;
        validate_non_empty_string("location_name", &self.location_name)?;
        validate_range("keyword_limit", self.keyword_limit, 1, MAX_KEYWORDS)?;
        validate_range(
            "dataforseo_timeout_seconds",
            self.dataforseo_timeout_seconds,
            MIN_DATAFORSEO_TIMEOUT_SECONDS,
            600,
        )?;

        validate_range("concurrent_requests", self.concurrent_requests, 1, 100)?;

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.competitor_count, 2);
        assert_eq!(config.keyword_limit, 10);
    }

    #[test]
    fn test_missing_credentials_do_not_fail_validation() {
        let config = AppConfig {
            openai_api_key: None,
            dataforseo_login: None,
            dataforseo_password: None,
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_keyword_limit_cannot_exceed_ten() {
        let config = AppConfig {
            keyword_limit: 50,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_short_keyword_timeout_is_rejected() {
        let config = AppConfig {
            dataforseo_timeout_seconds: 5,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_output_masks_secrets() {
        let config = AppConfig {
            openai_api_key: Some("sk-very-secret".to_string()),
            dataforseo_password: Some("hunter2".to_string()),
            ..AppConfig::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-very-secret"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<set>"));
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    /// 語言模型呼叫本身失敗（連線錯誤、逾時、非 2xx 回應）
    #[error("Language model request failed: {message}")]
    UpstreamModel { message: String },

    /// 語言模型有回應，但內容無法解析成競品清單
    #[error("Invalid model output: {message}")]
    InvalidModelOutput { message: String },

    /// 單一網域的關鍵字查詢失敗，只在 fetcher 內部使用，不會往外傳
    #[error("Keyword lookup for {domain} failed: {message}")]
    KeywordLookup { domain: String, message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config file parse error: {0}")]
    ConfigParseError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScoutError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ScoutError::KeywordLookup { .. } => ErrorSeverity::Low,
            ScoutError::UpstreamModel { .. } | ScoutError::InvalidRequest { .. } => {
                ErrorSeverity::Medium
            }
            ScoutError::InvalidModelOutput { .. } => ErrorSeverity::High,
            ScoutError::ConfigError { .. }
            | ScoutError::InvalidConfigValueError { .. }
            | ScoutError::IoError(_)
            | ScoutError::ConfigParseError(_) => ErrorSeverity::Critical,
        }
    }

    /// 是否屬於擷取階段的上游失敗（對外回 502）
    pub fn is_gateway_failure(&self) -> bool {
        matches!(
            self,
            ScoutError::UpstreamModel { .. } | ScoutError::InvalidModelOutput { .. }
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ScoutError::UpstreamModel { .. } => {
                "無法連線到語言模型服務，請檢查 OPENAI_API_KEY 與網路狀態".to_string()
            }
            ScoutError::InvalidModelOutput { .. } => {
                "語言模型回傳的內容無法解析成競品清單，請稍後再試".to_string()
            }
            ScoutError::KeywordLookup { domain, .. } => {
                format!("無法取得 {} 的關鍵字資料", domain)
            }
            ScoutError::InvalidRequest { message } => format!("請求無效: {}", message),
            ScoutError::ConfigError { message } => format!("設定錯誤: {}", message),
            ScoutError::InvalidConfigValueError { field, reason, .. } => {
                format!("設定項目 '{}' 無效: {}", field, reason)
            }
            ScoutError::IoError(e) => format!("檔案讀寫失敗: {}", e),
            ScoutError::ConfigParseError(e) => format!("設定檔格式錯誤: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoutError>;

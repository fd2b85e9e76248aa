use crate::config::AppConfig;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 選用的 TOML 設定檔，所有欄位都可省略
///
/// ```toml
/// [server]
/// bind_address = "127.0.0.1:8000"
/// concurrent_requests = 4
///
/// [openai]
/// model = "gpt-4o-mini"
/// competitor_count = 2
///
/// [dataforseo]
/// keyword_limit = 10
/// timeout_seconds = 30
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub server: ServerSection,
    pub openai: OpenAiSection,
    pub dataforseo: DataForSeoSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub bind_address: Option<String>,
    pub concurrent_requests: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpenAiSection {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub competitor_count: Option<usize>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataForSeoSection {
    pub login: Option<String>,
    pub password: Option<String>,
    pub endpoint: Option<String>,
    pub language_name: Option<String>,
    pub location_name: Option<String>,
    pub keyword_limit: Option<usize>,
    pub timeout_seconds: Option<u64>,
}

impl FileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 把設定檔有填的欄位覆蓋到 `config`
    pub fn apply_to(&self, config: &mut AppConfig) {
        let server = &self.server;
        if let Some(v) = &server.bind_address {
            config.bind_address = v.clone();
        }
        if let Some(v) = server.concurrent_requests {
            config.concurrent_requests = v;
        }

        let openai = &self.openai;
        if let Some(v) = &openai.api_key {
            config.openai_api_key = Some(v.clone());
        }
        if let Some(v) = &openai.endpoint {
            config.openai_endpoint = v.clone();
        }
        if let Some(v) = &openai.model {
            config.model = v.clone();
        }
        if let Some(v) = openai.temperature {
            config.temperature = v;
        }
        if let Some(v) = openai.competitor_count {
            config.competitor_count = v;
        }
        if let Some(v) = openai.timeout_seconds {
            config.openai_timeout_seconds = v;
        }

        let dfs = &self.dataforseo;
        if let Some(v) = &dfs.login {
            config.dataforseo_login = Some(v.clone());
        }
        if let Some(v) = &dfs.password {
            config.dataforseo_password = Some(v.clone());
        }
        if let Some(v) = &dfs.endpoint {
            config.dataforseo_endpoint = v.clone();
        }
        if let Some(v) = &dfs.language_name {
            config.language_name = v.clone();
        }
        if let Some(v) = &dfs.location_name {
            config.location_name = v.clone();
        }
        if let Some(v) = dfs.keyword_limit {
            config.keyword_limit = v;
        }
        if let Some(v) = dfs.timeout_seconds {
            config.dataforseo_timeout_seconds = v;
        }
    }
}

use crate::config::file::FileConfig;
use crate::config::AppConfig;
use crate::utils::error::Result;
use clap::Args;
use std::path::PathBuf;

/// 兩個執行檔共用的設定參數；優先順序為 命令列 > 環境變數 > 設定檔 > 預設值
#[derive(Debug, Clone, Default, Args)]
pub struct CliConfig {
    #[arg(long, env = "SCOUT_CONFIG", help = "Optional TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "SCOUT_BIND_ADDRESS", help = "Address the HTTP server listens on")]
    pub bind_address: Option<String>,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, env = "OPENAI_ENDPOINT")]
    pub openai_endpoint: Option<String>,

    #[arg(long, env = "OPENAI_MODEL")]
    pub model: Option<String>,

    #[arg(long, help = "Number of competitor URLs requested from the model")]
    pub competitor_count: Option<usize>,

    #[arg(long, env = "DATAFORSEO_LOGIN", hide_env_values = true)]
    pub dataforseo_login: Option<String>,

    #[arg(long, env = "DATAFORSEO_PASSWORD", hide_env_values = true)]
    pub dataforseo_password: Option<String>,

    #[arg(long, env = "DATAFORSEO_ENDPOINT")]
    pub dataforseo_endpoint: Option<String>,

    #[arg(long, help = "Keyword lookup timeout in seconds (minimum 20)")]
    pub dataforseo_timeout_seconds: Option<u64>,

    #[arg(long, env = "SCOUT_CONCURRENT_REQUESTS", help = "Parallel keyword lookups per request")]
    pub concurrent_requests: Option<usize>,

    #[arg(long, short, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl CliConfig {
    /// 預設值 → 設定檔 → 命令列 / 環境變數，依序疊加成最終設定
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = AppConfig::default();

        if let Some(path) = &self.config {
            tracing::debug!("Loading configuration file: {}", path.display());
            FileConfig::from_file(path)?.apply_to(&mut config);
        }

        self.apply_to(&mut config);
        Ok(config)
    }

    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(v) = &self.bind_address {
            config.bind_address = v.clone();
        }
        if let Some(v) = &self.openai_api_key {
            config.openai_api_key = Some(v.clone());
        }
        if let Some(v) = &self.openai_endpoint {
            config.openai_endpoint = v.clone();
        }
        if let Some(v) = &self.model {
            config.model = v.clone();
        }
        if let Some(v) = self.competitor_count {
            config.competitor_count = v;
        }
        if let Some(v) = &self.dataforseo_login {
            config.dataforseo_login = Some(v.clone());
        }
        if let Some(v) = &self.dataforseo_password {
            config.dataforseo_password = Some(v.clone());
        }
        if let Some(v) = &self.dataforseo_endpoint {
            config.dataforseo_endpoint = v.clone();
        }
        if let Some(v) = self.dataforseo_timeout_seconds {
            config.dataforseo_timeout_seconds = v;
        }
        if let Some(v) = self.concurrent_requests {
            config.concurrent_requests = v;
        }
    }
}

// Adapters layer: concrete implementations of the domain ports and the inbound HTTP surface.

pub mod dataforseo;
pub mod http;
pub mod openai;

use crate::config::AppConfig;
use crate::core::pipeline::CompetitorScan;
use crate::utils::error::Result;
use std::sync::Arc;

pub type LiveScan = CompetitorScan<openai::OpenAiExtractor, dataforseo::DataForSeoClient>;

/// 依設定組出接上真實上游服務的掃描流程
pub fn build_scan(config: Arc<AppConfig>) -> Result<LiveScan> {
    let extractor = openai::OpenAiExtractor::new(Arc::clone(&config))?;
    let keywords = dataforseo::DataForSeoClient::new(Arc::clone(&config))?;
    Ok(CompetitorScan::new(extractor, keywords).with_concurrency(config.concurrent_requests))
}

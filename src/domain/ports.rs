use crate::domain::model::{Domain, ExtractedCandidates, KeywordLookup};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 從應用描述推測競品（語言模型）
#[async_trait]
pub trait CompetitorSource: Send + Sync {
    async fn extract_competitors(&self, description: &str) -> Result<ExtractedCandidates>;
}

/// 取得單一網域的排名關鍵字；失敗時回傳 `KeywordLookup::Degraded`，不會回傳錯誤
#[async_trait]
pub trait KeywordSource: Send + Sync {
    async fn fetch_keywords(&self, domain: &Domain) -> KeywordLookup;
}

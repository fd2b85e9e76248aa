use crate::core::normalizer::normalize;
use crate::domain::model::{
    CompetitorCandidate, CompetitorResult, ExtractedCandidates, KeywordLookup, ResponseEnvelope,
};
use crate::domain::ports::{CompetitorSource, KeywordSource};
use crate::utils::error::{Result, ScoutError};
use futures::stream::{self, StreamExt};

pub const DEFAULT_CONCURRENT_REQUESTS: usize = 5;

/// 競品掃描流程：擷取（可能致命）→ 逐一補上關鍵字（只會降級）→ 組裝回應
pub struct CompetitorScan<E: CompetitorSource, K: KeywordSource> {
    extractor: E,
    keywords: K,
    concurrent_requests: usize,
}

impl<E: CompetitorSource, K: KeywordSource> CompetitorScan<E, K> {
    pub fn new(extractor: E, keywords: K) -> Self {
        Self {
            extractor,
            keywords,
            concurrent_requests: DEFAULT_CONCURRENT_REQUESTS,
        }
    }

    pub fn with_concurrency(mut self, concurrent_requests: usize) -> Self {
        self.concurrent_requests = concurrent_requests.max(1);
        self
    }

    pub async fn run(&self, description: &str) -> Result<ResponseEnvelope> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ScoutError::InvalidRequest {
                message: "appDescription must not be empty".to_string(),
            });
        }

        tracing::info!(
            "🔎 Starting competitor scan ({} chars of description)",
            description.len()
        );

        // 階段一：擷取，任何錯誤都直接中止
        let extracted = match self.extractor.extract_competitors(description).await {
            Ok(extracted) => extracted,
            Err(e) => {
                tracing::error!("❌ Competitor extraction failed: {}", e);
                return Err(e);
            }
        };

        if let ExtractedCandidates::Fallback { key, .. } = &extracted {
            tracing::warn!(
                "Model did not use the 'competitors' key, using field '{}' instead",
                key
            );
        }

        let candidates = extracted.into_candidates();
        tracing::info!("📋 Extracted {} competitor candidates", candidates.len());

        // 階段二：future 在被 poll 之前不會送出請求；buffered 依輸入順序產出結果
        let lookups: Vec<_> = candidates
            .into_iter()
            .map(|candidate| self.enrich(candidate))
            .collect();
        let competitors: Vec<CompetitorResult> = stream::iter(lookups)
            .buffered(self.concurrent_requests)
            .collect()
            .await;

        let degraded = competitors.iter().filter(|c| c.keywords.is_empty()).count();
        tracing::info!(
            "✅ Competitor scan finished: {} competitors, {} without keywords",
            competitors.len(),
            degraded
        );

        Ok(ResponseEnvelope { competitors })
    }

    async fn enrich(&self, candidate: CompetitorCandidate) -> CompetitorResult {
        let domain = normalize(&candidate);
        tracing::debug!("Normalized candidate '{}' to '{}'", candidate, domain);

        let lookup = self.keywords.fetch_keywords(&domain).await;
        if let KeywordLookup::Degraded { reason } = &lookup {
            tracing::warn!("⚠️ No keywords for {}: {}", domain, reason);
        }

        CompetitorResult {
            domain,
            keywords: lookup.into_keywords(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Domain, KeywordList};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    struct MockExtractor {
        result: std::result::Result<ExtractedCandidates, String>,
        calls: Arc<AtomicUsize>,
    }

    impl MockExtractor {
        fn returning(urls: &[&str]) -> Self {
            Self {
                result: Ok(ExtractedCandidates::Named(
                    urls.iter().map(|u| u.to_string()).collect(),
                )),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                result: Err(message.to_string()),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl CompetitorSource for MockExtractor {
        async fn extract_competitors(&self, _description: &str) -> Result<ExtractedCandidates> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
                .clone()
                .map_err(|message| ScoutError::UpstreamModel { message })
        }
    }

    /// 依網域回傳預設結果，可設定延遲以模擬不同完成順序
    #[derive(Default)]
    struct MockKeywords {
        responses: HashMap<String, (Duration, KeywordLookup)>,
        calls: Arc<AtomicUsize>,
        in_flight: Arc<AtomicUsize>,
        max_in_flight: Arc<AtomicUsize>,
    }

    impl MockKeywords {
        fn with(mut self, domain: &str, delay_ms: u64, keywords: &[&str]) -> Self {
            let list = KeywordList::new(keywords.iter().map(|k| k.to_string()).collect());
            self.responses.insert(
                domain.to_string(),
                (Duration::from_millis(delay_ms), KeywordLookup::Found(list)),
            );
            self
        }

        fn degraded(mut self, domain: &str, reason: &str) -> Self {
            self.responses.insert(
                domain.to_string(),
                (
                    Duration::ZERO,
                    KeywordLookup::Degraded {
                        reason: reason.to_string(),
                    },
                ),
            );
            self
        }
    }

    #[async_trait]
    impl KeywordSource for MockKeywords {
        async fn fetch_keywords(&self, domain: &Domain) -> KeywordLookup {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);

            let (delay, lookup) = self
                .responses
                .get(domain.as_str())
                .cloned()
                .unwrap_or((Duration::ZERO, KeywordLookup::Found(KeywordList::empty())));
            tokio::time::sleep(delay).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            lookup
        }
    }

    fn keywords_of(envelope: &ResponseEnvelope, index: usize) -> Vec<String> {
        envelope.competitors[index].keywords.clone().into_inner()
    }

    #[tokio::test]
    async fn test_scan_returns_entries_in_extraction_order() {
        let extractor = MockExtractor::returning(&["https://www.rover.com/", "wag.com"]);
        let keywords = MockKeywords::default()
            .with("rover.com", 0, &["walk", "sit"])
            .degraded("wag.com", "HTTP 500");

        let scan = CompetitorScan::new(extractor, keywords);
        let envelope = scan.run("pet ride sharing").await.unwrap();

        assert_eq!(envelope.competitors.len(), 2);
        assert_eq!(envelope.competitors[0].domain.as_str(), "rover.com");
        assert_eq!(keywords_of(&envelope, 0), vec!["walk", "sit"]);
        assert_eq!(envelope.competitors[1].domain.as_str(), "wag.com");
        assert!(envelope.competitors[1].keywords.is_empty());
    }

    #[tokio::test]
    async fn test_extraction_failure_aborts_before_any_keyword_fetch() {
        let extractor = MockExtractor::failing("connection reset");
        let keywords = MockKeywords::default();
        let fetches = keywords.calls.clone();

        let scan = CompetitorScan::new(extractor, keywords);
        let err = scan.run("pet ride sharing").await.unwrap_err();

        assert!(err.is_gateway_failure());
        assert!(err.to_string().contains("connection reset"));
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_output_order_ignores_completion_order() {
        // 第一個最慢完成，最後一個最快
        let extractor = MockExtractor::returning(&["a.com", "b.com", "c.com", "d.com"]);
        let keywords = MockKeywords::default()
            .with("a.com", 120, &["alpha"])
            .with("b.com", 80, &["bravo"])
            .with("c.com", 40, &["charlie"])
            .with("d.com", 0, &["delta"]);

        let scan = CompetitorScan::new(extractor, keywords).with_concurrency(4);
        let envelope = scan.run("anything").await.unwrap();

        let domains: Vec<&str> = envelope
            .competitors
            .iter()
            .map(|c| c.domain.as_str())
            .collect();
        assert_eq!(domains, vec!["a.com", "b.com", "c.com", "d.com"]);
        assert_eq!(keywords_of(&envelope, 0), vec!["alpha"]);
        assert_eq!(keywords_of(&envelope, 3), vec!["delta"]);
    }

    #[tokio::test]
    async fn test_fan_out_respects_concurrency_limit() {
        let urls: Vec<String> = (0..6).map(|i| format!("site{}.com", i)).collect();
        let url_refs: Vec<&str> = urls.iter().map(String::as_str).collect();
        let extractor = MockExtractor::returning(&url_refs);

        let mut keywords = MockKeywords::default();
        for url in &urls {
            keywords = keywords.with(url, 20, &["kw"]);
        }
        let max_in_flight = keywords.max_in_flight.clone();
        let calls = keywords.calls.clone();

        let scan = CompetitorScan::new(extractor, keywords).with_concurrency(2);
        let envelope = scan.run("anything").await.unwrap();

        assert_eq!(envelope.competitors.len(), 6);
        assert_eq!(calls.load(Ordering::SeqCst), 6);
        assert!(max_in_flight.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_blank_description_is_rejected_without_calling_model() {
        let extractor = MockExtractor::returning(&["a.com"]);
        let model_calls = extractor.calls.clone();
        let scan = CompetitorScan::new(extractor, MockKeywords::default());

        let err = scan.run("   ").await.unwrap_err();

        assert!(matches!(err, ScoutError::InvalidRequest { .. }));
        assert_eq!(model_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fallback_shape_is_enriched_like_named_shape() {
        let extractor = MockExtractor {
            result: Ok(ExtractedCandidates::Fallback {
                key: "rivals".to_string(),
                candidates: vec!["https://a.com".to_string()],
            }),
            calls: Arc::new(AtomicUsize::new(0)),
        };
        let keywords = MockKeywords::default().with("a.com", 0, &["seo"]);

        let scan = CompetitorScan::new(extractor, keywords);
        let envelope = scan.run("anything").await.unwrap();

        assert_eq!(envelope.competitors.len(), 1);
        assert_eq!(keywords_of(&envelope, 0), vec!["seo"]);
    }

    #[tokio::test]
    async fn test_empty_candidate_list_gives_empty_envelope() {
        let scan = CompetitorScan::new(MockExtractor::returning(&[]), MockKeywords::default());
        let envelope = scan.run("anything").await.unwrap();
        assert!(envelope.competitors.is_empty());
    }
}

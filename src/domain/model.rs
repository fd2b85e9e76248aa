use serde::{Deserialize, Serialize};
use std::fmt;

/// 每個網域最多回傳的關鍵字數
pub const MAX_KEYWORDS: usize = 10;

/// 語言模型回傳的原始競品字串（URL 或網域），未經驗證
pub type CompetitorCandidate = String;

/// 正規化後的主機名稱：沒有 scheme、沒有 `www.` 前綴、沒有 path/query/fragment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Domain(String);

impl Domain {
    /// 只給 normalizer 使用；其他地方請走 `core::normalizer::normalize`
    pub(crate) fn from_normalized(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Domain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 有序、最多 `MAX_KEYWORDS` 筆的關鍵字清單，查詢失敗時為空（不會是 null）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordList(Vec<String>);

impl KeywordList {
    pub fn new(keywords: Vec<String>) -> Self {
        keywords.into_iter().collect()
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl FromIterator<String> for KeywordList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().take(MAX_KEYWORDS).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorResult {
    pub domain: Domain,
    pub keywords: KeywordList,
}

/// `GET /competitors` 的回應本體，順序與擷取順序一致
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub competitors: Vec<CompetitorResult>,
}

/// 從模型輸出取出的競品清單，標明是從哪種形狀取得的
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedCandidates {
    /// 模型照指示使用了 `competitors` 欄位
    Named(Vec<CompetitorCandidate>),
    /// 沒有 `competitors` 欄位，改用物件的第一個欄位
    Fallback {
        key: String,
        candidates: Vec<CompetitorCandidate>,
    },
}

impl ExtractedCandidates {
    pub fn into_candidates(self) -> Vec<CompetitorCandidate> {
        match self {
            ExtractedCandidates::Named(candidates) => candidates,
            ExtractedCandidates::Fallback { candidates, .. } => candidates,
        }
    }
}

/// 單一網域關鍵字查詢的結果；`Degraded` 保留失敗原因供診斷
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordLookup {
    Found(KeywordList),
    Degraded { reason: String },
}

impl KeywordLookup {
    pub fn is_degraded(&self) -> bool {
        matches!(self, KeywordLookup::Degraded { .. })
    }

    /// 降級結果一律轉成空清單
    pub fn into_keywords(self) -> KeywordList {
        match self {
            KeywordLookup::Found(keywords) => keywords,
            KeywordLookup::Degraded { .. } => KeywordList::empty(),
        }
    }
}

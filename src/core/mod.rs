pub mod normalizer;
pub mod pipeline;

pub use crate::domain::model::{CompetitorResult, Domain, KeywordList, ResponseEnvelope};
pub use crate::domain::ports::{CompetitorSource, KeywordSource};
pub use crate::utils::error::Result;

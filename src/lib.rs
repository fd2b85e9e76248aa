pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::AppConfig;

pub use adapters::{build_scan, http::router, LiveScan};
pub use crate::core::{normalizer::normalize, pipeline::CompetitorScan};
pub use domain::model::{CompetitorResult, Domain, KeywordList, ResponseEnvelope};
pub use utils::error::{Result, ScoutError};

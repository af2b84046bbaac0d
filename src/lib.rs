pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::MatchConfig;

pub use crate::core::orchestrator::{
    CategoryFallback, CreatorMatch, MatchFailure, MatchOrchestrator, MatchOutcome, MatchSession,
    MatchSettings, TracingStageObserver,
};
pub use crate::core::roster::{Roster, RosterLoader};
pub use domain::model::{Category, ClassificationResult, Creator, MatchPhase, RawCreatorRow};
pub use utils::error::{MatchError, Result};

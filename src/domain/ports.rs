use crate::domain::model::{ClassificationResult, MatchPhase, RawCreatorRow};
use crate::utils::error::Result;
use async_trait::async_trait;
use url::Url;

/// One transport that can deliver the creator roster table.
#[async_trait]
pub trait RosterSource: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch_rows(&self) -> Result<Vec<RawCreatorRow>>;
}

#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, website: &Url) -> Result<ClassificationResult>;
}

/// Receives stage changes of a running match. Never gates the match itself.
pub trait StageObserver: Send + Sync {
    fn on_phase(&self, phase: MatchPhase);
}

use crate::core::roster::{Roster, RosterLoader};
use crate::core::selector::{pick_creator, selection_seed};
use crate::domain::model::{Category, ClassificationResult, Creator, MatchPhase};
use crate::domain::ports::{Classifier, StageObserver};
use crate::utils::error::{ErrorKind, MatchError, Result};
use crate::utils::validation::parse_website;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub struct MatchSettings {
    /// Minimum time before any outcome is revealed.
    pub min_display: Duration,
    pub finding_stage_at: Duration,
    pub finalizing_stage_at: Duration,
    /// Classifications below this confidence come with a category fallback.
    pub low_confidence_threshold: f64,
    /// Confidence reported for a category the user picked by hand.
    pub refine_confidence: f64,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            min_display: Duration::from_millis(4000),
            finding_stage_at: Duration::from_millis(1600),
            finalizing_stage_at: Duration::from_millis(3000),
            low_confidence_threshold: 0.55,
            refine_confidence: 0.85,
        }
    }
}

/// Category choices offered to the user, with the one to preselect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryFallback {
    pub options: Vec<Category>,
    pub preselected: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatorMatch {
    pub url: String,
    pub category: Category,
    pub confidence: f64,
    pub creator: Creator,
    /// Present when the classification was not confident enough.
    pub fallback: Option<CategoryFallback>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchFailure {
    pub kind: ErrorKind,
    pub message: String,
    pub fallback: Option<CategoryFallback>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchOutcome {
    Matched(CreatorMatch),
    /// The category is valid but nobody in the roster covers it.
    NoCreatorForCategory {
        url: String,
        category: Category,
        confidence: f64,
        fallback: CategoryFallback,
    },
    Failed(MatchFailure),
}

impl MatchOutcome {
    pub fn fallback(&self) -> Option<&CategoryFallback> {
        match self {
            MatchOutcome::Matched(m) => m.fallback.as_ref(),
            MatchOutcome::NoCreatorForCategory { fallback, .. } => Some(fallback),
            MatchOutcome::Failed(f) => f.fallback.as_ref(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, MatchOutcome::Failed(_))
    }
}

/// Everything one match attempt produced. The roster stays here so that
/// [`MatchSession::refine`] can re-select without any network I/O.
#[derive(Debug, Clone)]
pub struct MatchSession {
    website: Option<Url>,
    roster: Option<Roster>,
    outcome: MatchOutcome,
    refine_confidence: f64,
}

impl MatchSession {
    pub fn outcome(&self) -> &MatchOutcome {
        &self.outcome
    }

    pub fn website(&self) -> Option<&Url> {
        self.website.as_ref()
    }

    pub fn roster(&self) -> Option<&Roster> {
        self.roster.as_ref()
    }

    /// Re-runs the selection for a category the user picked, against the
    /// roster loaded by the original attempt.
    pub fn refine(&self, category_label: &str) -> Result<MatchOutcome> {
        let category =
            Category::from_label(category_label).ok_or_else(|| MatchError::UnknownCategory {
                label: category_label.to_string(),
            })?;
        let website = self.website.as_ref().ok_or_else(|| MatchError::InvalidUrl {
            input: String::new(),
            reason: "no website for this session".to_string(),
        })?;
        let roster = self
            .roster
            .as_ref()
            .ok_or_else(|| MatchError::RosterUnavailable {
                message: "Creator roster has not been loaded".to_string(),
            })?;

        let seed = selection_seed(website);
        tracing::debug!("Refining match for category {} with seed '{}'", category, seed);

        Ok(match pick_creator(roster, category, &seed) {
            Some(creator) => MatchOutcome::Matched(CreatorMatch {
                url: website.to_string(),
                category,
                confidence: self.refine_confidence,
                creator: creator.clone(),
                fallback: None,
            }),
            None => MatchOutcome::NoCreatorForCategory {
                url: website.to_string(),
                category,
                confidence: self.refine_confidence,
                fallback: CategoryFallback {
                    options: roster.fallback_categories(),
                    preselected: category,
                },
            },
        })
    }
}

pub struct MatchOrchestrator<C: Classifier> {
    loader: RosterLoader,
    classifier: C,
    settings: MatchSettings,
    observer: Option<Arc<dyn StageObserver>>,
}

impl<C: Classifier> MatchOrchestrator<C> {
    pub fn new(loader: RosterLoader, classifier: C, settings: MatchSettings) -> Self {
        Self {
            loader,
            classifier,
            settings,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn StageObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub async fn run(&self, website_input: &str) -> MatchSession {
        let website = match parse_website(website_input) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Rejected website input: {}", e);
                self.notify(MatchPhase::Failed);
                return self.session(None, None, failure(&e, None));
            }
        };

        tracing::info!("Matching creators for {}", website);
        let started = Instant::now();

        // Completion instants decide which failure surfaced first.
        let roster_branch = async { (self.loader.load().await, Instant::now()) };
        let classify_branch = async { (self.classifier.classify(&website).await, Instant::now()) };
        let ready = async {
            tokio::join!(
                tokio::time::sleep(self.settings.min_display),
                roster_branch,
                classify_branch
            )
        };

        let (_, (roster_result, roster_done), (classified, classified_done)) =
            self.with_stages(ready).await;

        tracing::debug!("Match inputs settled after {:?}", started.elapsed());

        let (roster, roster_error) = split_result(roster_result, roster_done);
        let (classification, classify_error) = split_result(classified, classified_done);

        let outcome = match (roster.as_ref(), classification) {
            (Some(roster), Some(classification)) => {
                self.select(&website, roster, classification)
            }
            _ => {
                let error = first_failure(roster_error, classify_error);
                match error {
                    Some(e) => {
                        tracing::error!("Match failed: {}", e);
                        failure(&e, Some(failure_fallback(roster.as_ref())))
                    }
                    None => failure(
                        &MatchError::classification("Match inputs were incomplete"),
                        Some(failure_fallback(roster.as_ref())),
                    ),
                }
            }
        };

        self.notify(if outcome.is_failure() {
            MatchPhase::Failed
        } else {
            MatchPhase::Done
        });

        self.session(Some(website), roster, outcome)
    }

    fn select(
        &self,
        website: &Url,
        roster: &Roster,
        classification: ClassificationResult,
    ) -> MatchOutcome {
        let ClassificationResult {
            category,
            confidence,
        } = classification;
        let seed = selection_seed(website);

        match pick_creator(roster, category, &seed) {
            Some(creator) => {
                tracing::info!(
                    "Matched {} ({}, confidence {:.2}) to {}",
                    website,
                    category,
                    confidence,
                    creator.name
                );
                let fallback = (confidence < self.settings.low_confidence_threshold).then(|| {
                    CategoryFallback {
                        options: roster.fallback_categories(),
                        preselected: category,
                    }
                });
                MatchOutcome::Matched(CreatorMatch {
                    url: website.to_string(),
                    category,
                    confidence,
                    creator: creator.clone(),
                    fallback,
                })
            }
            None => {
                tracing::info!("No creators in roster for category {}", category);
                MatchOutcome::NoCreatorForCategory {
                    url: website.to_string(),
                    category,
                    confidence,
                    fallback: CategoryFallback {
                        options: roster.fallback_categories(),
                        preselected: roster
                            .categories_with_creators()
                            .first()
                            .copied()
                            .unwrap_or(Category::Lifestyle),
                    },
                }
            }
        }
    }

    /// Drives `work` to completion while the stage schedule runs next to it.
    /// The schedule never delays `work`'s result.
    async fn with_stages<F: Future>(&self, work: F) -> F::Output {
        let stages = self.announce_stages();
        tokio::pin!(work);
        tokio::pin!(stages);
        let mut stages_done = false;

        loop {
            tokio::select! {
                biased;
                output = &mut work => return output,
                _ = &mut stages, if !stages_done => stages_done = true,
            }
        }
    }

    async fn announce_stages(&self) {
        if self.observer.is_none() {
            return;
        }
        let finding_at = self.settings.finding_stage_at;
        let finalizing_at = self.settings.finalizing_stage_at;

        self.notify(MatchPhase::Classifying);
        tokio::time::sleep(finding_at).await;
        self.notify(MatchPhase::Finding);
        tokio::time::sleep(finalizing_at.saturating_sub(finding_at)).await;
        self.notify(MatchPhase::Finalizing);
    }

    fn notify(&self, phase: MatchPhase) {
        if let Some(observer) = &self.observer {
            observer.on_phase(phase);
        }
    }

    fn session(&self, website: Option<Url>, roster: Option<Roster>, outcome: MatchOutcome) -> MatchSession {
        MatchSession {
            website,
            roster,
            outcome,
            refine_confidence: self.settings.refine_confidence,
        }
    }
}

/// Logs every phase change; the default observer of the CLI.
pub struct TracingStageObserver;

impl StageObserver for TracingStageObserver {
    fn on_phase(&self, phase: MatchPhase) {
        tracing::info!("{}", phase.title());
    }
}

fn split_result<T>(result: Result<T>, at: Instant) -> (Option<T>, Option<(MatchError, Instant)>) {
    match result {
        Ok(value) => (Some(value), None),
        Err(e) => (None, Some((e, at))),
    }
}

fn first_failure(
    a: Option<(MatchError, Instant)>,
    b: Option<(MatchError, Instant)>,
) -> Option<MatchError> {
    match (a, b) {
        (Some((ea, ta)), Some((eb, tb))) => Some(if tb < ta { eb } else { ea }),
        (Some((e, _)), None) | (None, Some((e, _))) => Some(e),
        (None, None) => None,
    }
}

fn failure(error: &MatchError, fallback: Option<CategoryFallback>) -> MatchOutcome {
    MatchOutcome::Failed(MatchFailure {
        kind: error.kind(),
        message: error.to_string(),
        fallback,
    })
}

fn failure_fallback(roster: Option<&Roster>) -> CategoryFallback {
    CategoryFallback {
        options: roster
            .map(Roster::fallback_categories)
            .unwrap_or_else(|| Category::ALL.to_vec()),
        preselected: Category::ALL[0],
    }
}

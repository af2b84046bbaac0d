use crate::adapters::{CsvSource, GvizSource, HttpClassifier, SheetLocation};
use crate::core::orchestrator::{MatchOrchestrator, MatchSettings};
use crate::core::roster::RosterLoader;
use crate::domain::ports::RosterSource;
use crate::utils::error::{MatchError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_url, Validate,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub roster: RosterConfig,
    pub classifier: ClassifierConfig,
    pub matching: MatchingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub spreadsheet_id: String,
    pub gid: String,
    pub base_url: String,
    /// Transports tried in order: `gviz`, `csv`.
    pub sources: Vec<String>,
    pub timeout_seconds: u64,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: "1QRQ_P3bi5ClIH_aD5ztTbFgxTH8XnypIWnPjsaqJ87Q".to_string(),
            gid: "0".to_string(),
            base_url: "https://docs.google.com".to_string(),
            sources: vec!["gviz".to_string(), "csv".to_string()],
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
    pub default_confidence: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5173/api/classify".to_string(),
            timeout_seconds: 15,
            default_confidence: crate::adapters::classifier::DEFAULT_CONFIDENCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub min_display_ms: u64,
    pub finding_stage_ms: u64,
    pub finalizing_stage_ms: u64,
    pub low_confidence_threshold: f64,
    pub refine_confidence: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_display_ms: 4000,
            finding_stage_ms: 1600,
            finalizing_stage_ms: 3000,
            low_confidence_threshold: 0.55,
            refine_confidence: 0.85,
        }
    }
}

impl From<&MatchingConfig> for MatchSettings {
    fn from(config: &MatchingConfig) -> Self {
        Self {
            min_display: Duration::from_millis(config.min_display_ms),
            finding_stage_at: Duration::from_millis(config.finding_stage_ms),
            finalizing_stage_at: Duration::from_millis(config.finalizing_stage_ms),
            low_confidence_threshold: config.low_confidence_threshold,
            refine_confidence: config.refine_confidence,
        }
    }
}

impl MatchConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;

        toml::from_str(&processed).map_err(|e| MatchError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| MatchError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn sheet(&self) -> SheetLocation {
        SheetLocation {
            base_url: self.roster.base_url.clone(),
            spreadsheet_id: self.roster.spreadsheet_id.clone(),
            gid: self.roster.gid.clone(),
        }
    }

    pub fn settings(&self) -> MatchSettings {
        MatchSettings::from(&self.matching)
    }

    pub fn roster_loader(&self) -> Result<RosterLoader> {
        let client = Client::builder()
            .timeout(Duration::from_secs(self.roster.timeout_seconds))
            .build()?;
        let sheet = self.sheet();

        let sources = self
            .roster
            .sources
            .iter()
            .map(|name| -> Result<Box<dyn RosterSource>> {
                match name.as_str() {
                    "gviz" => Ok(Box::new(GvizSource::new(client.clone(), &sheet))),
                    "csv" => Ok(Box::new(CsvSource::new(client.clone(), &sheet))),
                    other => Err(unknown_source(other)),
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(RosterLoader::new(sources))
    }

    pub fn classifier(&self) -> Result<HttpClassifier> {
        let client = Client::builder()
            .timeout(Duration::from_secs(self.classifier.timeout_seconds))
            .build()?;
        Ok(HttpClassifier::new(client, self.classifier.endpoint.clone())
            .with_default_confidence(self.classifier.default_confidence))
    }

    pub fn orchestrator(&self) -> Result<MatchOrchestrator<HttpClassifier>> {
        Ok(MatchOrchestrator::new(
            self.roster_loader()?,
            self.classifier()?,
            self.settings(),
        ))
    }
}

fn unknown_source(name: &str) -> MatchError {
    MatchError::InvalidConfigValueError {
        field: "roster.sources".to_string(),
        value: name.to_string(),
        reason: "Unsupported roster source. Valid sources: gviz, csv".to_string(),
    }
}

impl Validate for MatchConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("roster.spreadsheet_id", &self.roster.spreadsheet_id)?;
        validate_url("roster.base_url", &self.roster.base_url)?;
        validate_positive_number("roster.timeout_seconds", self.roster.timeout_seconds, 1)?;
        if self.roster.sources.is_empty() {
            return Err(MatchError::InvalidConfigValueError {
                field: "roster.sources".to_string(),
                value: String::new(),
                reason: "At least one roster source is required".to_string(),
            });
        }
        if let Some(bad) = self
            .roster
            .sources
            .iter()
            .find(|s| !matches!(s.as_str(), "gviz" | "csv"))
        {
            return Err(unknown_source(bad));
        }

        validate_url("classifier.endpoint", &self.classifier.endpoint)?;
        validate_positive_number(
            "classifier.timeout_seconds",
            self.classifier.timeout_seconds,
            1,
        )?;
        validate_range(
            "classifier.default_confidence",
            self.classifier.default_confidence,
            0.0,
            1.0,
        )?;

        let m = &self.matching;
        validate_range(
            "matching.finding_stage_ms",
            m.finding_stage_ms,
            0,
            m.finalizing_stage_ms,
        )?;
        validate_range(
            "matching.finalizing_stage_ms",
            m.finalizing_stage_ms,
            m.finding_stage_ms,
            m.min_display_ms,
        )?;
        validate_range(
            "matching.low_confidence_threshold",
            m.low_confidence_threshold,
            0.0,
            1.0,
        )?;
        validate_range("matching.refine_confidence", m.refine_confidence, 0.0, 1.0)?;

        Ok(())
    }
}

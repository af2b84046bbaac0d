use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed taxonomy every creator and classification is mapped onto.
/// Variant order is the taxonomy order used for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Games,
    Social,
    Entertainment,
    Productivity,
    Lifestyle,
    #[serde(rename = "Health & Fitness")]
    HealthAndFitness,
    Education,
    Business,
    Finance,
    Utilities,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Games,
        Category::Social,
        Category::Entertainment,
        Category::Productivity,
        Category::Lifestyle,
        Category::HealthAndFitness,
        Category::Education,
        Category::Business,
        Category::Finance,
        Category::Utilities,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Games => "Games",
            Category::Social => "Social",
            Category::Entertainment => "Entertainment",
            Category::Productivity => "Productivity",
            Category::Lifestyle => "Lifestyle",
            Category::HealthAndFitness => "Health & Fitness",
            Category::Education => "Education",
            Category::Business => "Business",
            Category::Finance => "Finance",
            Category::Utilities => "Utilities",
        }
    }

    /// Exact (case-insensitive) lookup of a taxonomy label. No alias matching.
    pub fn from_label(label: &str) -> Option<Category> {
        let key = label.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One roster row as produced by a transport, before category normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCreatorRow {
    pub name: String,
    pub category: String,
    pub photo_url: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    pub name: String,
    pub category: Category,
    pub photo_url: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Category,
    pub confidence: f64,
}

/// Externally visible stages of one match attempt. Presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    Classifying,
    Finding,
    Finalizing,
    Done,
    Failed,
}

impl MatchPhase {
    pub fn title(self) -> &'static str {
        match self {
            MatchPhase::Classifying => "Categorizing your website…",
            MatchPhase::Finding => "Finding the right creators…",
            MatchPhase::Finalizing => "Finalizing your match…",
            MatchPhase::Done => "Match ready",
            MatchPhase::Failed => "We couldn’t complete the match",
        }
    }
}

use crate::core::category::normalize_to_canonical_category;
use crate::domain::model::{Category, Creator, RawCreatorRow};
use crate::domain::ports::RosterSource;
use crate::utils::error::{MatchError, Result};
use std::collections::BTreeMap;

/// Creators grouped by canonical category, rebuilt wholesale on every load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    by_category: BTreeMap<Category, Vec<Creator>>,
    ignored_count: usize,
}

impl Roster {
    /// Normalizes every row's category label. Rows that do not map onto the
    /// taxonomy are counted as ignored; the rest keep their sheet order.
    pub fn build(rows: Vec<RawCreatorRow>) -> Self {
        let mut by_category: BTreeMap<Category, Vec<Creator>> = BTreeMap::new();
        let mut ignored_count = 0;

        for row in rows {
            let Some(category) = normalize_to_canonical_category(&row.category) else {
                tracing::debug!(
                    "Ignoring creator '{}' with unknown category '{}'",
                    row.name,
                    row.category
                );
                ignored_count += 1;
                continue;
            };

            by_category.entry(category).or_default().push(Creator {
                name: row.name,
                category,
                photo_url: row.photo_url,
                price: row.price,
            });
        }

        Self {
            by_category,
            ignored_count,
        }
    }

    pub fn creators(&self, category: Category) -> &[Creator] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn ignored_count(&self) -> usize {
        self.ignored_count
    }

    pub fn len(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Categories holding at least one creator, in taxonomy order.
    pub fn categories_with_creators(&self) -> Vec<Category> {
        self.by_category
            .iter()
            .filter(|(_, creators)| !creators.is_empty())
            .map(|(category, _)| *category)
            .collect()
    }

    /// Choices offered when the user refines the category by hand.
    pub fn fallback_categories(&self) -> Vec<Category> {
        let with_creators = self.categories_with_creators();
        if with_creators.is_empty() {
            Category::ALL.to_vec()
        } else {
            with_creators
        }
    }
}

/// Tries each roster transport in order and returns the first successful table.
pub struct RosterLoader {
    sources: Vec<Box<dyn RosterSource>>,
}

impl RosterLoader {
    pub fn new(sources: Vec<Box<dyn RosterSource>>) -> Self {
        Self { sources }
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub async fn load_rows(&self) -> Result<Vec<RawCreatorRow>> {
        let mut last_error: Option<MatchError> = None;

        for source in &self.sources {
            tracing::debug!("Loading roster from {}", source.name());
            match source.fetch_rows().await {
                Ok(rows) => {
                    tracing::info!("Loaded {} roster rows from {}", rows.len(), source.name());
                    return Ok(rows);
                }
                Err(e) => {
                    tracing::warn!("Roster source {} failed: {}", source.name(), e);
                    last_error = Some(e);
                }
            }
        }

        Err(MatchError::RosterUnavailable {
            message: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "Failed to load sheet".to_string()),
        })
    }

    /// Loads the raw rows and builds the categorized roster.
    /// A table without any usable row is reported as [`MatchError::RosterEmpty`].
    pub async fn load(&self) -> Result<Roster> {
        let rows = self.load_rows().await?;
        if rows.is_empty() {
            return Err(MatchError::RosterEmpty);
        }

        let roster = Roster::build(rows);
        if roster.ignored_count() > 0 {
            tracing::warn!(
                "{} roster rows had a category outside the taxonomy and were ignored",
                roster.ignored_count()
            );
        }
        Ok(roster)
    }
}

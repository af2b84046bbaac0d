//! Pieces shared by the two roster transports: endpoint layout, header
//! lookup and cell parsing.

use crate::core::category::title_case;
use crate::domain::model::RawCreatorRow;
use crate::utils::error::{MatchError, Result};
use reqwest::Client;

pub const MISSING_COLUMNS: &str =
    "Sheet must have columns: Creator, Category (and optionally Photo, Price)";

/// Where the creator spreadsheet lives.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLocation {
    pub base_url: String,
    pub spreadsheet_id: String,
    pub gid: String,
}

impl SheetLocation {
    pub fn gviz_url(&self) -> String {
        format!(
            "{}/spreadsheets/d/{}/gviz/tq?tqx=out:json&gid={}",
            self.base_url.trim_end_matches('/'),
            self.spreadsheet_id,
            url::form_urlencoded::byte_serialize(self.gid.as_bytes()).collect::<String>()
        )
    }

    pub fn csv_url(&self) -> String {
        format!(
            "{}/spreadsheets/d/{}/export?format=csv&gid={}",
            self.base_url.trim_end_matches('/'),
            self.spreadsheet_id,
            url::form_urlencoded::byte_serialize(self.gid.as_bytes()).collect::<String>()
        )
    }
}

/// GETs `url` and returns the body; any non-2xx status is a transport failure.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    tracing::debug!("Fetching roster table from {}", url);
    let response = client
        .get(url)
        .header(reqwest::header::CACHE_CONTROL, "no-store")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(MatchError::source_failure(format!(
            "Request failed: {}",
            status.as_u16()
        )));
    }

    Ok(response.text().await?)
}

/// Lowercased, trimmed header with inner whitespace collapsed to one space.
pub fn normalize_header(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Positions of the roster columns within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub creator: usize,
    pub category: usize,
    pub photo: Option<usize>,
    pub price: Option<usize>,
}

impl ColumnIndex {
    pub fn locate<S: AsRef<str>>(headers: &[S]) -> Result<Self> {
        let normalized: Vec<String> = headers
            .iter()
            .map(|h| normalize_header(h.as_ref()))
            .collect();
        let find = |name: &str| normalized.iter().position(|h| h == name);

        match (find("creator"), find("category")) {
            (Some(creator), Some(category)) => Ok(Self {
                creator,
                category,
                photo: find("photo"),
                price: find("price"),
            }),
            _ => Err(MatchError::source_failure(MISSING_COLUMNS)),
        }
    }

    /// Builds a row from already-stringified cells; `None` when the row has
    /// no creator name or no category.
    pub fn row_from_cells<F>(&self, cell: F) -> Option<RawCreatorRow>
    where
        F: Fn(usize) -> Option<String>,
    {
        let name = cell(self.creator).unwrap_or_default().trim().to_string();
        let category = cell(self.category).unwrap_or_default().trim().to_string();
        if name.is_empty() || category.is_empty() {
            return None;
        }

        let photo_url = self
            .photo
            .and_then(&cell)
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        let price = self.price.and_then(&cell).and_then(|p| parse_price(&p));

        Some(RawCreatorRow {
            name,
            category: title_case(&category),
            photo_url,
            price,
        })
    }
}

/// A finite, non-negative number; anything else counts as no price.
pub fn parse_price(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n >= 0.0)
}

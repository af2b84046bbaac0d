use crate::adapters::sheet::{fetch_text, ColumnIndex, SheetLocation};
use crate::domain::model::RawCreatorRow;
use crate::domain::ports::RosterSource;
use crate::utils::error::{MatchError, Result};
use async_trait::async_trait;
use reqwest::Client;

/// Roster transport reading the sheet's CSV export.
pub struct CsvSource {
    client: Client,
    url: String,
}

impl CsvSource {
    pub fn new(client: Client, sheet: &SheetLocation) -> Self {
        Self {
            client,
            url: sheet.csv_url(),
        }
    }

}

#[async_trait]
impl RosterSource for CsvSource {
    fn name(&self) -> &str {
        "csv"
    }

    async fn fetch_rows(&self) -> Result<Vec<RawCreatorRow>> {
        let text = fetch_text(&self.client, &self.url).await?;
        creators_from_csv_rows(&parse_csv(&text)?)
    }
}

/// Splits CSV text into rows of fields. Quoted fields may hold commas,
/// newlines and `""` escapes; rows may end in CRLF or LF. A trailing line
/// terminator opens one final empty row, so a header-only export still
/// reads as a loaded table with no creators.
pub fn parse_csv(text: &str) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    if text.ends_with(['\n', '\r']) {
        rows.push(vec![String::new()]);
    }
    Ok(rows)
}

pub fn creators_from_csv_rows(rows: &[Vec<String>]) -> Result<Vec<RawCreatorRow>> {
    let Some((headers, data)) = rows.split_first().filter(|(_, data)| !data.is_empty()) else {
        return Err(MatchError::source_failure("CSV appears empty"));
    };

    let index = ColumnIndex::locate(headers.as_slice())?;
    Ok(data
        .iter()
        .filter_map(|row| index.row_from_cells(|i| row.get(i).cloned()))
        .collect())
}

use crate::adapters::sheet::{fetch_text, ColumnIndex, SheetLocation};
use crate::domain::model::RawCreatorRow;
use crate::domain::ports::RosterSource;
use crate::utils::error::{MatchError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

const GVIZ_MARKER: &str = "google.visualization.Query.setResponse(";

/// Roster transport reading the visualization-query JSON of the sheet.
pub struct GvizSource {
    client: Client,
    url: String,
}

impl GvizSource {
    pub fn new(client: Client, sheet: &SheetLocation) -> Self {
        Self {
            client,
            url: sheet.gviz_url(),
        }
    }
}

#[async_trait]
impl RosterSource for GvizSource {
    fn name(&self) -> &str {
        "gviz"
    }

    async fn fetch_rows(&self) -> Result<Vec<RawCreatorRow>> {
        let text = fetch_text(&self.client, &self.url).await?;
        rows_from_gviz(&parse_gviz_response(&text)?)
    }
}

/// Strips the `setResponse(` … `);` envelope and parses the JSON inside.
pub fn parse_gviz_response(text: &str) -> Result<Value> {
    let unexpected = || MatchError::source_failure("Unexpected gviz response");

    let start = text.find(GVIZ_MARKER).ok_or_else(unexpected)? + GVIZ_MARKER.len();
    let end = text.rfind(");").ok_or_else(unexpected)?;
    if end < start {
        return Err(unexpected());
    }

    serde_json::from_str(&text[start..end])
        .map_err(|e| MatchError::source_failure(format!("Unexpected gviz response: {}", e)))
}

pub fn rows_from_gviz(json: &Value) -> Result<Vec<RawCreatorRow>> {
    let table = &json["table"];
    let (Some(cols), Some(rows)) = (table["cols"].as_array(), table["rows"].as_array()) else {
        return Err(MatchError::source_failure("Invalid gviz table"));
    };

    let labels: Vec<String> = cols
        .iter()
        .map(|col| {
            [&col["label"], &col["id"]]
                .into_iter()
                .find_map(|v| v.as_str().filter(|s| !s.is_empty()))
                .unwrap_or_default()
                .to_string()
        })
        .collect();
    let index = ColumnIndex::locate(labels.as_slice())?;

    let empty = Vec::new();
    Ok(rows
        .iter()
        .filter_map(|row| {
            let cells = row["c"].as_array().unwrap_or(&empty);
            index.row_from_cells(|i| cells.get(i).map(|cell| cell_text(&cell["v"])))
        })
        .collect())
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(json: &str) -> String {
        format!(
            "/*O_o*/\ngoogle.visualization.Query.setResponse({});",
            json
        )
    }

    #[test]
    fn test_parse_gviz_envelope() {
        let value = parse_gviz_response(&wrap(r#"{"status":"ok"}"#)).unwrap();
        assert_eq!(value["status"], "ok");
    }

    #[test]
    fn test_parse_gviz_without_marker() {
        let err = parse_gviz_response("<html>sign in</html>").unwrap_err();
        assert_eq!(err.to_string(), "Unexpected gviz response");
    }

    #[test]
    fn test_parse_gviz_bad_json_is_source_failure() {
        let err = parse_gviz_response(&wrap("{not json")).unwrap_err();
        assert!(matches!(err, MatchError::Source { .. }));
        assert!(err.to_string().starts_with("Unexpected gviz response: "));
    }

    #[test]
    fn test_rows_from_gviz_drops_incomplete_rows() {
        let json = serde_json::json!({
            "table": {
                "cols": [
                    {"id": "A", "label": "Creator"},
                    {"id": "B", "label": "Category"},
                    {"id": "C", "label": "Photo"},
                    {"id": "D", "label": "Price"}
                ],
                "rows": [
                    {"c": [{"v": ""}, {"v": "Games"}, null, {"v": 10}]},
                    {"c": [{"v": "Jane Doe"}, {"v": "gaming"}, {"v": "https://img.example/jane.png"}, {"v": 9.99}]},
                    {"c": [{"v": "No Category"}, null, null, null]}
                ]
            }
        });

        let rows = rows_from_gviz(&json).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Jane Doe");
        assert_eq!(rows[0].category, "Gaming");
        assert_eq!(
            rows[0].photo_url.as_deref(),
            Some("https://img.example/jane.png")
        );
        assert_eq!(rows[0].price, Some(9.99));
    }

    #[test]
    fn test_rows_from_gviz_uses_id_when_label_missing() {
        let json = serde_json::json!({
            "table": {
                "cols": [{"id": "Creator", "label": ""}, {"id": "Category"}],
                "rows": [{"c": [{"v": "Ana"}, {"v": "Finance"}]}]
            }
        });
        let rows = rows_from_gviz(&json).unwrap();
        assert_eq!(rows[0].name, "Ana");
        assert_eq!(rows[0].price, None);
    }

    #[test]
    fn test_rows_from_gviz_rejects_bad_tables() {
        let err = rows_from_gviz(&serde_json::json!({"status": "error"})).unwrap_err();
        assert_eq!(err.to_string(), "Invalid gviz table");

        let json = serde_json::json!({
            "table": {"cols": [{"label": "Name"}, {"label": "Category"}], "rows": []}
        });
        assert!(rows_from_gviz(&json).is_err());
    }
}

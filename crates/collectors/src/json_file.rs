//! Replays captures saved to disk (scraper exports, fixtures).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use crate::Collector;
use crate::error::CollectorError;

/// Reads a JSON array, a single JSON value, or JSON Lines from a file.
#[derive(Debug, Clone)]
pub struct JsonFileCollector {
    label: String,
    path: PathBuf,
}

impl JsonFileCollector {
    #[must_use]
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self { label: label.into(), path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Collector for JsonFileCollector {
    fn label(&self) -> &str {
        &self.label
    }

    async fn collect(&self) -> Result<Vec<Value>, CollectorError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CollectorError::Io { path: self.path.clone(), source })?;
        let items = parse_captures(&content);
        tracing::info!(path = %self.path.display(), count = items.len(), "captures read from file");
        Ok(items)
    }
}

/// Whole-document JSON first, then one value per line.
fn parse_captures(content: &str) -> Vec<Value> {
    match serde_json::from_str::<Value>(content) {
        Ok(Value::Array(items)) => return items,
        Ok(value) => return vec![value],
        Err(_) => {},
    }
    content
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let line = line.trim();
            if matches!(line, "" | "[" | "]" | ",") {
                return None;
            }
            let line = line.strip_suffix(',').unwrap_or(line);
            match serde_json::from_str(line) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(line = idx + 1, error = %e, "skipping unparsable capture line");
                    None
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn array_document_yields_each_element() {
        let items = parse_captures(r#"[{"name": "a"}, {"name": "b"}]"#);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["name"], "b");
    }

    #[test]
    fn single_object_yields_one_item() {
        assert_eq!(parse_captures(r#"{"name": "a"}"#).len(), 1);
    }

    #[test]
    fn json_lines_skip_brackets_and_garbage() {
        let content = "[\n{\"name\": \"a\"},\n\n{\"name\": \"b\"}\nnot json\n]\n";
        let items = parse_captures(content);
        let names: Vec<_> = items.iter().map(|v| v["name"].as_str().unwrap()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[tokio::test]
    async fn collect_reads_file_under_label() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{\"name\": \"Jazz Night\", \"url\": \"https://x/1\"}}").unwrap();
        writeln!(file, "{{\"name\": \"Blues Night\", \"url\": \"https://x/2\"}}").unwrap();

        let collector = JsonFileCollector::new("generic", file.path());
        assert_eq!(collector.label(), "generic");
        let items = collector.collect().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["url"], "https://x/1");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let collector = JsonFileCollector::new("generic", dir.path().join("absent.json"));
        assert!(matches!(collector.collect().await, Err(CollectorError::Io { .. })));
    }
}

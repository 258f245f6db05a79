use serde::{Deserialize, Serialize};

/// インターロック画面1枚分の抽出結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub name: String,
    pub description: String,
}

impl ExtractionResult {
    /// 両方の項目が `sentinel` のレコード
    pub fn unrecognized(sentinel: &str) -> Self {
        Self {
            name: sentinel.to_string(),
            description: sentinel.to_string(),
        }
    }
}

/// インターロックログの1行: (timestamp, name, description)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRow {
    pub timestamp: String,
    pub name: String,
    pub description: String,
}

impl LogRow {
    pub fn new(timestamp: impl Into<String>, result: ExtractionResult) -> Self {
        Self {
            timestamp: timestamp.into(),
            name: result.name,
            description: result.description,
        }
    }

    /// シンクに書く列順の値
    pub fn columns(&self) -> [&str; 3] {
        [&self.timestamp, &self.name, &self.description]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_fills_both_fields() {
        let result = ExtractionResult::unrecognized("unrecognized");
        assert_eq!(result.name, "unrecognized");
        assert_eq!(result.description, "unrecognized");
    }

    #[test]
    fn test_log_row_column_order() {
        let row = LogRow::new(
            "2026-01-01 08:00:00",
            ExtractionResult {
                name: "IL-12".into(),
                description: "151-HIGH TEMP".into(),
            },
        );
        assert_eq!(row.columns(), ["2026-01-01 08:00:00", "IL-12", "151-HIGH TEMP"]);
    }

    #[test]
    fn test_extraction_result_json_shape() {
        let result = ExtractionResult {
            name: "A".into(),
            description: "B".into(),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"name":"A","description":"B"}"#);
    }
}

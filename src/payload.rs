//! Report payload: the immutable snapshot the form layer hands to the engine
//!
//! In JSON, byte fields (logo, photos) are base64 strings and dates are `YYYY-MM-DD`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ReportResult;

/// Scope of work, either free text or a list of selected scopes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScopeOfWork {
    Text(String),
    Items(Vec<String>),
}

impl Default for ScopeOfWork {
    fn default() -> Self {
        ScopeOfWork::Items(Vec::new())
    }
}

impl ScopeOfWork {
    /// Rendered text; list entries are comma-joined with blanks dropped.
    pub fn display_text(&self) -> String {
        match self {
            ScopeOfWork::Text(text) => text.trim().to_string(),
            ScopeOfWork::Items(items) => join_non_blank(items),
        }
    }
}

/// One uploaded photo with its description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    #[serde(default, with = "base64_bytes")]
    pub image_bytes: Option<Vec<u8>>,
    #[serde(default)]
    pub description: String,
    /// Also list the description as a numbered observation
    #[serde(default)]
    pub include_in_observations: bool,
}

impl MediaItem {
    pub fn new(image_bytes: Option<Vec<u8>>, description: impl Into<String>, include_in_observations: bool) -> Self {
        Self {
            image_bytes,
            description: description.into(),
            include_in_observations,
        }
    }
}

/// Everything the engine needs to render one field report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportPayload {
    pub project_number: String,
    pub title: String,
    pub client_name: String,
    pub project_address: String,
    pub date_visited: Option<NaiveDate>,
    pub date_of_report: Option<NaiveDate>,
    pub weather: String,
    pub present: Vec<String>,
    pub scope_of_work: ScopeOfWork,
    /// Lead paragraph of the Observations section, rendered verbatim
    pub observations_template: String,
    /// Optional extra notes shown after the lead paragraph, unnumbered
    pub observation_notes: String,
    pub observation_items: Vec<String>,
    pub media: Vec<MediaItem>,
    pub remarks: String,
    pub prepared_by: String,
    /// Bold footer line; blank falls back to the configured default
    pub footer_address: String,
    #[serde(with = "base64_bytes")]
    pub logo_bytes: Option<Vec<u8>>,
}

impl ReportPayload {
    pub fn from_json(json: &str) -> ReportResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// "{project_number}_{title}_Field_Report", spaces replaced by underscores
    pub fn file_stem(&self) -> String {
        self.document_title().replace(' ', "_")
    }

    /// Title written into the PDF metadata
    pub fn document_title(&self) -> String {
        format!("{}_{}_Field_Report", self.project_number.trim(), self.title.trim())
    }

    /// "{number} {title}", trimmed
    pub fn project_line(&self) -> String {
        format!("{} {}", self.project_number.trim(), self.title.trim())
            .trim()
            .to_string()
    }

    /// Visit date and weather joined by ", ", empty parts omitted
    pub fn visit_line(&self) -> String {
        let date = format_date(self.date_visited);
        [date.as_str(), self.weather.trim()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn report_date_line(&self) -> String {
        format_date(self.date_of_report)
    }

    pub fn present_line(&self) -> String {
        join_non_blank(&self.present)
    }

    /// Observation items with blank entries removed, caller order kept
    pub fn non_blank_items(&self) -> Vec<String> {
        self.observation_items
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// MM/DD/YYYY, or empty when absent
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%m/%d/%Y").to_string()).unwrap_or_default()
}

fn join_non_blank(items: &[String]) -> String {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Optional byte buffers as base64 strings
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(deserializer)?;
        match encoded {
            Some(s) if !s.trim().is_empty() => STANDARD
                .decode(s.trim())
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem_replaces_spaces() {
        let payload = ReportPayload {
            project_number: "24-118".into(),
            title: "Main Street Garage".into(),
            ..Default::default()
        };
        assert_eq!(payload.file_stem(), "24-118_Main_Street_Garage_Field_Report");
    }

    #[test]
    fn test_visit_line_joins_date_and_weather() {
        let mut payload = ReportPayload {
            date_visited: NaiveDate::from_ymd_opt(2024, 3, 7),
            weather: "Sunny, 75°F".into(),
            ..Default::default()
        };
        assert_eq!(payload.visit_line(), "03/07/2024, Sunny, 75°F");
        payload.weather.clear();
        assert_eq!(payload.visit_line(), "03/07/2024");
        payload.date_visited = None;
        payload.weather = "Rain".into();
        assert_eq!(payload.visit_line(), "Rain");
    }

    #[test]
    fn test_present_drops_blanks() {
        let payload = ReportPayload {
            present: vec!["Ann, GC".into(), "  ".into(), "".into(), " Bo ".into()],
            ..Default::default()
        };
        assert_eq!(payload.present_line(), "Ann, GC, Bo");
    }

    #[test]
    fn test_scope_of_work_forms() {
        assert_eq!(ScopeOfWork::Text(" Grade Beam ".into()).display_text(), "Grade Beam");
        let items = ScopeOfWork::Items(vec!["Grade Beam".into(), "".into(), "SOG".into()]);
        assert_eq!(items.display_text(), "Grade Beam, SOG");
    }

    #[test]
    fn test_payload_from_json() {
        let json = r#"{
            "project_number": "24-118",
            "title": "Garage",
            "date_visited": "2024-03-07",
            "scope_of_work": ["Grade Beam", "SOG"],
            "media": [
                {"image_bytes": "AQID", "description": "Crack", "include_in_observations": true},
                {"description": "No photo"}
            ],
            "logo_bytes": null
        }"#;
        let payload = ReportPayload::from_json(json).unwrap();
        assert_eq!(payload.media.len(), 2);
        assert_eq!(payload.media[0].image_bytes.as_deref(), Some(&[1u8, 2, 3][..]));
        assert!(payload.media[1].image_bytes.is_none());
        assert!(!payload.media[1].include_in_observations);
        assert_eq!(payload.scope_of_work.display_text(), "Grade Beam, SOG");
        assert_eq!(payload.date_visited, NaiveDate::from_ymd_opt(2024, 3, 7));
        assert!(payload.logo_bytes.is_none());
    }

    #[test]
    fn test_bad_base64_is_config_error() {
        let err = ReportPayload::from_json(r#"{"logo_bytes": "***"}"#).unwrap_err();
        assert!(matches!(err, crate::error::ReportError::Config(_)));
    }

    #[test]
    fn test_non_blank_items() {
        let payload = ReportPayload {
            observation_items: vec!["".into(), " Add stirrup ".into(), "  ".into()],
            ..Default::default()
        };
        assert_eq!(payload.non_blank_items(), vec!["Add stirrup".to_string()]);
    }
}

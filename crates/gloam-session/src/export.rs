//! Deterministic transcript export.
//!
//! The export format is a JSON array of turn records followed by one
//! trailing summary record. The layout is stable: identical transcripts
//! produce byte-identical output apart from the wall-clock `timestamp`
//! fields. On failure nothing is emitted — there is no partial export.

use serde::Serialize;
use thiserror::Error;

use gloam_core::NodeId;
use gloam_engine::{Outcome, Phase};

use crate::transcript::{Transcript, TranscriptEntry};

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while exporting. Surfaced to the player as a
/// visible failure; no partial output is ever written.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Serialization failed.
    #[error("export failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The trailing summary record: final world and presence state.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    /// Unlocked node ids, sorted.
    pub unlocked: Vec<NodeId>,
    /// Final presence phase.
    pub phase: Phase,
    /// Session outcome, if the session ended.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum ExportRecord<'a> {
    Turn(&'a TranscriptEntry),
    Summary {
        summary: &'a ExportSummary,
    },
}

/// Serialize a transcript and its summary into the export layout.
pub fn export(transcript: &Transcript, summary: &ExportSummary) -> ExportResult<String> {
    let mut records: Vec<ExportRecord<'_>> = transcript
        .entries()
        .iter()
        .map(ExportRecord::Turn)
        .collect();
    records.push(ExportRecord::Summary { summary });
    Ok(serde_json::to_string_pretty(&records)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn fixed_transcript() -> Transcript {
        let ts = Utc.with_ymd_and_hms(2026, 2, 14, 9, 30, 0).unwrap();
        let mut t = Transcript::new();
        t.append_with_timestamp("look", "[foyer]\nDust.", ts);
        t.append_with_timestamp("open gate", "It's locked.", ts);
        t
    }

    fn summary() -> ExportSummary {
        ExportSummary {
            unlocked: vec!["foyer".into()],
            phase: Phase::Dormant,
            outcome: None,
        }
    }

    #[test]
    fn layout_is_stable() {
        let blob = export(&fixed_transcript(), &summary()).unwrap();
        insta::assert_snapshot!(blob, @r#"
[
  {
    "turn": 0,
    "input": "look",
    "output": "[foyer]\nDust.",
    "timestamp": "2026-02-14T09:30:00Z"
  },
  {
    "turn": 1,
    "input": "open gate",
    "output": "It's locked.",
    "timestamp": "2026-02-14T09:30:00Z"
  },
  {
    "summary": {
      "unlocked": [
        "foyer"
      ],
      "phase": "dormant"
    }
  }
]
"#);
    }

    #[test]
    fn identical_transcripts_export_identically() {
        let a = export(&fixed_transcript(), &summary()).unwrap();
        let b = export(&fixed_transcript(), &summary()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn outcome_appears_when_present() {
        let s = ExportSummary {
            unlocked: vec![],
            phase: Phase::Breach,
            outcome: Some(Outcome::Escaped),
        };
        let blob = export(&Transcript::new(), &s).unwrap();
        assert!(blob.contains("\"outcome\": \"escaped\""));
        assert!(blob.contains("\"phase\": \"breach\""));
    }

    #[test]
    fn empty_transcript_still_carries_summary() {
        let blob = export(&Transcript::new(), &summary()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
        let records = value.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].get("summary").is_some());
    }

    #[test]
    fn records_parse_back_in_order() {
        let blob = export(&fixed_transcript(), &summary()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
        let records = value.as_array().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["turn"], 0);
        assert_eq!(records[1]["turn"], 1);
        assert_eq!(records[2]["summary"]["phase"], "dormant");
    }
}

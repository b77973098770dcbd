//! Document snapshot serializer.
//!
//! # Responsibility
//! - Convert the live document into a versioned, timestamped snapshot.
//! - Encode/decode snapshots to the JSON stored under `projectData`.
//! - Restore the persisted subset of a snapshot on startup.
//!
//! # Invariants
//! - `saved_at` never decreases across snapshots produced by one serializer.
//! - Malformed or unsupported stored data decodes to `None`, never to an error.
//! - `restore` applies only the title; list content keeps built-in defaults.

use crate::model::document::{ConstraintRow, Criterion, DocumentModel};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Snapshot format version written by this binary.
pub const SNAPSHOT_VERSION: u32 = 1;

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

/// Persisted specific objective (progress is display-only and not stored).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveEntry {
    pub id: String,
    pub content: String,
}

/// Plain, storage-ready copy of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    /// Missing in snapshots written before versioning; treated as v1.
    #[serde(default = "default_version")]
    pub version: u32,
    pub title: String,
    pub objective: String,
    pub specific_objectives: Vec<ObjectiveEntry>,
    pub in_scope: Vec<String>,
    pub out_scope: Vec<String>,
    pub criteria: Vec<Criterion>,
    pub constraints: Vec<ConstraintRow>,
    /// Unix epoch milliseconds.
    pub saved_at: i64,
}

impl DocumentSnapshot {
    fn has_unique_ids(&self) -> bool {
        let mut objective_ids = HashSet::new();
        let mut criterion_ids = HashSet::new();
        self.specific_objectives
            .iter()
            .all(|entry| objective_ids.insert(entry.id.as_str()))
            && self
                .criteria
                .iter()
                .all(|entry| criterion_ids.insert(entry.id.as_str()))
    }
}

/// Stateful serializer that keeps `saved_at` monotonic.
#[derive(Debug, Default)]
pub struct Serializer {
    last_saved_at: Option<i64>,
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp of the latest snapshot taken or restored.
    pub fn last_saved_at(&self) -> Option<i64> {
        self.last_saved_at
    }

    /// Captures every field of `model` in display order.
    ///
    /// `saved_at` is `now_ms`, raised to the previous value when the clock
    /// moved backwards.
    pub fn snapshot(&mut self, model: &DocumentModel, now_ms: i64) -> DocumentSnapshot {
        let saved_at = self.last_saved_at.map_or(now_ms, |last| last.max(now_ms));
        self.last_saved_at = Some(saved_at);

        DocumentSnapshot {
            version: SNAPSHOT_VERSION,
            title: model.title.clone(),
            objective: model.objective.clone(),
            specific_objectives: model
                .specific_objectives
                .iter()
                .map(|objective| ObjectiveEntry {
                    id: objective.id.clone(),
                    content: objective.content.clone(),
                })
                .collect(),
            in_scope: model.in_scope.clone(),
            out_scope: model.out_scope.clone(),
            criteria: model.criteria.clone(),
            constraints: model.constraints.clone(),
            saved_at,
        }
    }

    /// Applies the persisted subset of `snapshot` to `model`.
    ///
    /// Only the title is restored. `None` leaves `model` untouched. An empty
    /// stored title is ignored so the built-in title survives.
    pub fn restore(&mut self, snapshot: Option<&DocumentSnapshot>, model: &mut DocumentModel) {
        let Some(snapshot) = snapshot else {
            debug!("event=snapshot_restore module=snapshot status=skipped reason=absent");
            return;
        };

        if !snapshot.title.is_empty() {
            model.title = snapshot.title.clone();
        }
        self.last_saved_at = Some(
            self.last_saved_at
                .map_or(snapshot.saved_at, |last| last.max(snapshot.saved_at)),
        );
        debug!(
            "event=snapshot_restore module=snapshot status=ok saved_at={}",
            snapshot.saved_at
        );
    }
}

/// Encodes a snapshot into its storage JSON.
pub fn encode_snapshot(snapshot: &DocumentSnapshot) -> serde_json::Result<String> {
    serde_json::to_string(snapshot)
}

/// Decodes stored JSON. Anything malformed, duplicated or from a newer
/// format version is treated as absent.
pub fn decode_snapshot(raw: &str) -> Option<DocumentSnapshot> {
    let snapshot = match serde_json::from_str::<DocumentSnapshot>(raw) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!(
                "event=snapshot_decode module=snapshot status=error error_code=malformed_snapshot line={} column={}",
                err.line(),
                err.column()
            );
            return None;
        }
    };

    if snapshot.version > SNAPSHOT_VERSION {
        warn!(
            "event=snapshot_decode module=snapshot status=error error_code=unsupported_version version={} latest_supported={}",
            snapshot.version, SNAPSHOT_VERSION
        );
        return None;
    }

    if !snapshot.has_unique_ids() {
        warn!(
            "event=snapshot_decode module=snapshot status=error error_code=duplicate_ids"
        );
        return None;
    }

    Some(snapshot)
}

#[cfg(test)]
mod tests {
    use super::{decode_snapshot, encode_snapshot, Serializer, SNAPSHOT_VERSION};
    use crate::model::document::{CriterionStatus, DocumentModel};

    #[test]
    fn snapshot_captures_every_section_in_order() {
        let mut model = DocumentModel::builtin();
        model.criteria[1].status = CriterionStatus::Completed;

        let snapshot = Serializer::new().snapshot(&model, 42);

        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.title, model.title);
        assert_eq!(snapshot.objective, model.objective);
        let ids: Vec<_> = snapshot
            .specific_objectives
            .iter()
            .map(|entry| entry.id.as_str())
            .collect();
        assert_eq!(ids, ["oe1", "oe2", "oe3", "oe4"]);
        assert_eq!(snapshot.in_scope, model.in_scope);
        assert_eq!(snapshot.out_scope, model.out_scope);
        assert_eq!(snapshot.criteria[1].status, CriterionStatus::Completed);
        assert_eq!(snapshot.constraints, model.constraints);
        assert_eq!(snapshot.saved_at, 42);
    }

    #[test]
    fn saved_at_never_goes_backwards() {
        let model = DocumentModel::empty();
        let mut serializer = Serializer::new();

        assert_eq!(serializer.snapshot(&model, 1_000).saved_at, 1_000);
        assert_eq!(serializer.snapshot(&model, 900).saved_at, 1_000);
        assert_eq!(serializer.snapshot(&model, 2_000).saved_at, 2_000);
    }

    #[test]
    fn json_uses_camel_case_keys_and_snake_case_status() {
        let snapshot = Serializer::new().snapshot(&DocumentModel::builtin(), 7);
        let json = encode_snapshot(&snapshot).unwrap();

        assert!(json.contains("\"specificObjectives\""));
        assert!(json.contains("\"inScope\""));
        assert!(json.contains("\"outScope\""));
        assert!(json.contains("\"savedAt\":7"));
        assert!(json.contains("\"status\":\"pending\""));
        assert_eq!(decode_snapshot(&json), Some(snapshot));
    }

    #[test]
    fn decode_treats_bad_data_as_absent() {
        assert_eq!(decode_snapshot("not json"), None);
        assert_eq!(decode_snapshot("{\"title\": 3}"), None);
        assert_eq!(decode_snapshot("null"), None);

        let mut snapshot = Serializer::new().snapshot(&DocumentModel::builtin(), 1);
        snapshot.version = SNAPSHOT_VERSION + 1;
        assert_eq!(decode_snapshot(&encode_snapshot(&snapshot).unwrap()), None);

        snapshot.version = SNAPSHOT_VERSION;
        snapshot.criteria[1].id = snapshot.criteria[0].id.clone();
        assert_eq!(decode_snapshot(&encode_snapshot(&snapshot).unwrap()), None);
    }

    #[test]
    fn decode_accepts_snapshot_without_version_field() {
        let raw = r#"{
            "title": "Legacy",
            "objective": "",
            "specificObjectives": [],
            "inScope": [],
            "outScope": [],
            "criteria": [],
            "constraints": [],
            "savedAt": 5
        }"#;
        let snapshot = decode_snapshot(raw).expect("legacy snapshot should decode");
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.title, "Legacy");
    }

    #[test]
    fn restore_applies_only_title() {
        let mut source = DocumentModel::builtin();
        source.title = "Alcance v2".to_string();
        source.objective = "changed".to_string();
        source.in_scope.clear();
        let snapshot = Serializer::new().snapshot(&source, 10);

        let mut target = DocumentModel::builtin();
        let mut serializer = Serializer::new();
        serializer.restore(Some(&snapshot), &mut target);

        assert_eq!(target.title, "Alcance v2");
        assert_eq!(target.objective, DocumentModel::builtin().objective);
        assert_eq!(target.in_scope, DocumentModel::builtin().in_scope);
        assert_eq!(serializer.last_saved_at(), Some(10));
    }

    #[test]
    fn restore_without_snapshot_is_noop() {
        let mut model = DocumentModel::builtin();
        Serializer::new().restore(None, &mut model);
        assert_eq!(model, DocumentModel::builtin());
    }

    #[test]
    fn title_round_trips_through_restore() {
        let mut original = DocumentModel::empty();
        original.title = "Proyecto Ñandú".to_string();
        let first = Serializer::new().snapshot(&original, 1);

        let mut restored = DocumentModel::empty();
        Serializer::new().restore(Some(&first), &mut restored);
        let second = Serializer::new().snapshot(&restored, 2);

        assert_eq!(second.title, original.title);
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::finding::{CheckName, Finding, Severity};

/// Aggregate classification of a submission against established canon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    /// No hard findings and confidence above the acceptance threshold.
    Clean,
    /// Requires human review: a hard conflict, or confidence below the
    /// threshold without being abusive.
    Flagged,
    /// Moderation policy violation. Never published.
    Rejected,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Classification::Clean => "clean",
            Classification::Flagged => "flagged",
            Classification::Rejected => "rejected",
        };
        write!(f, "{name}")
    }
}

/// Aggregate of all findings across the battery, with the engine's
/// certainty that the content is consistent with canon.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub classification: Classification,
    /// In `[0, 1]`. 1.0 means fully consistent with canon.
    pub confidence_score: f64,
    /// All findings across all checks, in canonical battery order.
    pub findings: Vec<Finding>,
}

impl ConflictReport {
    pub fn is_clean(&self) -> bool {
        self.classification == Classification::Clean
    }

    pub fn hard_count(&self) -> usize {
        self.findings.iter().filter(|f| f.is_hard()).count()
    }

    pub fn soft_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Soft)
            .count()
    }

    pub fn hard_findings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_hard())
    }
}

/// Stable reference to one finding within one battery run: the check that
/// raised it and its index within that check's ordered findings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FindingRef {
    pub check: CheckName,
    pub index: usize,
}

impl FindingRef {
    pub fn new(check: CheckName, index: usize) -> Self {
        Self { check, index }
    }
}

impl std::fmt::Display for FindingRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.check, self.index)
    }
}

/// A non-destructive automatic resolution of one soft finding.
///
/// Resolutions only attach inferred metadata; the submitted title and body
/// are never altered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub finding: FindingRef,
    pub resolution: String,
    /// Metadata keys the resolution attaches to the content on publish.
    pub inferred_metadata: BTreeMap<String, serde_json::Value>,
}

impl Reconciliation {
    pub fn new(finding: FindingRef, resolution: impl Into<String>) -> Self {
        Self {
            finding,
            resolution: resolution.into(),
            inferred_metadata: BTreeMap::new(),
        }
    }

    pub fn infer(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.inferred_metadata.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::EntityId;

    #[test]
    fn report_counts_by_severity() {
        let report = ConflictReport {
            classification: Classification::Flagged,
            confidence_score: 0.4,
            findings: vec![
                Finding::hard(CheckName::Timeline, "era contradiction"),
                Finding::soft(CheckName::Tone, "register drift"),
                Finding::soft(CheckName::Timeline, "era implied"),
            ],
        };
        assert_eq!(report.hard_count(), 1);
        assert_eq!(report.soft_count(), 2);
        assert!(!report.is_clean());
    }

    #[test]
    fn finding_ref_display() {
        let r = FindingRef::new(CheckName::Timeline, 2);
        assert_eq!(format!("{r}"), "timeline#2");
    }

    #[test]
    fn reconciliation_carries_inferred_metadata() {
        let rec = Reconciliation::new(
            FindingRef::new(CheckName::Timeline, 0),
            "inferred time period from linked characters",
        )
        .infer("time_period", serde_json::json!("age-of-embers"));

        assert_eq!(
            rec.inferred_metadata.get("time_period"),
            Some(&serde_json::json!("age-of-embers"))
        );
    }

    #[test]
    fn all_classification_variants_serialize() {
        for c in [
            Classification::Clean,
            Classification::Flagged,
            Classification::Rejected,
        ] {
            let json = serde_json::to_string(&c).unwrap();
            let restored: Classification = serde_json::from_str(&json).unwrap();
            assert_eq!(c, restored);
        }
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = ConflictReport {
            classification: Classification::Clean,
            confidence_score: 0.92,
            findings: vec![Finding::soft(CheckName::Character, "touches locked entity")
                .related(EntityId::new("elder-thorn"))],
        };
        let json = serde_json::to_string(&report).unwrap();
        let restored: ConflictReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, restored);
    }
}

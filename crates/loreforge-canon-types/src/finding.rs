use serde::{Deserialize, Serialize};

use crate::ids::EntityId;

/// The seven consistency axes of the check battery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CheckName {
    WorldLaw,
    Metaphysics,
    Timeline,
    Geography,
    Character,
    Tone,
    Moderation,
}

impl CheckName {
    /// Canonical battery order. Battery output is reported in this order
    /// regardless of which check finishes first.
    pub const ALL: [CheckName; 7] = [
        CheckName::WorldLaw,
        CheckName::Metaphysics,
        CheckName::Timeline,
        CheckName::Geography,
        CheckName::Character,
        CheckName::Tone,
        CheckName::Moderation,
    ];
}

impl std::fmt::Display for CheckName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CheckName::WorldLaw => "world-law",
            CheckName::Metaphysics => "metaphysics",
            CheckName::Timeline => "timeline",
            CheckName::Geography => "geography",
            CheckName::Character => "character",
            CheckName::Tone => "tone",
            CheckName::Moderation => "moderation",
        };
        write!(f, "{name}")
    }
}

/// Per-check verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckVerdict {
    Pass,
    /// The check could not fully evaluate (missing linked entity, oracle
    /// unavailable, timeout). Carries a soft finding describing why.
    Partial,
    Fail,
}

/// Conflict severity. Hard blocks automatic acceptance; soft is
/// informational or auto-reconcilable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Soft,
    Hard,
}

/// One conflict or observation raised by a check.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub check: CheckName,
    pub description: String,
    pub severity: Severity,
    pub related_entity_ids: Vec<EntityId>,
    pub suggestion: Option<String>,
}

impl Finding {
    pub fn soft(check: CheckName, description: impl Into<String>) -> Self {
        Self {
            check,
            description: description.into(),
            severity: Severity::Soft,
            related_entity_ids: Vec::new(),
            suggestion: None,
        }
    }

    pub fn hard(check: CheckName, description: impl Into<String>) -> Self {
        Self {
            check,
            description: description.into(),
            severity: Severity::Hard,
            related_entity_ids: Vec::new(),
            suggestion: None,
        }
    }

    pub fn related(mut self, entity: EntityId) -> Self {
        self.related_entity_ids.push(entity);
        self
    }

    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn is_hard(&self) -> bool {
        self.severity == Severity::Hard
    }
}

/// Result of one check in the battery.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub check: CheckName,
    pub verdict: CheckVerdict,
    pub findings: Vec<Finding>,
}

impl CheckResult {
    pub fn pass(check: CheckName) -> Self {
        Self {
            check,
            verdict: CheckVerdict::Pass,
            findings: Vec::new(),
        }
    }

    /// A passing result carrying informational soft findings.
    pub fn pass_with(check: CheckName, findings: Vec<Finding>) -> Self {
        Self {
            check,
            verdict: CheckVerdict::Pass,
            findings,
        }
    }

    pub fn partial(check: CheckName, findings: Vec<Finding>) -> Self {
        Self {
            check,
            verdict: CheckVerdict::Partial,
            findings,
        }
    }

    pub fn fail(check: CheckName, findings: Vec<Finding>) -> Self {
        Self {
            check,
            verdict: CheckVerdict::Fail,
            findings,
        }
    }

    pub fn is_pass(&self) -> bool {
        self.verdict == CheckVerdict::Pass
    }

    pub fn hard_findings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Hard)
    }

    pub fn soft_findings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Soft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_covers_all_axes() {
        assert_eq!(CheckName::ALL.len(), 7);
        let mut seen = std::collections::HashSet::new();
        for name in CheckName::ALL {
            assert!(seen.insert(name));
        }
    }

    #[test]
    fn finding_builders_set_severity() {
        let soft = Finding::soft(CheckName::Timeline, "no time period declared");
        assert_eq!(soft.severity, Severity::Soft);
        assert!(!soft.is_hard());

        let hard = Finding::hard(CheckName::Moderation, "banned content")
            .related(EntityId::new("elder-thorn"))
            .suggest("remove the offending passage");
        assert!(hard.is_hard());
        assert_eq!(hard.related_entity_ids.len(), 1);
        assert!(hard.suggestion.is_some());
    }

    #[test]
    fn check_result_severity_filters() {
        let result = CheckResult::fail(
            CheckName::Timeline,
            vec![
                Finding::hard(CheckName::Timeline, "contradicts the founding era"),
                Finding::soft(CheckName::Timeline, "era implied, not declared"),
            ],
        );
        assert_eq!(result.hard_findings().count(), 1);
        assert_eq!(result.soft_findings().count(), 1);
    }

    #[test]
    fn all_verdict_variants_serialize() {
        for verdict in [CheckVerdict::Pass, CheckVerdict::Partial, CheckVerdict::Fail] {
            let json = serde_json::to_string(&verdict).unwrap();
            let restored: CheckVerdict = serde_json::from_str(&json).unwrap();
            assert_eq!(verdict, restored);
        }
    }

    #[test]
    fn severity_orders_hard_above_soft() {
        assert!(Severity::Hard > Severity::Soft);
    }
}

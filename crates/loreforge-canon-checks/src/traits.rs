use async_trait::async_trait;
use loreforge_canon_catalog::CatalogSnapshot;
use loreforge_canon_types::{CheckName, CheckResult, ContentSubmission, EntityId, Severity};
use serde::{Deserialize, Serialize};

use crate::error::{CheckError, OracleError};

/// One consistency check in the battery.
///
/// Implementations must be deterministic given the same catalog snapshot
/// and must not mutate shared state; the battery runs them concurrently
/// and the audit trail replays against the snapshot a run saw.
#[async_trait]
pub trait CanonCheck: Send + Sync {
    fn name(&self) -> CheckName;

    async fn evaluate(
        &self,
        submission: &ContentSubmission,
        catalog: &CatalogSnapshot,
    ) -> Result<CheckResult, CheckError>;
}

/// The consistency axes that defer semantic judgment to an oracle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OracleAxis {
    Metaphysics,
    Tone,
}

impl std::fmt::Display for OracleAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OracleAxis::Metaphysics => "metaphysics",
            OracleAxis::Tone => "tone",
        };
        write!(f, "{name}")
    }
}

/// One concern an oracle raised about a submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OracleConcern {
    pub description: String,
    pub severity: Severity,
    pub related_entity_ids: Vec<EntityId>,
    pub suggestion: Option<String>,
}

/// An oracle's judgment of one axis of a submission.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OracleAssessment {
    pub concerns: Vec<OracleConcern>,
}

impl OracleAssessment {
    /// An assessment with nothing to report.
    pub fn consistent() -> Self {
        Self::default()
    }

    pub fn is_consistent(&self) -> bool {
        self.concerns.is_empty()
    }
}

/// The pluggable capability behind the oracle-backed checks.
///
/// What makes a passage metaphysically inconsistent or tonally off is not
/// prescribed here; only the contract is: assessments must be
/// deterministic per submission, and failure is an error the battery
/// degrades to a partial verdict, never a pipeline abort.
#[async_trait]
pub trait ConsistencyOracle: Send + Sync {
    async fn assess(
        &self,
        axis: OracleAxis,
        submission: &ContentSubmission,
    ) -> Result<OracleAssessment, OracleError>;
}

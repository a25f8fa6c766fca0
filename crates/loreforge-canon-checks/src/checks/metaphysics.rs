use std::sync::Arc;

use async_trait::async_trait;
use loreforge_canon_catalog::CatalogSnapshot;
use loreforge_canon_types::{CheckName, CheckResult, ContentSubmission, Finding, Severity};

use crate::error::CheckError;
use crate::traits::{CanonCheck, ConsistencyOracle, OracleAxis};

/// Metaphysical consistency: whether the content obeys how this world's
/// magic, death, and causality work. Judgment is delegated to the
/// consistency oracle; this check only maps its concerns onto findings.
pub struct MetaphysicsCheck {
    oracle: Arc<dyn ConsistencyOracle>,
}

impl MetaphysicsCheck {
    pub fn new(oracle: Arc<dyn ConsistencyOracle>) -> Self {
        Self { oracle }
    }
}

#[async_trait]
impl CanonCheck for MetaphysicsCheck {
    fn name(&self) -> CheckName {
        CheckName::Metaphysics
    }

    async fn evaluate(
        &self,
        submission: &ContentSubmission,
        _catalog: &CatalogSnapshot,
    ) -> Result<CheckResult, CheckError> {
        let assessment = self
            .oracle
            .assess(OracleAxis::Metaphysics, submission)
            .await?;

        let findings: Vec<Finding> = assessment
            .concerns
            .into_iter()
            .map(|concern| Finding {
                check: CheckName::Metaphysics,
                description: concern.description,
                severity: concern.severity,
                related_entity_ids: concern.related_entity_ids,
                suggestion: concern.suggestion,
            })
            .collect();

        if findings.iter().any(|f| f.severity == Severity::Hard) {
            Ok(CheckResult::fail(CheckName::Metaphysics, findings))
        } else {
            Ok(CheckResult::pass_with(CheckName::Metaphysics, findings))
        }
    }
}

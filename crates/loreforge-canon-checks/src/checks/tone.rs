use std::sync::Arc;

use async_trait::async_trait;
use loreforge_canon_catalog::CatalogSnapshot;
use loreforge_canon_types::{CheckName, CheckResult, ContentSubmission, Finding, Severity};

use crate::error::CheckError;
use crate::traits::{CanonCheck, ConsistencyOracle, OracleAxis};

/// Tonal consistency: whether the content's register fits the universe.
/// Oracle-backed like metaphysics, but tone is style rather than canon;
/// its concerns are always recorded as soft findings.
pub struct ToneCheck {
    oracle: Arc<dyn ConsistencyOracle>,
}

impl ToneCheck {
    pub fn new(oracle: Arc<dyn ConsistencyOracle>) -> Self {
        Self { oracle }
    }
}

#[async_trait]
impl CanonCheck for ToneCheck {
    fn name(&self) -> CheckName {
        CheckName::Tone
    }

    async fn evaluate(
        &self,
        submission: &ContentSubmission,
        _catalog: &CatalogSnapshot,
    ) -> Result<CheckResult, CheckError> {
        let assessment = self.oracle.assess(OracleAxis::Tone, submission).await?;

        let findings: Vec<Finding> = assessment
            .concerns
            .into_iter()
            .map(|concern| Finding {
                check: CheckName::Tone,
                description: concern.description,
                severity: Severity::Soft,
                related_entity_ids: concern.related_entity_ids,
                suggestion: concern.suggestion,
            })
            .collect();

        Ok(CheckResult::pass_with(CheckName::Tone, findings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::FailingOracle;
    use crate::oracle::LexiconOracle;
    use loreforge_canon_types::{ContentKey, ContentKind, CreatorId, EntityId};

    fn submission(body: &str) -> ContentSubmission {
        ContentSubmission::builder(
            ContentKey::new(ContentKind::Story, EntityId::new("tale-1")),
            CreatorId::new("mira"),
        )
        .body(body)
        .build()
    }

    #[tokio::test]
    async fn concerns_are_always_soft() {
        // Even a rule the oracle considers hard is style here, not canon.
        let oracle = LexiconOracle::new().rule(
            OracleAxis::Tone,
            "lol",
            Severity::Hard,
            "modern slang breaks register",
        );
        let check = ToneCheck::new(Arc::new(oracle));
        let result = check
            .evaluate(&submission("lol, said the knight"), &CatalogSnapshot::default())
            .await
            .unwrap();
        assert!(result.is_pass());
        assert_eq!(result.soft_findings().count(), 1);
        assert_eq!(result.hard_findings().count(), 0);
    }

    #[tokio::test]
    async fn quiet_oracle_passes_clean() {
        let check = ToneCheck::new(Arc::new(LexiconOracle::new()));
        let result = check
            .evaluate(&submission("The ferry crossed at dusk."), &CatalogSnapshot::default())
            .await
            .unwrap();
        assert!(result.is_pass());
        assert!(result.findings.is_empty());
    }

    #[tokio::test]
    async fn oracle_failure_propagates_for_battery_degradation() {
        let check = ToneCheck::new(Arc::new(FailingOracle::new("backend offline")));
        assert!(check
            .evaluate(&submission("Anything."), &CatalogSnapshot::default())
            .await
            .is_err());
    }
}

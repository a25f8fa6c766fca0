use async_trait::async_trait;
use loreforge_canon_catalog::CatalogSnapshot;
use loreforge_canon_types::{CheckName, CheckResult, ContentSubmission, Finding};

use crate::checks::searchable_text;
use crate::error::CheckError;
use crate::traits::CanonCheck;

/// World-law consistency: content must not assert anything a world law
/// forbids. Each law carries the forbidden phrasings it can detect
/// deterministically; every hit is a hard finding citing the law.
pub struct WorldLawCheck;

impl WorldLawCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WorldLawCheck {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CanonCheck for WorldLawCheck {
    fn name(&self) -> CheckName {
        CheckName::WorldLaw
    }

    async fn evaluate(
        &self,
        submission: &ContentSubmission,
        catalog: &CatalogSnapshot,
    ) -> Result<CheckResult, CheckError> {
        let haystack = searchable_text(submission);
        let mut findings = Vec::new();

        for law in catalog.laws() {
            for term in &law.forbidden_terms {
                if haystack.contains(&term.to_lowercase()) {
                    findings.push(
                        Finding::hard(
                            CheckName::WorldLaw,
                            format!("violates world law {}: content asserts \"{term}\"", law.id),
                        )
                        .suggest(law.statement.clone()),
                    );
                }
            }
        }

        if findings.is_empty() {
            Ok(CheckResult::pass(CheckName::WorldLaw))
        } else {
            Ok(CheckResult::fail(CheckName::WorldLaw, findings))
        }
    }
}

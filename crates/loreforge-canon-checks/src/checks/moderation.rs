use async_trait::async_trait;
use loreforge_canon_catalog::CatalogSnapshot;
use loreforge_canon_types::{CheckName, CheckResult, ContentSubmission, Finding};

use crate::checks::searchable_text;
use crate::error::CheckError;
use crate::traits::CanonCheck;

/// Content moderation. A banned-term hit is a hard policy violation; the
/// classifier turns any hard moderation finding into an outright
/// rejection. Restricted terms are soft cautions.
pub struct ModerationCheck;

impl ModerationCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ModerationCheck {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CanonCheck for ModerationCheck {
    fn name(&self) -> CheckName {
        CheckName::Moderation
    }

    async fn evaluate(
        &self,
        submission: &ContentSubmission,
        catalog: &CatalogSnapshot,
    ) -> Result<CheckResult, CheckError> {
        let haystack = searchable_text(submission);
        let policy = catalog.moderation_policy();
        let mut findings = Vec::new();

        for term in &policy.banned_terms {
            if haystack.contains(&term.to_lowercase()) {
                findings.push(Finding::hard(
                    CheckName::Moderation,
                    format!("content contains banned material (\"{term}\")"),
                ));
            }
        }

        for term in &policy.restricted_terms {
            if haystack.contains(&term.to_lowercase()) {
                findings.push(
                    Finding::soft(
                        CheckName::Moderation,
                        format!("content contains restricted material (\"{term}\")"),
                    )
                    .suggest("rework the passage or request an editorial exception"),
                );
            }
        }

        if findings.iter().any(Finding::is_hard) {
            Ok(CheckResult::fail(CheckName::Moderation, findings))
        } else {
            Ok(CheckResult::pass_with(CheckName::Moderation, findings))
        }
    }
}

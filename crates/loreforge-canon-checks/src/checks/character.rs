use async_trait::async_trait;
use loreforge_canon_catalog::CatalogSnapshot;
use loreforge_canon_types::{CheckName, CheckResult, ContentSubmission, Finding};

use crate::error::CheckError;
use crate::traits::CanonCheck;

/// Metadata prefix for trait assertions about linked entities
/// (`trait.allegiance`, `trait.origin`, ...).
pub const TRAIT_PREFIX: &str = "trait.";

/// Character consistency: every linked entity must exist in the catalog,
/// trait assertions must not contradict a locked entity's recorded facts,
/// and any touch of a locked entity is surfaced for lane assignment.
pub struct CharacterCheck;

impl CharacterCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CharacterCheck {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CanonCheck for CharacterCheck {
    fn name(&self) -> CheckName {
        CheckName::Character
    }

    async fn evaluate(
        &self,
        submission: &ContentSubmission,
        catalog: &CatalogSnapshot,
    ) -> Result<CheckResult, CheckError> {
        let mut findings = Vec::new();
        let mut missing = 0usize;

        let asserted_traits: Vec<(&str, &str)> = submission
            .metadata
            .iter()
            .filter_map(|(key, value)| {
                let name = key.strip_prefix(TRAIT_PREFIX)?;
                Some((name, value.as_str()?))
            })
            .collect();

        for entity_id in &submission.linked_entity_ids {
            let Some(entity) = catalog.entity(entity_id) else {
                missing += 1;
                findings.push(
                    Finding::soft(
                        CheckName::Character,
                        format!("linked entity {entity_id} is not in the catalog"),
                    )
                    .suggest("link established entities, or submit this one first")
                    .related(entity_id.clone()),
                );
                continue;
            };

            if entity.locked {
                findings.push(
                    Finding::soft(
                        CheckName::Character,
                        format!("touches locked entity {} ({})", entity.name, entity_id),
                    )
                    .related(entity_id.clone()),
                );
            }

            for (name, asserted) in &asserted_traits {
                if let Some(recorded) = entity.traits.get(*name) {
                    if !recorded.eq_ignore_ascii_case(asserted) {
                        let finding = if entity.locked {
                            Finding::hard(
                                CheckName::Character,
                                format!(
                                    "asserts {name} = \"{asserted}\" but locked entity {} records \"{recorded}\"",
                                    entity.name
                                ),
                            )
                        } else {
                            Finding::soft(
                                CheckName::Character,
                                format!(
                                    "asserts {name} = \"{asserted}\", diverging from {}'s recorded \"{recorded}\"",
                                    entity.name
                                ),
                            )
                        };
                        findings.push(finding.related(entity_id.clone()));
                    }
                }
            }
        }

        if findings.iter().any(Finding::is_hard) {
            Ok(CheckResult::fail(CheckName::Character, findings))
        } else if missing > 0 {
            Ok(CheckResult::partial(CheckName::Character, findings))
        } else {
            Ok(CheckResult::pass_with(CheckName::Character, findings))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loreforge_canon_catalog::CanonEntity;
    use loreforge_canon_types::{
        CheckVerdict, ContentKey, ContentKind, CreatorId, EntityId, Severity,
    };

    fn ent(id: &str) -> EntityId {
        EntityId::new(id)
    }

    fn catalog() -> CatalogSnapshot {
        CatalogSnapshot::builder()
            .entity(
                CanonEntity::new(ent("elder-thorn"), ContentKind::Character, "Elder Thorn")
                    .locked()
                    .with_trait("allegiance", "the Ember Court"),
            )
            .entity(
                CanonEntity::new(ent("ember-scout"), ContentKind::Character, "Ember Scout")
                    .with_trait("origin", "the Ashlands"),
            )
            .build()
            .unwrap()
    }

    fn builder() -> loreforge_canon_types::ContentSubmissionBuilder {
        ContentSubmission::builder(
            ContentKey::new(ContentKind::Story, ent("tale-1")),
            CreatorId::new("mira"),
        )
    }

    #[tokio::test]
    async fn pass_when_links_resolve_without_contradiction() {
        let sub = builder().link(ent("ember-scout")).build();
        let result = CharacterCheck::new().evaluate(&sub, &catalog()).await.unwrap();
        assert!(result.is_pass());
        assert!(result.findings.is_empty());
    }

    #[tokio::test]
    async fn missing_linked_entity_is_partial_with_soft_finding() {
        let sub = builder().link(ent("never-written")).build();
        let result = CharacterCheck::new().evaluate(&sub, &catalog()).await.unwrap();
        assert_eq!(result.verdict, CheckVerdict::Partial);
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].severity, Severity::Soft);
    }

    #[tokio::test]
    async fn locked_touch_is_surfaced_as_soft() {
        let sub = builder().link(ent("elder-thorn")).build();
        let result = CharacterCheck::new().evaluate(&sub, &catalog()).await.unwrap();
        assert!(result.is_pass());
        assert!(result.findings[0].description.contains("locked"));
    }

    #[tokio::test]
    async fn contradicting_a_locked_trait_is_hard() {
        let sub = builder()
            .metadata("trait.allegiance", serde_json::json!("the Glass Court"))
            .link(ent("elder-thorn"))
            .build();
        let result = CharacterCheck::new().evaluate(&sub, &catalog()).await.unwrap();
        assert_eq!(result.verdict, CheckVerdict::Fail);
        assert_eq!(result.hard_findings().count(), 1);
    }

    #[tokio::test]
    async fn diverging_from_an_unlocked_trait_is_soft() {
        let sub = builder()
            .metadata("trait.origin", serde_json::json!("the Glass Coast"))
            .link(ent("ember-scout"))
            .build();
        let result = CharacterCheck::new().evaluate(&sub, &catalog()).await.unwrap();
        assert!(result.is_pass());
        assert_eq!(result.soft_findings().count(), 1);
    }

    #[tokio::test]
    async fn matching_trait_assertion_raises_nothing() {
        let sub = builder()
            .metadata("trait.allegiance", serde_json::json!("the ember court"))
            .link(ent("elder-thorn"))
            .build();
        let result = CharacterCheck::new().evaluate(&sub, &catalog()).await.unwrap();
        // Only the locked-touch finding, no contradiction.
        assert!(result.is_pass());
        assert_eq!(result.findings.len(), 1);
    }
}

use async_trait::async_trait;
use loreforge_canon_catalog::CatalogSnapshot;
use loreforge_canon_types::{
    CheckName, CheckResult, ContentKind, ContentSubmission, EntityId, Finding,
};

use crate::error::CheckError;
use crate::traits::CanonCheck;

/// Metadata key a submission uses to declare where it takes place.
pub const REGION_KEY: &str = "region";

/// Geographic consistency: linked locations must be co-located, in the
/// same region or explicitly connected ones. A declared region must be
/// reachable from every linked location's region.
pub struct GeographyCheck;

impl GeographyCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GeographyCheck {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CanonCheck for GeographyCheck {
    fn name(&self) -> CheckName {
        CheckName::Geography
    }

    async fn evaluate(
        &self,
        submission: &ContentSubmission,
        catalog: &CatalogSnapshot,
    ) -> Result<CheckResult, CheckError> {
        let mut findings = Vec::new();

        // Linked locations with a known region.
        let mut placed: Vec<(&EntityId, EntityId)> = Vec::new();
        for entity_id in &submission.linked_entity_ids {
            let Some(entity) = catalog.entity(entity_id) else {
                continue; // existence is the character check's concern
            };
            if entity.kind != ContentKind::Location {
                continue;
            }
            match &entity.region {
                Some(region) => placed.push((entity_id, region.clone())),
                None => findings.push(
                    Finding::soft(
                        CheckName::Geography,
                        format!("linked location {entity_id} has no recorded region"),
                    )
                    .related(entity_id.clone()),
                ),
            }
        }

        for (i, (id_a, region_a)) in placed.iter().enumerate() {
            for (id_b, region_b) in &placed[i + 1..] {
                if !catalog.regions_adjacent(region_a, region_b) {
                    findings.push(
                        Finding::hard(
                            CheckName::Geography,
                            format!(
                                "linked locations {id_a} and {id_b} are in unconnected regions"
                            ),
                        )
                        .related((*id_a).clone())
                        .related((*id_b).clone()),
                    );
                }
            }
        }

        if let Some(value) = submission.metadata.get(REGION_KEY) {
            match value.as_str().map(EntityId::new) {
                Some(declared) if catalog.region(&declared).is_some() => {
                    for (id, region) in &placed {
                        if !catalog.regions_adjacent(&declared, region) {
                            findings.push(
                                Finding::hard(
                                    CheckName::Geography,
                                    format!(
                                        "declared region {declared} is unreachable from linked location {id}"
                                    ),
                                )
                                .related((*id).clone()),
                            );
                        }
                    }
                }
                Some(declared) => findings.push(
                    Finding::soft(
                        CheckName::Geography,
                        format!("declares unknown region \"{}\"", declared.0),
                    )
                    .related(declared),
                ),
                None => findings.push(Finding::soft(
                    CheckName::Geography,
                    format!("metadata key {REGION_KEY} must be a region id string"),
                )),
            }
        }

        if findings.iter().any(Finding::is_hard) {
            Ok(CheckResult::fail(CheckName::Geography, findings))
        } else {
            Ok(CheckResult::pass_with(CheckName::Geography, findings))
        }
    }
}

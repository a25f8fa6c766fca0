use async_trait::async_trait;
use loreforge_canon_catalog::{CatalogSnapshot, TimePeriod};
use loreforge_canon_types::{
    CheckName, CheckResult, ContentSubmission, EntityId, Finding,
};

use crate::error::CheckError;
use crate::traits::CanonCheck;

/// Metadata key a submission uses to declare its time period.
pub const TIME_PERIOD_KEY: &str = "time_period";

/// Timeline consistency: the submission's declared period and the periods
/// of every linked entity must pairwise overlap. A missing declaration
/// when the linked entities agree on an era is soft and reconcilable; a
/// contradiction is hard.
pub struct TimelineCheck;

impl TimelineCheck {
    pub fn new() -> Self {
        Self
    }

    fn declared_period<'a>(
        submission: &ContentSubmission,
        catalog: &'a CatalogSnapshot,
    ) -> Result<Option<&'a TimePeriod>, Finding> {
        let Some(value) = submission.metadata.get(TIME_PERIOD_KEY) else {
            return Ok(None);
        };
        let Some(name) = value.as_str() else {
            return Err(Finding::hard(
                CheckName::Timeline,
                format!("metadata key {TIME_PERIOD_KEY} must be a time period id string"),
            ));
        };
        let id = EntityId::new(name);
        match catalog.time_period(&id) {
            Some(period) => Ok(Some(period)),
            None => Err(Finding::hard(
                CheckName::Timeline,
                format!("declares unknown time period \"{name}\""),
            )
            .related(id)),
        }
    }
}

impl Default for TimelineCheck {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CanonCheck for TimelineCheck {
    fn name(&self) -> CheckName {
        CheckName::Timeline
    }

    async fn evaluate(
        &self,
        submission: &ContentSubmission,
        catalog: &CatalogSnapshot,
    ) -> Result<CheckResult, CheckError> {
        let mut findings = Vec::new();
        let mut unresolved = Vec::new();

        let declared = match Self::declared_period(submission, catalog) {
            Ok(period) => period,
            Err(finding) => {
                findings.push(finding);
                None
            }
        };

        // Periods of the linked entities that are anchored to one.
        let mut anchored: Vec<(&EntityId, &TimePeriod)> = Vec::new();
        for entity_id in &submission.linked_entity_ids {
            match catalog.entity(entity_id) {
                None => unresolved.push(entity_id.clone()),
                Some(_) => {
                    if let Some(period) = catalog.period_of(entity_id) {
                        anchored.push((entity_id, period));
                    }
                }
            }
        }

        // Linked entities must be able to coexist.
        for (i, (id_a, period_a)) in anchored.iter().enumerate() {
            for (id_b, period_b) in &anchored[i + 1..] {
                if !period_a.overlaps(period_b) {
                    findings.push(
                        Finding::hard(
                            CheckName::Timeline,
                            format!(
                                "linked entities live in disjoint eras: {} ({}) and {} ({})",
                                id_a, period_a.name, id_b, period_b.name
                            ),
                        )
                        .related((*id_a).clone())
                        .related((*id_b).clone()),
                    );
                }
            }
        }

        match declared {
            Some(declared) => {
                for (id, period) in &anchored {
                    if !declared.overlaps(period) {
                        findings.push(
                            Finding::hard(
                                CheckName::Timeline,
                                format!(
                                    "declared period {} does not overlap {} of linked entity {}",
                                    declared.name, period.name, id
                                ),
                            )
                            .related((*id).clone()),
                        );
                    }
                }
            }
            None if !anchored.is_empty() => {
                // Only reconcilable when the linked eras agree.
                let agree = anchored.iter().enumerate().all(|(i, (_, a))| {
                    anchored[i + 1..].iter().all(|(_, b)| a.overlaps(b))
                });
                if agree {
                    let implied = &anchored[0].1;
                    let mut finding = Finding::soft(
                        CheckName::Timeline,
                        format!(
                            "no time period declared; linked entities imply {}",
                            implied.name
                        ),
                    )
                    .suggest(format!(
                        "declare {TIME_PERIOD_KEY} = \"{}\"",
                        implied.id.0
                    ));
                    for (id, _) in &anchored {
                        finding = finding.related((*id).clone());
                    }
                    findings.push(finding);
                }
            }
            None => {}
        }

        if !unresolved.is_empty() {
            let mut finding = Finding::soft(
                CheckName::Timeline,
                format!(
                    "cannot assess timeline fully: {} linked entities are not in the catalog",
                    unresolved.len()
                ),
            );
            for id in unresolved {
                finding = finding.related(id);
            }
            findings.push(finding);
            return Ok(CheckResult::partial(CheckName::Timeline, findings));
        }

        if findings.iter().any(Finding::is_hard) {
            Ok(CheckResult::fail(CheckName::Timeline, findings))
        } else {
            Ok(CheckResult::pass_with(CheckName::Timeline, findings))
        }
    }
}

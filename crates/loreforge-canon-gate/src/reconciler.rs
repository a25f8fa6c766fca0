use loreforge_canon_catalog::{CatalogSnapshot, TimePeriod};
use loreforge_canon_checks::checks::timeline::TIME_PERIOD_KEY;
use loreforge_canon_types::{
    CheckName, CheckResult, ContentSubmission, Finding, FindingRef, Reconciliation, Severity,
};

/// Attempts automatic, non-destructive resolution of soft findings on a
/// clean-track report.
///
/// A resolution only ever attaches inferred metadata; the submitted title
/// and body are never altered. Output is keyed by [`FindingRef`] and is a
/// pure function of the inputs, so re-running over the same battery
/// output yields the identical reconciliation set; nothing double-applies.
#[derive(Clone, Debug, Default)]
pub struct Reconciler;

impl Reconciler {
    pub fn new() -> Self {
        Self
    }

    pub fn reconcile(
        &self,
        submission: &ContentSubmission,
        results: &[CheckResult],
        catalog: &CatalogSnapshot,
    ) -> Vec<Reconciliation> {
        let mut reconciliations = Vec::new();
        for result in results {
            for (index, finding) in result.findings.iter().enumerate() {
                if finding.severity != Severity::Soft {
                    continue;
                }
                let finding_ref = FindingRef::new(result.check, index);
                if let Some(reconciliation) =
                    self.resolve(finding_ref, finding, submission, catalog)
                {
                    reconciliations.push(reconciliation);
                }
            }
        }
        reconciliations
    }

    fn resolve(
        &self,
        finding_ref: FindingRef,
        finding: &Finding,
        submission: &ContentSubmission,
        catalog: &CatalogSnapshot,
    ) -> Option<Reconciliation> {
        match finding.check {
            CheckName::Timeline => {
                self.infer_time_period(finding_ref, finding, submission, catalog)
            }
            // Other soft findings stay informational.
            _ => None,
        }
    }

    /// A submission that declares no time period but links entities that
    /// agree on an era gets that era attached as inferred metadata.
    fn infer_time_period(
        &self,
        finding_ref: FindingRef,
        finding: &Finding,
        submission: &ContentSubmission,
        catalog: &CatalogSnapshot,
    ) -> Option<Reconciliation> {
        if submission.metadata.contains_key(TIME_PERIOD_KEY) {
            return None;
        }

        let periods: Vec<&TimePeriod> = finding
            .related_entity_ids
            .iter()
            .filter_map(|id| catalog.period_of(id))
            .collect();
        if periods.is_empty() {
            return None;
        }
        let agree = periods
            .iter()
            .enumerate()
            .all(|(i, a)| periods[i + 1..].iter().all(|b| a.overlaps(b)));
        if !agree {
            return None;
        }

        let implied = periods[0];
        Some(
            Reconciliation::new(
                finding_ref,
                format!(
                    "attached time period {} inferred from linked entities",
                    implied.name
                ),
            )
            .infer(
                TIME_PERIOD_KEY,
                serde_json::Value::String(implied.id.0.clone()),
            ),
        )
    }
}

use loreforge_canon_catalog::CatalogSnapshot;
use loreforge_canon_types::{
    CanonLane, Classification, ConflictReport, ContentSubmission,
};

/// The lane assigner's answer for one classified submission.
#[derive(Clone, Debug, PartialEq)]
pub enum LaneDecision {
    /// Moderation refused publication outright. No lane.
    Refused,
    /// Human review required before any lane is final. Carries the
    /// proposed lane when primary impact forced the review.
    ReviewRequired { proposed: Option<CanonLane> },
    /// Publish automatically into the given lane.
    Publish(CanonLane),
}

/// Maps a conflict report and the submission's scope onto a canon lane.
#[derive(Clone, Debug, Default)]
pub struct LaneAssigner;

impl LaneAssigner {
    pub fn new() -> Self {
        Self
    }

    pub fn assign(
        &self,
        report: &ConflictReport,
        submission: &ContentSubmission,
        catalog: &CatalogSnapshot,
    ) -> LaneDecision {
        match report.classification {
            Classification::Rejected => LaneDecision::Refused,
            Classification::Flagged => LaneDecision::ReviewRequired { proposed: None },
            Classification::Clean => {
                // Primary impact is an override, not a confidence
                // function: touching a locked entity forces review even
                // on a clean report.
                if self.touches_locked(report, submission, catalog) {
                    LaneDecision::ReviewRequired {
                        proposed: Some(CanonLane::Primary),
                    }
                } else if submission.touches_existing_canon() {
                    LaneDecision::Publish(CanonLane::Branch)
                } else {
                    LaneDecision::Publish(CanonLane::Instant)
                }
            }
        }
    }

    /// A locked entity counts as touched when it is linked directly or
    /// referenced by any finding, so the override cannot be bypassed by a
    /// check forgetting to flag it.
    fn touches_locked(
        &self,
        report: &ConflictReport,
        submission: &ContentSubmission,
        catalog: &CatalogSnapshot,
    ) -> bool {
        submission
            .linked_entity_ids
            .iter()
            .chain(report.findings.iter().flat_map(|f| &f.related_entity_ids))
            .any(|id| catalog.is_locked(id))
    }
}

use serde::{Deserialize, Serialize};

use crate::finding::Finding;
use crate::report::{Classification, Reconciliation};

/// The admission track content is placed in upon acceptance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CanonLane {
    /// New content with no conflicts; auto-accepted.
    Instant,
    /// Touches existing canon entities but reconciled cleanly.
    Branch,
    /// Materially alters shared canon state; always requires explicit
    /// review regardless of confidence.
    Primary,
}

impl std::fmt::Display for CanonLane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CanonLane::Instant => "instant",
            CanonLane::Branch => "branch",
            CanonLane::Primary => "primary",
        };
        write!(f, "{name}")
    }
}

/// Lifecycle status of a publishing queue entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueStatus {
    Validating,
    Published,
    ReviewNeeded,
    Rejected,
}

impl QueueStatus {
    /// Terminal statuses cannot transition further, except
    /// `ReviewNeeded`, which a manual review decision resolves exactly
    /// once.
    pub fn is_terminal(&self) -> bool {
        matches!(self, QueueStatus::Published | QueueStatus::Rejected)
    }
}

impl std::fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            QueueStatus::Validating => "validating",
            QueueStatus::Published => "published",
            QueueStatus::ReviewNeeded => "review-needed",
            QueueStatus::Rejected => "rejected",
        };
        write!(f, "{name}")
    }
}

/// The pipeline's answer to one submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub can_publish: bool,
    pub canon_lane: Option<CanonLane>,
    pub classification: Classification,
    pub confidence_score: f64,
    /// Conflicts the caller must act on. Soft findings are informational
    /// and are excluded here; they surface as suggestions instead.
    pub conflicts: Vec<Finding>,
    pub auto_reconciliations: Vec<Reconciliation>,
    pub suggestions: Vec<String>,
}

/// A reviewer's manual verdict on content held for review.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ReviewDecision {
    /// Publish, optionally overriding the proposed lane.
    Approve { lane: Option<CanonLane> },
    Reject { reason: String },
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use loreforge_canon_types::{
    CheckName, CheckResult, CheckVerdict, Classification, ConflictReport, EntityId, Finding,
    Severity,
};

/// Scoring configuration for the conflict classifier.
///
/// Weights reflect how canon-critical each axis is: a timeline or
/// character contradiction damages the shared universe more than a tonal
/// wobble.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub weights: BTreeMap<CheckName, f64>,
    /// Minimum confidence for a clean classification.
    pub acceptance_threshold: f64,
    /// Confidence penalty per hard finding in a failed check.
    pub hard_penalty: f64,
    /// Confidence penalty per soft finding in a failed check.
    pub soft_penalty: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        let mut weights = BTreeMap::new();
        weights.insert(CheckName::WorldLaw, 1.25);
        weights.insert(CheckName::Metaphysics, 1.0);
        weights.insert(CheckName::Timeline, 1.5);
        weights.insert(CheckName::Geography, 1.0);
        weights.insert(CheckName::Character, 1.5);
        weights.insert(CheckName::Tone, 0.5);
        weights.insert(CheckName::Moderation, 1.0);
        Self {
            weights,
            acceptance_threshold: 0.6,
            hard_penalty: 0.25,
            soft_penalty: 0.1,
        }
    }
}

/// Aggregates battery output into a severity-ranked conflict report.
#[derive(Clone, Debug)]
pub struct ConflictClassifier {
    config: ClassifierConfig,
}

impl ConflictClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classify one battery run.
    ///
    /// A hard moderation finding forces rejection before any scoring.
    /// Otherwise confidence is the weighted average of per-check scores
    /// (pass 1.0, partial 0.5, fail penalized per finding), and the
    /// report is clean iff nothing hard was found and confidence clears
    /// the acceptance threshold.
    pub fn classify(&self, results: &[CheckResult]) -> ConflictReport {
        let findings: Vec<Finding> = results
            .iter()
            .flat_map(|r| r.findings.iter().cloned())
            .collect();

        let moderation_violation = results
            .iter()
            .filter(|r| r.check == CheckName::Moderation)
            .flat_map(|r| r.findings.iter())
            .any(Finding::is_hard);

        if moderation_violation {
            return ConflictReport {
                classification: Classification::Rejected,
                confidence_score: 0.0,
                findings,
            };
        }

        let mut weighted = 0.0;
        let mut total_weight = 0.0;
        for result in results {
            let weight = self.config.weights.get(&result.check).copied().unwrap_or(1.0);
            let local = match result.verdict {
                CheckVerdict::Pass => 1.0,
                CheckVerdict::Partial => 0.5,
                CheckVerdict::Fail => {
                    let (hard, soft) = deduped_counts(&result.findings);
                    (1.0 - self.config.hard_penalty * hard as f64
                        - self.config.soft_penalty * soft as f64)
                        .max(0.0)
                }
            };
            weighted += weight * local;
            total_weight += weight;
        }
        let confidence_score = if total_weight > 0.0 {
            weighted / total_weight
        } else {
            0.0
        };

        let any_hard = findings.iter().any(Finding::is_hard);
        let classification =
            if !any_hard && confidence_score >= self.config.acceptance_threshold {
                Classification::Clean
            } else {
                Classification::Flagged
            };

        ConflictReport {
            classification,
            confidence_score,
            findings,
        }
    }
}

impl Default for ConflictClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

/// Count findings for scoring, with entity dedup: findings referencing the
/// same entity count once, at the highest severity present for that
/// entity, so one entity touch is not penalized twice.
fn deduped_counts(findings: &[Finding]) -> (usize, usize) {
    let mut hard = 0usize;
    let mut soft = 0usize;
    let mut per_entity: BTreeMap<&EntityId, Severity> = BTreeMap::new();

    for finding in findings {
        if finding.related_entity_ids.is_empty() {
            match finding.severity {
                Severity::Hard => hard += 1,
                Severity::Soft => soft += 1,
            }
        } else {
            for entity in &finding.related_entity_ids {
                per_entity
                    .entry(entity)
                    .and_modify(|s| *s = (*s).max(finding.severity))
                    .or_insert(finding.severity);
            }
        }
    }

    for severity in per_entity.values() {
        match severity {
            Severity::Hard => hard += 1,
            Severity::Soft => soft += 1,
        }
    }

    (hard, soft)
}

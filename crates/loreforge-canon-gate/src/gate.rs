use std::sync::Arc;

use loreforge_canon_catalog::CatalogSnapshot;
use loreforge_canon_checks::{BatteryConfig, CheckBattery, ConsistencyOracle};
use loreforge_canon_types::{
    CanonLane, CheckName, ConflictReport, ContentKey, ContentSubmission, Finding, QueueStatus,
    ReviewDecision, Verdict,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::classifier::{ClassifierConfig, ConflictClassifier};
use crate::error::GateError;
use crate::lanes::{LaneAssigner, LaneDecision};
use crate::log::{
    DecisionSource, FinalDecision, ValidationLogStore, ValidationRecord,
};
use crate::queue::{ClaimToken, PublishingQueue, PublishingQueueEntry};
use crate::reconciler::Reconciler;
use crate::stores::ContentStore;

/// Configuration for the Canon Gate.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GateConfig {
    pub battery: BatteryConfig,
    pub classifier: ClassifierConfig,
}

/// Answer to a status query: queue state plus the latest audit record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: QueueStatus,
    pub canon_lane: Option<CanonLane>,
    pub last_validation: Option<ValidationRecord>,
}

/// The Canon Gate owns the submit -> validate -> (reconcile) -> decide
/// -> persist/publish state machine.
///
/// The gate is request-driven and `Arc`-shareable across stateless
/// workers: the only in-process state is the publishing queue and the
/// catalog snapshot, which is read-only for the duration of a run.
///
/// Invariants:
/// - At most one validation in flight per content key; a concurrent
///   second submission fails with a conflict instead of racing.
/// - Every run appends a validation record, whatever the outcome.
/// - Content-store visibility and the `published` queue status move
///   together; a partial failure leaves the entry `validating` and
///   retryable.
/// - A run entered is a run finished: caller disconnection does not
///   cancel validation, and the outcome is still recorded.
#[derive(Clone)]
pub struct CanonGate {
    battery: Arc<CheckBattery>,
    classifier: ConflictClassifier,
    assigner: LaneAssigner,
    reconciler: Reconciler,
    catalog: Arc<CatalogSnapshot>,
    queue: Arc<PublishingQueue>,
    content_store: Arc<dyn ContentStore>,
    validation_log: Arc<dyn ValidationLogStore>,
}

impl CanonGate {
    /// A gate running the standard seven-check battery.
    pub fn new(
        catalog: Arc<CatalogSnapshot>,
        oracle: Arc<dyn ConsistencyOracle>,
        content_store: Arc<dyn ContentStore>,
        validation_log: Arc<dyn ValidationLogStore>,
        config: GateConfig,
    ) -> Self {
        let battery = CheckBattery::standard(oracle, config.battery.clone());
        Self::with_battery(battery, catalog, content_store, validation_log, config)
    }

    /// A gate with a caller-assembled battery.
    pub fn with_battery(
        battery: CheckBattery,
        catalog: Arc<CatalogSnapshot>,
        content_store: Arc<dyn ContentStore>,
        validation_log: Arc<dyn ValidationLogStore>,
        config: GateConfig,
    ) -> Self {
        Self {
            battery: Arc::new(battery),
            classifier: ConflictClassifier::new(config.classifier),
            assigner: LaneAssigner::new(),
            reconciler: Reconciler::new(),
            catalog,
            queue: Arc::new(PublishingQueue::new()),
            content_store,
            validation_log,
        }
    }

    /// Submit content for canonization. The single entry point.
    ///
    /// Returns `GateError::Conflict` if a run for the same content key is
    /// already validating. Rejection and review-needed outcomes are
    /// successful verdicts, not errors.
    pub async fn submit(&self, submission: ContentSubmission) -> Result<Verdict, GateError> {
        let key = submission.key.clone();
        let submission_id = submission.id;
        info!(submission = %submission_id, key = %key, "content submitted for canonization");

        let token = self.queue.claim(key.clone(), submission_id)?;

        // Detached so a disconnecting caller cannot cancel the run; the
        // verdict is durably recorded either way. A panic anywhere in the
        // pipeline surfaces here as a retryable internal error, and the
        // dropped claim token releases the key.
        let gate = self.clone();
        let handle =
            tokio::spawn(async move { gate.run_pipeline(Arc::new(submission), token).await });

        match handle.await {
            Ok(result) => result,
            Err(join_err) => {
                error!(
                    submission = %submission_id,
                    key = %key,
                    error = %join_err,
                    "validation run crashed"
                );
                Err(GateError::Internal(format!(
                    "validation run crashed for {key}"
                )))
            }
        }
    }

    /// Apply a reviewer's manual verdict to a `review_needed` entry.
    /// Exactly once: later decisions for the same entry are rejected.
    pub async fn resolve_review(
        &self,
        key: &ContentKey,
        decision: ReviewDecision,
    ) -> Result<Verdict, GateError> {
        let token = self.queue.begin_review(key)?;

        let latest = match self.validation_log.latest_for(key).await? {
            Some(record) => record,
            None => {
                return Err(GateError::Internal(format!(
                    "queue entry for {key} has no validation record"
                )))
            }
        };

        match decision {
            ReviewDecision::Approve { lane } => {
                let proposed = match &latest.decision {
                    FinalDecision::ReviewQueued { proposed_lane } => *proposed_lane,
                    _ => None,
                };
                let lane = lane.or(proposed).unwrap_or(CanonLane::Branch);

                self.content_store.mark_published(key, lane).await?;

                let record = ValidationRecord::new(
                    latest.submission.clone(),
                    Vec::new(),
                    latest.report.clone(),
                    Vec::new(),
                    FinalDecision::Published { lane },
                    DecisionSource::Reviewer,
                );
                let record_id = record.record_id;
                self.validation_log.append(record).await?;
                token.resolve(QueueStatus::Published, Some(lane), record_id);

                info!(key = %key, lane = %lane, "review approved; content published");
                Ok(Verdict {
                    can_publish: true,
                    canon_lane: Some(lane),
                    classification: latest.report.classification,
                    confidence_score: latest.report.confidence_score,
                    conflicts: Vec::new(),
                    auto_reconciliations: latest.reconciliations.clone(),
                    suggestions: Vec::new(),
                })
            }
            ReviewDecision::Reject { reason } => {
                let record = ValidationRecord::new(
                    latest.submission.clone(),
                    Vec::new(),
                    latest.report.clone(),
                    Vec::new(),
                    FinalDecision::Rejected {
                        reason: Some(reason),
                    },
                    DecisionSource::Reviewer,
                );
                let record_id = record.record_id;
                self.validation_log.append(record).await?;
                token.resolve(QueueStatus::Rejected, None, record_id);

                info!(key = %key, "review rejected content");
                Ok(Verdict {
                    can_publish: false,
                    canon_lane: None,
                    classification: latest.report.classification,
                    confidence_score: latest.report.confidence_score,
                    conflicts: latest.report.hard_findings().cloned().collect(),
                    auto_reconciliations: Vec::new(),
                    suggestions: Vec::new(),
                })
            }
        }
    }

    /// Queue state and latest audit record for a content key.
    pub async fn status(&self, key: &ContentKey) -> Result<StatusReport, GateError> {
        let entry = self
            .queue
            .entry(key)
            .ok_or_else(|| GateError::UnknownContent(key.clone()))?;
        let last_validation = self.validation_log.latest_for(key).await?;
        Ok(StatusReport {
            status: entry.status,
            canon_lane: entry.canon_lane,
            last_validation,
        })
    }

    /// Current queue entries, for operational inspection.
    pub fn queue_entries(&self) -> Vec<PublishingQueueEntry> {
        self.queue.entries()
    }

    async fn run_pipeline(
        &self,
        submission: Arc<ContentSubmission>,
        token: ClaimToken,
    ) -> Result<Verdict, GateError> {
        let key = submission.key.clone();

        let results = self
            .battery
            .run(Arc::clone(&submission), Arc::clone(&self.catalog))
            .await;
        let report = self.classifier.classify(&results);
        debug!(
            key = %key,
            classification = %report.classification,
            confidence = report.confidence_score,
            "submission classified"
        );

        let reconciliations = if report.is_clean() {
            self.reconciler
                .reconcile(&submission, &results, &self.catalog)
        } else {
            Vec::new()
        };

        let decision = self.assigner.assign(&report, &submission, &self.catalog);

        let final_decision = match &decision {
            LaneDecision::Publish(lane) => FinalDecision::Published { lane: *lane },
            LaneDecision::ReviewRequired { proposed } => FinalDecision::ReviewQueued {
                proposed_lane: *proposed,
            },
            LaneDecision::Refused => FinalDecision::Rejected { reason: None },
        };

        let record = ValidationRecord::new(
            submission.as_ref().clone(),
            results,
            report.clone(),
            reconciliations.clone(),
            final_decision,
            DecisionSource::Pipeline,
        );
        let record_id = record.record_id;
        // On failure the claim token drops unresolved: the entry stays
        // `validating` and the submission is safe to retry.
        self.validation_log.append(record).await?;

        match decision {
            LaneDecision::Publish(lane) => {
                self.content_store.mark_published(&key, lane).await?;
                token.resolve(QueueStatus::Published, Some(lane), record_id);
                info!(key = %key, lane = %lane, "content published as canon");
                Ok(Verdict {
                    can_publish: true,
                    canon_lane: Some(lane),
                    classification: report.classification,
                    confidence_score: report.confidence_score,
                    conflicts: Vec::new(),
                    auto_reconciliations: reconciliations,
                    suggestions: collect_suggestions(&report),
                })
            }
            LaneDecision::ReviewRequired { proposed } => {
                token.resolve(QueueStatus::ReviewNeeded, proposed, record_id);
                info!(key = %key, "content held for human review");
                Ok(Verdict {
                    can_publish: false,
                    canon_lane: proposed,
                    classification: report.classification,
                    confidence_score: report.confidence_score,
                    conflicts: report.hard_findings().cloned().collect(),
                    auto_reconciliations: reconciliations,
                    suggestions: collect_suggestions(&report),
                })
            }
            LaneDecision::Refused => {
                token.resolve(QueueStatus::Rejected, None, record_id);
                warn!(key = %key, "content rejected by moderation");
                Ok(Verdict {
                    can_publish: false,
                    canon_lane: None,
                    classification: report.classification,
                    confidence_score: report.confidence_score,
                    conflicts: moderation_findings(&report),
                    auto_reconciliations: Vec::new(),
                    suggestions: collect_suggestions(&report),
                })
            }
        }
    }
}

fn collect_suggestions(report: &ConflictReport) -> Vec<String> {
    report
        .findings
        .iter()
        .filter_map(|f| f.suggestion.clone())
        .collect()
}

fn moderation_findings(report: &ConflictReport) -> Vec<Finding> {
    report
        .findings
        .iter()
        .filter(|f| f.check == CheckName::Moderation)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{MemoryValidationLog, RecordFilter};
    use crate::mocks::{FailingValidationLog, FlakyContentStore};
    use crate::stores::MemoryContentStore;
    use loreforge_canon_catalog::{CanonEntity, ModerationPolicy};
    use loreforge_canon_checks::mocks::StallingCheck;
    use loreforge_canon_checks::LexiconOracle;
    use loreforge_canon_types::{
        Classification, ContentKind, CreatorId, EntityId,
    };

    fn ent(id: &str) -> EntityId {
        EntityId::new(id)
    }

    fn sample_catalog() -> Arc<CatalogSnapshot> {
        Arc::new(
            CatalogSnapshot::builder()
                .time_period(ent("age-of-embers"), "Age of Embers", 100, 400)
                .time_period(ent("age-of-glass"), "Age of Glass", 400, 700)
                .entity(
                    CanonEntity::new(ent("elder-thorn"), ContentKind::Character, "Elder Thorn")
                        .locked()
                        .in_period(ent("age-of-embers")),
                )
                .entity(
                    CanonEntity::new(ent("ember-scout"), ContentKind::Character, "Ember Scout")
                        .in_period(ent("age-of-embers")),
                )
                .entity(
                    CanonEntity::new(ent("mirror-queen"), ContentKind::Character, "Mirror Queen")
                        .in_period(ent("age-of-glass")),
                )
                .moderation(ModerationPolicy {
                    banned_terms: vec!["forbidden grimoire".into()],
                    restricted_terms: vec![],
                })
                .build()
                .unwrap(),
        )
    }

    fn setup() -> (CanonGate, Arc<MemoryContentStore>, Arc<MemoryValidationLog>) {
        let store = Arc::new(MemoryContentStore::new());
        let log = Arc::new(MemoryValidationLog::new());
        let gate = CanonGate::new(
            sample_catalog(),
            Arc::new(LexiconOracle::new()),
            Arc::clone(&store) as Arc<dyn ContentStore>,
            Arc::clone(&log) as Arc<dyn ValidationLogStore>,
            GateConfig::default(),
        );
        (gate, store, log)
    }

    fn submission(content_id: &str) -> loreforge_canon_types::ContentSubmissionBuilder {
        ContentSubmission::builder(
            ContentKey::new(ContentKind::Story, ent(content_id)),
            CreatorId::new("mira"),
        )
        .title("The Ferry")
        .body("The ferry crossed at dusk.")
    }

    #[tokio::test]
    async fn standalone_clean_content_publishes_instantly() {
        let (gate, store, log) = setup();
        let sub = submission("tale-1").build();
        let key = sub.key.clone();

        let verdict = gate.submit(sub).await.unwrap();

        assert!(verdict.can_publish);
        assert_eq!(verdict.canon_lane, Some(CanonLane::Instant));
        assert_eq!(verdict.classification, Classification::Clean);
        assert!((verdict.confidence_score - 1.0).abs() < f64::EPSILON);
        assert!(verdict.conflicts.is_empty());

        assert_eq!(store.published_lane(&key), Some(CanonLane::Instant));
        assert_eq!(log.len(), 1);

        let status = gate.status(&key).await.unwrap();
        assert_eq!(status.status, QueueStatus::Published);
        assert_eq!(status.canon_lane, Some(CanonLane::Instant));
    }

    #[tokio::test]
    async fn linked_content_publishes_to_branch_with_reconciliation() {
        let (gate, store, log) = setup();
        let sub = submission("tale-2").link(ent("ember-scout")).build();
        let key = sub.key.clone();
        let title = sub.title.clone();
        let body = sub.body.clone();

        let verdict = gate.submit(sub).await.unwrap();

        assert!(verdict.can_publish);
        assert_eq!(verdict.canon_lane, Some(CanonLane::Branch));
        // The missing time period was inferred from the linked character.
        assert_eq!(verdict.auto_reconciliations.len(), 1);
        assert_eq!(
            verdict.auto_reconciliations[0]
                .inferred_metadata
                .get("time_period"),
            Some(&serde_json::json!("age-of-embers"))
        );
        assert_eq!(store.published_lane(&key), Some(CanonLane::Branch));

        // Reconciliation attached metadata only; the recorded submission
        // is byte-for-byte what was submitted.
        let record = log.latest_for(&key).await.unwrap().unwrap();
        assert_eq!(record.submission.title, title);
        assert_eq!(record.submission.body, body);
        assert!(record.submission.metadata.is_empty());
    }

    #[tokio::test]
    async fn locked_entity_touch_forces_primary_review() {
        let (gate, store, _log) = setup();
        let sub = submission("tale-3").link(ent("elder-thorn")).build();
        let key = sub.key.clone();

        let verdict = gate.submit(sub).await.unwrap();

        // Clean and confident, yet still held: primary impact overrides.
        assert_eq!(verdict.classification, Classification::Clean);
        assert!(verdict.confidence_score >= 0.6);
        assert!(!verdict.can_publish);
        assert_eq!(verdict.canon_lane, Some(CanonLane::Primary));

        assert_eq!(store.published_count(), 0);
        let status = gate.status(&key).await.unwrap();
        assert_eq!(status.status, QueueStatus::ReviewNeeded);
    }

    #[tokio::test]
    async fn moderation_rejection_never_touches_content_store() {
        let (gate, store, log) = setup();
        let sub = submission("tale-4")
            .body("Bound within: the forbidden grimoire, word for word.")
            .build();
        let key = sub.key.clone();

        let verdict = gate.submit(sub).await.unwrap();

        assert_eq!(verdict.classification, Classification::Rejected);
        assert!(!verdict.can_publish);
        assert_eq!(verdict.canon_lane, None);
        assert!(verdict
            .conflicts
            .iter()
            .any(|f| f.check == CheckName::Moderation && f.is_hard()));

        assert_eq!(store.published_count(), 0);
        assert_eq!(log.len(), 1);
        let status = gate.status(&key).await.unwrap();
        assert_eq!(status.status, QueueStatus::Rejected);
    }

    #[tokio::test]
    async fn timeline_contradiction_flags_for_review() {
        let (gate, _store, _log) = setup();
        let sub = submission("tale-5")
            .link(ent("ember-scout"))
            .link(ent("mirror-queen"))
            .build();
        let key = sub.key.clone();

        let verdict = gate.submit(sub).await.unwrap();

        assert_eq!(verdict.classification, Classification::Flagged);
        assert!(!verdict.can_publish);
        assert_eq!(verdict.canon_lane, None);
        assert!(verdict
            .conflicts
            .iter()
            .any(|f| f.check == CheckName::Timeline && f.is_hard()));

        let status = gate.status(&key).await.unwrap();
        assert_eq!(status.status, QueueStatus::ReviewNeeded);
    }

    #[tokio::test]
    async fn concurrent_submissions_for_same_key_conflict() {
        let store = Arc::new(MemoryContentStore::new());
        let log = Arc::new(MemoryValidationLog::new());
        let (stall, started, release) = StallingCheck::new(CheckName::WorldLaw);
        let mut battery = CheckBattery::new(BatteryConfig::default());
        battery.register(Arc::new(stall));
        let gate = CanonGate::with_battery(
            battery,
            sample_catalog(),
            Arc::clone(&store) as Arc<dyn ContentStore>,
            Arc::clone(&log) as Arc<dyn ValidationLogStore>,
            GateConfig::default(),
        );

        let first = submission("tale-6").build();
        let second = submission("tale-6").build();

        let racing_gate = gate.clone();
        let handle = tokio::spawn(async move { racing_gate.submit(first).await });

        // Wait until the first run is demonstrably inside the battery.
        started.notified().await;
        let conflict = gate.submit(second).await;
        assert!(matches!(conflict, Err(GateError::Conflict(_))));

        release.notify_one();
        let verdict = handle.await.unwrap().unwrap();
        assert!(verdict.can_publish);
    }

    #[tokio::test]
    async fn resubmission_appends_record_and_supersedes_entry() {
        let (gate, _store, log) = setup();
        let key = ContentKey::new(ContentKind::Story, ent("tale-7"));

        let first = gate.submit(submission("tale-7").build()).await.unwrap();
        let second = gate.submit(submission("tale-7").build()).await.unwrap();

        // Deterministic checks: equivalent verdicts, fresh audit records.
        assert_eq!(first.classification, second.classification);
        assert_eq!(first.canon_lane, second.canon_lane);
        let records = log
            .query(&RecordFilter::new().with_key(key.clone()))
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_ne!(records[0].record_id, records[1].record_id);

        // One live queue entry, not two.
        assert_eq!(gate.queue_entries().len(), 1);
        let status = gate.status(&key).await.unwrap();
        assert_eq!(status.status, QueueStatus::Published);
    }

    #[tokio::test]
    async fn store_failure_leaves_entry_validating_and_retry_succeeds() {
        let store = Arc::new(FlakyContentStore::failing(1));
        let log = Arc::new(MemoryValidationLog::new());
        let gate = CanonGate::new(
            sample_catalog(),
            Arc::new(LexiconOracle::new()),
            Arc::clone(&store) as Arc<dyn ContentStore>,
            Arc::clone(&log) as Arc<dyn ValidationLogStore>,
            GateConfig::default(),
        );
        let key = ContentKey::new(ContentKind::Story, ent("tale-8"));

        let failure = gate.submit(submission("tale-8").build()).await;
        assert!(matches!(&failure, Err(err) if err.is_retryable()));
        let status = gate.status(&key).await.unwrap();
        assert_eq!(status.status, QueueStatus::Validating);

        // The store recovered; the retry publishes.
        let verdict = gate.submit(submission("tale-8").build()).await.unwrap();
        assert!(verdict.can_publish);
        assert_eq!(store.published_lane(&key), Some(CanonLane::Instant));
        let status = gate.status(&key).await.unwrap();
        assert_eq!(status.status, QueueStatus::Published);
    }

    #[tokio::test]
    async fn log_failure_surfaces_retryable_internal_error() {
        let gate = CanonGate::new(
            sample_catalog(),
            Arc::new(LexiconOracle::new()),
            Arc::new(MemoryContentStore::new()),
            Arc::new(FailingValidationLog),
            GateConfig::default(),
        );

        let failure = gate.submit(submission("tale-9").build()).await;
        assert!(matches!(&failure, Err(err) if err.is_retryable()));
    }

    #[tokio::test]
    async fn review_approval_publishes_exactly_once() {
        let (gate, store, log) = setup();
        let sub = submission("tale-10")
            .link(ent("ember-scout"))
            .link(ent("mirror-queen"))
            .build();
        let key = sub.key.clone();
        gate.submit(sub).await.unwrap();

        let verdict = gate
            .resolve_review(&key, ReviewDecision::Approve { lane: None })
            .await
            .unwrap();
        assert!(verdict.can_publish);
        assert_eq!(verdict.canon_lane, Some(CanonLane::Branch));
        assert_eq!(store.published_lane(&key), Some(CanonLane::Branch));

        let record = log.latest_for(&key).await.unwrap().unwrap();
        assert_eq!(record.source, DecisionSource::Reviewer);

        // A second decision for the same entry is refused.
        let again = gate
            .resolve_review(&key, ReviewDecision::Approve { lane: None })
            .await;
        assert!(matches!(
            again,
            Err(GateError::InvalidReview {
                status: QueueStatus::Published,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn review_approval_defaults_to_proposed_primary_lane() {
        let (gate, store, _log) = setup();
        let sub = submission("tale-11").link(ent("elder-thorn")).build();
        let key = sub.key.clone();
        gate.submit(sub).await.unwrap();

        let verdict = gate
            .resolve_review(&key, ReviewDecision::Approve { lane: None })
            .await
            .unwrap();
        assert_eq!(verdict.canon_lane, Some(CanonLane::Primary));
        assert_eq!(store.published_lane(&key), Some(CanonLane::Primary));
    }

    #[tokio::test]
    async fn review_rejection_is_terminal_and_never_publishes() {
        let (gate, store, log) = setup();
        let sub = submission("tale-12")
            .link(ent("ember-scout"))
            .link(ent("mirror-queen"))
            .build();
        let key = sub.key.clone();
        gate.submit(sub).await.unwrap();

        let verdict = gate
            .resolve_review(
                &key,
                ReviewDecision::Reject {
                    reason: "contradicts the founding era".into(),
                },
            )
            .await
            .unwrap();
        assert!(!verdict.can_publish);
        assert_eq!(store.published_count(), 0);

        let record = log.latest_for(&key).await.unwrap().unwrap();
        assert!(matches!(
            &record.decision,
            FinalDecision::Rejected { reason: Some(r) } if r.contains("founding era")
        ));

        let status = gate.status(&key).await.unwrap();
        assert_eq!(status.status, QueueStatus::Rejected);
    }

    #[tokio::test]
    async fn review_on_unknown_content_errors() {
        let (gate, _store, _log) = setup();
        let key = ContentKey::new(ContentKind::Story, ent("never-submitted"));
        let result = gate
            .resolve_review(&key, ReviewDecision::Approve { lane: None })
            .await;
        assert!(matches!(result, Err(GateError::UnknownContent(_))));
    }

    #[tokio::test]
    async fn disconnected_caller_does_not_cancel_the_run() {
        let store = Arc::new(MemoryContentStore::new());
        let log = Arc::new(MemoryValidationLog::new());
        let (stall, started, release) = StallingCheck::new(CheckName::WorldLaw);
        let mut battery = CheckBattery::new(BatteryConfig::default());
        battery.register(Arc::new(stall));
        let gate = CanonGate::with_battery(
            battery,
            sample_catalog(),
            Arc::clone(&store) as Arc<dyn ContentStore>,
            Arc::clone(&log) as Arc<dyn ValidationLogStore>,
            GateConfig::default(),
        );
        let key = ContentKey::new(ContentKind::Story, ent("tale-13"));

        let submitting_gate = gate.clone();
        let caller = tokio::spawn(async move {
            submitting_gate
                .submit(submission("tale-13").build())
                .await
        });

        started.notified().await;
        // The caller goes away mid-validation.
        caller.abort();
        assert!(caller.await.is_err());

        release.notify_one();
        // The run still completes and records its outcome.
        let mut published = false;
        for _ in 0..100 {
            if let Ok(status) = gate.status(&key).await {
                if status.status == QueueStatus::Published {
                    published = true;
                    break;
                }
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(published);
        assert_eq!(store.published_lane(&key), Some(CanonLane::Instant));
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn status_includes_latest_validation_record() {
        let (gate, _store, _log) = setup();
        let sub = submission("tale-14").build();
        let key = sub.key.clone();
        gate.submit(sub).await.unwrap();

        let status = gate.status(&key).await.unwrap();
        let record = status.last_validation.unwrap();
        assert_eq!(record.report.classification, Classification::Clean);
        assert!(matches!(
            record.decision,
            FinalDecision::Published {
                lane: CanonLane::Instant,
            }
        ));
    }

    #[tokio::test]
    async fn status_for_unknown_content_errors() {
        let (gate, _store, _log) = setup();
        let key = ContentKey::new(ContentKind::Story, ent("never-submitted"));
        assert!(matches!(
            gate.status(&key).await,
            Err(GateError::UnknownContent(_))
        ));
    }
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use loreforge_canon_types::{CanonLane, ContentKey, QueueStatus, RecordId, SubmissionId};
use serde::{Deserialize, Serialize};

use crate::error::QueueError;

/// Lifecycle record for one content key. Exactly one live entry exists
/// per key; resubmission supersedes the prior entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PublishingQueueEntry {
    pub key: ContentKey,
    pub submission_id: SubmissionId,
    pub status: QueueStatus,
    pub canon_lane: Option<CanonLane>,
    pub validation_ref: Option<RecordId>,
    pub submitted_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

struct Slot {
    entry: PublishingQueueEntry,
    in_flight: bool,
}

type Slots = Arc<Mutex<HashMap<ContentKey, Slot>>>;

/// In-process publishing queue enforcing at-most-one-in-flight per
/// content key.
///
/// The in-flight guarantee is held by a [`ClaimToken`], not by the
/// entry's status: a claim that is dropped without resolving (a crashed
/// or failed run) releases the key while the entry stays `validating`,
/// so a retry can claim cleanly and nothing is ever permanently stuck.
pub struct PublishingQueue {
    slots: Slots,
}

impl PublishingQueue {
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Atomically claim a key for validation.
    ///
    /// Fails iff a claim for the key is currently held. A prior terminal
    /// entry is superseded by a fresh `validating` entry.
    pub fn claim(
        &self,
        key: ContentKey,
        submission_id: SubmissionId,
    ) -> Result<ClaimToken, QueueError> {
        let mut slots = self.slots.lock().expect("queue mutex poisoned");
        if let Some(slot) = slots.get(&key) {
            if slot.in_flight {
                return Err(QueueError::InFlight(key));
            }
        }
        let entry = PublishingQueueEntry {
            key: key.clone(),
            submission_id,
            status: QueueStatus::Validating,
            canon_lane: None,
            validation_ref: None,
            submitted_at: Utc::now(),
            resolved_at: None,
        };
        slots.insert(key.clone(), Slot {
            entry,
            in_flight: true,
        });
        Ok(ClaimToken {
            slots: Arc::clone(&self.slots),
            key,
            settled: false,
        })
    }

    /// Claim a `review_needed` entry for its exactly-once manual
    /// resolution. Fails for any other status, or while another reviewer
    /// holds the claim.
    pub fn begin_review(&self, key: &ContentKey) -> Result<ClaimToken, QueueError> {
        let mut slots = self.slots.lock().expect("queue mutex poisoned");
        let slot = slots
            .get_mut(key)
            .ok_or_else(|| QueueError::NotFound(key.clone()))?;
        if slot.in_flight {
            return Err(QueueError::InFlight(key.clone()));
        }
        if slot.entry.status != QueueStatus::ReviewNeeded {
            return Err(QueueError::InvalidTransition {
                key: key.clone(),
                from: slot.entry.status,
            });
        }
        slot.in_flight = true;
        Ok(ClaimToken {
            slots: Arc::clone(&self.slots),
            key: key.clone(),
            settled: false,
        })
    }

    pub fn entry(&self, key: &ContentKey) -> Option<PublishingQueueEntry> {
        let slots = self.slots.lock().expect("queue mutex poisoned");
        slots.get(key).map(|slot| slot.entry.clone())
    }

    pub fn entries(&self) -> Vec<PublishingQueueEntry> {
        let slots = self.slots.lock().expect("queue mutex poisoned");
        slots.values().map(|slot| slot.entry.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.lock().expect("queue mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PublishingQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive hold on one queue key while a run (or review) is in flight.
///
/// Dropping the token without resolving releases the claim and leaves the
/// entry's status untouched.
pub struct ClaimToken {
    slots: Slots,
    key: ContentKey,
    settled: bool,
}

impl ClaimToken {
    pub fn key(&self) -> &ContentKey {
        &self.key
    }

    /// Flip the claimed entry to a terminal status and release the claim.
    pub fn resolve(
        mut self,
        status: QueueStatus,
        lane: Option<CanonLane>,
        validation_ref: RecordId,
    ) {
        let mut slots = self.slots.lock().expect("queue mutex poisoned");
        if let Some(slot) = slots.get_mut(&self.key) {
            slot.entry.status = status;
            slot.entry.canon_lane = lane;
            slot.entry.validation_ref = Some(validation_ref);
            slot.entry.resolved_at = Some(Utc::now());
            slot.in_flight = false;
        }
        self.settled = true;
    }

    /// Release the claim without resolving the entry.
    pub fn release(self) {
        // Drop does the work.
    }
}

impl Drop for ClaimToken {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        if let Ok(mut slots) = self.slots.lock() {
            if let Some(slot) = slots.get_mut(&self.key) {
                slot.in_flight = false;
            }
        }
    }
}

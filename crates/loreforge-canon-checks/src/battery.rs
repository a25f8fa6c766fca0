use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use loreforge_canon_catalog::CatalogSnapshot;
use loreforge_canon_types::{CheckResult, ContentSubmission, Finding};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::checks::{
    CharacterCheck, GeographyCheck, MetaphysicsCheck, ModerationCheck, TimelineCheck, ToneCheck,
    WorldLawCheck,
};
use crate::traits::{CanonCheck, ConsistencyOracle};

/// Configuration for the check battery.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatteryConfig {
    /// Per-check deadline. A check that exceeds it is degraded to a
    /// partial verdict, not a pipeline abort.
    pub check_timeout: Duration,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            check_timeout: Duration::from_secs(5),
        }
    }
}

/// The battery runs every registered check concurrently against one
/// catalog snapshot and reports results in registration order.
///
/// No check outcome can abort the run: an `Err`, a panic, or a timeout in
/// one check degrades that check to `Partial` with a soft finding while
/// the rest of the battery completes normally.
pub struct CheckBattery {
    checks: Vec<Arc<dyn CanonCheck>>,
    config: BatteryConfig,
}

impl CheckBattery {
    pub fn new(config: BatteryConfig) -> Self {
        Self {
            checks: Vec::new(),
            config,
        }
    }

    /// The seven standard checks in canonical order.
    pub fn standard(oracle: Arc<dyn ConsistencyOracle>, config: BatteryConfig) -> Self {
        let mut battery = Self::new(config);
        battery.register(Arc::new(WorldLawCheck::new()));
        battery.register(Arc::new(MetaphysicsCheck::new(Arc::clone(&oracle))));
        battery.register(Arc::new(TimelineCheck::new()));
        battery.register(Arc::new(GeographyCheck::new()));
        battery.register(Arc::new(CharacterCheck::new()));
        battery.register(Arc::new(ToneCheck::new(oracle)));
        battery.register(Arc::new(ModerationCheck::new()));
        battery
    }

    pub fn register(&mut self, check: Arc<dyn CanonCheck>) {
        self.checks.push(check);
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run every check concurrently. Returns one result per registered
    /// check, in registration order regardless of completion order.
    pub async fn run(
        &self,
        submission: Arc<ContentSubmission>,
        catalog: Arc<CatalogSnapshot>,
    ) -> Vec<CheckResult> {
        let futures = self.checks.iter().map(|check| {
            let check = Arc::clone(check);
            let submission = Arc::clone(&submission);
            let catalog = Arc::clone(&catalog);
            let timeout = self.config.check_timeout;

            async move {
                let name = check.name();
                let handle =
                    tokio::spawn(async move { check.evaluate(&submission, &catalog).await });

                match tokio::time::timeout(timeout, handle).await {
                    Ok(Ok(Ok(result))) => {
                        debug!(check = %name, verdict = ?result.verdict, "check evaluated");
                        result
                    }
                    Ok(Ok(Err(err))) => {
                        warn!(check = %name, error = %err, "check degraded to partial");
                        degraded(name, format!("check could not evaluate: {err}"))
                    }
                    Ok(Err(join_err)) => {
                        warn!(check = %name, error = %join_err, "check crashed; degraded to partial");
                        degraded(name, "check crashed during evaluation".to_string())
                    }
                    Err(_) => {
                        warn!(check = %name, timeout_ms = timeout.as_millis() as u64, "check timed out; degraded to partial");
                        degraded(name, "check timed out".to_string())
                    }
                }
            }
        });

        join_all(futures).await
    }
}

fn degraded(name: loreforge_canon_types::CheckName, reason: String) -> CheckResult {
    CheckResult::partial(name, vec![Finding::soft(name, reason)])
}

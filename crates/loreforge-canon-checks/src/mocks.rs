//! Test doubles for checks and oracles.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use loreforge_canon_catalog::CatalogSnapshot;
use loreforge_canon_types::{CheckName, CheckResult, ContentSubmission};
use tokio::sync::Notify;

use crate::error::{CheckError, OracleError};
use crate::traits::{CanonCheck, ConsistencyOracle, OracleAssessment, OracleAxis};

/// Oracle that replays scripted assessments per axis; unscripted axes are
/// consistent.
#[derive(Default)]
pub struct ScriptedOracle {
    assessments: HashMap<OracleAxis, OracleAssessment>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assessment(mut self, axis: OracleAxis, assessment: OracleAssessment) -> Self {
        self.assessments.insert(axis, assessment);
        self
    }
}

#[async_trait]
impl ConsistencyOracle for ScriptedOracle {
    async fn assess(
        &self,
        axis: OracleAxis,
        _submission: &ContentSubmission,
    ) -> Result<OracleAssessment, OracleError> {
        Ok(self
            .assessments
            .get(&axis)
            .cloned()
            .unwrap_or_else(OracleAssessment::consistent))
    }
}

/// Oracle that always fails, for degradation tests.
pub struct FailingOracle {
    message: String,
}

impl FailingOracle {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl ConsistencyOracle for FailingOracle {
    async fn assess(
        &self,
        _axis: OracleAxis,
        _submission: &ContentSubmission,
    ) -> Result<OracleAssessment, OracleError> {
        Err(OracleError::Unavailable(self.message.clone()))
    }
}

/// Check that returns a fixed result.
pub struct FixedCheck {
    result: CheckResult,
}

impl FixedCheck {
    pub fn new(result: CheckResult) -> Self {
        Self { result }
    }
}

#[async_trait]
impl CanonCheck for FixedCheck {
    fn name(&self) -> CheckName {
        self.result.check
    }

    async fn evaluate(
        &self,
        _submission: &ContentSubmission,
        _catalog: &CatalogSnapshot,
    ) -> Result<CheckResult, CheckError> {
        Ok(self.result.clone())
    }
}

/// Check that sleeps for a fixed duration before passing, for timeout
/// tests.
pub struct SleepingCheck {
    name: CheckName,
    delay: Duration,
}

impl SleepingCheck {
    pub fn new(name: CheckName, delay: Duration) -> Self {
        Self { name, delay }
    }
}

#[async_trait]
impl CanonCheck for SleepingCheck {
    fn name(&self) -> CheckName {
        self.name
    }

    async fn evaluate(
        &self,
        _submission: &ContentSubmission,
        _catalog: &CatalogSnapshot,
    ) -> Result<CheckResult, CheckError> {
        tokio::time::sleep(self.delay).await;
        Ok(CheckResult::pass(self.name))
    }
}

/// Check that panics, for crash-isolation tests.
pub struct PanickingCheck {
    name: CheckName,
}

impl PanickingCheck {
    pub fn new(name: CheckName) -> Self {
        Self { name }
    }
}

#[async_trait]
impl CanonCheck for PanickingCheck {
    fn name(&self) -> CheckName {
        self.name
    }

    async fn evaluate(
        &self,
        _submission: &ContentSubmission,
        _catalog: &CatalogSnapshot,
    ) -> Result<CheckResult, CheckError> {
        panic!("induced check crash");
    }
}

/// Check that signals when it starts and blocks until released. Lets
/// tests hold a validation run open at a known point.
pub struct StallingCheck {
    name: CheckName,
    started: Arc<Notify>,
    release: Arc<Notify>,
}

impl StallingCheck {
    /// Returns the check plus the `started` and `release` handles.
    pub fn new(name: CheckName) -> (Self, Arc<Notify>, Arc<Notify>) {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        (
            Self {
                name,
                started: Arc::clone(&started),
                release: Arc::clone(&release),
            },
            started,
            release,
        )
    }
}

#[async_trait]
impl CanonCheck for StallingCheck {
    fn name(&self) -> CheckName {
        self.name
    }

    async fn evaluate(
        &self,
        _submission: &ContentSubmission,
        _catalog: &CatalogSnapshot,
    ) -> Result<CheckResult, CheckError> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(CheckResult::pass(self.name))
    }
}

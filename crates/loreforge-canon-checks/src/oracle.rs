use std::collections::HashMap;

use async_trait::async_trait;
use loreforge_canon_types::{ContentSubmission, Severity};

use crate::error::OracleError;
use crate::traits::{ConsistencyOracle, OracleAssessment, OracleAxis, OracleConcern};

/// A term-scan rule for one oracle axis.
#[derive(Clone, Debug)]
pub struct LexiconRule {
    pub term: String,
    pub severity: Severity,
    pub note: String,
}

/// The bundled deterministic oracle: judges an axis by scanning the
/// submission for configured terms. An empty lexicon finds everything
/// consistent.
///
/// Richer oracles (an LLM-backed assessor, a world-model service) plug in
/// behind the same [`ConsistencyOracle`] contract; the engine only relies
/// on determinism per submission.
#[derive(Default)]
pub struct LexiconOracle {
    rules: HashMap<OracleAxis, Vec<LexiconRule>>,
}

impl LexiconOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(
        mut self,
        axis: OracleAxis,
        term: impl Into<String>,
        severity: Severity,
        note: impl Into<String>,
    ) -> Self {
        self.rules.entry(axis).or_default().push(LexiconRule {
            term: term.into(),
            severity,
            note: note.into(),
        });
        self
    }
}

#[async_trait]
impl ConsistencyOracle for LexiconOracle {
    async fn assess(
        &self,
        axis: OracleAxis,
        submission: &ContentSubmission,
    ) -> Result<OracleAssessment, OracleError> {
        let haystack =
            format!("{}\n{}", submission.title, submission.body).to_lowercase();

        let concerns = self
            .rules
            .get(&axis)
            .map(|rules| {
                rules
                    .iter()
                    .filter(|rule| haystack.contains(&rule.term.to_lowercase()))
                    .map(|rule| OracleConcern {
                        description: format!("{} (matched \"{}\")", rule.note, rule.term),
                        severity: rule.severity,
                        related_entity_ids: Vec::new(),
                        suggestion: None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(OracleAssessment { concerns })
    }
}

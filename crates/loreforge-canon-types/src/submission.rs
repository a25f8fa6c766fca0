use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::{CreatorId, EntityId, SubmissionId};

/// Kinds of creative content the pipeline admits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    Story,
    Character,
    Location,
    Quest,
    LoreEntry,
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ContentKind::Story => "story",
            ContentKind::Character => "character",
            ContentKind::Location => "location",
            ContentKind::Quest => "quest",
            ContentKind::LoreEntry => "lore-entry",
        };
        write!(f, "{name}")
    }
}

/// The identity the publishing queue serializes on.
///
/// There is at most one live queue entry per key; resubmission of the same
/// content supersedes the prior entry rather than duplicating it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentKey {
    pub kind: ContentKind,
    pub content_id: EntityId,
}

impl ContentKey {
    pub fn new(kind: ContentKind, content_id: EntityId) -> Self {
        Self { kind, content_id }
    }
}

impl std::fmt::Display for ContentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.content_id)
    }
}

/// The unit under review. Immutable once accepted into the pipeline.
///
/// `metadata` is free-form, ordered, and the only place automatic
/// reconciliation may attach inferred values; title and body are never
/// altered by the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentSubmission {
    pub id: SubmissionId,
    pub key: ContentKey,
    pub creator: CreatorId,
    pub title: String,
    pub body: String,
    pub metadata: BTreeMap<String, serde_json::Value>,
    /// Established canon entities this content touches. Empty means the
    /// content stands alone and is eligible for the instant lane.
    pub linked_entity_ids: Vec<EntityId>,
}

impl ContentSubmission {
    pub fn builder(key: ContentKey, creator: CreatorId) -> ContentSubmissionBuilder {
        ContentSubmissionBuilder::new(key, creator)
    }

    /// Whether this content touches established canon.
    pub fn touches_existing_canon(&self) -> bool {
        !self.linked_entity_ids.is_empty()
    }
}

/// Builder for [`ContentSubmission`].
pub struct ContentSubmissionBuilder {
    key: ContentKey,
    creator: CreatorId,
    title: String,
    body: String,
    metadata: BTreeMap<String, serde_json::Value>,
    linked_entity_ids: Vec<EntityId>,
}

impl ContentSubmissionBuilder {
    pub fn new(key: ContentKey, creator: CreatorId) -> Self {
        Self {
            key,
            creator,
            title: String::new(),
            body: String::new(),
            metadata: BTreeMap::new(),
            linked_entity_ids: Vec::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn link(mut self, entity: EntityId) -> Self {
        self.linked_entity_ids.push(entity);
        self
    }

    pub fn build(self) -> ContentSubmission {
        ContentSubmission {
            id: SubmissionId::new(),
            key: self.key,
            creator: self.creator,
            title: self.title,
            body: self.body,
            metadata: self.metadata,
            linked_entity_ids: self.linked_entity_ids,
        }
    }
}

pub mod character;
pub mod geography;
pub mod metaphysics;
pub mod moderation;
pub mod timeline;
pub mod tone;
pub mod world_law;

pub use character::CharacterCheck;
pub use geography::GeographyCheck;
pub use metaphysics::MetaphysicsCheck;
pub use moderation::ModerationCheck;
pub use timeline::TimelineCheck;
pub use tone::ToneCheck;
pub use world_law::WorldLawCheck;

use loreforge_canon_types::ContentSubmission;

/// The text a lexical check scans: title and body, lowercased.
pub(crate) fn searchable_text(submission: &ContentSubmission) -> String {
    format!("{}\n{}", submission.title, submission.body).to_lowercase()
}

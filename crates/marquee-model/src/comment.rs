#![forbid(unsafe_code)]

//! Comment entity and the new-comment draft.

use crate::film::FilmId;
use chrono::{DateTime, Utc};

/// Identity of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommentId(pub u32);

/// Reaction attached to a comment. Exactly these four exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Emoji {
    Smile,
    Sleeping,
    Puke,
    Angry,
}

impl Emoji {
    pub const ALL: [Emoji; 4] = [Emoji::Smile, Emoji::Sleeping, Emoji::Puke, Emoji::Angry];

    /// Asset name used by the templates.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Smile => "smile",
            Self::Sleeping => "sleeping",
            Self::Puke => "puke",
            Self::Angry => "angry",
        }
    }
}

/// A comment, associated to exactly one film.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Comment {
    pub id: CommentId,
    pub film_id: FilmId,
    pub text: String,
    pub emoji: Emoji,
    pub author: String,
    pub date: DateTime<Utc>,
}

/// Unsaved new-comment form state.
///
/// Lives in the open detail view; discarded on Escape-close, preserved
/// across a failed save.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommentDraft {
    pub text: String,
    pub emoji: Option<Emoji>,
}

impl CommentDraft {
    /// A draft is submittable once it has text and a chosen reaction.
    pub fn is_complete(&self) -> bool {
        !self.text.is_empty() && self.emoji.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_completeness() {
        let mut draft = CommentDraft::default();
        assert!(!draft.is_complete());

        draft.text = "Booooooooooring".to_owned();
        assert!(!draft.is_complete());

        draft.emoji = Some(Emoji::Sleeping);
        assert!(draft.is_complete());
    }

    #[test]
    fn emoji_asset_names() {
        let names: Vec<&str> = Emoji::ALL.iter().map(|e| e.as_str()).collect();
        assert_eq!(names, vec!["smile", "sleeping", "puke", "angry"]);
    }
}

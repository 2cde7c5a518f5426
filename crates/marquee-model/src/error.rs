#![forbid(unsafe_code)]

//! Model error taxonomy.

use crate::comment::CommentId;
use crate::film::FilmId;
use std::fmt;

/// Errors raised by model mutations and presenter state transitions.
///
/// `NotFound`-kind errors are surfaced to the caller without notifying any
/// observer; the board keeps working. `InvalidTransition` rejects an action
/// that arrived while an earlier one is still settling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelError {
    /// A mutation referenced a film id the model does not hold.
    FilmNotFound(FilmId),

    /// A mutation referenced a comment id absent from the film's cache.
    CommentNotFound(CommentId),

    /// A comment mutation targeted a film whose comments were never loaded.
    CommentsNotLoaded(FilmId),

    /// An action was rejected because the target is mid-transition
    /// (e.g. a delete issued while a save is still in flight).
    InvalidTransition(&'static str),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FilmNotFound(id) => write!(f, "unknown film id {}", id.0),
            Self::CommentNotFound(id) => write!(f, "unknown comment id {}", id.0),
            Self::CommentsNotLoaded(id) => {
                write!(f, "comments for film {} are not loaded", id.0)
            }
            Self::InvalidTransition(what) => write!(f, "invalid transition: {what}"),
        }
    }
}

impl std::error::Error for ModelError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_entity() {
        let err = ModelError::FilmNotFound(FilmId(7));
        assert_eq!(err.to_string(), "unknown film id 7");

        let err = ModelError::InvalidTransition("save in flight");
        assert_eq!(err.to_string(), "invalid transition: save in flight");
    }
}

#![forbid(unsafe_code)]

//! Marquee public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for embedders. It
//! re-exports the model, render, view, and presenter types from the internal
//! crates and offers a lightweight prelude for day-to-day usage.

use std::fmt;

// --- Model re-exports ------------------------------------------------------

pub use marquee_model::{
    Comment, CommentDraft, CommentId, CommentsEvent, CommentsModel, Emoji, Film, FilmFlags,
    FilmId, FilmsModel, FilterModel, FilterType, ModelError, ObserverId, ObserverList, SortType,
    UpdateType, mock,
};

// --- Render re-exports -----------------------------------------------------

pub use marquee_render::{
    Document, HandlerId, KeyCode, KeyEvent, Modifiers, NodeId, Position, escape_text,
};

// --- View re-exports -------------------------------------------------------

pub use marquee_view::{
    CommentAction, ControlType, DetailFormState, DetailView, EmptyBoardView, FilmCardView,
    ShakeTarget, ShowMoreView, SortBarView, View,
};

// --- Runtime re-exports ----------------------------------------------------

pub use marquee_runtime::{
    BoardPresenter, CommentService, FilmPresenter, FormState, PAGE_SIZE, PopupSlot,
    SHAKE_DURATION, ServiceError, ViewAction,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for marquee embedders.
#[derive(Debug)]
pub enum Error {
    /// A model mutation was rejected.
    Model(ModelError),
    /// The simulated comment backend rejected a request.
    Service(ServiceError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model(err) => write!(f, "{err}"),
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ModelError> for Error {
    fn from(err: ModelError) -> Self {
        Self::Model(err)
    }
}

impl From<ServiceError> for Error {
    fn from(err: ServiceError) -> Self {
        Self::Service(err)
    }
}

/// Standard result type for marquee APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BoardPresenter, CommentService, CommentsModel, Document, Error, Film, FilmsModel,
        FilterModel, FilterType, Result, SortType, UpdateType,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_wrap_and_display() {
        let err: Error = ModelError::FilmNotFound(FilmId(3)).into();
        assert_eq!(err.to_string(), "unknown film id 3");

        let err: Error = ServiceError::Rejected.into();
        assert!(err.to_string().contains("rejected"));
    }
}

#![forbid(unsafe_code)]

//! Presenter layer for the marquee film catalog.
//!
//! [`BoardPresenter`] owns the board: it derives the filtered/sorted/paged
//! film slice, keeps exactly one [`FilmPresenter`] per rendered card, and
//! routes model notifications into patch-or-rebuild decisions. Each
//! [`FilmPresenter`] runs the lifecycle of one card and its detail popup,
//! including the optimistic save/delete states and the timed abort shake.
//!
//! The only asynchronous boundary is the [`CommentService`]; everything else
//! is synchronous and driven by the embedder's clock through
//! [`BoardPresenter::tick`].

pub mod board;
pub mod film;
pub mod popup;
pub mod service;

pub use board::{BoardPresenter, PAGE_SIZE};
pub use film::{FilmPresenter, FormState, SHAKE_DURATION};
pub use popup::{PopupRestore, PopupSlot};
pub use service::{CommentService, ServiceError, ServiceRequest, ServiceResponse};

use marquee_model::{CommentDraft, CommentId, Film, FilmId, UpdateType};

/// A user intention raised by a view, translated by the presenters into
/// model mutations. Comment actions imply [`UpdateType::Minor`]: the
/// denormalized comment count on the card must refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewAction {
    /// Replace a film (flag toggle or comment-count bump).
    UpdateFilm { update: UpdateType, film: Film },

    /// Request the lazy comment load for a film's first popup open.
    LoadComments { film_id: FilmId },

    /// Save the draft as a new comment on a film.
    AddComment { film_id: FilmId, draft: CommentDraft },

    /// Delete one comment from a film.
    DeleteComment {
        film_id: FilmId,
        comment_id: CommentId,
    },
}

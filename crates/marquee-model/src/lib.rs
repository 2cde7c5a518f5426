#![forbid(unsafe_code)]

//! Data layer for the marquee film board.
//!
//! Three observable models hold all session state:
//!
//! - [`FilmsModel`] — the full film list, mutated in place by toggle actions
//! - [`CommentsModel`] — per-film comment caches, lazily loaded
//! - [`FilterModel`] — the active filter selection
//!
//! Mutation methods apply their change synchronously, then notify every
//! registered observer with an [`UpdateType`] describing how much of the
//! board the change invalidates. A mutation either fully succeeds and
//! notifies, or fails with a [`ModelError`] and notifies nobody.

pub mod comment;
pub mod comments;
pub mod error;
pub mod film;
pub mod films;
pub mod filter;
pub mod mock;
pub mod observe;
pub mod sort;

pub use comment::{Comment, CommentDraft, CommentId, Emoji};
pub use comments::{CommentsEvent, CommentsModel};
pub use error::ModelError;
pub use film::{Film, FilmFlags, FilmId};
pub use films::FilmsModel;
pub use filter::{FilterModel, FilterType};
pub use observe::{ObserverId, ObserverList, UpdateType};
pub use sort::SortType;

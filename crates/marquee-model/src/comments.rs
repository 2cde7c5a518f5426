#![forbid(unsafe_code)]

//! Observable per-film comment caches.
//!
//! Comments are loaded lazily: a film's cache is absent until the first
//! popup open requests a load and [`set_comments`](CommentsModel::set_comments)
//! lands it. The loaded set is remembered so reopening a popup renders from
//! cache immediately.

use crate::comment::{Comment, CommentId};
use crate::error::ModelError;
use crate::film::FilmId;
use crate::observe::{Observer, ObserverId, ObserverList, UpdateType};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Payload delivered to comments-model observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentsEvent {
    /// A film's comments finished loading into the cache.
    Loaded { film_id: FilmId },

    /// A comment was appended to a film's cache.
    Added {
        film_id: FilmId,
        comment_id: CommentId,
    },

    /// A comment was removed from a film's cache.
    Deleted {
        film_id: FilmId,
        comment_id: CommentId,
    },
}

/// Comment caches keyed by film id, plus the loaded set.
pub struct CommentsModel {
    by_film: RefCell<HashMap<FilmId, Vec<Comment>>>,
    loaded: RefCell<HashSet<FilmId>>,
    observers: ObserverList<CommentsEvent>,
}

impl CommentsModel {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            by_film: RefCell::new(HashMap::new()),
            loaded: RefCell::new(HashSet::new()),
            observers: ObserverList::new(),
        })
    }

    /// Cached comments for a film; empty when never loaded.
    pub fn comments(&self, film_id: FilmId) -> Vec<Comment> {
        self.by_film
            .borrow()
            .get(&film_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_loaded(&self, film_id: FilmId) -> bool {
        self.loaded.borrow().contains(&film_id)
    }

    pub fn add_observer(&self, observer: Observer<CommentsEvent>) -> ObserverId {
        self.observers.add(observer)
    }

    pub fn remove_observer(&self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    /// Land a completed load, marking the film id loaded.
    ///
    /// Notifies with [`UpdateType::Patch`]: only the popup showing this film
    /// needs to refresh.
    pub fn set_comments(&self, film_id: FilmId, comments: Vec<Comment>) {
        self.by_film.borrow_mut().insert(film_id, comments);
        self.loaded.borrow_mut().insert(film_id);

        #[cfg(feature = "tracing")]
        tracing::debug!(film = film_id.0, "comments loaded");

        self.observers
            .notify(UpdateType::Patch, &CommentsEvent::Loaded { film_id });
    }

    /// Append a comment to a loaded film's cache, then notify.
    pub fn add_comment(
        &self,
        update: UpdateType,
        film_id: FilmId,
        comment: Comment,
    ) -> Result<(), ModelError> {
        if !self.is_loaded(film_id) {
            return Err(ModelError::CommentsNotLoaded(film_id));
        }

        let comment_id = comment.id;
        self.by_film
            .borrow_mut()
            .entry(film_id)
            .or_default()
            .push(comment);

        self.observers.notify(
            update,
            &CommentsEvent::Added {
                film_id,
                comment_id,
            },
        );
        Ok(())
    }

    /// Remove a comment from a loaded film's cache, then notify.
    pub fn delete_comment(
        &self,
        update: UpdateType,
        film_id: FilmId,
        comment_id: CommentId,
    ) -> Result<(), ModelError> {
        if !self.is_loaded(film_id) {
            return Err(ModelError::CommentsNotLoaded(film_id));
        }

        {
            let mut by_film = self.by_film.borrow_mut();
            let comments = by_film
                .get_mut(&film_id)
                .ok_or(ModelError::CommentsNotLoaded(film_id))?;
            let index = comments
                .iter()
                .position(|comment| comment.id == comment_id)
                .ok_or(ModelError::CommentNotFound(comment_id))?;
            comments.remove(index);
        }

        self.observers.notify(
            update,
            &CommentsEvent::Deleted {
                film_id,
                comment_id,
            },
        );
        Ok(())
    }
}

#![forbid(unsafe_code)]

//! Observable film list.

use crate::error::ModelError;
use crate::film::{Film, FilmId};
use crate::observe::{Observer, ObserverId, ObserverList, UpdateType};
use std::cell::RefCell;
use std::rc::Rc;

/// The full film list plus its observer registry.
///
/// Films are created once at startup and never deleted during a session;
/// [`update_film`](Self::update_film) replaces a film in place.
pub struct FilmsModel {
    films: RefCell<Vec<Film>>,
    observers: ObserverList<Film>,
}

impl FilmsModel {
    pub fn new(films: Vec<Film>) -> Rc<Self> {
        Rc::new(Self {
            films: RefCell::new(films),
            observers: ObserverList::new(),
        })
    }

    /// Snapshot of the film list in model order.
    pub fn films(&self) -> Vec<Film> {
        self.films.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.films.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.films.borrow().is_empty()
    }

    pub fn get(&self, id: FilmId) -> Option<Film> {
        self.films.borrow().iter().find(|film| film.id == id).cloned()
    }

    pub fn add_observer(&self, observer: Observer<Film>) -> ObserverId {
        self.observers.add(observer)
    }

    pub fn remove_observer(&self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    /// Replace the film with `film.id`, then notify observers with the
    /// updated film.
    ///
    /// Fails with [`ModelError::FilmNotFound`] — and notifies nobody — when
    /// the id is unknown.
    pub fn update_film(&self, update: UpdateType, film: Film) -> Result<(), ModelError> {
        {
            let mut films = self.films.borrow_mut();
            let slot = films
                .iter_mut()
                .find(|candidate| candidate.id == film.id)
                .ok_or(ModelError::FilmNotFound(film.id))?;
            *slot = film.clone();
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(film = film.id.0, update = ?update, "film updated");

        self.observers.notify(update, &film);
        Ok(())
    }
}

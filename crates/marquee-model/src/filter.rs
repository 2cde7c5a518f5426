#![forbid(unsafe_code)]

//! Filter selection and predicates.

use crate::film::{Film, FilmFlags};
use crate::observe::{Observer, ObserverId, ObserverList, UpdateType};
use std::cell::Cell;
use std::rc::Rc;

/// Which slice of the catalog the board shows. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterType {
    /// All films.
    #[default]
    Default,
    Watchlist,
    Watched,
    Favourites,
}

impl FilterType {
    /// The flag whose membership this filter tracks, if any.
    pub fn tracked_flag(self) -> Option<FilmFlags> {
        match self {
            Self::Default => None,
            Self::Watchlist => Some(FilmFlags::WATCHLIST),
            Self::Watched => Some(FilmFlags::WATCHED),
            Self::Favourites => Some(FilmFlags::FAVOURITE),
        }
    }

    /// Membership predicate for this filter.
    pub fn matches(self, film: &Film) -> bool {
        match self.tracked_flag() {
            None => true,
            Some(flag) => film.flags.contains(flag),
        }
    }

    /// Apply the predicate, keeping model order.
    pub fn apply(self, films: Vec<Film>) -> Vec<Film> {
        films.into_iter().filter(|film| self.matches(film)).collect()
    }
}

/// The active filter plus its observer registry.
pub struct FilterModel {
    filter: Cell<FilterType>,
    observers: ObserverList<FilterType>,
}

impl FilterModel {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            filter: Cell::new(FilterType::Default),
            observers: ObserverList::new(),
        })
    }

    pub fn filter(&self) -> FilterType {
        self.filter.get()
    }

    pub fn add_observer(&self, observer: Observer<FilterType>) -> ObserverId {
        self.observers.add(observer)
    }

    pub fn remove_observer(&self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    /// Switch the active filter and notify. Callers that want to skip
    /// no-op switches compare against [`filter`](Self::filter) first.
    pub fn set_filter(&self, update: UpdateType, filter: FilterType) {
        self.filter.set(filter);
        self.observers.notify(update, &filter);
    }
}

#![forbid(unsafe_code)]

//! View layer for the marquee board.
//!
//! Every view is a thin pairing of a pure markup template with callback
//! slots. Views never touch the models; they raise callbacks that the
//! presenters translate into model mutations. Event-simulation methods
//! (`click_*`, `input_*`) stand in for real input plumbing and are what the
//! demo binary and the integration tests drive.

pub mod card;
pub mod component;
pub mod containers;
pub mod detail;
pub mod empty;
pub mod humanize;
pub mod show_more;
pub mod sort_bar;

pub use card::{FilmCardView, film_card_markup};
pub use component::{View, remove_view, render_view, replace_view};
pub use containers::{BoardView, FilmContainerView, FilmListContainerView};
pub use detail::{
    CommentAction, DetailFormState, DetailView, ShakeTarget, comment_markup, detail_markup,
};
pub use empty::{EmptyBoardView, empty_board_markup};
pub use show_more::{ShowMoreView, show_more_markup};
pub use sort_bar::{SortBarView, sort_bar_markup};

use marquee_model::FilmFlags;

/// The three flag-toggle controls shown on every card and in the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlType {
    Watchlist,
    Watched,
    Favourite,
}

impl ControlType {
    /// The film flag this control inverts.
    pub fn flag(self) -> FilmFlags {
        match self {
            Self::Watchlist => FilmFlags::WATCHLIST,
            Self::Watched => FilmFlags::WATCHED,
            Self::Favourite => FilmFlags::FAVOURITE,
        }
    }
}

#![forbid(unsafe_code)]

//! Empty-state view, parameterized by the filter that came up empty.

use crate::component::View;
use marquee_model::FilterType;
use marquee_render::{Document, NodeId};
use std::rc::Rc;

fn empty_text(filter: FilterType) -> &'static str {
    match filter {
        FilterType::Default => "There are no movies in our database",
        FilterType::Watchlist => "There are no movies to watch now",
        FilterType::Watched => "There are no watched movies now",
        FilterType::Favourites => "There are no favorite movies now",
    }
}

pub fn empty_board_markup(filter: FilterType) -> String {
    format!(
        r#"<h2 class="films-list__title">{}</h2>"#,
        empty_text(filter)
    )
}

/// Shown instead of the list when the derived slice is empty.
pub struct EmptyBoardView {
    node: NodeId,
    filter: FilterType,
}

impl EmptyBoardView {
    pub fn new(doc: &Rc<Document>, filter: FilterType) -> Rc<Self> {
        Rc::new(Self {
            node: doc.create(empty_board_markup(filter)),
            filter,
        })
    }

    pub fn filter(&self) -> FilterType {
        self.filter
    }
}

impl View for EmptyBoardView {
    fn node(&self) -> NodeId {
        self.node
    }
}

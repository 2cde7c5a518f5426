#![forbid(unsafe_code)]

//! Static shell views the board mounts once.

use crate::component::View;
use marquee_render::{Document, NodeId};
use std::rc::Rc;

macro_rules! shell_view {
    ($(#[$doc:meta])* $name:ident, $markup:expr) => {
        $(#[$doc])*
        pub struct $name {
            node: NodeId,
        }

        impl $name {
            pub fn new(doc: &Rc<Document>) -> Rc<Self> {
                Rc::new(Self {
                    node: doc.create($markup),
                })
            }
        }

        impl View for $name {
            fn node(&self) -> NodeId {
                self.node
            }
        }
    };
}

shell_view!(
    /// Outer board shell.
    BoardView,
    r#"<section class="films"></section>"#
);

shell_view!(
    /// The films section holding the list container and empty state.
    FilmContainerView,
    r#"<section class="films-list"></section>"#
);

shell_view!(
    /// The element film cards mount into.
    FilmListContainerView,
    r#"<div class="films-list__container"></div>"#
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::render_view;
    use marquee_render::Position;

    #[test]
    fn shells_nest() {
        let doc = Document::new();
        let board = BoardView::new(&doc);
        let films = FilmContainerView::new(&doc);
        let list = FilmListContainerView::new(&doc);

        render_view(&doc, doc.body(), board.as_ref(), Position::BeforeEnd);
        render_view(&doc, board.node(), films.as_ref(), Position::BeforeEnd);
        render_view(&doc, films.node(), list.as_ref(), Position::BeforeEnd);

        assert_eq!(doc.children(board.node()), vec![films.node()]);
        assert_eq!(doc.children(films.node()), vec![list.node()]);
    }
}

#![forbid(unsafe_code)]

//! "Show more" pagination control.

use crate::component::View;
use marquee_render::{Document, NodeId};
use std::cell::RefCell;
use std::rc::Rc;

pub fn show_more_markup() -> String {
    r#"<button class="films-list__show-more" type="button">Show more</button>"#.to_owned()
}

/// Reveals one more page of films per click. Removed by the board once the
/// whole slice is rendered.
pub struct ShowMoreView {
    node: NodeId,
    on_click: RefCell<Option<Rc<dyn Fn()>>>,
}

impl ShowMoreView {
    pub fn new(doc: &Rc<Document>) -> Rc<Self> {
        Rc::new(Self {
            node: doc.create(show_more_markup()),
            on_click: RefCell::new(None),
        })
    }

    pub fn set_click_handler(&self, handler: Rc<dyn Fn()>) {
        *self.on_click.borrow_mut() = Some(handler);
    }

    /// Simulated click.
    pub fn click(&self) {
        let handler = self.on_click.borrow().clone();
        if let Some(handler) = handler {
            handler();
        }
    }
}

impl View for ShowMoreView {
    fn node(&self) -> NodeId {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn click_without_handler_is_a_no_op() {
        let doc = Document::new();
        let view = ShowMoreView::new(&doc);
        view.click();
    }

    #[test]
    fn click_reaches_handler() {
        let doc = Document::new();
        let view = ShowMoreView::new(&doc);
        let clicks = Rc::new(Cell::new(0u32));

        let counter = Rc::clone(&clicks);
        view.set_click_handler(Rc::new(move || counter.set(counter.get() + 1)));

        view.click();
        view.click();
        assert_eq!(clicks.get(), 2);
    }
}

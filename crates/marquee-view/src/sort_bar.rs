#![forbid(unsafe_code)]

//! Sort control.

use crate::component::View;
use marquee_model::SortType;
use marquee_render::{Document, NodeId};
use std::cell::RefCell;
use std::rc::Rc;

const ACTIVE_CLASS: &str = "sort__button--active";

fn sort_button(label: &str, kind: SortType, active: SortType) -> String {
    let class = if kind == active { ACTIVE_CLASS } else { "" };
    format!(r##"<li><a href="#" class="sort__button {class}">{label}</a></li>"##)
}

/// Sort bar markup with the active order highlighted.
pub fn sort_bar_markup(active: SortType) -> String {
    format!(
        "<ul class=\"sort\">\n{}\n{}\n{}\n</ul>",
        sort_button("Sort by default", SortType::Default, active),
        sort_button("Sort by date", SortType::Date, active),
        sort_button("Sort by rating", SortType::Rate, active),
    )
}

/// The sort control above the film list.
pub struct SortBarView {
    node: NodeId,
    active: SortType,
    on_change: RefCell<Option<Rc<dyn Fn(SortType)>>>,
}

impl SortBarView {
    pub fn new(doc: &Rc<Document>, active: SortType) -> Rc<Self> {
        Rc::new(Self {
            node: doc.create(sort_bar_markup(active)),
            active,
            on_change: RefCell::new(None),
        })
    }

    pub fn active(&self) -> SortType {
        self.active
    }

    pub fn set_change_handler(&self, handler: Rc<dyn Fn(SortType)>) {
        *self.on_change.borrow_mut() = Some(handler);
    }

    /// Simulated click on one of the sort links.
    pub fn click_sort(&self, sort: SortType) {
        let handler = self.on_change.borrow().clone();
        if let Some(handler) = handler {
            handler(sort);
        }
    }
}

impl View for SortBarView {
    fn node(&self) -> NodeId {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_button_is_active() {
        for active in [SortType::Default, SortType::Date, SortType::Rate] {
            let markup = sort_bar_markup(active);
            assert_eq!(markup.matches(ACTIVE_CLASS).count(), 1, "{active:?}");
        }
    }

    #[test]
    fn click_forwards_the_choice() {
        let doc = Document::new();
        let bar = SortBarView::new(&doc, SortType::Default);
        let chosen = Rc::new(std::cell::Cell::new(None));

        let slot = Rc::clone(&chosen);
        bar.set_change_handler(Rc::new(move |sort| slot.set(Some(sort))));
        bar.click_sort(SortType::Rate);

        assert_eq!(chosen.get(), Some(SortType::Rate));
    }
}

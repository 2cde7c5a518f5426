#![forbid(unsafe_code)]

//! The process-wide popup slot.
//!
//! At most one detail popup is open at a time. The slot owns the resources
//! that come with that: the pair of global key handlers (Escape and
//! Ctrl+Enter) and the body `hide-overflow` class. Handlers are installed
//! when the slot goes empty → held and removed on held → empty, so open and
//! close always pair up.
//!
//! The slot also parks restorable popup state across a board rebuild: a
//! presenter being destroyed saves scroll offset and draft here, and the
//! board re-opens the popup for the same film after re-rendering.

use marquee_model::{CommentDraft, FilmId};
use marquee_render::{Document, HandlerId, KeyEvent};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const HIDE_OVERFLOW: &str = "hide-overflow";

/// Popup state that survives a board rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupRestore {
    pub film_id: FilmId,
    pub scroll_top: u32,
    pub draft: CommentDraft,
}

/// Exclusive holder of the open-popup resources.
pub struct PopupSlot {
    doc: Rc<Document>,
    active: Cell<Option<FilmId>>,
    handlers: Cell<Option<(HandlerId, HandlerId)>>,
    saved: RefCell<Option<PopupRestore>>,
}

impl PopupSlot {
    pub fn new(doc: &Rc<Document>) -> Rc<Self> {
        Rc::new(Self {
            doc: Rc::clone(doc),
            active: Cell::new(None),
            handlers: Cell::new(None),
            saved: RefCell::new(None),
        })
    }

    /// The film whose popup currently holds the slot.
    pub fn active(&self) -> Option<FilmId> {
        self.active.get()
    }

    /// Take the slot for `film_id`, installing the key handler pair and the
    /// body overflow lock on the empty → held transition.
    ///
    /// The mode-change pass closes every sibling popup before any open, so
    /// finding the slot held by a different film is a coordination breach
    /// and panics.
    pub fn acquire(
        &self,
        film_id: FilmId,
        on_escape: Rc<dyn Fn(&KeyEvent)>,
        on_submit: Rc<dyn Fn(&KeyEvent)>,
    ) {
        match self.active.get() {
            Some(holder) if holder != film_id => {
                panic!("popup slot still held by film {} on acquire", holder.0)
            }
            Some(_) => {}
            None => {
                let escape_id = self.doc.add_keydown_handler(on_escape);
                let submit_id = self.doc.add_keydown_handler(on_submit);
                self.handlers.set(Some((escape_id, submit_id)));
                self.doc.add_class(self.doc.body(), HIDE_OVERFLOW);
                self.active.set(Some(film_id));
            }
        }
    }

    /// Release the slot if `film_id` holds it; removes the handler pair and
    /// the overflow lock. No-op for non-holders, so close paths stay
    /// idempotent.
    pub fn release(&self, film_id: FilmId) {
        if self.active.get() != Some(film_id) {
            return;
        }
        if let Some((escape_id, submit_id)) = self.handlers.take() {
            self.doc.remove_keydown_handler(escape_id);
            self.doc.remove_keydown_handler(submit_id);
        }
        self.doc.remove_class(self.doc.body(), HIDE_OVERFLOW);
        self.active.set(None);
    }

    // --- Rebuild survival --------------------------------------------------

    pub fn save_restore(&self, restore: PopupRestore) {
        *self.saved.borrow_mut() = Some(restore);
    }

    pub fn take_restore(&self) -> Option<PopupRestore> {
        self.saved.borrow_mut().take()
    }

    /// Drop any parked popup state (major rebuilds).
    pub fn clear_restore(&self) {
        *self.saved.borrow_mut() = None;
    }
}

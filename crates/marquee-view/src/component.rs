#![forbid(unsafe_code)]

//! View-level mount helpers.
//!
//! A view owns exactly one document node; these helpers let presenters
//! mount, swap, and drop views without reaching for node handles directly.

use marquee_render::{Document, NodeId, Position};

/// A renderable component backed by one document node.
pub trait View {
    fn node(&self) -> NodeId;
}

/// Mount a view relative to a target node.
pub fn render_view(doc: &Document, target: NodeId, view: &dyn View, position: Position) {
    doc.insert(target, view.node(), position);
}

/// Swap a mounted view for a fresh one at the same position. The old view's
/// node ends up detached; the caller drops the old view.
pub fn replace_view(doc: &Document, new: &dyn View, old: &dyn View) {
    doc.replace(new.node(), old.node());
}

/// Unmount a view. Safe to call on an already-detached view.
pub fn remove_view(doc: &Document, view: &dyn View) {
    doc.remove(view.node());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    struct Stub {
        node: NodeId,
    }

    impl View for Stub {
        fn node(&self) -> NodeId {
            self.node
        }
    }

    #[test]
    fn replace_then_remove_leaves_target_detached() {
        let doc = Document::new();
        let old = Stub {
            node: doc.create("<p>old"),
        };
        let new = Stub {
            node: doc.create("<p>new"),
        };

        render_view(&doc, doc.body(), &old, Position::BeforeEnd);
        replace_view(&doc, &new, &old);
        remove_view(&doc, &old);

        assert!(doc.is_attached(new.node()));
        assert!(!doc.is_attached(old.node()));
        assert_eq!(doc.children(doc.body()), vec![new.node()]);
        let _keep = Rc::new(doc);
    }
}

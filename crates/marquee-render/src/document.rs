#![forbid(unsafe_code)]

//! Retained node tree with DOM-like mount primitives.
//!
//! A [`Document`] owns an arena of nodes. Each node carries an opaque markup
//! payload, an ordered child list, and a class set. Views create nodes,
//! presenters mount and unmount them; nobody ever inspects markup except to
//! display it.
//!
//! # Mount contract
//!
//! - [`insert`](Document::insert) moves an already-attached node (detach
//!   first, then attach), matching DOM insertion semantics.
//! - [`replace`](Document::replace) puts the new node at the old node's
//!   child index; the old node ends up detached.
//! - [`remove`](Document::remove) is idempotent on detached nodes.
//!
//! Passing a detached target where an attached one is required is a
//! programming-contract breach and panics.
//!
//! # Keyboard
//!
//! Keydown handlers are process-global, registered in pairs by the popup
//! lifecycle. [`keydown_handler_count`](Document::keydown_handler_count)
//! exists so tests can prove the pairs are balanced.

use crate::event::KeyEvent;
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Token for a registered keydown handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// Where to mount a node relative to a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// As the target's previous sibling.
    BeforeBegin,
    /// As the target's first child.
    AfterBegin,
    /// As the target's last child.
    BeforeEnd,
    /// As the target's next sibling.
    AfterEnd,
}

struct Node {
    markup: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    classes: BTreeSet<String>,
}

type KeydownHandler = Rc<dyn Fn(&KeyEvent)>;

/// The retained tree plus the global keydown registry.
pub struct Document {
    nodes: RefCell<Vec<Node>>,
    body: NodeId,
    keydown: RefCell<Vec<(HandlerId, KeydownHandler)>>,
    next_handler: Cell<u64>,
}

impl Document {
    /// Create a document whose only node is the body.
    pub fn new() -> Rc<Self> {
        let body = Node {
            markup: String::new(),
            parent: None,
            children: Vec::new(),
            classes: BTreeSet::new(),
        };
        Rc::new(Self {
            nodes: RefCell::new(vec![body]),
            body: NodeId(0),
            keydown: RefCell::new(Vec::new()),
            next_handler: Cell::new(0),
        })
    }

    /// The root node. Always attached; carries the `hide-overflow` class
    /// while a popup is open.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create a detached node with the given markup.
    pub fn create(&self, markup: impl Into<String>) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(Node {
            markup: markup.into(),
            parent: None,
            children: Vec::new(),
            classes: BTreeSet::new(),
        });
        id
    }

    /// Mount `node` relative to `target`. Moves `node` if already attached.
    pub fn insert(&self, target: NodeId, node: NodeId, position: Position) {
        assert_ne!(target, node, "cannot insert a node relative to itself");
        self.detach(node);

        let mut nodes = self.nodes.borrow_mut();
        match position {
            Position::AfterBegin | Position::BeforeEnd => {
                let at = match position {
                    Position::AfterBegin => 0,
                    _ => nodes[target.0].children.len(),
                };
                nodes[target.0].children.insert(at, node);
                nodes[node.0].parent = Some(target);
            }
            Position::BeforeBegin | Position::AfterEnd => {
                let parent = nodes[target.0]
                    .parent
                    .unwrap_or_else(|| panic!("sibling insert against a detached target"));
                let index = child_index_in(&nodes, parent, target);
                let at = match position {
                    Position::BeforeBegin => index,
                    _ => index + 1,
                };
                nodes[parent.0].children.insert(at, node);
                nodes[node.0].parent = Some(parent);
            }
        }
    }

    /// Mount `new` at `old`'s position; `old` ends up detached.
    pub fn replace(&self, new: NodeId, old: NodeId) {
        assert_ne!(new, old, "cannot replace a node with itself");
        self.detach(new);

        let mut nodes = self.nodes.borrow_mut();
        let parent = nodes[old.0]
            .parent
            .unwrap_or_else(|| panic!("replace target is not mounted"));
        let index = child_index_in(&nodes, parent, old);
        nodes[parent.0].children[index] = new;
        nodes[new.0].parent = Some(parent);
        nodes[old.0].parent = None;
    }

    /// Unmount a node. No-op when already detached.
    pub fn remove(&self, node: NodeId) {
        self.detach(node);
    }

    fn detach(&self, node: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes[node.0].parent.take() {
            nodes[parent.0].children.retain(|child| *child != node);
        }
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        node == self.body || self.nodes.borrow()[node.0].parent.is_some()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.borrow()[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[node.0].children.clone()
    }

    /// Index of `node` among its parent's children, when attached.
    pub fn child_index(&self, node: NodeId) -> Option<usize> {
        let nodes = self.nodes.borrow();
        let parent = nodes[node.0].parent?;
        Some(child_index_in(&nodes, parent, node))
    }

    pub fn markup(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].markup.clone()
    }

    pub fn set_markup(&self, node: NodeId, markup: impl Into<String>) {
        self.nodes.borrow_mut()[node.0].markup = markup.into();
    }

    // --- Classes -----------------------------------------------------------

    pub fn add_class(&self, node: NodeId, class: &str) {
        self.nodes.borrow_mut()[node.0].classes.insert(class.to_owned());
    }

    pub fn remove_class(&self, node: NodeId, class: &str) {
        self.nodes.borrow_mut()[node.0].classes.remove(class);
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes.borrow()[node.0].classes.contains(class)
    }

    // --- Keyboard ----------------------------------------------------------

    /// Register a global keydown handler, returning its token.
    pub fn add_keydown_handler(&self, handler: KeydownHandler) -> HandlerId {
        let id = HandlerId(self.next_handler.get());
        self.next_handler.set(self.next_handler.get() + 1);
        self.keydown.borrow_mut().push((id, handler));
        id
    }

    /// Unregister a keydown handler. Returns `false` for unknown tokens.
    pub fn remove_keydown_handler(&self, id: HandlerId) -> bool {
        let mut handlers = self.keydown.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    pub fn keydown_handler_count(&self) -> usize {
        self.keydown.borrow().len()
    }

    /// Deliver a key event to every handler registered at dispatch time.
    ///
    /// The handler list is snapshotted first, so a handler removing itself
    /// (Escape closing the popup) does not disturb the iteration.
    pub fn dispatch_keydown(&self, event: &KeyEvent) {
        let snapshot: Vec<KeydownHandler> = self
            .keydown
            .borrow()
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        for handler in snapshot {
            handler(event);
        }
    }

    // --- Debug output ------------------------------------------------------

    /// Depth-first dump of the subtree markup, one node per line, indented.
    /// Demo/diagnostic output only.
    pub fn render_tree(&self, root: NodeId) -> String {
        let mut out = String::new();
        self.render_into(root, 0, &mut out);
        out
    }

    fn render_into(&self, node: NodeId, depth: usize, out: &mut String) {
        let (markup, classes, children) = {
            let nodes = self.nodes.borrow();
            (
                nodes[node.0].markup.clone(),
                nodes[node.0]
                    .classes
                    .iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(" "),
                nodes[node.0].children.clone(),
            )
        };

        let first_line = markup.lines().next().unwrap_or("").trim().to_owned();
        out.push_str(&"  ".repeat(depth));
        if classes.is_empty() {
            out.push_str(&first_line);
        } else {
            out.push_str(&format!("{first_line} [.{classes}]"));
        }
        out.push('\n');

        for child in children {
            self.render_into(child, depth + 1, out);
        }
    }
}

fn child_index_in(nodes: &[Node], parent: NodeId, child: NodeId) -> usize {
    nodes[parent.0]
        .children
        .iter()
        .position(|candidate| *candidate == child)
        .unwrap_or_else(|| panic!("child list out of step with parent pointer"))
}

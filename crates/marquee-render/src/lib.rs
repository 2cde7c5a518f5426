#![forbid(unsafe_code)]

//! Render layer for the marquee board.
//!
//! Presenters treat this crate as a black box: a retained tree of markup
//! nodes with DOM-like mount primitives ([`Document::insert`],
//! [`Document::replace`], [`Document::remove`]), class toggling on nodes,
//! and a global keydown handler registry. There is no diffing here — a node
//! is an opaque markup payload that views rebuild wholesale.

pub mod document;
pub mod escape;
pub mod event;

pub use document::{Document, HandlerId, NodeId, Position};
pub use escape::escape_text;
pub use event::{KeyCode, KeyEvent, Modifiers};

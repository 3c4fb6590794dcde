//! Typed document-tree model.
//!
//! A document is a [`Tree`] of typed blocks ([`BlockKind`]): the tree owns
//! every node in an arena, nodes reference each other through [`BlockId`]
//! indices, and an owned [`Block`] value is the interchange format used to
//! build, substitute and graft subtrees.
//!
//! # Architecture
//!
//! The model decouples *what a document contains* from *how it is printed*:
//!
//! - [`Tree::traverse`] walks the tree depth-first and pushes a stream of
//!   [`Event`] values into a [`Listener`], one `Begin`/`End` pair per
//!   container block and a single event per atomic block.
//! - [`Tree::blocks`] evaluates a predicate over one of the XPath-style
//!   [`Axis`] directions, which is how "nearest enclosing X" and "next Y
//!   after this point" queries are expressed.
//! - [`BlockFilter`] projects a subtree into a flat block sequence; the
//!   bundled [`PlainTextFilter`] extracts literal text only.
//!
//! Rendering lives in the `doctree-render` crate; parsing raw markup and
//! macro expansion are external collaborators that produce and mutate trees
//! through the operations defined here.

mod axis;
mod block;
mod error;
mod event;
mod filter;
mod ids;
mod params;
mod text;
mod tree;

pub use axis::Axis;
pub use block::{
    Block, BlockKind, Format, HeaderLevel, ImageKind, ImageTarget, LinkKind, LinkTarget,
    ListKind, MacroCall, XmlNode,
};
pub use error::TreeError;
pub use event::{Event, Listener, Tag};
pub use filter::{BlockFilter, FilterAction, LinkLabelGenerator, PlainTextFilter, ReferenceLabel};
pub use ids::IdGenerator;
pub use params::Parameters;
pub use text::parse_plain_text;
pub use tree::{BlockId, Tree};

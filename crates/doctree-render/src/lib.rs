//! Renderers turning document-tree traversal events back into text.
//!
//! A [`ListenerChain`] sits between a tree traversal and a [`Renderer`]:
//! it tracks nesting state (list indices, table positions, link and macro
//! depth) and gives the renderer one event of lookahead. Four renderers
//! are provided:
//!
//! - [`EventRenderer`]: one diagnostic line per event
//! - [`PlainTextRenderer`]: literal text with minimal separators
//! - [`XhtmlRenderer`]: XHTML with hidden macro-invocation comments
//! - [`WikiSyntaxRenderer`]: the original authoring syntax, escaped so the
//!   output parses back to the same tree
//!
//! # Example
//!
//! ```
//! use doctree_model::{Block, BlockKind, Tree};
//! use doctree_render::render;
//! use doctree_render::xhtml::XhtmlRenderer;
//!
//! let mut tree = Tree::from_block(
//!     Block::new(BlockKind::Document)
//!         .child(Block::paragraph(vec![Block::word("Hello")])),
//! );
//! let html = render(&mut tree, XhtmlRenderer::new()).unwrap();
//! assert_eq!(html, "<p>Hello</p>");
//! ```

mod chain;
mod error;
pub mod events;
mod invocation;
pub mod plain;
mod printer;
mod state;
pub mod wiki;
pub mod xhtml;

pub use chain::{ListenerChain, Renderer};
pub use error::RenderError;
pub use events::EventRenderer;
pub use plain::PlainTextRenderer;
pub use printer::PrinterStack;
pub use state::{BlockState, ChainState};
pub use wiki::WikiSyntaxRenderer;
pub use xhtml::XhtmlRenderer;

use doctree_model::Tree;

/// Traverses `tree` through a fresh [`ListenerChain`] and returns the
/// rendered output.
///
/// # Errors
///
/// Returns [`RenderError::PrinterStackImbalance`] when the renderer left
/// buffered printers open, which indicates unbalanced begin/end events.
pub fn render<R: Renderer>(tree: &mut Tree, renderer: R) -> Result<String, RenderError> {
    let mut chain = ListenerChain::new(renderer);
    tree.traverse(&mut chain);
    let output = chain.finish()?;
    tracing::debug!(bytes = output.len(), "rendered document tree");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use doctree_model::{Block, BlockKind};
    use pretty_assertions::assert_eq;

    fn hello_world() -> Tree {
        Tree::from_block(Block::new(BlockKind::Document).child(Block::paragraph(vec![
            Block::word("Hello"),
            Block::space(),
            Block::word("World"),
        ])))
    }

    #[test]
    fn one_tree_renders_through_every_backend() {
        let mut tree = hello_world();
        assert_eq!(
            render(&mut tree, PlainTextRenderer::new()).unwrap(),
            "Hello World"
        );
        assert_eq!(
            render(&mut tree, XhtmlRenderer::new()).unwrap(),
            "<p>Hello World</p>"
        );
        assert_eq!(
            render(&mut tree, WikiSyntaxRenderer::new()).unwrap(),
            "Hello World"
        );
    }
}

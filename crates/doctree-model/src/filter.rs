//! Block filters: tree-to-sequence projections.

use crate::block::{Block, BlockKind, LinkKind};
use crate::text::parse_plain_text;

/// Outcome of filtering one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    /// Keep the block unchanged.
    Keep,
    /// Remove the block itself; its already-filtered children take its place.
    Drop,
    /// Substitute the block with a sequence of replacement blocks.
    Replace(Vec<Block>),
}

/// A pure projection from one block to a sequence of zero or more blocks.
///
/// Filters must be total over every [`BlockKind`] and must never fail for a
/// well-formed tree; they receive only node-local information.
pub trait BlockFilter {
    fn filter(&self, block: &Block) -> FilterAction;
}

/// Produces a human-readable label for a document link reference.
///
/// Label generation proper lives outside this crate (it needs document
/// storage); this seam is what the plain-text filter and renderer call when
/// a link has no explicit label children.
pub trait LinkLabelGenerator {
    fn label(&self, reference: &str) -> String;
}

/// Fallback label generator: the reference string itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceLabel;

impl LinkLabelGenerator for ReferenceLabel {
    fn label(&self, reference: &str) -> String {
        reference.to_owned()
    }
}

/// Apply a filter to a block whose children have already been filtered:
/// the block is kept, dropped, or substituted as the filter decides.
pub(crate) fn apply_filter(filter: &dyn BlockFilter, block: Block) -> Vec<Block> {
    let block = Block {
        kind: block.kind,
        parameters: block.parameters,
        children: block
            .children
            .into_iter()
            .flat_map(|child| apply_filter(filter, child))
            .collect(),
    };
    match filter.filter(&block) {
        FilterAction::Keep => vec![block],
        FilterAction::Drop => block.children,
        FilterAction::Replace(blocks) => blocks,
    }
}

impl Block {
    /// Deep copy with `filter` applied to every descendant (children first,
    /// bottom-up); the receiver itself is not filtered.
    #[must_use]
    pub fn cloned_with(&self, filter: &dyn BlockFilter) -> Block {
        Block {
            kind: self.kind.clone(),
            parameters: self.parameters.clone(),
            children: self
                .children
                .iter()
                .flat_map(|child| apply_filter(filter, child.clone()))
                .collect(),
        }
    }
}

/// Concatenated literal text of a filtered block sequence.
pub(crate) fn literal_text(blocks: &[Block]) -> String {
    let mut text = String::new();
    for block in blocks {
        match &block.kind {
            BlockKind::Word(word) => text.push_str(word),
            BlockKind::Space | BlockKind::NewLine => text.push(' '),
            BlockKind::SpecialSymbol(symbol) => text.push(*symbol),
            _ => {}
        }
        text.push_str(&literal_text(&block.children));
    }
    text
}

/// Keeps only literal text blocks.
///
/// Words, spaces, special symbols and new lines pass through unchanged; a
/// link with no label children is replaced by plain-text blocks parsed from
/// its generated label (document links) or raw reference (URL links);
/// every other block is dropped, leaving its filtered children in place.
pub struct PlainTextFilter<G> {
    labels: G,
}

impl<G: LinkLabelGenerator> PlainTextFilter<G> {
    /// Create a filter using `labels` for label-less document links.
    pub fn new(labels: G) -> Self {
        Self { labels }
    }
}

impl<G: LinkLabelGenerator> BlockFilter for PlainTextFilter<G> {
    fn filter(&self, block: &Block) -> FilterAction {
        match &block.kind {
            BlockKind::Word(_)
            | BlockKind::Space
            | BlockKind::SpecialSymbol(_)
            | BlockKind::NewLine => FilterAction::Keep,
            BlockKind::Link { target, .. } if block.children.is_empty() => {
                let label = match target.kind {
                    LinkKind::Document => self.labels.label(&target.reference),
                    LinkKind::Url => target.reference.clone(),
                };
                if label.is_empty() {
                    tracing::warn!(reference = %target.reference, "link label flattened to nothing");
                }
                FilterAction::Replace(parse_plain_text(&label))
            }
            _ => FilterAction::Drop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::LinkTarget;
    use pretty_assertions::assert_eq;

    fn filter() -> PlainTextFilter<ReferenceLabel> {
        PlainTextFilter::new(ReferenceLabel)
    }

    #[test]
    fn literal_blocks_pass_unchanged() {
        for block in [Block::word("Hello"), Block::space(), Block::symbol('!')] {
            assert_eq!(filter().filter(&block), FilterAction::Keep);
        }
    }

    #[test]
    fn table_is_dropped() {
        let table = Block::new(BlockKind::Table);
        assert_eq!(filter().filter(&table), FilterAction::Drop);
    }

    #[test]
    fn label_less_link_becomes_its_label() {
        let link = Block::new(BlockKind::Link {
            target: LinkTarget::document("Main.Home"),
            freestanding: false,
        });
        let FilterAction::Replace(blocks) = filter().filter(&link) else {
            panic!("expected replacement");
        };
        assert_eq!(literal_text(&blocks), "Main.Home");
    }

    #[test]
    fn link_with_label_children_is_dropped_as_a_container() {
        // The link's own children have already been filtered up into the
        // projection by the time the link itself is inspected.
        let link = Block::new(BlockKind::Link {
            target: LinkTarget::url("https://example.org"),
            freestanding: false,
        })
        .child(Block::word("label"));
        assert_eq!(filter().filter(&link), FilterAction::Drop);
    }

    #[test]
    fn cloned_with_projects_nested_text() {
        let paragraph = Block::paragraph(vec![
            Block::word("Hello"),
            Block::space(),
            Block::new(BlockKind::Format(crate::Format::Bold)).child(Block::word("World")),
        ]);
        let projected = paragraph.cloned_with(&filter());
        // The format container is dropped but its filtered children are
        // hoisted into its place in the parent sequence.
        assert_eq!(literal_text(&projected.children), "Hello World");
        assert_eq!(projected.children.len(), 3);
    }

    #[test]
    fn dropped_link_keeps_its_label_children() {
        let paragraph = Block::paragraph(vec![
            Block::new(BlockKind::Link {
                target: LinkTarget::url("https://example.org"),
                freestanding: false,
            })
            .child(Block::word("label")),
        ]);
        let projected = paragraph.cloned_with(&filter());
        assert_eq!(literal_text(&projected.children), "label");
    }
}

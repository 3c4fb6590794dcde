//! XPath-style query axes over the tree.

use crate::tree::{BlockId, Tree};

/// A named traversal direction for [`Tree::blocks`].
///
/// Forward axes (`Child`, `Descendant`, `Following`, ...) yield matches in
/// document order; reverse axes (`Ancestor`, `Preceding`, ...) yield them
/// nearest-first, i.e. reverse document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Only the block itself.
    SelfAxis,
    /// The immediate parent, if any.
    Parent,
    /// Strict ancestors, nearest first.
    Ancestor,
    /// The block, then its ancestors nearest first.
    AncestorOrSelf,
    /// Immediate children in document order.
    Child,
    /// Every block strictly below, pre-order.
    Descendant,
    /// The block, then every block below in pre-order.
    DescendantOrSelf,
    /// Blocks after the block in document order, excluding its own
    /// descendants.
    Following,
    /// Later siblings in document order.
    FollowingSibling,
    /// Blocks before the block in document order, excluding its ancestors,
    /// nearest first.
    Preceding,
    /// Earlier siblings, nearest first.
    PrecedingSibling,
}

impl Tree {
    /// All blocks reachable from `from` along `axis` that satisfy
    /// `matcher`, in the axis's natural order.
    pub fn blocks<F>(&self, from: BlockId, matcher: F, axis: Axis) -> Vec<BlockId>
    where
        F: Fn(&Tree, BlockId) -> bool,
    {
        self.axis_blocks(from, axis)
            .into_iter()
            .filter(|&id| matcher(self, id))
            .collect()
    }

    /// First match along `axis`, if any.
    pub fn first_block<F>(&self, from: BlockId, matcher: F, axis: Axis) -> Option<BlockId>
    where
        F: Fn(&Tree, BlockId) -> bool,
    {
        self.axis_blocks(from, axis)
            .into_iter()
            .find(|&id| matcher(self, id))
    }

    fn ancestors(&self, from: BlockId) -> Vec<BlockId> {
        let mut out = Vec::new();
        let mut current = self.parent(from);
        while let Some(id) = current {
            out.push(id);
            current = self.parent(id);
        }
        out
    }

    fn siblings(&self, from: BlockId) -> (Vec<BlockId>, Vec<BlockId>) {
        let Some(parent) = self.parent(from) else {
            return (Vec::new(), Vec::new());
        };
        let children = self.children(parent);
        let pos = children
            .iter()
            .position(|&c| c == from)
            .unwrap_or(children.len());
        (children[..pos].to_vec(), children[pos + 1..].to_vec())
    }

    fn axis_blocks(&self, from: BlockId, axis: Axis) -> Vec<BlockId> {
        match axis {
            Axis::SelfAxis => vec![from],
            Axis::Parent => self.parent(from).into_iter().collect(),
            Axis::Ancestor => self.ancestors(from),
            Axis::AncestorOrSelf => {
                let mut out = vec![from];
                out.extend(self.ancestors(from));
                out
            }
            Axis::Child => self.children(from).to_vec(),
            Axis::Descendant => self.preorder(from).into_iter().skip(1).collect(),
            Axis::DescendantOrSelf => self.preorder(from),
            Axis::FollowingSibling => self.siblings(from).1,
            Axis::PrecedingSibling => {
                let mut before = self.siblings(from).0;
                before.reverse();
                before
            }
            Axis::Following => {
                // Document order after `from`, minus its own subtree: the
                // following siblings' subtrees at every ancestor level,
                // nearest level first.
                let mut out = Vec::new();
                let mut current = from;
                loop {
                    for sibling in self.siblings(current).1 {
                        out.extend(self.preorder(sibling));
                    }
                    match self.parent(current) {
                        Some(parent) => current = parent,
                        None => break,
                    }
                }
                out
            }
            Axis::Preceding => {
                // Reverse document order before `from`, excluding ancestors.
                let mut out = Vec::new();
                let mut current = from;
                loop {
                    let (before, _) = self.siblings(current);
                    for sibling in before.into_iter().rev() {
                        let mut subtree = self.preorder(sibling);
                        subtree.reverse();
                        out.extend(subtree);
                    }
                    match self.parent(current) {
                        Some(parent) => current = parent,
                        None => break,
                    }
                }
                out
            }
        }
    }
}

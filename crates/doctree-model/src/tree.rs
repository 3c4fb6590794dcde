//! Arena-backed document tree.

use crate::block::{Block, BlockKind};
use crate::error::TreeError;
use crate::filter::{BlockFilter, PlainTextFilter, ReferenceLabel, literal_text};
use crate::ids::IdGenerator;
use crate::params::Parameters;

/// Index of one block inside its owning [`Tree`].
///
/// Ids are only meaningful for the tree that produced them; they stay valid
/// for the tree's lifetime (detached blocks keep their slot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) struct BlockData {
    pub(crate) kind: BlockKind,
    pub(crate) parameters: Parameters,
    pub(crate) parent: Option<BlockId>,
    pub(crate) children: Vec<BlockId>,
}

/// A document tree: an arena owning every block, a designated root, and the
/// root's [`IdGenerator`].
///
/// Parents own their children exclusively (insertion order preserved);
/// the parent edge stored on each block is purely navigational. The id
/// generator belongs to the root position: grafting a tree into another
/// consumes it together with its generator, and detaching a subtree back
/// out mints a fresh one.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<BlockData>,
    root: BlockId,
    pub(crate) ids: IdGenerator,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// An empty tree with a `Document` root.
    #[must_use]
    pub fn new() -> Self {
        Self::from_block(Block::new(BlockKind::Document))
    }

    /// Build a tree from an owned block value (deep adoption).
    #[must_use]
    pub fn from_block(root: Block) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: BlockId(0),
            ids: IdGenerator::new(),
        };
        let root_id = tree.adopt(root, None);
        tree.root = root_id;
        tree
    }

    /// Allocate `block` and its descendants; cached header ids are dropped
    /// so they are regenerated against this tree's generator.
    fn adopt(&mut self, block: Block, parent: Option<BlockId>) -> BlockId {
        let mut kind = block.kind;
        if let BlockKind::Header { id, .. } = &mut kind {
            *id = None;
        }
        let id = BlockId(self.nodes.len());
        self.nodes.push(BlockData {
            kind,
            parameters: block.parameters,
            parent,
            children: Vec::new(),
        });
        for child in block.children {
            let child_id = self.adopt(child, Some(id));
            self.nodes[id.0].children.push(child_id);
        }
        id
    }

    /// The root block.
    #[must_use]
    pub fn root(&self) -> BlockId {
        self.root
    }

    /// Topmost ancestor of `id`: the tree root for attached blocks, the
    /// detached subtree's head otherwise.
    #[must_use]
    pub fn root_of(&self, id: BlockId) -> BlockId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Kind of a block.
    #[must_use]
    pub fn kind(&self, id: BlockId) -> &BlockKind {
        &self.nodes[id.0].kind
    }

    pub(crate) fn kind_mut(&mut self, id: BlockId) -> &mut BlockKind {
        &mut self.nodes[id.0].kind
    }

    /// Parent of a block, `None` for the root or a detached block.
    #[must_use]
    pub fn parent(&self, id: BlockId) -> Option<BlockId> {
        self.nodes[id.0].parent
    }

    /// Children of a block in document order.
    #[must_use]
    pub fn children(&self, id: BlockId) -> &[BlockId] {
        &self.nodes[id.0].children
    }

    /// Parameter map of a block.
    #[must_use]
    pub fn parameters(&self, id: BlockId) -> &Parameters {
        &self.nodes[id.0].parameters
    }

    /// One parameter value.
    #[must_use]
    pub fn parameter(&self, id: BlockId, name: &str) -> Option<&str> {
        self.nodes[id.0].parameters.get(name)
    }

    /// Replace a single parameter (the map itself is replaced, not aliased).
    pub fn set_parameter(&mut self, id: BlockId, name: impl Into<String>, value: impl Into<String>) {
        let params = self.nodes[id.0].parameters.clone().with(name, value);
        self.nodes[id.0].parameters = params;
    }

    /// Replace the whole parameter map.
    pub fn set_parameters(&mut self, id: BlockId, parameters: Parameters) {
        self.nodes[id.0].parameters = parameters;
    }

    /// Append one child block, returning its id.
    pub fn add_child(&mut self, parent: BlockId, block: Block) -> BlockId {
        let child = self.adopt(block, Some(parent));
        self.nodes[parent.0].children.push(child);
        child
    }

    /// Append a sequence of child blocks in order.
    pub fn add_children(&mut self, parent: BlockId, blocks: Vec<Block>) -> Vec<BlockId> {
        blocks
            .into_iter()
            .map(|block| self.add_child(parent, block))
            .collect()
    }

    /// Re-attach a detached block (and its subtree) under a new parent.
    ///
    /// Fails if the block still has a parent; cached header ids in the
    /// moved subtree are cleared so they regenerate under the new root.
    pub fn attach_child(&mut self, parent: BlockId, id: BlockId) -> Result<(), TreeError> {
        if self.nodes[id.0].parent.is_some() {
            return Err(TreeError::StillAttached(id));
        }
        self.clear_header_ids(id);
        self.nodes[id.0].parent = Some(parent);
        self.nodes[parent.0].children.push(id);
        Ok(())
    }

    fn child_position(&self, parent: BlockId, anchor: BlockId) -> Result<usize, TreeError> {
        self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == anchor)
            .ok_or(TreeError::NotAChild { parent, anchor })
    }

    /// Insert a block immediately before `anchor`, which must be a current
    /// child of `parent`.
    pub fn insert_child_before(
        &mut self,
        parent: BlockId,
        block: Block,
        anchor: BlockId,
    ) -> Result<BlockId, TreeError> {
        let pos = self.child_position(parent, anchor)?;
        let child = self.adopt(block, Some(parent));
        self.nodes[parent.0].children.insert(pos, child);
        Ok(child)
    }

    /// Insert a block immediately after `anchor`, which must be a current
    /// child of `parent`.
    pub fn insert_child_after(
        &mut self,
        parent: BlockId,
        block: Block,
        anchor: BlockId,
    ) -> Result<BlockId, TreeError> {
        let pos = self.child_position(parent, anchor)?;
        let child = self.adopt(block, Some(parent));
        self.nodes[parent.0].children.insert(pos + 1, child);
        Ok(child)
    }

    /// Replace a current child with a sequence of blocks at the same
    /// position. An empty sequence removes the child.
    pub fn replace_child(
        &mut self,
        parent: BlockId,
        blocks: Vec<Block>,
        old: BlockId,
    ) -> Result<Vec<BlockId>, TreeError> {
        let pos = self.child_position(parent, old)?;
        self.nodes[parent.0].children.remove(pos);
        self.nodes[old.0].parent = None;
        self.clear_header_ids(old);

        let new_ids: Vec<BlockId> = blocks
            .into_iter()
            .map(|block| self.adopt(block, Some(parent)))
            .collect();
        for (offset, &new_id) in new_ids.iter().enumerate() {
            self.nodes[parent.0].children.insert(pos + offset, new_id);
        }
        Ok(new_ids)
    }

    /// Detach a block from its parent. Sibling order is unaffected; the
    /// block keeps its subtree and can be re-attached with
    /// [`attach_child`](Self::attach_child).
    pub fn remove_block(&mut self, id: BlockId) -> Result<(), TreeError> {
        let parent = self.nodes[id.0]
            .parent
            .ok_or(TreeError::AlreadyDetached(id))?;
        let pos = self.child_position(parent, id)?;
        self.nodes[parent.0].children.remove(pos);
        self.nodes[id.0].parent = None;
        self.clear_header_ids(id);
        Ok(())
    }

    /// Graft another tree under `parent`, consuming it together with its id
    /// generator: the embedded document defers to this tree's root for id
    /// generation from now on.
    pub fn graft(&mut self, parent: BlockId, other: Tree) -> BlockId {
        let block = other.to_block(other.root);
        self.add_child(parent, block)
    }

    /// Extract the subtree at `id` into a new tree with a fresh id
    /// generator, detaching it from this tree.
    pub fn detach(&mut self, id: BlockId) -> Result<Tree, TreeError> {
        let block = self.to_block(id);
        self.remove_block(id)?;
        Ok(Tree::from_block(block))
    }

    /// Deep copy of a subtree as an owned block value.
    #[must_use]
    pub fn to_block(&self, id: BlockId) -> Block {
        let data = &self.nodes[id.0];
        Block {
            kind: data.kind.clone(),
            parameters: data.parameters.clone(),
            children: data.children.iter().map(|&c| self.to_block(c)).collect(),
        }
    }

    /// Structurally independent copy of the subtree at `id`.
    #[must_use]
    pub fn clone_subtree(&self, id: BlockId) -> Tree {
        Tree::from_block(self.to_block(id))
    }

    /// Copy of the subtree at `id` with `filter` applied to every copied
    /// descendant (the subtree root itself is kept as the copy's root).
    #[must_use]
    pub fn clone_subtree_with(&self, id: BlockId, filter: &dyn BlockFilter) -> Tree {
        Tree::from_block(self.to_block(id).cloned_with(filter))
    }

    /// Pre-order sequence of the subtree rooted at `id`, including `id`.
    #[must_use]
    pub fn preorder(&self, id: BlockId) -> Vec<BlockId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            for &child in self.nodes[current.0].children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// `true` when `descendant` is strictly below `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: BlockId, ancestor: BlockId) -> bool {
        let mut current = self.parent(descendant);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Flattened plain-text title of a header (or any container), computed
    /// by projecting the children through the plain-text filter.
    #[must_use]
    pub fn flattened_text(&self, id: BlockId) -> String {
        let filter = PlainTextFilter::new(ReferenceLabel);
        let mut flat = Vec::new();
        for &child in self.children(id) {
            flat.extend(crate::filter::apply_filter(&filter, self.to_block(child)));
        }
        literal_text(&flat)
    }

    /// The header's generated id, minting and caching one on first use.
    ///
    /// The cache is cleared whenever the header is reparented, so the id is
    /// regenerated against the then-current root's generator. Returns
    /// `None` when `id` is not a header.
    pub fn ensure_header_id(&mut self, id: BlockId) -> Option<String> {
        match self.kind(id) {
            BlockKind::Header { id: Some(cached), .. } => Some(cached.clone()),
            BlockKind::Header { id: None, .. } => {
                let title = self.flattened_text(id);
                let generated = self.ids.unique_id("H", &title);
                if let BlockKind::Header { id: slot, .. } = self.kind_mut(id) {
                    *slot = Some(generated.clone());
                }
                Some(generated)
            }
            _ => None,
        }
    }

    fn clear_header_ids(&mut self, id: BlockId) {
        for block in self.preorder(id) {
            if let BlockKind::Header { id: slot, .. } = self.kind_mut(block) {
                *slot = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Format, HeaderLevel};
    use pretty_assertions::assert_eq;

    static_assertions::assert_impl_all!(Tree: Send, Sync);

    fn sample_tree() -> Tree {
        Tree::from_block(
            Block::new(BlockKind::Document)
                .child(Block::paragraph(vec![
                    Block::word("Hello"),
                    Block::space(),
                    Block::word("world"),
                ]))
                .child(Block::header(HeaderLevel::Level1, vec![Block::word("Title")])),
        )
    }

    #[test]
    fn add_child_sets_parent_and_order() {
        let mut tree = Tree::new();
        let a = tree.add_child(tree.root(), Block::word("a"));
        let b = tree.add_child(tree.root(), Block::word("b"));
        assert_eq!(tree.children(tree.root()), &[a, b]);
        assert_eq!(tree.parent(a), Some(tree.root()));
        assert_eq!(tree.parent(tree.root()), None);
    }

    #[test]
    fn insert_before_and_after_anchor() {
        let mut tree = Tree::new();
        let root = tree.root();
        let anchor = tree.add_child(root, Block::word("anchor"));
        let before = tree.insert_child_before(root, Block::word("x"), anchor).unwrap();
        let after = tree.insert_child_after(root, Block::word("y"), anchor).unwrap();
        assert_eq!(tree.children(root), &[before, anchor, after]);
    }

    #[test]
    fn insert_with_foreign_anchor_fails() {
        let mut tree = Tree::new();
        let root = tree.root();
        let child = tree.add_child(root, Block::paragraph(vec![Block::word("a")]));
        let grandchild = tree.children(child)[0];
        let err = tree
            .insert_child_before(root, Block::word("x"), grandchild)
            .unwrap_err();
        assert_eq!(
            err,
            TreeError::NotAChild {
                parent: root,
                anchor: grandchild
            }
        );
    }

    #[test]
    fn replace_child_preserves_position() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.add_child(root, Block::word("a"));
        let b = tree.add_child(root, Block::word("b"));
        let c = tree.add_child(root, Block::word("c"));
        let _ = (a, c);

        let replacements = tree
            .replace_child(root, vec![Block::word("x"), Block::word("y")], b)
            .unwrap();
        let children = tree.children(root).to_vec();
        assert_eq!(children.len(), 4);
        assert_eq!(children[1], replacements[0]);
        assert_eq!(children[2], replacements[1]);
        assert_eq!(tree.parent(b), None);
    }

    #[test]
    fn remove_block_keeps_sibling_order() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.add_child(root, Block::word("a"));
        let b = tree.add_child(root, Block::word("b"));
        let c = tree.add_child(root, Block::word("c"));
        tree.remove_block(b).unwrap();
        assert_eq!(tree.children(root), &[a, c]);
        assert_eq!(tree.remove_block(b), Err(TreeError::AlreadyDetached(b)));
        // A detached block becomes its own topmost ancestor.
        assert_eq!(tree.root_of(b), b);
        assert_eq!(tree.root_of(a), root);
    }

    #[test]
    fn clone_subtree_is_independent() {
        let tree = sample_tree();
        let mut copy = tree.clone_subtree(tree.root());
        let copy_root = copy.root();
        copy.add_child(copy_root, Block::word("extra"));
        assert_eq!(tree.children(tree.root()).len(), 2);
        assert_eq!(copy.children(copy.root()).len(), 3);
    }

    #[test]
    fn duplicate_header_titles_get_distinct_ids() {
        let mut tree = Tree::from_block(
            Block::new(BlockKind::Document)
                .child(Block::header(HeaderLevel::Level1, vec![Block::word("Introduction")]))
                .child(Block::header(HeaderLevel::Level1, vec![Block::word("Introduction")])),
        );
        let first = tree.children(tree.root())[0];
        let second = tree.children(tree.root())[1];
        let id1 = tree.ensure_header_id(first).unwrap();
        let id2 = tree.ensure_header_id(second).unwrap();
        assert_eq!(id1, "HIntroduction");
        assert_eq!(id2, "HIntroduction-1");
    }

    #[test]
    fn formatted_header_title_survives_flattening() {
        let mut tree = Tree::from_block(Block::new(BlockKind::Document).child(Block::header(
            HeaderLevel::Level2,
            vec![
                Block::word("Install"),
                Block::space(),
                Block::new(BlockKind::Format(Format::Bold)).child(Block::word("guide")),
            ],
        )));
        let header = tree.children(tree.root())[0];
        assert_eq!(tree.flattened_text(header), "Install guide");
        assert_eq!(tree.ensure_header_id(header).unwrap(), "HInstallguide");
    }

    #[test]
    fn header_id_is_stable_until_reparented() {
        let mut tree = sample_tree();
        let header = tree.children(tree.root())[1];
        let original = tree.ensure_header_id(header).unwrap();
        assert_eq!(tree.ensure_header_id(header).unwrap(), original);

        // Reparent: the cached id is dropped and a new one minted.
        tree.remove_block(header).unwrap();
        let section = tree.add_child(tree.root(), Block::new(BlockKind::Section));
        tree.attach_child(section, header).unwrap();
        let regenerated = tree.ensure_header_id(header).unwrap();
        assert_ne!(regenerated, original);
    }

    #[test]
    fn graft_consumes_the_embedded_tree() {
        let mut host = sample_tree();
        let embedded = Tree::from_block(
            Block::new(BlockKind::Document)
                .child(Block::header(HeaderLevel::Level1, vec![Block::word("Title")])),
        );
        let host_header = host.children(host.root())[1];
        host.ensure_header_id(host_header).unwrap();

        let root = host.root();
        let grafted = host.graft(root, embedded);
        let inner_header = host.children(grafted)[0];
        // Both titles are "Title": the grafted header disambiguates against
        // the host generator.
        assert_eq!(host.ensure_header_id(inner_header).unwrap(), "HTitle-1");
    }

    #[test]
    fn detach_regains_a_fresh_generator() {
        let mut tree = sample_tree();
        let header = tree.children(tree.root())[1];
        tree.ensure_header_id(header).unwrap();

        let paragraph = tree.children(tree.root())[0];
        let mut detached = tree.detach(paragraph).unwrap();
        let root = detached.root();
        let new_header = detached.add_child(
            root,
            Block::header(HeaderLevel::Level1, vec![Block::word("Title")]),
        );
        // Fresh generator: no `-1` suffix even though the old tree used HTitle.
        assert_eq!(detached.ensure_header_id(new_header).unwrap(), "HTitle");
    }

    #[test]
    fn flattened_text_concatenates_words() {
        let tree = Tree::from_block(Block::new(BlockKind::Document).child(Block::header(
            HeaderLevel::Level2,
            vec![
                Block::word("Install"),
                Block::space(),
                Block::word("guide"),
            ],
        )));
        let header = tree.children(tree.root())[0];
        assert_eq!(tree.flattened_text(header), "Install guide");
    }
}

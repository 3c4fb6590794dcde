//! Block kinds and their payloads.

use crate::params::Parameters;

/// Inline formatting applied by a format span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Format {
    Bold,
    Italic,
    Strikeout,
    Underline,
    Superscript,
    Subscript,
    Monospace,
}

/// List style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ListKind {
    Bulleted,
    Numbered,
}

/// Header level, 1 (largest) through 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeaderLevel {
    Level1,
    Level2,
    Level3,
    Level4,
    Level5,
    Level6,
}

impl HeaderLevel {
    /// Numeric level, 1..=6.
    #[must_use]
    pub fn as_number(self) -> u8 {
        match self {
            Self::Level1 => 1,
            Self::Level2 => 2,
            Self::Level3 => 3,
            Self::Level4 => 4,
            Self::Level5 => 5,
            Self::Level6 => 6,
        }
    }

    /// Level for a numeric value, if in range.
    #[must_use]
    pub fn from_number(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Level1),
            2 => Some(Self::Level2),
            3 => Some(Self::Level3),
            4 => Some(Self::Level4),
            5 => Some(Self::Level5),
            6 => Some(Self::Level6),
            _ => None,
        }
    }
}

/// What a link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LinkKind {
    /// A document inside the system; the label is produced by a
    /// [`LinkLabelGenerator`](crate::LinkLabelGenerator) when absent.
    Document,
    /// An external URL; the raw reference doubles as the fallback label.
    Url,
}

/// Link reference payload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkTarget {
    pub kind: LinkKind,
    pub reference: String,
    pub anchor: Option<String>,
}

impl LinkTarget {
    /// A link to a document reference.
    #[must_use]
    pub fn document(reference: impl Into<String>) -> Self {
        Self {
            kind: LinkKind::Document,
            reference: reference.into(),
            anchor: None,
        }
    }

    /// A link to an external URL.
    #[must_use]
    pub fn url(reference: impl Into<String>) -> Self {
        Self {
            kind: LinkKind::Url,
            reference: reference.into(),
            anchor: None,
        }
    }

    /// Attach a target anchor.
    #[must_use]
    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    /// Serialized reference, `reference` plus `#anchor` when present.
    #[must_use]
    pub fn serialize(&self) -> String {
        match &self.anchor {
            Some(anchor) => format!("{}#{anchor}", self.reference),
            None => self.reference.clone(),
        }
    }
}

/// What an image points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImageKind {
    /// An attachment of a document inside the system.
    Document,
    /// An external URL.
    Url,
}

/// Image reference payload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageTarget {
    pub kind: ImageKind,
    pub reference: String,
}

impl ImageTarget {
    /// An image stored as a document attachment.
    #[must_use]
    pub fn document(reference: impl Into<String>) -> Self {
        Self {
            kind: ImageKind::Document,
            reference: reference.into(),
        }
    }

    /// An image at an external URL.
    #[must_use]
    pub fn url(reference: impl Into<String>) -> Self {
        Self {
            kind: ImageKind::Url,
            reference: reference.into(),
        }
    }
}

/// A macro invocation: name, parameters, optional body, inline flag.
///
/// Carried both by an unexpanded call placeholder and by the marker that
/// wraps an expansion so renderers can reconstruct the original source.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MacroCall {
    pub name: String,
    pub parameters: Parameters,
    pub content: Option<String>,
    pub inline: bool,
}

impl MacroCall {
    /// A block-level macro call without parameters or content.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Parameters::new(),
            content: None,
            inline: false,
        }
    }

    /// Set invocation parameters.
    #[must_use]
    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Set the macro body.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Mark the call as inline (part of a line of text).
    #[must_use]
    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }
}

/// Raw XML node payload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum XmlNode {
    Element {
        name: String,
        attributes: Parameters,
    },
    CData,
    Comment(String),
}

/// The kind of one document-tree block, with its kind-specific payload.
///
/// One closed variant per content kind; renderers and filters dispatch over
/// this exhaustively, so adding a kind is a compile-checked change across
/// the whole pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockKind {
    /// Document root, or an embedded sub-document when not at the root.
    Document,
    Section,
    /// The id is generated lazily from the flattened title and cached until
    /// the header is reparented.
    Header {
        level: HeaderLevel,
        id: Option<String>,
    },
    Paragraph,
    List(ListKind),
    ListItem,
    DefinitionList,
    DefinitionTerm,
    DefinitionDescription,
    Quotation,
    QuotationLine,
    Table,
    TableRow,
    TableCell,
    TableHeadCell,
    Format(Format),
    Link {
        target: LinkTarget,
        freestanding: bool,
    },
    Image {
        target: ImageTarget,
        freestanding: bool,
    },
    /// Unexpanded macro call. Traversal emits a single informational event
    /// and never recurses; expansion replaces this block with a
    /// `MacroMarker`-wrapped subtree.
    MacroCall(MacroCall),
    /// Wraps a macro expansion, retaining the original invocation.
    MacroMarker(MacroCall),
    /// Text passed through untouched into one named output syntax.
    Raw { text: String, syntax: String },
    Verbatim { text: String, inline: bool },
    Word(String),
    Space,
    SpecialSymbol(char),
    NewLine,
    EmptyLines(u32),
    HorizontalRule,
    /// Anchor with a referencable name.
    Id(String),
    Xml(XmlNode),
    Error { message: String, description: String },
    /// Generic delimited group.
    Group,
    /// Transparent container: traversal emits only the children's events.
    Collection,
    /// Wraps children with out-of-band metadata; produces no visible output.
    Metadata,
}

impl BlockKind {
    /// `true` for father-type kinds whose children are traversed between a
    /// `Begin`/`End` event pair.
    ///
    /// `MacroCall` is deliberately not a container: a still-unexpanded call
    /// must not produce structural events.
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Self::Document
                | Self::Section
                | Self::Header { .. }
                | Self::Paragraph
                | Self::List(_)
                | Self::ListItem
                | Self::DefinitionList
                | Self::DefinitionTerm
                | Self::DefinitionDescription
                | Self::Quotation
                | Self::QuotationLine
                | Self::Table
                | Self::TableRow
                | Self::TableCell
                | Self::TableHeadCell
                | Self::Format(_)
                | Self::Link { .. }
                | Self::MacroMarker(_)
                | Self::Xml(_)
                | Self::Group
                | Self::Collection
                | Self::Metadata
        )
    }
}

/// An owned block value: kind, parameters and child blocks.
///
/// This is the interchange format of the model: parsers and macro
/// transformers build `Block` values, [`Tree`](crate::Tree) adopts them into
/// its arena, filters substitute them, and cloning a subtree extracts them
/// back out.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    pub kind: BlockKind,
    pub parameters: Parameters,
    pub children: Vec<Block>,
}

impl Block {
    /// A block of the given kind with no parameters or children.
    #[must_use]
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            parameters: Parameters::new(),
            children: Vec::new(),
        }
    }

    /// Attach parameters.
    #[must_use]
    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Replace the child sequence.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }

    /// Append one child.
    #[must_use]
    pub fn child(mut self, child: Block) -> Self {
        self.children.push(child);
        self
    }

    /// A word block.
    #[must_use]
    pub fn word(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Word(text.into()))
    }

    /// A space block.
    #[must_use]
    pub fn space() -> Self {
        Self::new(BlockKind::Space)
    }

    /// A special-symbol block.
    #[must_use]
    pub fn symbol(symbol: char) -> Self {
        Self::new(BlockKind::SpecialSymbol(symbol))
    }

    /// A paragraph wrapping the given children.
    #[must_use]
    pub fn paragraph(children: Vec<Block>) -> Self {
        Self::new(BlockKind::Paragraph).with_children(children)
    }

    /// A header at the given level wrapping the given title blocks.
    #[must_use]
    pub fn header(level: HeaderLevel, children: Vec<Block>) -> Self {
        Self::new(BlockKind::Header { level, id: None }).with_children(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macro_call_is_not_a_container() {
        assert!(!BlockKind::MacroCall(MacroCall::new("toc")).is_container());
        assert!(BlockKind::MacroMarker(MacroCall::new("toc")).is_container());
    }

    #[test]
    fn atomic_kinds_are_not_containers() {
        assert!(!BlockKind::Word("a".into()).is_container());
        assert!(!BlockKind::Space.is_container());
        assert!(!BlockKind::HorizontalRule.is_container());
        assert!(!BlockKind::EmptyLines(2).is_container());
        assert!(BlockKind::Paragraph.is_container());
    }

    #[test]
    fn link_target_serializes_anchor() {
        let target = LinkTarget::document("Main.Home").with_anchor("intro");
        assert_eq!(target.serialize(), "Main.Home#intro");
        assert_eq!(LinkTarget::url("https://example.org").serialize(), "https://example.org");
    }
}

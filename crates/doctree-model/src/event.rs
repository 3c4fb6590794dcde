//! Traversal events and the listener seam.

use crate::block::{BlockKind, Format, HeaderLevel, ImageTarget, LinkTarget, ListKind, MacroCall, XmlNode};
use crate::params::Parameters;
use crate::tree::{BlockId, Tree};

/// A container opened by [`Event::Begin`] and closed by [`Event::End`].
///
/// Each variant carries the node-specific data plus the node's parameter
/// map, so a listener never needs to reach back into the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Document(Parameters),
    Section(Parameters),
    Header {
        level: HeaderLevel,
        id: String,
        parameters: Parameters,
    },
    Paragraph(Parameters),
    Format(Format, Parameters),
    List(ListKind, Parameters),
    ListItem(Parameters),
    DefinitionList(Parameters),
    DefinitionTerm(Parameters),
    DefinitionDescription(Parameters),
    Quotation(Parameters),
    QuotationLine(Parameters),
    Table(Parameters),
    TableRow(Parameters),
    TableCell(Parameters),
    TableHeadCell(Parameters),
    Link {
        target: LinkTarget,
        freestanding: bool,
        parameters: Parameters,
    },
    MacroMarker(MacroCall),
    Xml(XmlNode),
    Group(Parameters),
    Metadata(Parameters),
}

/// One push-style traversal event.
///
/// This is the seam that decouples what a document contains from how it is
/// printed: anything implementing [`Listener`] can consume a traversal
/// without knowing concrete block types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Begin(Tag),
    End(Tag),
    Word(String),
    Space,
    SpecialSymbol(char),
    NewLine,
    EmptyLines(u32),
    HorizontalRule(Parameters),
    Id(String),
    Verbatim {
        text: String,
        inline: bool,
        parameters: Parameters,
    },
    Raw {
        text: String,
        syntax: String,
    },
    Image {
        target: ImageTarget,
        freestanding: bool,
        parameters: Parameters,
    },
    /// A still-unexpanded macro call; purely informational, traversal never
    /// recurses into or executes the call.
    MacroCall(MacroCall),
    Error {
        message: String,
        description: String,
    },
}

impl Event {
    /// `true` when this event closes an inline context (used by renderers
    /// deciding whether a trailing new line must become a hard break).
    #[must_use]
    pub fn ends_inline_content(&self) -> bool {
        matches!(
            self,
            Event::End(
                Tag::Paragraph(_)
                    | Tag::Header { .. }
                    | Tag::ListItem(_)
                    | Tag::DefinitionTerm(_)
                    | Tag::DefinitionDescription(_)
                    | Tag::QuotationLine(_)
                    | Tag::TableCell(_)
                    | Tag::TableHeadCell(_)
                    | Tag::Link { .. }
                    | Tag::Format(..)
            )
        ) || matches!(self, Event::End(Tag::MacroMarker(call)) if call.inline)
    }
}

/// The event surface a tree traversal pushes into.
pub trait Listener {
    fn event(&mut self, event: &Event);
}

impl Tree {
    /// Depth-first traversal of the whole tree, in document order.
    ///
    /// Container blocks produce a `Begin` event, their children's events,
    /// then an `End` event; atomic blocks produce exactly one event. Takes
    /// `&mut self` because header ids are minted lazily on first traversal.
    pub fn traverse(&mut self, listener: &mut dyn Listener) {
        self.traverse_from(self.root(), listener);
    }

    /// Traversal of the subtree rooted at `id`.
    pub fn traverse_from(&mut self, id: BlockId, listener: &mut dyn Listener) {
        if let Some(event) = self.atomic_event(id) {
            listener.event(&event);
            return;
        }
        match self.container_tag(id) {
            Some(tag) => {
                listener.event(&Event::Begin(tag.clone()));
                for child in self.children(id).to_vec() {
                    self.traverse_from(child, listener);
                }
                listener.event(&Event::End(tag));
            }
            // Transparent collection: children only.
            None => {
                for child in self.children(id).to_vec() {
                    self.traverse_from(child, listener);
                }
            }
        }
    }

    fn atomic_event(&self, id: BlockId) -> Option<Event> {
        let parameters = self.parameters(id).clone();
        match self.kind(id) {
            BlockKind::Word(word) => Some(Event::Word(word.clone())),
            BlockKind::Space => Some(Event::Space),
            BlockKind::SpecialSymbol(symbol) => Some(Event::SpecialSymbol(*symbol)),
            BlockKind::NewLine => Some(Event::NewLine),
            BlockKind::EmptyLines(count) => Some(Event::EmptyLines(*count)),
            BlockKind::HorizontalRule => Some(Event::HorizontalRule(parameters)),
            BlockKind::Id(name) => Some(Event::Id(name.clone())),
            BlockKind::Verbatim { text, inline } => Some(Event::Verbatim {
                text: text.clone(),
                inline: *inline,
                parameters,
            }),
            BlockKind::Raw { text, syntax } => Some(Event::Raw {
                text: text.clone(),
                syntax: syntax.clone(),
            }),
            BlockKind::Image {
                target,
                freestanding,
            } => Some(Event::Image {
                target: target.clone(),
                freestanding: *freestanding,
                parameters,
            }),
            BlockKind::MacroCall(call) => Some(Event::MacroCall(call.clone())),
            BlockKind::Error {
                message,
                description,
            } => Some(Event::Error {
                message: message.clone(),
                description: description.clone(),
            }),
            BlockKind::Document
            | BlockKind::Section
            | BlockKind::Header { .. }
            | BlockKind::Paragraph
            | BlockKind::List(_)
            | BlockKind::ListItem
            | BlockKind::DefinitionList
            | BlockKind::DefinitionTerm
            | BlockKind::DefinitionDescription
            | BlockKind::Quotation
            | BlockKind::QuotationLine
            | BlockKind::Table
            | BlockKind::TableRow
            | BlockKind::TableCell
            | BlockKind::TableHeadCell
            | BlockKind::Format(_)
            | BlockKind::Link { .. }
            | BlockKind::MacroMarker(_)
            | BlockKind::Xml(_)
            | BlockKind::Group
            | BlockKind::Collection
            | BlockKind::Metadata => None,
        }
    }

    fn container_tag(&mut self, id: BlockId) -> Option<Tag> {
        let parameters = self.parameters(id).clone();
        match self.kind(id) {
            BlockKind::Document => Some(Tag::Document(parameters)),
            BlockKind::Section => Some(Tag::Section(parameters)),
            BlockKind::Header { level, .. } => {
                let level = *level;
                let id_attr = self.ensure_header_id(id).unwrap_or_default();
                Some(Tag::Header {
                    level,
                    id: id_attr,
                    parameters,
                })
            }
            BlockKind::Paragraph => Some(Tag::Paragraph(parameters)),
            BlockKind::Format(format) => Some(Tag::Format(*format, parameters)),
            BlockKind::List(kind) => Some(Tag::List(*kind, parameters)),
            BlockKind::ListItem => Some(Tag::ListItem(parameters)),
            BlockKind::DefinitionList => Some(Tag::DefinitionList(parameters)),
            BlockKind::DefinitionTerm => Some(Tag::DefinitionTerm(parameters)),
            BlockKind::DefinitionDescription => Some(Tag::DefinitionDescription(parameters)),
            BlockKind::Quotation => Some(Tag::Quotation(parameters)),
            BlockKind::QuotationLine => Some(Tag::QuotationLine(parameters)),
            BlockKind::Table => Some(Tag::Table(parameters)),
            BlockKind::TableRow => Some(Tag::TableRow(parameters)),
            BlockKind::TableCell => Some(Tag::TableCell(parameters)),
            BlockKind::TableHeadCell => Some(Tag::TableHeadCell(parameters)),
            BlockKind::Link {
                target,
                freestanding,
            } => Some(Tag::Link {
                target: target.clone(),
                freestanding: *freestanding,
                parameters,
            }),
            BlockKind::MacroMarker(call) => Some(Tag::MacroMarker(call.clone())),
            BlockKind::Xml(node) => Some(Tag::Xml(node.clone())),
            BlockKind::Group => Some(Tag::Group(parameters)),
            BlockKind::Metadata => Some(Tag::Metadata(parameters)),
            BlockKind::Collection => None,
            BlockKind::Word(_)
            | BlockKind::Space
            | BlockKind::SpecialSymbol(_)
            | BlockKind::NewLine
            | BlockKind::EmptyLines(_)
            | BlockKind::HorizontalRule
            | BlockKind::Id(_)
            | BlockKind::Verbatim { .. }
            | BlockKind::Raw { .. }
            | BlockKind::Image { .. }
            | BlockKind::MacroCall(_)
            | BlockKind::Error { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use pretty_assertions::assert_eq;

    /// Records every event it sees.
    #[derive(Default)]
    struct Recorder {
        events: Vec<Event>,
    }

    impl Listener for Recorder {
        fn event(&mut self, event: &Event) {
            self.events.push(event.clone());
        }
    }

    #[test]
    fn container_emits_begin_children_end() {
        let mut tree = Tree::from_block(Block::new(BlockKind::Document).child(
            Block::paragraph(vec![Block::word("a"), Block::space(), Block::word("b")]),
        ));
        let mut recorder = Recorder::default();
        tree.traverse(&mut recorder);

        assert_eq!(
            recorder.events,
            vec![
                Event::Begin(Tag::Document(Parameters::new())),
                Event::Begin(Tag::Paragraph(Parameters::new())),
                Event::Word("a".into()),
                Event::Space,
                Event::Word("b".into()),
                Event::End(Tag::Paragraph(Parameters::new())),
                Event::End(Tag::Document(Parameters::new())),
            ]
        );
    }

    #[test]
    fn unexpanded_macro_call_emits_one_event() {
        let call = MacroCall::new("toc");
        let mut tree = Tree::from_block(
            Block::new(BlockKind::Document).child(
                // A malformed tree with children under a call: traversal
                // must still not recurse.
                Block::new(BlockKind::MacroCall(call.clone())).child(Block::word("ignored")),
            ),
        );
        let mut recorder = Recorder::default();
        tree.traverse(&mut recorder);

        assert_eq!(recorder.events.len(), 3);
        assert_eq!(recorder.events[1], Event::MacroCall(call));
    }

    #[test]
    fn collection_is_transparent() {
        let mut tree = Tree::from_block(
            Block::new(BlockKind::Document).child(
                Block::new(BlockKind::Collection)
                    .child(Block::word("a"))
                    .child(Block::word("b")),
            ),
        );
        let mut recorder = Recorder::default();
        tree.traverse(&mut recorder);

        let words: Vec<_> = recorder
            .events
            .iter()
            .filter(|e| matches!(e, Event::Word(_)))
            .collect();
        assert_eq!(words.len(), 2);
        assert!(
            !recorder
                .events
                .iter()
                .any(|e| matches!(e, Event::Begin(Tag::Group(_))))
        );
    }

    #[test]
    fn header_event_carries_generated_id() {
        let mut tree = Tree::from_block(Block::new(BlockKind::Document).child(Block::header(
            HeaderLevel::Level1,
            vec![Block::word("Title")],
        )));
        let mut recorder = Recorder::default();
        tree.traverse(&mut recorder);

        let Event::Begin(Tag::Header { id, level, .. }) = &recorder.events[1] else {
            panic!("expected header begin");
        };
        assert_eq!(id, "HTitle");
        assert_eq!(*level, HeaderLevel::Level1);
    }

    #[test]
    fn repeated_traversal_is_stable() {
        let mut tree = Tree::from_block(Block::new(BlockKind::Document).child(Block::header(
            HeaderLevel::Level1,
            vec![Block::word("Title")],
        )));
        let mut first = Recorder::default();
        tree.traverse(&mut first);
        let mut second = Recorder::default();
        tree.traverse(&mut second);
        assert_eq!(first.events, second.events);
    }
}

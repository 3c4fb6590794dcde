//! Event-dump renderer: one line per traversal event.
//!
//! The output is meant for differential testing of traversals, not for
//! humans, so it favours an exhaustive and stable format over looks.

use std::fmt::Write as _;

use doctree_model::{Event, Parameters, Tag, XmlNode};

use crate::chain::Renderer;
use crate::error::RenderError;
use crate::invocation::serialize_parameters;
use crate::printer::PrinterStack;
use crate::state::ChainState;

#[derive(Default)]
pub struct EventRenderer {
    printer: PrinterStack,
}

impl EventRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn line(&mut self, text: &str) {
        self.printer.print(text);
        self.printer.print("\n");
    }
}

impl Renderer for EventRenderer {
    fn event(&mut self, event: &Event, _state: &ChainState, _next: Option<&Event>) {
        let line = match event {
            Event::Begin(tag) => format!("begin{}", describe_tag(tag)),
            Event::End(tag) => format!("end{}", describe_tag(tag)),
            Event::Word(word) => format!("onWord [{}]", escape(word)),
            Event::Space => "onSpace".to_owned(),
            Event::SpecialSymbol(symbol) => {
                format!("onSpecialSymbol [{}]", escape(&symbol.to_string()))
            }
            Event::NewLine => "onNewLine".to_owned(),
            Event::EmptyLines(count) => format!("onEmptyLines [{count}]"),
            Event::HorizontalRule(parameters) => {
                format!("onHorizontalRule{}", describe_parameters(parameters))
            }
            Event::Id(name) => format!("onId [{}]", escape(name)),
            Event::Verbatim {
                text,
                inline,
                parameters,
            } => format!(
                "onVerbatim [{}] [{inline}]{}",
                escape(text),
                describe_parameters(parameters)
            ),
            Event::Raw { text, syntax } => {
                format!("onRawText [{}] [{syntax}]", escape(text))
            }
            Event::Image {
                target,
                freestanding,
                parameters,
            } => format!(
                "onImage [{}] [{freestanding}]{}",
                escape(&target.reference),
                describe_parameters(parameters)
            ),
            Event::MacroCall(call) => format!(
                "onMacro [{}] [{}] [{}]",
                call.name,
                serialize_parameters(&call.parameters),
                escape(call.content.as_deref().unwrap_or(""))
            ),
            Event::Error {
                message,
                description,
            } => format!("onError [{}] [{}]", escape(message), escape(description)),
        };
        self.line(&line);
    }

    fn finish(self) -> Result<String, RenderError> {
        self.printer.finish()
    }
}

fn describe_tag(tag: &Tag) -> String {
    match tag {
        Tag::Document(parameters) => format!("Document{}", describe_parameters(parameters)),
        Tag::Section(parameters) => format!("Section{}", describe_parameters(parameters)),
        Tag::Header {
            level,
            id,
            parameters,
        } => format!(
            "Header [{}] [{}]{}",
            level.as_number(),
            id,
            describe_parameters(parameters)
        ),
        Tag::Paragraph(parameters) => format!("Paragraph{}", describe_parameters(parameters)),
        Tag::Format(format, parameters) => {
            format!("Format [{format:?}]{}", describe_parameters(parameters))
        }
        Tag::List(kind, parameters) => {
            format!("List [{kind:?}]{}", describe_parameters(parameters))
        }
        Tag::ListItem(parameters) => format!("ListItem{}", describe_parameters(parameters)),
        Tag::DefinitionList(parameters) => {
            format!("DefinitionList{}", describe_parameters(parameters))
        }
        Tag::DefinitionTerm(parameters) => {
            format!("DefinitionTerm{}", describe_parameters(parameters))
        }
        Tag::DefinitionDescription(parameters) => {
            format!("DefinitionDescription{}", describe_parameters(parameters))
        }
        Tag::Quotation(parameters) => format!("Quotation{}", describe_parameters(parameters)),
        Tag::QuotationLine(parameters) => {
            format!("QuotationLine{}", describe_parameters(parameters))
        }
        Tag::Table(parameters) => format!("Table{}", describe_parameters(parameters)),
        Tag::TableRow(parameters) => format!("TableRow{}", describe_parameters(parameters)),
        Tag::TableCell(parameters) => format!("TableCell{}", describe_parameters(parameters)),
        Tag::TableHeadCell(parameters) => {
            format!("TableHeadCell{}", describe_parameters(parameters))
        }
        Tag::Link {
            target,
            freestanding,
            parameters,
        } => format!(
            "Link [{}] [{freestanding}]{}",
            escape(&target.serialize()),
            describe_parameters(parameters)
        ),
        Tag::MacroMarker(call) => format!(
            "MacroMarker [{}] [{}] [{}]",
            call.name,
            serialize_parameters(&call.parameters),
            escape(call.content.as_deref().unwrap_or(""))
        ),
        Tag::Xml(node) => match node {
            XmlNode::Element { name, attributes } => {
                format!("Xml [{}]{}", name, describe_parameters(attributes))
            }
            XmlNode::CData => "XmlCData".to_owned(),
            XmlNode::Comment(text) => format!("XmlComment [{}]", escape(text)),
        },
        Tag::Group(parameters) => format!("Group{}", describe_parameters(parameters)),
        Tag::Metadata(parameters) => format!("Metadata{}", describe_parameters(parameters)),
    }
}

fn describe_parameters(parameters: &Parameters) -> String {
    if parameters.is_empty() {
        return String::new();
    }
    format!(" [{}]", serialize_parameters(parameters))
}

/// Control and other non-printable characters become `(((codepoint)))` so
/// dump lines stay one physical line each.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_control() {
            let _ = write!(out, "((({})))", c as u32);
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ListenerChain;
    use doctree_model::{Block, BlockKind, Tree};
    use pretty_assertions::assert_eq;

    fn dump(block: Block) -> String {
        let mut tree = Tree::from_block(block);
        let mut chain = ListenerChain::new(EventRenderer::new());
        tree.traverse(&mut chain);
        chain.finish().unwrap()
    }

    #[test]
    fn paragraph_dump() {
        let output = dump(Block::new(BlockKind::Document).child(Block::paragraph(vec![
            Block::word("Hello"),
            Block::space(),
            Block::word("World"),
        ])));
        assert_eq!(
            output,
            "beginDocument\n\
             beginParagraph\n\
             onWord [Hello]\n\
             onSpace\n\
             onWord [World]\n\
             endParagraph\n\
             endDocument\n"
        );
    }

    #[test]
    fn control_characters_are_escaped() {
        let output = dump(
            Block::new(BlockKind::Document)
                .child(Block::paragraph(vec![Block::word("a\tb")])),
        );
        assert!(output.contains("onWord [a(((9)))b]"));
    }
}

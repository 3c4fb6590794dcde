//! XHTML renderer.
//!
//! Macro calls and markers leave hidden comments in the output so a later
//! pass can reconstruct the original invocation from the rendered page.

use doctree_model::{Event, Format, ListKind, MacroCall, Tag, XmlNode};

use crate::chain::Renderer;
use crate::error::RenderError;
use crate::invocation::{comment_payload, escape_comment};
use crate::printer::PrinterStack;
use crate::state::ChainState;

#[derive(Default)]
pub struct XhtmlRenderer {
    printer: PrinterStack,
}

impl XhtmlRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn start_element<'a>(
        &mut self,
        name: &str,
        attributes: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) {
        self.printer.print_char('<');
        self.printer.print(name);
        for (key, value) in attributes {
            self.printer.print_char(' ');
            self.printer.print(key);
            self.printer.print("=\"");
            self.printer.print(&escape_attribute(value));
            self.printer.print_char('"');
        }
        self.printer.print_char('>');
    }

    fn end_element(&mut self, name: &str) {
        self.printer.print("</");
        self.printer.print(name);
        self.printer.print_char('>');
    }

    fn empty_element<'a>(
        &mut self,
        name: &str,
        attributes: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) {
        self.printer.print_char('<');
        self.printer.print(name);
        for (key, value) in attributes {
            self.printer.print_char(' ');
            self.printer.print(key);
            self.printer.print("=\"");
            self.printer.print(&escape_attribute(value));
            self.printer.print_char('"');
        }
        self.printer.print("/>");
    }

    fn text(&mut self, text: &str) {
        self.printer.print(&escape_text(text));
    }

    fn comment(&mut self, payload: &str) {
        self.printer.print("<!--");
        self.printer.print(&escape_comment(payload));
        self.printer.print("-->");
    }

    fn macro_comment(&mut self, call: &MacroCall) {
        self.comment(&comment_payload(call));
    }

    fn begin_tag(&mut self, tag: &Tag, state: &ChainState) {
        match tag {
            Tag::Document(_) => {
                if state.document_depth() > 1 {
                    self.start_element("div", [("class", "doctree-document")]);
                }
            }
            Tag::Section(_) | Tag::Metadata(_) => {}
            Tag::Header {
                level,
                id,
                parameters,
            } => {
                let name = format!("h{}", level.as_number());
                let attributes: Vec<(&str, &str)> = std::iter::once(("id", id.as_str()))
                    .chain(parameters.iter())
                    .collect();
                self.start_element(&name, attributes);
                self.start_element("span", []);
            }
            Tag::Paragraph(parameters) => self.start_element("p", parameters.iter()),
            Tag::Format(format, parameters) => {
                if !parameters.is_empty() {
                    self.start_element("span", parameters.iter());
                }
                self.start_element(format_element(*format), []);
            }
            Tag::List(ListKind::Bulleted, parameters) => self.start_element("ul", parameters.iter()),
            Tag::List(ListKind::Numbered, parameters) => self.start_element("ol", parameters.iter()),
            Tag::ListItem(parameters) => self.start_element("li", parameters.iter()),
            Tag::DefinitionList(parameters) => self.start_element("dl", parameters.iter()),
            Tag::DefinitionTerm(parameters) => self.start_element("dt", parameters.iter()),
            Tag::DefinitionDescription(parameters) => self.start_element("dd", parameters.iter()),
            Tag::Quotation(parameters) => self.start_element("blockquote", parameters.iter()),
            Tag::QuotationLine(_) => {
                // Lines would otherwise run together inside the blockquote.
                if matches!(
                    state.block().previous_event(),
                    Some(Event::End(Tag::QuotationLine(_)))
                ) {
                    self.empty_element("br", []);
                }
            }
            Tag::Table(parameters) => self.start_element("table", parameters.iter()),
            Tag::TableRow(parameters) => self.start_element("tr", parameters.iter()),
            Tag::TableCell(parameters) => self.start_element("td", parameters.iter()),
            Tag::TableHeadCell(parameters) => self.start_element("th", parameters.iter()),
            Tag::Link {
                target, parameters, ..
            } => {
                if state.block().link_depth() < 2 {
                    let href = target.serialize();
                    let attributes: Vec<(&str, &str)> =
                        std::iter::once(("href", href.as_str()))
                            .chain(parameters.iter())
                            .collect();
                    self.start_element("a", attributes);
                    // Buffer the label so an empty one can be synthesized.
                    self.printer.push();
                }
            }
            Tag::MacroMarker(call) => {
                if state.block().macro_depth() == 1 {
                    self.macro_comment(call);
                }
            }
            Tag::Xml(node) => match node {
                XmlNode::Element { name, attributes } => {
                    self.start_element(name, attributes.iter());
                }
                XmlNode::CData => self.printer.print("<![CDATA["),
                XmlNode::Comment(text) => self.comment(text),
            },
            Tag::Group(parameters) => self.start_element("div", parameters.iter()),
        }
    }

    fn end_tag(&mut self, tag: &Tag, state: &ChainState) {
        match tag {
            Tag::Document(_) => {
                if state.document_depth() > 1 {
                    self.end_element("div");
                }
            }
            Tag::Section(_) | Tag::Metadata(_) | Tag::QuotationLine(_) => {}
            Tag::Header { level, .. } => {
                self.end_element("span");
                self.end_element(&format!("h{}", level.as_number()));
            }
            Tag::Paragraph(_) => self.end_element("p"),
            Tag::Format(format, parameters) => {
                self.end_element(format_element(*format));
                if !parameters.is_empty() {
                    self.end_element("span");
                }
            }
            Tag::List(ListKind::Bulleted, _) => self.end_element("ul"),
            Tag::List(ListKind::Numbered, _) => self.end_element("ol"),
            Tag::ListItem(_) => self.end_element("li"),
            Tag::DefinitionList(_) => self.end_element("dl"),
            Tag::DefinitionTerm(_) => self.end_element("dt"),
            Tag::DefinitionDescription(_) => self.end_element("dd"),
            Tag::Quotation(_) => self.end_element("blockquote"),
            Tag::Table(_) => self.end_element("table"),
            Tag::TableRow(_) => self.end_element("tr"),
            Tag::TableCell(_) => self.end_element("td"),
            Tag::TableHeadCell(_) => self.end_element("th"),
            Tag::Link { target, .. } => {
                if state.block().link_depth() == 1 {
                    let label = self.printer.pop();
                    if label.is_empty() {
                        self.text(&target.reference);
                    } else {
                        self.printer.print(&label);
                    }
                    self.end_element("a");
                }
            }
            Tag::MacroMarker(_) => {
                if state.block().macro_depth() == 1 {
                    self.comment("stopmacro");
                }
            }
            Tag::Xml(node) => match node {
                XmlNode::Element { name, .. } => self.end_element(name),
                XmlNode::CData => self.printer.print("]]>"),
                XmlNode::Comment(_) => {}
            },
            Tag::Group(_) => self.end_element("div"),
        }
    }
}

impl Renderer for XhtmlRenderer {
    fn event(&mut self, event: &Event, state: &ChainState, _next: Option<&Event>) {
        match event {
            Event::Begin(tag) => self.begin_tag(tag, state),
            Event::End(tag) => self.end_tag(tag, state),
            Event::Word(word) => self.text(word),
            Event::Space => self.printer.print_char(' '),
            Event::SpecialSymbol(symbol) => self.text(&symbol.to_string()),
            Event::NewLine => self.empty_element("br", []),
            Event::EmptyLines(count) => {
                // BR is invalid between block elements, an empty div is not.
                for _ in 0..*count {
                    self.start_element("div", [("class", "doctree-emptyline")]);
                    self.end_element("div");
                }
            }
            Event::HorizontalRule(parameters) => self.empty_element("hr", parameters.iter()),
            Event::Id(name) => {
                self.start_element("a", [("id", name.as_str()), ("name", name.as_str())]);
                self.end_element("a");
            }
            Event::Verbatim {
                text,
                inline,
                parameters,
            } => {
                if *inline {
                    self.start_element("tt", [("class", "doctree-verbatim")]);
                    self.text(text);
                    self.end_element("tt");
                } else {
                    self.start_element("pre", parameters.iter());
                    self.text(text);
                    self.end_element("pre");
                }
            }
            Event::Raw { text, syntax } => {
                if syntax.eq_ignore_ascii_case("xhtml") || syntax.eq_ignore_ascii_case("html") {
                    self.printer.print(text);
                }
            }
            Event::Image {
                target, parameters, ..
            } => {
                let attributes: Vec<(&str, &str)> = [
                    ("src", target.reference.as_str()),
                    ("alt", target.reference.as_str()),
                ]
                .into_iter()
                .chain(parameters.iter())
                .collect();
                self.empty_element("img", attributes);
            }
            Event::MacroCall(call) => {
                self.macro_comment(call);
                self.comment("stopmacro");
            }
            Event::Error {
                message,
                description,
            } => {
                self.start_element(
                    "span",
                    [("class", "doctree-error"), ("title", description.as_str())],
                );
                self.text(message);
                self.end_element("span");
            }
        }
    }

    fn finish(self) -> Result<String, RenderError> {
        self.printer.finish()
    }
}

fn format_element(format: Format) -> &'static str {
    match format {
        Format::Bold => "strong",
        Format::Italic => "em",
        Format::Strikeout => "del",
        Format::Underline => "ins",
        Format::Superscript => "sup",
        Format::Subscript => "sub",
        Format::Monospace => "tt",
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attribute(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

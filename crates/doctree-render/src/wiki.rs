//! Wiki-syntax renderer: reconstructs the authoring syntax from events.
//!
//! Literal text is held in a delay buffer until the next structural print
//! so markup sequences occurring in plain words can be `~`-escaped with
//! full lookahead over the run.

use doctree_model::{Event, Format, ListKind, MacroCall, Parameters, Tag};

use crate::chain::Renderer;
use crate::error::RenderError;
use crate::invocation::serialize_invocation;
use crate::printer::PrinterStack;
use crate::state::ChainState;

/// Renderer state that embedded documents save and restore.
#[derive(Default)]
struct SyntaxState {
    first_element_rendered: bool,
    list_style: String,
    previous_format_parameters: Option<Parameters>,
}

pub struct WikiSyntaxRenderer {
    printer: PrinterStack,
    delayed: String,
    stack: Vec<SyntaxState>,
}

impl Default for WikiSyntaxRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl WikiSyntaxRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            printer: PrinterStack::default(),
            delayed: String::new(),
            stack: vec![SyntaxState::default()],
        }
    }

    fn state(&mut self) -> &mut SyntaxState {
        self.stack
            .last_mut()
            .unwrap_or_else(|| unreachable!("syntax state stack is never empty"))
    }

    fn flush_delayed(&mut self) {
        if self.delayed.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.delayed);
        let escaped = escape_wiki(&text, self.printer.at_line_start());
        self.printer.print(&escaped);
    }

    /// An empty `(%%)` closes dangling format parameters once any other
    /// output follows the format's end.
    fn close_dangling_format(&mut self) {
        if self.state().previous_format_parameters.take().is_some() {
            self.flush_delayed();
            self.printer.print("(%%)");
        }
    }

    fn print(&mut self, text: &str) {
        self.close_dangling_format();
        self.flush_delayed();
        self.printer.print(text);
    }

    fn print_delayed(&mut self, text: &str) {
        self.close_dangling_format();
        self.delayed.push_str(text);
    }

    fn empty_line(&mut self) {
        if self.state().first_element_rendered {
            self.print("\n\n");
        } else {
            self.state().first_element_rendered = true;
        }
    }

    fn print_parameters(&mut self, parameters: &Parameters, own_line: bool) {
        if parameters.is_empty() {
            return;
        }
        let mut out = String::from("(%");
        for (key, value) in parameters.iter() {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            for c in value.chars() {
                match c {
                    '\\' | '"' => {
                        out.push('\\');
                        out.push(c);
                    }
                    ')' if out.ends_with('%') => {
                        // "%)" inside a value would close the block early.
                        out.pop();
                        out.push_str("~%)");
                    }
                    _ => out.push(c),
                }
            }
            out.push('"');
        }
        out.push_str(" %)");
        if own_line {
            out.push('\n');
        }
        self.print(&out);
    }

    fn list_item_prefix(&mut self) {
        let style = self.state().list_style.clone();
        self.print(&style);
        if style.starts_with('1') {
            self.print(".");
        }
    }

    fn begin_tag(&mut self, tag: &Tag, state: &ChainState, _next: Option<&Event>) {
        let block = state.block();
        match tag {
            Tag::Document(_) => {
                if state.document_depth() > 1 {
                    if !block.is_in_line() {
                        self.empty_line();
                    }
                    self.print("(((");
                    self.stack.push(SyntaxState::default());
                }
            }
            Tag::Paragraph(parameters) => {
                self.empty_line();
                self.print_parameters(parameters, true);
            }
            Tag::Header {
                level, parameters, ..
            } => {
                self.empty_line();
                self.print_parameters(parameters, true);
                self.print(&"=".repeat(level.as_number() as usize));
                self.print(" ");
            }
            Tag::Format(format, parameters) => {
                let previous = self.state().previous_format_parameters.take();
                self.flush_delayed();
                self.printer.print(format_marker(*format));
                if previous.as_ref() != Some(parameters) {
                    self.print_parameters(parameters, false);
                }
            }
            Tag::List(kind, parameters) => {
                if !block.is_in_line() {
                    self.empty_line();
                }
                let marker = match kind {
                    ListKind::Bulleted => '*',
                    ListKind::Numbered => '1',
                };
                self.state().list_style.push(marker);
                self.print_parameters(parameters, true);
            }
            Tag::ListItem(_) => {
                if block.list_item_index() > 0 {
                    self.print("\n");
                }
                self.list_item_prefix();
                self.print(" ");
            }
            Tag::DefinitionList(_) => {
                if !block.is_in_line() {
                    self.empty_line();
                }
            }
            Tag::DefinitionTerm(_) | Tag::DefinitionDescription(_) => {
                if block.definition_item_index() > 0 || block.list_item_index() >= 0 {
                    self.print("\n");
                }
                if !self.state().list_style.is_empty() {
                    self.list_item_prefix();
                }
                self.print(&":".repeat(block.definition_list_depth() - 1));
                self.print(if matches!(tag, Tag::DefinitionTerm(_)) {
                    "; "
                } else {
                    ": "
                });
            }
            Tag::Quotation(parameters) => {
                if !block.is_in_line() {
                    self.empty_line();
                }
                self.print_parameters(parameters, true);
            }
            Tag::QuotationLine(_) => {
                if block.quotation_line_index() > 0 {
                    self.print("\n");
                }
                self.print(&">".repeat(block.quotation_depth()));
            }
            Tag::Table(parameters) => {
                self.empty_line();
                self.print_parameters(parameters, true);
            }
            Tag::TableRow(parameters) => {
                if block.cell_row() > 0 {
                    self.print("\n");
                }
                self.print_parameters(parameters, false);
            }
            Tag::TableCell(parameters) => {
                self.print("|");
                self.print_parameters(parameters, false);
            }
            Tag::TableHeadCell(parameters) => {
                self.print("|=");
                self.print_parameters(parameters, false);
            }
            Tag::Link {
                target,
                freestanding,
                ..
            } => {
                if block.link_depth() < 2 {
                    if !*freestanding {
                        self.print("[[");
                    }
                    // Label content is buffered so nested elements can be
                    // gathered before the reference is appended.
                    self.flush_delayed();
                    self.printer.push();
                } else if *freestanding {
                    self.print(&target.serialize());
                }
            }
            Tag::MacroMarker(call) => {
                if !call.inline {
                    self.empty_line();
                }
                // Children re-render from the stored invocation instead.
                self.flush_delayed();
                self.printer.push_void();
            }
            Tag::Group(_) => {
                if !block.is_in_line() {
                    self.empty_line();
                }
                self.print("(((");
                self.stack.push(SyntaxState::default());
            }
            // No wiki syntax for raw markup nodes.
            Tag::Section(_) | Tag::Metadata(_) | Tag::Xml(_) => {}
        }
    }

    fn end_tag(&mut self, tag: &Tag, state: &ChainState) {
        let block = state.block();
        match tag {
            Tag::Document(_) => {
                self.flush_delayed();
                if state.document_depth() > 1 {
                    self.stack.pop();
                    self.print(")))");
                }
            }
            Tag::Paragraph(_) => {
                self.state().previous_format_parameters = None;
                self.flush_delayed();
            }
            Tag::Header { level, .. } => {
                self.print(" ");
                self.print(&"=".repeat(level.as_number() as usize));
            }
            Tag::Format(format, parameters) => {
                self.flush_delayed();
                self.printer.print(format_marker(*format));
                if !parameters.is_empty() {
                    self.state().previous_format_parameters = Some(parameters.clone());
                }
            }
            Tag::List(..) => {
                self.state().list_style.pop();
            }
            Tag::TableCell(_) | Tag::TableHeadCell(_) => {
                self.state().previous_format_parameters = None;
                self.flush_delayed();
            }
            Tag::Link {
                target,
                freestanding,
                ..
            } => {
                if block.link_depth() == 1 {
                    self.flush_delayed();
                    let label = self.printer.pop();
                    if *freestanding {
                        self.printer.print(&target.serialize());
                    } else {
                        self.printer.print(&label);
                        self.printer.print(">>");
                        self.printer.print(&target.serialize());
                        self.printer.print("]]");
                    }
                }
            }
            Tag::MacroMarker(call) => {
                self.state().previous_format_parameters = None;
                self.flush_delayed();
                self.printer.pop();
                self.print(&serialize_invocation(call));
            }
            Tag::Group(_) => {
                self.flush_delayed();
                self.stack.pop();
                self.print(")))");
            }
            Tag::Section(_)
            | Tag::Metadata(_)
            | Tag::Xml(_)
            | Tag::DefinitionList(_)
            | Tag::DefinitionTerm(_)
            | Tag::DefinitionDescription(_)
            | Tag::Quotation(_)
            | Tag::QuotationLine(_)
            | Tag::Table(_)
            | Tag::TableRow(_)
            | Tag::ListItem(_) => {}
        }
    }
}

impl Renderer for WikiSyntaxRenderer {
    fn event(&mut self, event: &Event, state: &ChainState, next: Option<&Event>) {
        match event {
            Event::Begin(tag) => self.begin_tag(tag, state, next),
            Event::End(tag) => self.end_tag(tag, state),
            Event::Word(word) => self.print_delayed(word),
            Event::Space => self.print_delayed(" "),
            Event::SpecialSymbol(symbol) => {
                let mut buffer = [0u8; 4];
                self.print_delayed(symbol.encode_utf8(&mut buffer));
            }
            Event::NewLine => {
                let block = state.block();
                // A trailing or repeated new line inside inline content
                // must be a hard break or the output would re-parse as an
                // empty line.
                if block.is_in_line()
                    && (block.consecutive_new_lines() > 1
                        || next.is_some_and(Event::ends_inline_content))
                {
                    self.print("\\\\");
                } else {
                    self.print("\n");
                }
            }
            Event::EmptyLines(count) => {
                self.print(&"\n".repeat(*count as usize));
            }
            Event::HorizontalRule(parameters) => {
                self.empty_line();
                self.print_parameters(parameters, true);
                self.print("----");
            }
            Event::Id(name) => {
                let call = MacroCall::new("id")
                    .with_parameters(Parameters::new().with("name", name.clone()));
                self.print(&serialize_invocation(&call));
            }
            Event::Verbatim {
                text,
                inline,
                parameters,
            } => {
                if !*inline {
                    self.empty_line();
                }
                self.print_parameters(parameters, !*inline);
                self.print("{{{");
                self.print(text);
                self.print("}}}");
            }
            Event::Raw { text, syntax } => {
                if syntax.eq_ignore_ascii_case("wiki") {
                    self.print(text);
                }
            }
            Event::Image {
                target,
                freestanding,
                parameters,
            } => {
                self.print_parameters(parameters, false);
                let reference = format!("image:{}", target.reference);
                if *freestanding {
                    self.print(&reference);
                } else {
                    self.print("[[");
                    self.print(&reference);
                    self.print("]]");
                }
            }
            Event::MacroCall(call) => {
                if !call.inline {
                    self.empty_line();
                }
                self.print(&serialize_invocation(call));
            }
            // Rendering errors have no authoring syntax of their own.
            Event::Error { .. } => {}
        }
    }

    fn finish(mut self) -> Result<String, RenderError> {
        self.flush_delayed();
        self.printer.finish()
    }
}

fn format_marker(format: Format) -> &'static str {
    match format {
        Format::Bold => "**",
        Format::Italic => "//",
        Format::Strikeout => "--",
        Format::Underline => "__",
        Format::Superscript => "^^",
        Format::Subscript => ",,",
        Format::Monospace => "##",
    }
}

// Characters that pair up into an inline markup marker.
const PAIRED: &[char] = &['*', '/', '-', '_', '^', ',', '#', '{', '}', '[', ']', '(', ')'];

// Characters that open block syntax at the start of a line.
const LINE_START: &[char] = &['=', '*', '|', '>', ';', ':'];

/// Escapes literal text so it survives a round trip through the parser:
/// `~` itself, any doubled marker pair, a `(%` parameter opener and
/// structure characters at the start of a line get a `~` prefix.
fn escape_wiki(text: &str, mut at_line_start: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        if c == '~' {
            out.push_str("~~");
        } else if c == '\n' {
            out.push('\n');
            at_line_start = true;
            i += 1;
            continue;
        } else if at_line_start && LINE_START.contains(&c) {
            out.push('~');
            out.push(c);
        } else if (next == Some(c) && PAIRED.contains(&c)) || (c == '(' && next == Some('%')) {
            out.push('~');
            out.push(c);
        } else {
            out.push(c);
        }
        at_line_start = false;
        i += 1;
    }
    out
}

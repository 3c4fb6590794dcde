//! Plain-text renderer: strips all markup and keeps the literal text.

use doctree_model::{Event, LinkKind, LinkLabelGenerator, ReferenceLabel, Tag};

use crate::chain::Renderer;
use crate::error::RenderError;
use crate::printer::PrinterStack;
use crate::state::ChainState;

pub struct PlainTextRenderer<G = ReferenceLabel> {
    printer: PrinterStack,
    labels: G,
    first_element_rendered: bool,
}

impl Default for PlainTextRenderer<ReferenceLabel> {
    fn default() -> Self {
        Self::new()
    }
}

impl PlainTextRenderer<ReferenceLabel> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_labels(ReferenceLabel)
    }
}

impl<G: LinkLabelGenerator> PlainTextRenderer<G> {
    /// Uses `labels` to synthesize text for document links without one.
    #[must_use]
    pub fn with_labels(labels: G) -> Self {
        Self {
            printer: PrinterStack::default(),
            labels,
            first_element_rendered: false,
        }
    }

    /// Blank line between standalone elements, suppressed before the first.
    fn separate(&mut self) {
        if self.first_element_rendered {
            self.printer.print("\n\n");
        }
        self.first_element_rendered = true;
    }
}

impl<G: LinkLabelGenerator> Renderer for PlainTextRenderer<G> {
    fn event(&mut self, event: &Event, state: &ChainState, _next: Option<&Event>) {
        let block = state.block();
        match event {
            Event::Begin(tag) => match tag {
                Tag::Paragraph(_)
                | Tag::Header { .. }
                | Tag::Table(_)
                | Tag::Quotation(_) => self.separate(),
                Tag::List(..) => {
                    if block.list_depth() == 1 {
                        self.separate();
                    }
                }
                Tag::DefinitionList(_) => {
                    if block.definition_list_depth() == 1 {
                        self.separate();
                    }
                }
                Tag::ListItem(_) => {
                    if block.list_item_index() > 0 {
                        self.printer.print("\n");
                    }
                }
                Tag::DefinitionTerm(_) | Tag::DefinitionDescription(_) => {
                    if block.definition_item_index() > 0 || block.list_item_index() >= 0 {
                        self.printer.print("\n");
                    }
                }
                Tag::QuotationLine(_) => {
                    if block.quotation_line_index() > 0 {
                        self.printer.print("\n");
                    }
                }
                Tag::TableRow(_) => {
                    if block.cell_row() > 0 {
                        self.printer.print("\n");
                    }
                }
                Tag::TableCell(_) | Tag::TableHeadCell(_) => {
                    if block.cell_col() > 0 {
                        self.printer.print("\t");
                    }
                }
                // Label content is buffered so an empty label can be
                // replaced by a generated one.
                Tag::Link { .. } => {
                    if block.link_depth() < 2 {
                        self.printer.push();
                    }
                }
                _ => {}
            },
            Event::End(Tag::Link {
                target,
                freestanding,
                ..
            }) => {
                if block.link_depth() == 1 {
                    let label = self.printer.pop();
                    if label.is_empty() || *freestanding {
                        let generated = match target.kind {
                            LinkKind::Document => self.labels.label(&target.reference),
                            LinkKind::Url => target.reference.clone(),
                        };
                        self.printer.print(&generated);
                    } else {
                        self.printer.print(&label);
                    }
                }
            }
            Event::Word(word) => self.printer.print(word),
            Event::Space => self.printer.print(" "),
            Event::SpecialSymbol(symbol) => self.printer.print_char(*symbol),
            Event::NewLine => self.printer.print("\n"),
            Event::EmptyLines(count) => {
                for _ in 0..*count {
                    self.printer.print("\n");
                }
            }
            Event::Verbatim { text, inline, .. } => {
                if !*inline {
                    self.separate();
                }
                self.printer.print(text);
            }
            // Markup-only events leave no trace in plain text.
            _ => {}
        }
    }

    fn finish(self) -> Result<String, RenderError> {
        self.printer.finish()
    }
}

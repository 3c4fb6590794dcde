//! Nesting and position state shared along a listener chain.

use doctree_model::{Event, Tag};

/// Per-document counters maintained by the chain and queried by renderers.
///
/// Indices are `-1` outside their container and are incremented *before*
/// the corresponding begin event reaches the renderer, so the renderer sees
/// the index of the element being opened (first item: 0). Item indices run
/// across a whole nesting of lists and only reset once the outermost list
/// closes, so any item after the very first one has a positive index.
#[derive(Debug, Clone, Default)]
pub struct BlockState {
    inline_depth: usize,
    list_depth: usize,
    list_item_index: i32,
    definition_list_depth: usize,
    definition_item_index: i32,
    quotation_depth: usize,
    quotation_line_index: i32,
    cell_row: i32,
    cell_col: i32,
    link_depth: usize,
    macro_depth: usize,
    consecutive_new_lines: u32,
    previous: Option<Event>,
}

impl BlockState {
    fn new() -> Self {
        Self {
            list_item_index: -1,
            definition_item_index: -1,
            quotation_line_index: -1,
            cell_row: -1,
            cell_col: -1,
            ..Self::default()
        }
    }

    /// `true` inside any inline content context (paragraph, list item,
    /// header, table cell, definition term/description, quotation line).
    #[must_use]
    pub fn is_in_line(&self) -> bool {
        self.inline_depth > 0
    }

    /// Current list nesting depth.
    #[must_use]
    pub fn list_depth(&self) -> usize {
        self.list_depth
    }

    /// Index of the current item within its list, `-1` outside a list.
    #[must_use]
    pub fn list_item_index(&self) -> i32 {
        self.list_item_index
    }

    /// Definition-list nesting depth.
    #[must_use]
    pub fn definition_list_depth(&self) -> usize {
        self.definition_list_depth
    }

    /// Index of the current term/description within its definition list.
    #[must_use]
    pub fn definition_item_index(&self) -> i32 {
        self.definition_item_index
    }

    /// Quotation nesting depth.
    #[must_use]
    pub fn quotation_depth(&self) -> usize {
        self.quotation_depth
    }

    /// Index of the current line within its quotation.
    #[must_use]
    pub fn quotation_line_index(&self) -> i32 {
        self.quotation_line_index
    }

    /// Row index of the current table row, `-1` outside a table.
    #[must_use]
    pub fn cell_row(&self) -> i32 {
        self.cell_row
    }

    /// Column index of the current cell, `-1` before the first cell.
    #[must_use]
    pub fn cell_col(&self) -> i32 {
        self.cell_col
    }

    /// Link nesting depth (1 inside a top-level link).
    #[must_use]
    pub fn link_depth(&self) -> usize {
        self.link_depth
    }

    /// Macro-marker nesting depth (1 inside the outermost marker).
    #[must_use]
    pub fn macro_depth(&self) -> usize {
        self.macro_depth
    }

    /// Length of the current run of `NewLine` events, including the one
    /// being dispatched.
    #[must_use]
    pub fn consecutive_new_lines(&self) -> u32 {
        self.consecutive_new_lines
    }

    /// The previously dispatched event, if any.
    #[must_use]
    pub fn previous_event(&self) -> Option<&Event> {
        self.previous.as_ref()
    }

    /// State updates applied before the renderer sees `event`.
    fn observe_begin(&mut self, event: &Event) {
        if matches!(event, Event::NewLine) {
            self.consecutive_new_lines += 1;
        } else {
            self.consecutive_new_lines = 0;
        }

        if let Event::Begin(tag) = event {
            match tag {
                Tag::List(..) => self.list_depth += 1,
                Tag::ListItem(_) => {
                    self.list_item_index += 1;
                    self.inline_depth += 1;
                }
                Tag::DefinitionList(_) => self.definition_list_depth += 1,
                Tag::DefinitionTerm(_) | Tag::DefinitionDescription(_) => {
                    self.definition_item_index += 1;
                    self.inline_depth += 1;
                }
                Tag::Quotation(_) => self.quotation_depth += 1,
                Tag::QuotationLine(_) => {
                    self.quotation_line_index += 1;
                    self.inline_depth += 1;
                }
                Tag::Table(_) => {
                    self.cell_row = -1;
                    self.cell_col = -1;
                }
                Tag::TableRow(_) => {
                    self.cell_row += 1;
                    self.cell_col = -1;
                }
                Tag::TableCell(_) | Tag::TableHeadCell(_) => {
                    self.cell_col += 1;
                    self.inline_depth += 1;
                }
                Tag::Paragraph(_) | Tag::Header { .. } => self.inline_depth += 1,
                Tag::Link { .. } => self.link_depth += 1,
                Tag::MacroMarker(_) => self.macro_depth += 1,
                _ => {}
            }
        }
    }

    /// State updates applied after the renderer has seen `event`.
    fn observe_end(&mut self, event: &Event) {
        if let Event::End(tag) = event {
            match tag {
                Tag::List(..) => {
                    self.list_depth -= 1;
                    if self.list_depth == 0 {
                        self.list_item_index = -1;
                    }
                }
                Tag::DefinitionList(_) => {
                    self.definition_list_depth -= 1;
                    if self.definition_list_depth == 0 {
                        self.definition_item_index = -1;
                    }
                }
                Tag::Quotation(_) => {
                    self.quotation_depth -= 1;
                    if self.quotation_depth == 0 {
                        self.quotation_line_index = -1;
                    }
                }
                Tag::Table(_) => {
                    self.cell_row = -1;
                    self.cell_col = -1;
                }
                Tag::ListItem(_)
                | Tag::DefinitionTerm(_)
                | Tag::DefinitionDescription(_)
                | Tag::QuotationLine(_)
                | Tag::TableCell(_)
                | Tag::TableHeadCell(_)
                | Tag::Paragraph(_)
                | Tag::Header { .. } => self.inline_depth -= 1,
                Tag::Link { .. } => self.link_depth -= 1,
                Tag::MacroMarker(_) => self.macro_depth -= 1,
                _ => {}
            }
        }
    }
}

/// The full queryable state of a listener chain: document nesting plus a
/// stack of per-document [`BlockState`]s.
///
/// Entering an embedded document pushes a fresh block state (so inner
/// counters never pollute the outer document's) and leaving pops it; the
/// chain pairs push and pop unconditionally.
#[derive(Debug)]
pub struct ChainState {
    document_depth: usize,
    blocks: Vec<BlockState>,
}

impl Default for ChainState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            document_depth: 0,
            blocks: vec![BlockState::new()],
        }
    }

    /// Document nesting depth: 1 inside the top-level document.
    #[must_use]
    pub fn document_depth(&self) -> usize {
        self.document_depth
    }

    /// Block state of the innermost document.
    #[must_use]
    pub fn block(&self) -> &BlockState {
        self.blocks
            .last()
            .unwrap_or_else(|| unreachable!("block state stack is never empty"))
    }

    pub(crate) fn update_before(&mut self, event: &Event) {
        if matches!(event, Event::Begin(Tag::Document(_))) {
            self.document_depth += 1;
        } else if matches!(event, Event::End(Tag::Document(_))) && self.document_depth > 1 {
            // The end event itself renders against the outer state.
            self.blocks.pop();
        }
        self.block_mut().observe_begin(event);
    }

    pub(crate) fn update_after(&mut self, event: &Event) {
        self.block_mut().observe_end(event);
        if matches!(event, Event::Begin(Tag::Document(_))) && self.document_depth > 1 {
            self.blocks.push(BlockState::new());
        } else if matches!(event, Event::End(Tag::Document(_))) {
            self.document_depth -= 1;
        }
        self.block_mut().previous = Some(event.clone());
    }

    fn block_mut(&mut self) -> &mut BlockState {
        self.blocks
            .last_mut()
            .unwrap_or_else(|| unreachable!("block state stack is never empty"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doctree_model::{ListKind, Parameters};
    use pretty_assertions::assert_eq;

    fn begin(tag: Tag) -> Event {
        Event::Begin(tag)
    }
    fn end(tag: Tag) -> Event {
        Event::End(tag)
    }
    fn p() -> Parameters {
        Parameters::new()
    }

    /// Drive the state through events as the chain would, sampling the
    /// value a renderer observes at each step.
    fn drive(state: &mut ChainState, events: &[Event]) -> Vec<i32> {
        let mut seen = Vec::new();
        for event in events {
            state.update_before(event);
            seen.push(state.block().list_item_index());
            state.update_after(event);
        }
        seen
    }

    #[test]
    fn list_item_indices_pre_increment() {
        let mut state = ChainState::new();
        let events = vec![
            begin(Tag::List(ListKind::Bulleted, p())),
            begin(Tag::ListItem(p())),
            end(Tag::ListItem(p())),
            begin(Tag::ListItem(p())),
            end(Tag::ListItem(p())),
            end(Tag::List(ListKind::Bulleted, p())),
        ];
        let seen = drive(&mut state, &events);
        // The reset happens only after the end event has been observed.
        assert_eq!(seen, vec![-1, 0, 0, 1, 1, 1]);
        assert_eq!(state.block().list_item_index(), -1);
    }

    #[test]
    fn nested_list_items_continue_the_counter() {
        let mut state = ChainState::new();
        for event in [
            begin(Tag::List(ListKind::Bulleted, p())),
            begin(Tag::ListItem(p())),
            begin(Tag::List(ListKind::Numbered, p())),
        ] {
            state.update_before(&event);
            state.update_after(&event);
        }
        assert_eq!(state.block().list_depth(), 2);
        // First item of the nested list is not the first item overall.
        state.update_before(&begin(Tag::ListItem(p())));
        assert_eq!(state.block().list_item_index(), 1);
        state.update_after(&begin(Tag::ListItem(p())));

        for event in [
            end(Tag::ListItem(p())),
            end(Tag::List(ListKind::Numbered, p())),
            end(Tag::ListItem(p())),
        ] {
            state.update_before(&event);
            state.update_after(&event);
        }
        assert_eq!(state.block().list_item_index(), 1);
        assert_eq!(state.block().list_depth(), 1);
    }

    #[test]
    fn embedded_document_stacks_block_state() {
        let mut state = ChainState::new();
        for event in [
            begin(Tag::Document(p())),
            begin(Tag::List(ListKind::Bulleted, p())),
            begin(Tag::ListItem(p())),
        ] {
            state.update_before(&event);
            state.update_after(&event);
        }
        assert_eq!(state.block().list_item_index(), 0);

        // Embedded document: fresh counters.
        let inner = begin(Tag::Document(p()));
        state.update_before(&inner);
        assert_eq!(state.document_depth(), 2);
        // During the begin event the outer state is still visible.
        assert_eq!(state.block().list_item_index(), 0);
        state.update_after(&inner);
        assert_eq!(state.block().list_item_index(), -1);

        let inner_end = end(Tag::Document(p()));
        state.update_before(&inner_end);
        // Outer state restored for the end event itself.
        assert_eq!(state.block().list_item_index(), 0);
        state.update_after(&inner_end);
        assert_eq!(state.document_depth(), 1);
    }

    #[test]
    fn table_counters() {
        let mut state = ChainState::new();
        let events = [
            begin(Tag::Table(p())),
            begin(Tag::TableRow(p())),
            begin(Tag::TableCell(p())),
        ];
        for event in &events {
            state.update_before(event);
            state.update_after(event);
        }
        assert_eq!(state.block().cell_row(), 0);
        assert_eq!(state.block().cell_col(), 0);
        assert!(state.block().is_in_line());
    }

    #[test]
    fn consecutive_new_lines_reset() {
        let mut state = ChainState::new();
        for event in [Event::NewLine, Event::NewLine] {
            state.update_before(&event);
            state.update_after(&event);
        }
        assert_eq!(state.block().consecutive_new_lines(), 2);
        state.update_before(&Event::Space);
        assert_eq!(state.block().consecutive_new_lines(), 0);
    }
}

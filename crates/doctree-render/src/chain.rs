//! The listener chain wiring events, state tracking and lookahead to a
//! renderer.

use doctree_model::{Event, Listener};

use crate::error::RenderError;
use crate::state::ChainState;

/// A stateful output backend driven by a [`ListenerChain`].
///
/// `next` is the event that will follow `event`, or `None` at the end of
/// the stream. Renderers that do not need lookahead simply ignore it.
pub trait Renderer {
    fn event(&mut self, event: &Event, state: &ChainState, next: Option<&Event>);

    /// Consumes the renderer and returns the accumulated output.
    ///
    /// # Errors
    ///
    /// Returns an error when the renderer's internal printer stack is
    /// unbalanced, which indicates a begin event without its matching end.
    fn finish(self) -> Result<String, RenderError>;
}

/// Buffers one event of lookahead and maintains [`ChainState`] around
/// every dispatch to the wrapped renderer.
pub struct ListenerChain<R> {
    renderer: R,
    state: ChainState,
    pending: Option<Event>,
}

impl<R: Renderer> ListenerChain<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            state: ChainState::new(),
            pending: None,
        }
    }

    fn dispatch(&mut self, event: &Event, next: Option<&Event>) {
        self.state.update_before(event);
        self.renderer.event(event, &self.state, next);
        self.state.update_after(event);
    }

    /// Flushes the buffered event and returns the rendered output.
    ///
    /// # Errors
    ///
    /// Propagates [`RenderError::PrinterStackImbalance`] from the renderer.
    pub fn finish(mut self) -> Result<String, RenderError> {
        if let Some(event) = self.pending.take() {
            self.dispatch(&event, None);
        }
        self.renderer.finish()
    }
}

impl<R: Renderer> Listener for ListenerChain<R> {
    fn event(&mut self, event: &Event) {
        if let Some(previous) = self.pending.replace(event.clone()) {
            let next = self.pending.clone();
            self.dispatch(&previous, next.as_ref());
        }
    }
}

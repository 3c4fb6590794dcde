//! Output buffering for renderers.

use crate::error::RenderError;

/// A stack of output buffers.
///
/// The base buffer is the render output; a renderer pushes an extra buffer
/// when content must be fully known before it can be emitted (a link label,
/// a macro marker's suppressed children) and pops it back as a string. A
/// pushed buffer may be *void*, in which case everything printed into it is
/// discarded.
///
/// `push` and `pop` must be paired: popping the base buffer panics, and a
/// buffer left unpopped at [`finish`](Self::finish) is reported as an
/// imbalance.
#[derive(Debug, Default)]
pub struct PrinterStack {
    base: String,
    stack: Vec<Buffer>,
}

#[derive(Debug)]
struct Buffer {
    content: String,
    void: bool,
}

impl PrinterStack {
    /// New stack with an empty base buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text to the active buffer.
    pub fn print(&mut self, text: &str) {
        match self.stack.last_mut() {
            Some(buffer) if buffer.void => {}
            Some(buffer) => buffer.content.push_str(text),
            None => self.base.push_str(text),
        }
    }

    /// Append a single character to the active buffer.
    pub fn print_char(&mut self, c: char) {
        match self.stack.last_mut() {
            Some(buffer) if buffer.void => {}
            Some(buffer) => buffer.content.push(c),
            None => self.base.push(c),
        }
    }

    /// Last character of the active buffer, if any.
    #[must_use]
    pub fn last_char(&self) -> Option<char> {
        match self.stack.last() {
            Some(buffer) => buffer.content.chars().last(),
            None => self.base.chars().last(),
        }
    }

    /// `true` when the active buffer is empty or ends with a newline.
    #[must_use]
    pub fn at_line_start(&self) -> bool {
        matches!(self.last_char(), None | Some('\n'))
    }

    /// Push a buffering printer; subsequent prints accumulate until
    /// [`pop`](Self::pop).
    pub fn push(&mut self) {
        self.stack.push(Buffer {
            content: String::new(),
            void: false,
        });
    }

    /// Push a void printer; subsequent prints are discarded until
    /// [`pop`](Self::pop).
    pub fn push_void(&mut self) {
        self.stack.push(Buffer {
            content: String::new(),
            void: true,
        });
    }

    /// Pop the top buffering printer and return its accumulated content.
    ///
    /// # Panics
    ///
    /// Panics when no buffering printer is on the stack; that is a
    /// programmer error, never recovered.
    pub fn pop(&mut self) -> String {
        self.stack
            .pop()
            .map(|buffer| buffer.content)
            .unwrap_or_else(|| panic!("popped the base printer"))
    }

    /// Number of pushed buffering printers.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Consume the stack, returning the base buffer.
    ///
    /// Fails when buffering printers were left unpopped.
    pub fn finish(self) -> Result<String, RenderError> {
        if self.stack.is_empty() {
            Ok(self.base)
        } else {
            Err(RenderError::PrinterStackImbalance {
                depth: self.stack.len(),
            })
        }
    }
}

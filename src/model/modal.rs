//! Modal stack for overlays drawn above the customers screen

/// A modal overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    /// Quit confirmation dialog
    QuitConfirm,
    /// Key binding reference
    Help,
}

/// Modals are drawn bottom to top; only the top one receives input.
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, modal: Modal) {
        self.stack.push(modal);
    }

    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    pub fn top(&self) -> Option<Modal> {
        self.stack.last().copied()
    }

    /// Push `modal` unless it is already on top, in which case close it
    pub fn toggle(&mut self, modal: Modal) {
        if self.top() == Some(modal) {
            self.stack.pop();
        } else {
            self.stack.push(modal);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

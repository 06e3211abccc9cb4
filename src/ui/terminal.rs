//! Line-oriented [`ChatView`] for the interactive CLI.
//!
//! Elements are printed as they are appended. A terminal cannot take lines
//! back, so removals only update the bookkeeping; the typing line stays in
//! the scrollback and the reply follows it.

use std::cell::RefCell;
use std::io::Write;

use tracing::warn;

use crate::core::constants::DISABLED_PLACEHOLDER;
use crate::ui::document::element_text;
use crate::ui::view::{ChatView, Element, ElementId};

struct TerminalState {
    next_id: u64,
    live: Vec<ElementId>,
    controls_enabled: bool,
    placeholder: String,
    input: String,
    visible: bool,
}

pub struct TerminalView<W: Write> {
    out: RefCell<W>,
    state: RefCell<TerminalState>,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
            state: RefCell::new(TerminalState {
                next_id: 1,
                live: Vec::new(),
                controls_enabled: false,
                placeholder: DISABLED_PLACEHOLDER.to_string(),
                input: String::new(),
                visible: true,
            }),
        }
    }

    /// Load a line the user typed into the input field.
    pub fn set_input_value(&self, value: &str) {
        self.state.borrow_mut().input = value.to_string();
    }

    pub fn controls_enabled(&self) -> bool {
        self.state.borrow().controls_enabled
    }

    pub fn placeholder(&self) -> String {
        self.state.borrow().placeholder.clone()
    }

    pub fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    /// Number of appended elements not yet removed.
    pub fn live_elements(&self) -> usize {
        self.state.borrow().live.len()
    }

    /// Print the input hint shown before the user types.
    pub fn prompt(&self) {
        let placeholder = self.placeholder();
        self.emit(&format!("› {placeholder}"));
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn emit(&self, text: &str) {
        let mut out = self.out.borrow_mut();
        if let Err(err) = writeln!(out, "{text}") {
            warn!(error = %err, "failed to write to terminal");
        }
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn append(&self, element: Element) -> ElementId {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = ElementId(state.next_id);
            state.next_id += 1;
            state.live.push(id);
            id
        };
        self.emit(&element_text(&element));
        self.emit("");
        id
    }

    fn remove(&self, id: ElementId) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.live.len();
        state.live.retain(|seen| *seen != id);
        state.live.len() != before
    }

    fn scroll_to_bottom(&self) {
        if let Err(err) = self.out.borrow_mut().flush() {
            warn!(error = %err, "failed to flush terminal");
        }
    }

    fn set_controls_enabled(&self, enabled: bool) {
        self.state.borrow_mut().controls_enabled = enabled;
    }

    fn set_placeholder(&self, text: &str) {
        self.state.borrow_mut().placeholder = text.to_string();
    }

    fn input_value(&self) -> String {
        self.state.borrow().input.clone()
    }

    fn clear_input(&self) {
        self.state.borrow_mut().input.clear();
    }

    fn hide(&self) {
        self.state.borrow_mut().visible = false;
        self.emit("(chat closed)");
    }
}

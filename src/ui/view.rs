//! The surface the widget draws on.
//!
//! A [`ChatView`] owns the message list, the input field, the send control
//! and the widget's root container. All methods take `&self`: views are
//! shared through `Rc` on the UI thread and keep their state in cells.

use crate::core::message::Message;

/// Handle to an element previously appended to the message list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// Content of a message bubble, already prepared for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Literal text. Views must escape it, never interpret it as markup.
    Text(String),
    /// Markup produced by a [`MarkupRenderer`](crate::ui::markup::MarkupRenderer).
    Html(String),
}

/// Static block shown when the backend cannot be reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPanel {
    pub title: String,
    pub intro: String,
    pub steps: Vec<String>,
}

/// Anything that can be appended to the message list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Message { message: Message, body: Body },
    TypingIndicator,
    StatusPanel(StatusPanel),
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Message { .. } => ElementKind::Message,
            Element::TypingIndicator => ElementKind::TypingIndicator,
            Element::StatusPanel(_) => ElementKind::StatusPanel,
        }
    }

    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Element::Message { message, .. } => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Message,
    TypingIndicator,
    StatusPanel,
}

pub trait ChatView {
    /// Append an element to the end of the message list.
    fn append(&self, element: Element) -> ElementId;

    /// Remove a previously appended element. Returns `false` if it was
    /// already gone.
    fn remove(&self, id: ElementId) -> bool;

    /// Move the message list's scroll position to its maximum extent.
    fn scroll_to_bottom(&self);

    /// Enable or disable the input field and the send control together.
    fn set_controls_enabled(&self, enabled: bool);

    fn set_placeholder(&self, text: &str);

    /// Current raw value of the input field.
    fn input_value(&self) -> String;

    fn clear_input(&self);

    /// Hide the widget's root container.
    fn hide(&self);
}

//! In-memory model of the widget's document.
//!
//! [`DocumentView`] keeps the element list, input state and scroll geometry
//! of the widget and serializes them to the same HTML the browser page
//! shows. It is what `jobi say` and `jobi page` render into, and what the
//! widget's tests observe.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::time::Duration;

use tokio::time::Instant;

use crate::core::constants::{ASSISTANT_NAME, DISABLED_PLACEHOLDER};
use crate::core::message::Message;
use crate::ui::markup::{escape_html, markdown_to_text};
use crate::ui::view::{Body, ChatView, Element, ElementId, ElementKind, StatusPanel};

/// Height of one rendered text row, in pixels.
const ROW_HEIGHT: u32 = 20;
/// Vertical padding and margin around every element.
const ELEMENT_PADDING: u32 = 16;
/// Characters that fit on one row of a bubble.
const CHARS_PER_ROW: usize = 48;
const DEFAULT_VIEWPORT_HEIGHT: u32 = 400;

/// Something that happened to the message list, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    Appended {
        id: ElementId,
        kind: ElementKind,
        at: Instant,
    },
    Removed {
        id: ElementId,
        at: Instant,
    },
}

struct DocumentState {
    elements: Vec<(ElementId, Element)>,
    events: Vec<ViewEvent>,
    next_id: u64,
    scroll_top: u32,
    viewport_height: u32,
    controls_enabled: bool,
    placeholder: String,
    input: String,
    visible: bool,
}

impl DocumentState {
    fn content_height(&self) -> u32 {
        self.elements
            .iter()
            .map(|(_, element)| element_height(element))
            .sum()
    }

    fn max_scroll_top(&self) -> u32 {
        self.content_height().saturating_sub(self.viewport_height)
    }
}

pub struct DocumentView {
    state: RefCell<DocumentState>,
}

impl DocumentView {
    /// A fresh widget: empty list, controls disabled until the backend
    /// answers.
    pub fn new() -> Self {
        Self::with_viewport(DEFAULT_VIEWPORT_HEIGHT)
    }

    pub fn with_viewport(viewport_height: u32) -> Self {
        Self {
            state: RefCell::new(DocumentState {
                elements: Vec::new(),
                events: Vec::new(),
                next_id: 1,
                scroll_top: 0,
                viewport_height,
                controls_enabled: false,
                placeholder: DISABLED_PLACEHOLDER.to_string(),
                input: String::new(),
                visible: true,
            }),
        }
    }

    /// Simulate typing into the input field.
    pub fn set_input_value(&self, value: &str) {
        self.state.borrow_mut().input = value.to_string();
    }

    pub fn elements(&self) -> Vec<(ElementId, Element)> {
        self.state.borrow().elements.clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state
            .borrow()
            .elements
            .iter()
            .filter_map(|(_, element)| element.as_message().cloned())
            .collect()
    }

    pub fn count_kind(&self, kind: ElementKind) -> usize {
        self.state
            .borrow()
            .elements
            .iter()
            .filter(|(_, element)| element.kind() == kind)
            .count()
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.state.borrow().events.clone()
    }

    /// How long an element stayed in the list, if it has been removed.
    pub fn visible_duration(&self, id: ElementId) -> Option<Duration> {
        let state = self.state.borrow();
        let appended = state.events.iter().find_map(|event| match event {
            ViewEvent::Appended { id: seen, at, .. } if *seen == id => Some(*at),
            _ => None,
        })?;
        let removed = state.events.iter().find_map(|event| match event {
            ViewEvent::Removed { id: seen, at } if *seen == id => Some(*at),
            _ => None,
        })?;
        Some(removed.duration_since(appended))
    }

    pub fn scroll_top(&self) -> u32 {
        self.state.borrow().scroll_top
    }

    /// Scroll as a user would. Clamped to the scrollable range.
    pub fn set_scroll_top(&self, scroll_top: u32) {
        let mut state = self.state.borrow_mut();
        state.scroll_top = scroll_top.min(state.max_scroll_top());
    }

    pub fn scroll_height(&self) -> u32 {
        let state = self.state.borrow();
        state.content_height().max(state.viewport_height)
    }

    pub fn max_scroll_top(&self) -> u32 {
        self.state.borrow().max_scroll_top()
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

    /// Inner HTML of the message list.
    pub fn to_html(&self) -> String {
        let state = self.state.borrow();
        let mut html = String::new();
        for (_, element) in &state.elements {
            write_element(&mut html, element);
        }
        html
    }

    /// Plain-text rendering of the list, one block per element.
    pub fn transcript(&self) -> String {
        let state = self.state.borrow();
        state
            .elements
            .iter()
            .map(|(_, element)| element_text(element))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for DocumentView {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatView for DocumentView {
    fn append(&self, element: Element) -> ElementId {
        let mut state = self.state.borrow_mut();
        let id = ElementId(state.next_id);
        state.next_id += 1;
        state.events.push(ViewEvent::Appended {
            id,
            kind: element.kind(),
            at: Instant::now(),
        });
        state.elements.push((id, element));
        id
    }

    fn remove(&self, id: ElementId) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(index) = state.elements.iter().position(|(seen, _)| *seen == id) else {
            return false;
        };
        state.elements.remove(index);
        state.events.push(ViewEvent::Removed {
            id,
            at: Instant::now(),
        });
        let max = state.max_scroll_top();
        state.scroll_top = state.scroll_top.min(max);
        true
    }

    fn scroll_to_bottom(&self) {
        let mut state = self.state.borrow_mut();
        state.scroll_top = state.max_scroll_top();
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
    }
}

fn wrapped_rows(text: &str) -> u32 {
    let rows: usize = text
        .lines()
        .map(|line| line.chars().count().div_ceil(CHARS_PER_ROW).max(1))
        .sum();
    u32::try_from(rows.max(1)).unwrap_or(u32::MAX)
}

fn element_height(element: &Element) -> u32 {
    let rows = match element {
        Element::Message { message, .. } => wrapped_rows(&message.text),
        Element::TypingIndicator => 1,
        Element::StatusPanel(panel) => {
            let steps: u32 = panel.steps.iter().map(|step| wrapped_rows(step)).sum();
            1 + wrapped_rows(&panel.intro) + steps
        }
    };
    rows.saturating_mul(ROW_HEIGHT).saturating_add(ELEMENT_PADDING)
}

fn write_element(html: &mut String, element: &Element) {
    match element {
        Element::Message { message, body } => {
            let content = match body {
                Body::Text(text) => escape_html(text),
                Body::Html(markup) => markup.clone(),
            };
            let _ = write!(
                html,
                r#"<div class="{}">{}</div>"#,
                message.css_classes(),
                content
            );
        }
        Element::TypingIndicator => html.push_str(
            r#"<div class="typing-indicator"><div class="typing-dots"><span></span><span></span><span></span></div></div>"#,
        ),
        Element::StatusPanel(panel) => {
            let _ = write!(
                html,
                r#"<div class="status-message error"><h4>{}</h4><p>{}</p><ol>"#,
                escape_html(&panel.title),
                escape_html(&panel.intro)
            );
            for step in &panel.steps {
                let _ = write!(html, "<li>{}</li>", escape_html(step));
            }
            html.push_str("</ol></div>");
        }
    }
}

/// Plain-text form of an element, as shown in transcripts and terminals.
///
/// Bot messages are Markdown and are rendered to text; user messages are
/// shown as typed.
pub(crate) fn element_text(element: &Element) -> String {
    match element {
        Element::Message { message, .. } => {
            let (label, text) = if message.is_user() {
                ("You", message.text.clone())
            } else {
                (ASSISTANT_NAME, markdown_to_text(&message.text))
            };
            if message.is_error {
                format!("{label} (error): {text}")
            } else {
                format!("{label}: {text}")
            }
        }
        Element::TypingIndicator => format!("{ASSISTANT_NAME} is typing..."),
        Element::StatusPanel(panel) => panel_text(panel),
    }
}

fn panel_text(panel: &StatusPanel) -> String {
    let mut text = format!("{}\n{}", panel.title, panel.intro);
    for (index, step) in panel.steps.iter().enumerate() {
        let _ = write!(text, "\n  {}. {}", index + 1, step);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(text: &str) -> Element {
        Element::Message {
            message: Message::user(text),
            body: Body::Text(text.to_string()),
        }
    }

    #[test]
    fn new_document_starts_locked() {
        let view = DocumentView::new();
        assert!(!view.controls_enabled());
        assert_eq!(view.placeholder(), DISABLED_PLACEHOLDER);
        assert!(view.is_visible());
        assert!(view.elements().is_empty());
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let view = DocumentView::new();
        let a = view.append(user("a"));
        let b = view.append(Element::TypingIndicator);
        view.remove(b);
        let c = view.append(user("c"));
        assert!(a < b && b < c);
    }

    #[test]
    fn removing_twice_reports_missing() {
        let view = DocumentView::new();
        let id = view.append(Element::TypingIndicator);
        assert!(view.remove(id));
        assert!(!view.remove(id));
        assert_eq!(view.events().len(), 2);
    }

    #[test]
    fn scroll_to_bottom_is_idempotent() {
        let view = DocumentView::with_viewport(60);
        for i in 0..8 {
            view.append(user(&format!("line {i}")));
        }

        view.scroll_to_bottom();
        let first = view.scroll_top();
        view.scroll_to_bottom();
        assert_eq!(view.scroll_top(), first);
        assert_eq!(first, view.scroll_height() - 60);
    }

    #[test]
    fn short_content_does_not_scroll() {
        let view = DocumentView::new();
        view.append(user("hi"));
        view.scroll_to_bottom();
        assert_eq!(view.scroll_top(), 0);
        assert_eq!(view.scroll_height(), DEFAULT_VIEWPORT_HEIGHT);
    }

    #[test]
    fn user_scroll_is_clamped() {
        let view = DocumentView::with_viewport(40);
        view.append(user("one"));
        view.append(user("two"));
        view.set_scroll_top(10_000);
        assert_eq!(view.scroll_top(), view.max_scroll_top());
    }

    #[test]
    fn long_messages_take_more_rows() {
        assert_eq!(wrapped_rows("short"), 1);
        assert_eq!(wrapped_rows(&"x".repeat(CHARS_PER_ROW + 1)), 2);
        assert_eq!(wrapped_rows("a\n\nb"), 3);
    }

    #[test]
    fn html_escapes_user_text_and_keeps_bot_markup() {
        let view = DocumentView::new();
        view.append(user("1 < 2 & 3"));
        view.append(Element::Message {
            message: Message::bot_error("oops"),
            body: Body::Html("<p>oops</p>".to_string()),
        });

        assert_eq!(
            view.to_html(),
            r#"<div class="user-message">1 &lt; 2 &amp; 3</div><div class="bot-message error"><p>oops</p></div>"#
        );
    }

    #[test]
    fn transcript_labels_each_block() {
        let view = DocumentView::new();
        view.append(user("Hello"));
        view.append(Element::TypingIndicator);
        assert_eq!(view.transcript(), "You: Hello\n\nJobi is typing...");
    }

    #[test]
    fn transcript_renders_bot_markdown_but_not_user_text() {
        let view = DocumentView::new();
        view.append(user("is **this** literal?"));
        view.append(Element::Message {
            message: Message::bot("Hi *there* and **bold**"),
            body: Body::Html("<p>Hi <em>there</em> and <strong>bold</strong></p>".to_string()),
        });

        assert_eq!(
            view.transcript(),
            "You: is **this** literal?\n\nJobi: Hi there and bold"
        );
    }

    #[test]
    fn input_round_trips() {
        let view = DocumentView::new();
        view.set_input_value("  typed  ");
        assert_eq!(view.input_value(), "  typed  ");
        view.clear_input();
        assert_eq!(view.input_value(), "");
    }
}

use std::rc::Rc;

use tracing::debug;

use crate::core::constants::{
    CONNECTION_ERROR_INTRO, CONNECTION_ERROR_STEPS, CONNECTION_ERROR_TITLE,
    CONNECTION_FAILED_PLACEHOLDER,
};
use crate::core::message::{Message, Sender};
use crate::ui::markup::MarkupRenderer;
use crate::ui::view::{Body, ChatView, Element, ElementId, StatusPanel};

/// View-mutation helpers shared by the prober and the exchanger.
///
/// Cloning is cheap; clones draw on the same view.
#[derive(Clone)]
pub struct Renderer {
    view: Rc<dyn ChatView>,
    markup: Rc<dyn MarkupRenderer>,
}

impl Renderer {
    pub fn new(view: Rc<dyn ChatView>, markup: Rc<dyn MarkupRenderer>) -> Self {
        Self { view, markup }
    }

    pub fn view(&self) -> &Rc<dyn ChatView> {
        &self.view
    }

    /// Append a message bubble and scroll it into view.
    ///
    /// Bot text is converted to HTML; user text is kept literal.
    pub fn append_message(&self, text: &str, sender: Sender, is_error: bool) -> ElementId {
        let body = match sender {
            Sender::Bot => Body::Html(self.markup.to_html(text)),
            Sender::User => Body::Text(text.to_string()),
        };
        let message = Message {
            text: text.to_string(),
            sender,
            is_error,
        };

        let id = self.view.append(Element::Message { message, body });
        self.view.scroll_to_bottom();
        id
    }

    /// Append the three-dot placeholder. The returned handle removes it.
    pub fn show_typing_indicator(&self) -> TypingIndicator {
        let id = self.view.append(Element::TypingIndicator);
        self.view.scroll_to_bottom();
        debug!(id = id.0, "typing indicator shown");
        TypingIndicator {
            id,
            view: Rc::clone(&self.view),
            dismissed: false,
        }
    }

    pub fn scroll_to_bottom(&self) {
        self.view.scroll_to_bottom();
    }

    /// Append the remediation panel shown when the backend is unreachable.
    pub fn display_connection_error(&self) -> ElementId {
        let panel = StatusPanel {
            title: CONNECTION_ERROR_TITLE.to_string(),
            intro: CONNECTION_ERROR_INTRO.to_string(),
            steps: CONNECTION_ERROR_STEPS
                .iter()
                .map(|step| (*step).to_string())
                .collect(),
        };

        let id = self.view.append(Element::StatusPanel(panel));
        self.view.set_placeholder(CONNECTION_FAILED_PLACEHOLDER);
        id
    }

    /// Hide the widget. There is no way back.
    pub fn minimize(&self) {
        debug!("widget minimized");
        self.view.hide();
    }
}

/// A visible typing placeholder.
///
/// [`dismiss`](Self::dismiss) removes it and scrolls to the newest content.
/// Dropping an undismissed handle does the same, so an exchange that
/// unwinds still clears its placeholder.
pub struct TypingIndicator {
    id: ElementId,
    view: Rc<dyn ChatView>,
    dismissed: bool,
}

impl TypingIndicator {
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn dismiss(mut self) {
        self.clear();
    }

    fn clear(&mut self) {
        if self.dismissed {
            return;
        }
        self.dismissed = true;
        if !self.view.remove(self.id) {
            debug!(id = self.id.0, "typing indicator was already removed");
        }
        self.view.scroll_to_bottom();
    }
}

impl Drop for TypingIndicator {
    fn drop(&mut self) {
        self.clear();
    }
}

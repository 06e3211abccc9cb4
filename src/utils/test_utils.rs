use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::backend::{Backend, BackendError};
use crate::ui::document::DocumentView;
use crate::ui::renderer::Renderer;

/// Markup stand-in that tags its input instead of converting it.
pub fn stub_markup(text: &str) -> String {
    format!("<md>{text}</md>")
}

/// A fresh document view and a renderer drawing on it with [`stub_markup`].
pub fn test_renderer() -> (Rc<DocumentView>, Renderer) {
    let view = Rc::new(DocumentView::new());
    let renderer = Renderer::new(view.clone(), Rc::new(stub_markup));
    (view, renderer)
}

/// Scripted [`Backend`]. Replies are served in order; once the script runs
/// out every message is echoed back.
pub struct FakeBackend {
    health: Result<(), BackendError>,
    replies: RefCell<VecDeque<Result<String, BackendError>>>,
    latency: Duration,
    health_calls: Cell<usize>,
    chat_messages: RefCell<Vec<String>>,
}

impl FakeBackend {
    pub fn healthy() -> Self {
        Self {
            health: Ok(()),
            replies: RefCell::new(VecDeque::new()),
            latency: Duration::ZERO,
            health_calls: Cell::new(0),
            chat_messages: RefCell::new(Vec::new()),
        }
    }

    pub fn unhealthy(error: BackendError) -> Self {
        Self {
            health: Err(error),
            ..Self::healthy()
        }
    }

    pub fn with_reply(self, reply: Result<String, BackendError>) -> Self {
        self.replies.borrow_mut().push_back(reply);
        self
    }

    /// Delay applied to every chat request.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn health_calls(&self) -> usize {
        self.health_calls.get()
    }

    /// Messages received so far, in call order.
    pub fn chat_messages(&self) -> Vec<String> {
        self.chat_messages.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Backend for FakeBackend {
    async fn health(&self) -> Result<(), BackendError> {
        self.health_calls.set(self.health_calls.get() + 1);
        self.health.clone()
    }

    async fn chat(&self, message: &str) -> Result<String, BackendError> {
        self.chat_messages.borrow_mut().push(message.to_string());
        let reply = self
            .replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(format!("echo: {message}")));
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        reply
    }
}

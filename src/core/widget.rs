use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use crate::core::backend::Backend;
use crate::core::exchanger::{ExchangeOutcome, ExchangeSettings, MessageExchanger};
use crate::core::prober::{BackendStatus, StatusProber};
use crate::ui::markup::MarkupRenderer;
use crate::ui::renderer::Renderer;
use crate::ui::view::ChatView;

/// A wired-up chat widget: one view, one backend, one markup renderer.
pub struct Widget {
    renderer: Renderer,
    prober: StatusProber,
    exchanger: MessageExchanger,
    status: Cell<Option<BackendStatus>>,
}

impl Widget {
    pub fn new(
        view: Rc<dyn ChatView>,
        backend: Rc<dyn Backend>,
        markup: Rc<dyn MarkupRenderer>,
        settings: ExchangeSettings,
    ) -> Self {
        let renderer = Renderer::new(view, markup);
        Self {
            prober: StatusProber::new(Rc::clone(&backend), renderer.clone()),
            exchanger: MessageExchanger::new(backend, renderer.clone(), settings),
            renderer,
            status: Cell::new(None),
        }
    }

    /// Run the load-time status probe.
    ///
    /// Only the first call talks to the backend; later calls return the
    /// status it found.
    pub async fn load(&self) -> BackendStatus {
        if let Some(status) = self.status.get() {
            debug!(?status, "widget already loaded");
            return status;
        }
        let status = self.prober.check_backend_status().await;
        self.status.set(Some(status));
        status
    }

    pub fn status(&self) -> Option<BackendStatus> {
        self.status.get()
    }

    pub fn exchanger(&self) -> &MessageExchanger {
        &self.exchanger
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub async fn send_message(&self) -> Option<ExchangeOutcome> {
        self.exchanger.send_message().await
    }

    /// Hide the widget and stop waiting on replies nobody will see.
    pub fn minimize(&self) {
        self.exchanger.cancel_pending();
        self.renderer.minimize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::BackendError;
    use crate::core::constants::GREETING;
    use crate::core::message::Message;
    use crate::ui::document::DocumentView;
    use crate::ui::markup::MarkdownRenderer;
    use crate::utils::test_utils::FakeBackend;

    fn widget(backend: &Rc<FakeBackend>) -> (Rc<DocumentView>, Widget) {
        let view = Rc::new(DocumentView::new());
        let widget = Widget::new(
            view.clone(),
            backend.clone(),
            Rc::new(MarkdownRenderer::new()),
            ExchangeSettings::default(),
        );
        (view, widget)
    }

    #[tokio::test]
    async fn load_probes_only_once() {
        let backend = Rc::new(FakeBackend::healthy());
        let (view, widget) = widget(&backend);

        assert_eq!(widget.status(), None);
        assert_eq!(widget.load().await, BackendStatus::Online);
        assert_eq!(widget.load().await, BackendStatus::Online);

        assert_eq!(backend.health_calls(), 1);
        assert_eq!(view.messages(), vec![Message::bot(GREETING)]);
    }

    #[tokio::test(start_paused = true)]
    async fn full_session_against_a_healthy_backend() {
        let backend =
            Rc::new(FakeBackend::healthy().with_reply(Ok("Hi *there*".to_string())));
        let (view, widget) = widget(&backend);

        widget.load().await;
        view.set_input_value("Hello");
        assert_eq!(widget.send_message().await, Some(ExchangeOutcome::Replied));

        let texts: Vec<_> = view.messages().into_iter().map(|m| m.text).collect();
        assert_eq!(texts, vec![GREETING, "Hello", "Hi *there*"]);
        assert!(view.to_html().contains("<em>there</em>"));
    }

    #[tokio::test]
    async fn unreachable_backend_leaves_widget_locked() {
        let backend = Rc::new(FakeBackend::unhealthy(BackendError::Transport(
            "connection refused".to_string(),
        )));
        let (view, widget) = widget(&backend);

        assert_eq!(widget.load().await, BackendStatus::Unreachable);
        assert!(!view.controls_enabled());
        assert!(view.messages().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn minimize_hides_and_cancels() {
        let backend = Rc::new(
            FakeBackend::healthy().with_latency(std::time::Duration::from_secs(60)),
        );
        let (view, widget) = widget(&backend);
        widget.load().await;

        view.set_input_value("anyone there?");
        let exchange = widget.exchanger().begin().expect("exchange");
        widget.minimize();

        assert_eq!(exchange.settle().await, ExchangeOutcome::Cancelled);
        assert!(!view.is_visible());
    }
}

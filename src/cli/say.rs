//! One-shot "say" command

use std::error::Error;
use std::io::{self, Write};
use std::rc::Rc;

use tracing::debug;

use crate::core::backend::{Backend, HttpBackend};
use crate::core::exchanger::ExchangeSettings;
use crate::core::prober::BackendStatus;
use crate::core::widget::Widget;
use crate::ui::document::DocumentView;
use crate::ui::markup::MarkdownRenderer;
use crate::ui::page::render_page;

pub async fn run_say(
    origin: String,
    settings: ExchangeSettings,
    words: Vec<String>,
    html: bool,
) -> Result<(), Box<dyn Error>> {
    let prompt = words.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: jobi say <message>");
        std::process::exit(1);
    }

    let backend = Rc::new(HttpBackend::new(origin));
    let Some(output) = converse(backend, settings, &prompt, html).await else {
        eprintln!("❌ The chat backend is unreachable. Run 'jobi page' for troubleshooting steps.");
        std::process::exit(1);
    };

    let mut stdout = io::stdout();
    writeln!(stdout, "{}", output.trim_end())?;
    stdout.flush()?;
    Ok(())
}

/// Load a fresh widget, send `prompt` and wait for the reply. Returns the
/// rendered conversation, or `None` when the probe fails.
async fn converse(
    backend: Rc<dyn Backend>,
    settings: ExchangeSettings,
    prompt: &str,
    html: bool,
) -> Option<String> {
    let view = Rc::new(DocumentView::new());
    let widget = Widget::new(
        view.clone(),
        backend,
        Rc::new(MarkdownRenderer::new()),
        settings,
    );

    if widget.load().await == BackendStatus::Unreachable {
        return None;
    }

    view.set_input_value(prompt);
    let outcome = widget.send_message().await;
    debug!(?outcome, "say exchange finished");

    Some(if html {
        render_page(&view)
    } else {
        view.transcript()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::BackendError;
    use crate::core::constants::{APOLOGY, GREETING};
    use crate::utils::test_utils::FakeBackend;

    #[tokio::test(start_paused = true)]
    async fn transcript_contains_greeting_prompt_and_reply() {
        let backend = Rc::new(FakeBackend::healthy().with_reply(Ok("Try **this**".to_string())));
        let output = converse(backend.clone(), ExchangeSettings::default(), "Hello", false)
            .await
            .expect("backend is healthy");

        assert_eq!(backend.chat_messages(), vec!["Hello".to_string()]);
        assert!(output.contains(GREETING));
        assert!(output.contains("You: Hello"));
        assert!(output.contains("Jobi: Try this"));
        assert!(!output.contains("**this**"));
    }

    #[tokio::test(start_paused = true)]
    async fn html_output_is_a_full_page() {
        let backend = Rc::new(FakeBackend::healthy().with_reply(Ok("Try **this**".to_string())));
        let output = converse(backend, ExchangeSettings::default(), "Hello", true)
            .await
            .expect("backend is healthy");

        assert!(output.starts_with("<!DOCTYPE html>"));
        assert!(output.contains("<strong>this</strong>"));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_exchange_still_prints_the_apology() {
        let backend = Rc::new(
            FakeBackend::healthy().with_reply(Err(BackendError::Transport("reset".to_string()))),
        );
        let output = converse(backend, ExchangeSettings::default(), "Hello", false)
            .await
            .expect("probe succeeded");

        assert!(output.contains(&format!("Jobi (error): {APOLOGY}")));
    }

    #[tokio::test]
    async fn unreachable_backend_yields_nothing() {
        let backend = Rc::new(FakeBackend::unhealthy(BackendError::Transport(
            "connection refused".to_string(),
        )));
        assert!(converse(backend.clone(), ExchangeSettings::default(), "Hello", false)
            .await
            .is_none());
        assert!(backend.chat_messages().is_empty());
    }
}

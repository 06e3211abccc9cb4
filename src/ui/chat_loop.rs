//! Interactive chat session in the terminal.
//!
//! The session runs on a single thread inside a `LocalSet`. Each submitted
//! line starts an exchange synchronously and its settlement is spawned as a
//! local task, so the next line can be read while a reply is pending.

use std::error::Error;
use std::io::Write;
use std::rc::Rc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::{JoinSet, LocalSet};
use tracing::{debug, info, warn};

use crate::core::backend::HttpBackend;
use crate::core::exchanger::{ExchangeOutcome, ExchangeSettings};
use crate::core::widget::Widget;
use crate::ui::markup::MarkdownRenderer;
use crate::ui::terminal::TerminalView;

const QUIT_COMMAND: &str = "/quit";
const CLOSE_COMMAND: &str = "/close";

/// Why the session stopped reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Input ran out; pending replies were awaited.
    EndOfInput,
    /// `/quit`: pending replies were cancelled.
    Quit,
    /// `/close`: the widget was minimized.
    Closed,
}

pub async fn run_chat(origin: String, settings: ExchangeSettings) -> Result<(), Box<dyn Error>> {
    info!(%origin, "starting chat session");
    let view = Rc::new(TerminalView::new(std::io::stdout()));
    let widget = Widget::new(
        view.clone(),
        Rc::new(HttpBackend::new(origin)),
        Rc::new(MarkdownRenderer::new()),
        settings,
    );

    let input = BufReader::new(tokio::io::stdin());
    let end = LocalSet::new()
        .run_until(run_session(&widget, &view, input))
        .await?;
    debug!(?end, "chat session ended");
    Ok(())
}

/// Drive a loaded widget from lines of input until the input ends or the
/// user quits. Must be polled inside a `LocalSet`.
pub async fn run_session<W, R>(
    widget: &Widget,
    view: &Rc<TerminalView<W>>,
    input: R,
) -> Result<SessionEnd, Box<dyn Error>>
where
    W: Write + 'static,
    R: AsyncBufRead + Unpin,
{
    widget.load().await;
    view.prompt();

    let mut lines = input.lines();
    let mut settling = JoinSet::new();

    let end = loop {
        let Some(line) = lines.next_line().await? else {
            break SessionEnd::EndOfInput;
        };

        match line.trim() {
            QUIT_COMMAND => {
                widget.exchanger().cancel_pending();
                break SessionEnd::Quit;
            }
            CLOSE_COMMAND => {
                widget.minimize();
                break SessionEnd::Closed;
            }
            _ => {}
        }

        if !view.controls_enabled() {
            view.prompt();
            continue;
        }

        view.set_input_value(&line);
        match widget.exchanger().begin() {
            Some(exchange) => {
                let view = Rc::clone(view);
                settling.spawn_local(async move {
                    let outcome = exchange.settle().await;
                    if outcome != ExchangeOutcome::Cancelled && view.is_visible() {
                        view.prompt();
                    }
                    outcome
                });
            }
            None => view.prompt(),
        }
    };

    while let Some(joined) = settling.join_next().await {
        match joined {
            Ok(outcome) => debug!(?outcome, "exchange settled"),
            Err(err) => warn!(error = %err, "exchange task failed"),
        }
    }

    Ok(end)
}

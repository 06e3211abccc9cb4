//! One send → response → render cycle.
//!
//! A send happens in two phases. [`MessageExchanger::begin`] runs
//! synchronously: it appends the user's message, clears the input and shows
//! the typing placeholder. The returned [`Exchange`] is then
//! [settled](Exchange::settle): the chat request and the minimum typing delay
//! run together, the reply (or the apology) is appended, and the placeholder
//! is removed.
//!
//! Sends are not serialized. Two exchanges started back to back each get
//! their own placeholder and settle independently, in whichever order their
//! requests finish. `single_in_flight` turns this off.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::backend::{Backend, BackendError};
use crate::core::constants::{APOLOGY, MIN_TYPING_DELAY};
use crate::core::message::Sender;
use crate::ui::renderer::{Renderer, TypingIndicator};

/// How an exchange ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    Replied,
    Failed(BackendError),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeSettings {
    /// Minimum time the typing placeholder stays up.
    pub min_typing_delay: Duration,
    /// Ignore sends while another exchange is pending.
    pub single_in_flight: bool,
}

impl Default for ExchangeSettings {
    fn default() -> Self {
        Self {
            min_typing_delay: MIN_TYPING_DELAY,
            single_in_flight: false,
        }
    }
}

#[derive(Clone)]
pub struct MessageExchanger {
    backend: Rc<dyn Backend>,
    renderer: Renderer,
    settings: ExchangeSettings,
    pending: Rc<Cell<usize>>,
    cancel_root: CancellationToken,
}

impl MessageExchanger {
    pub fn new(backend: Rc<dyn Backend>, renderer: Renderer, settings: ExchangeSettings) -> Self {
        Self {
            backend,
            renderer,
            settings,
            pending: Rc::new(Cell::new(0)),
            cancel_root: CancellationToken::new(),
        }
    }

    /// Exchanges started but not yet settled.
    pub fn pending(&self) -> usize {
        self.pending.get()
    }

    /// Send whatever is in the input field and wait for the exchange to
    /// settle. `None` when nothing was sent.
    pub async fn send_message(&self) -> Option<ExchangeOutcome> {
        let exchange = self.begin()?;
        Some(exchange.settle().await)
    }

    /// Start an exchange from the current input value.
    ///
    /// Returns `None` without touching the view when the trimmed input is
    /// empty, or when `single_in_flight` is set and an exchange is pending.
    pub fn begin(&self) -> Option<Exchange> {
        let view = self.renderer.view();
        let raw = view.input_value();
        let message = raw.trim();
        if message.is_empty() {
            return None;
        }

        if self.settings.single_in_flight && self.pending() > 0 {
            debug!(pending = self.pending(), "send ignored while a reply is pending");
            return None;
        }

        self.renderer.append_message(message, Sender::User, false);
        view.clear_input();
        let indicator = self.renderer.show_typing_indicator();

        self.pending.set(self.pending.get() + 1);
        Some(Exchange {
            message: message.to_string(),
            backend: Rc::clone(&self.backend),
            renderer: self.renderer.clone(),
            min_delay: self.settings.min_typing_delay.max(MIN_TYPING_DELAY),
            cancel: self.cancel_root.child_token(),
            indicator: Some(indicator),
            _pending: PendingGuard(Rc::clone(&self.pending)),
        })
    }

    /// Cancel every exchange currently in flight.
    ///
    /// Cancelled exchanges append nothing but still clear their placeholder.
    /// Exchanges begun afterwards are cancelled too.
    pub fn cancel_pending(&self) {
        if self.pending() > 0 {
            debug!(pending = self.pending(), "cancelling pending exchanges");
        }
        self.cancel_root.cancel();
    }
}

struct PendingGuard(Rc<Cell<usize>>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

/// An exchange whose user message and placeholder are already on screen.
pub struct Exchange {
    message: String,
    backend: Rc<dyn Backend>,
    renderer: Renderer,
    min_delay: Duration,
    cancel: CancellationToken,
    indicator: Option<TypingIndicator>,
    _pending: PendingGuard,
}

impl Exchange {
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Run the request, render its outcome and clear the placeholder.
    pub async fn settle(mut self) -> ExchangeOutcome {
        let request = async {
            let (result, ()) = tokio::join!(
                self.backend.chat(&self.message),
                tokio::time::sleep(self.min_delay)
            );
            result
        };

        let result = tokio::select! {
            result = request => Some(result),
            () = self.cancel.cancelled() => None,
        };

        let outcome = match result {
            Some(Ok(reply)) => {
                self.renderer.append_message(&reply, Sender::Bot, false);
                ExchangeOutcome::Replied
            }
            Some(Err(err)) => {
                if err.is_status() {
                    warn!(error = %err, "chat request rejected by server");
                } else {
                    warn!(error = %err, "chat request failed");
                }
                self.renderer.append_message(APOLOGY, Sender::Bot, true);
                ExchangeOutcome::Failed(err)
            }
            None => {
                debug!("exchange cancelled before the reply arrived");
                ExchangeOutcome::Cancelled
            }
        };

        if let Some(indicator) = self.indicator.take() {
            indicator.dismiss();
        }
        outcome
    }
}

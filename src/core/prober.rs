use std::rc::Rc;

use tracing::{info, warn};

use crate::core::backend::Backend;
use crate::core::constants::{GREETING, READY_PLACEHOLDER};
use crate::core::message::Sender;
use crate::ui::renderer::Renderer;

/// Outcome of the startup liveness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStatus {
    Online,
    Unreachable,
}

/// Decides at load time whether the widget can be used.
pub struct StatusProber {
    backend: Rc<dyn Backend>,
    renderer: Renderer,
}

impl StatusProber {
    pub fn new(backend: Rc<dyn Backend>, renderer: Renderer) -> Self {
        Self { backend, renderer }
    }

    /// Probe the backend once and unlock or lock the widget accordingly.
    ///
    /// Appends exactly one block: the greeting when the backend answers,
    /// the connection-error panel when it does not.
    pub async fn check_backend_status(&self) -> BackendStatus {
        match self.backend.health().await {
            Ok(()) => {
                info!("backend is reachable");
                let view = self.renderer.view();
                self.renderer.append_message(GREETING, Sender::Bot, false);
                view.set_controls_enabled(true);
                view.set_placeholder(READY_PLACEHOLDER);
                BackendStatus::Online
            }
            Err(err) => {
                warn!(error = %err, "backend check failed");
                self.renderer.display_connection_error();
                BackendStatus::Unreachable
            }
        }
    }
}

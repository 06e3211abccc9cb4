use std::time::Duration;

/// Name the assistant introduces itself with.
pub const ASSISTANT_NAME: &str = "Jobi";

pub const GREETING: &str = "Hello! I'm Jobi, your AI assistant. How can I help you today?";

pub const READY_PLACEHOLDER: &str = "Ask me about your career concerns...";

pub const DISABLED_PLACEHOLDER: &str = "Connecting...";

pub const CONNECTION_FAILED_PLACEHOLDER: &str = "Connection failed...";

/// Shown in place of any reply when the chat request fails.
pub const APOLOGY: &str = "Sorry, I am having trouble connecting. Please try again later.";

/// Minimum time the typing placeholder stays visible.
pub const MIN_TYPING_DELAY: Duration = Duration::from_millis(500);

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5001";

/// Environment variable that overrides the configured backend URL.
pub const BASE_URL_ENV: &str = "JOBI_URL";

/// Environment variable holding the tracing filter directives.
pub const LOG_FILTER_ENV: &str = "JOBI_LOG";

pub const CONNECTION_ERROR_TITLE: &str = "Connection Error: Cannot Reach AI Server";

pub const CONNECTION_ERROR_INTRO: &str =
    "This error means the chat widget cannot communicate with the assistant backend.";

pub const CONNECTION_ERROR_STEPS: &[&str] = &[
    "Open a terminal in the backend project folder.",
    "Make sure the backend's dependencies are installed.",
    "Start the backend server and note the address it listens on.",
    "Check the terminal for any errors. The server must start without issues.",
    "Once the server is running, start the widget again (or refresh the page).",
];

//! The widget's full HTML page.

use std::fmt::Write as _;

use crate::core::constants::ASSISTANT_NAME;
use crate::ui::document::DocumentView;
use crate::ui::markup::escape_html;
use crate::ui::view::ChatView;

const STYLE: &str = r#"
.chat-window { width: 360px; font-family: system-ui, sans-serif; border: 1px solid #e2e8f0; border-radius: 12px; overflow: hidden; }
.chat-header { display: flex; justify-content: space-between; align-items: center; padding: 12px 16px; background: #2b6cb0; color: #fff; }
.chat-header button { background: none; border: none; color: inherit; font-size: 18px; cursor: pointer; }
#chat-message { height: 400px; overflow-y: auto; padding: 12px; }
.user-message, .bot-message { margin: 8px 0; padding: 8px 12px; border-radius: 10px; max-width: 80%; }
.user-message { margin-left: auto; background: #2b6cb0; color: #fff; white-space: pre-wrap; }
.bot-message { background: #edf2f7; color: #2d3748; }
.bot-message.error { background: #fed7d7; color: #c53030; }
.status-message.error { padding: 12px; border: 1px solid #feb2b2; border-radius: 8px; background: #fff5f5; }
.status-message h4 { color: #c53030; margin: 0 0 10px; font-size: 16px; }
.typing-dots span { display: inline-block; width: 6px; height: 6px; margin: 0 2px; border-radius: 50%; background: #a0aec0; animation: blink 1.4s infinite both; }
.typing-dots span:nth-child(2) { animation-delay: .2s; }
.typing-dots span:nth-child(3) { animation-delay: .4s; }
@keyframes blink { 0%, 80%, 100% { opacity: .2; } 40% { opacity: 1; } }
.chat-input { display: flex; gap: 8px; padding: 12px; border-top: 1px solid #e2e8f0; }
.chat-input input { flex: 1; }
"#;

/// Serialize the whole widget (header, message list, input row) around the
/// document's current state.
pub fn render_page(view: &DocumentView) -> String {
    let disabled = if view.controls_enabled() {
        ""
    } else {
        " disabled"
    };
    let display = if view.is_visible() {
        ""
    } else {
        r#" style="display: none""#
    };

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{ASSISTANT_NAME}</title>");
    let _ = writeln!(html, "<style>{STYLE}</style>");
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(html, r#"<div class="chat-window"{display}>"#);
    let _ = writeln!(
        html,
        r#"<div class="chat-header"><span>{ASSISTANT_NAME}</span><button class="close-btn" aria-label="Minimize chat">&times;</button></div>"#
    );
    let _ = writeln!(
        html,
        r#"<div id="chat-message" data-scroll-top="{}">{}</div>"#,
        view.scroll_top(),
        view.to_html()
    );
    let _ = writeln!(
        html,
        r#"<div class="chat-input"><input id="chatInput" type="text" placeholder="{}" value="{}"{disabled}><button id="sendBtn"{disabled}>Send</button></div>"#,
        escape_html(&view.placeholder()),
        escape_html(&view.input_value()),
    );
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

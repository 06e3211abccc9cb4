//! "page" command: probe the backend and emit the widget as HTML.

use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;

use tracing::info;

use crate::core::backend::{Backend, HttpBackend};
use crate::core::config::data::path_display;
use crate::core::exchanger::ExchangeSettings;
use crate::core::widget::Widget;
use crate::ui::document::DocumentView;
use crate::ui::markup::MarkdownRenderer;
use crate::ui::page::render_page;

pub async fn run_page(
    origin: String,
    settings: ExchangeSettings,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let html = loaded_page(Rc::new(HttpBackend::new(origin)), settings).await;

    match output {
        Some(path) => {
            fs::write(&path, html)?;
            info!(path = %path_display(&path), "wrote widget page");
            println!("✅ Wrote widget page to {}", path_display(&path));
        }
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(html.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// The page as it looks right after load: greeting and enabled input, or
/// the connection panel and a locked input.
async fn loaded_page(backend: Rc<dyn Backend>, settings: ExchangeSettings) -> String {
    let view = Rc::new(DocumentView::new());
    let widget = Widget::new(
        view.clone(),
        backend,
        Rc::new(MarkdownRenderer::new()),
        settings,
    );
    widget.load().await;
    render_page(&view)
}

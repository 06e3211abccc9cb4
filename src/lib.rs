//! Jobi is a career-guidance chat widget that talks to a small HTTP backend.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the widget logic: the load-time status probe, the
//!   message exchange with its typing placeholder, configuration, and the
//!   backend client.
//! - [`ui`] defines the view seam the widget draws on, with an in-memory
//!   document view, a terminal view, Markdown rendering, and the
//!   interactive chat loop.
//! - [`api`] defines the JSON payloads exchanged with the backend.
//! - [`utils`] holds URL and logging helpers.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which dispatches into [`ui::chat_loop`] for
//! interactive sessions.

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;

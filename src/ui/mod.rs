pub mod chat_loop;
pub mod document;
pub mod markup;
pub mod page;
pub mod renderer;
pub mod terminal;
pub mod view;

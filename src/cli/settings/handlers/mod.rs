//! Setting handler implementations.

pub mod boolean;
pub mod simple;

pub use boolean::single_in_flight_handler;
pub use simple::{BaseUrlHandler, TypingDelayHandler};

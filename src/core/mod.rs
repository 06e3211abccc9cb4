pub mod backend;
pub mod config;
pub mod constants;
pub mod exchanger;
pub mod message;
pub mod prober;
pub mod widget;

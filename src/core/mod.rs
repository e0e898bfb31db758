pub mod catalog;
pub mod ports;
pub mod runtime;
pub mod template;
pub mod trigger;

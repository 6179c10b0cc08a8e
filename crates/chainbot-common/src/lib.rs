pub mod cache;
pub mod service;

mod macros;

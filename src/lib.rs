pub mod config;
pub mod constants;
pub mod document;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod publisher;
pub mod sheets;
pub mod types;

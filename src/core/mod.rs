pub mod buildcore;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod log;
pub mod queue;
pub mod singleton;
pub mod stack;

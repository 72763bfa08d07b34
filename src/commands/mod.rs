//! Runnable flows.

pub mod flow;

pub use flow::{FlowCommand, FlowReport, PageStats};

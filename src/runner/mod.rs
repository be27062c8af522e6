pub mod process_runner;

pub use process_runner::{ToolOutput, ToolRunner, DEFAULT_TOOL};

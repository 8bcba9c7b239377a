// Toolcore module - tool trait, closure adapter, and registry
pub mod error;
pub mod tool;
pub mod tool_registry;

pub use error::ToolError;
pub use tool::{FnTool, Tool, ToolParameters};
pub use tool_registry::ToolRegistry;

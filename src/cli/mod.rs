//! CLI 命令处理

pub mod output;
pub mod setup;

pub use output::*;
pub use setup::*;

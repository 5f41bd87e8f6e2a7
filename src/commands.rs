//! # Commands Module / 命令模块
//!
//! Entry points for the operations the command line exposes.
//!
//! 命令行公开的各项操作的入口点。

pub mod generate;

pub use generate::{execute, GenerateOptions};

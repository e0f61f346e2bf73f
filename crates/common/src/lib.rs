//! Common types, protocol definitions, and errors shared by `strcrypt` front ends.

pub mod error;
pub mod protocol;

pub use error::ToolError;

//! Configuration
//!
//! All parameters are compile-time constants; the structs here only group
//! them so firmware can override a few at construction.

pub mod limits;
pub mod node;

pub use limits::*;
pub use node::NodeConfig;

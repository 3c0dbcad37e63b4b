//! Door components

pub mod config;
pub mod door;


// Re-export all components
pub use config::*;
pub use door::*;

pub mod advisor;
pub mod client;
pub mod prompts;
pub mod types;

pub use advisor::*;
pub use client::*;
pub use types::*;

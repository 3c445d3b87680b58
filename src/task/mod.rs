pub mod error;
pub mod parser;
pub mod tree;
pub mod types;
pub mod wildcard;

#[cfg(test)]
mod tests;

pub use error::*;
pub use tree::*;
pub use types::*;
pub use wildcard::*;

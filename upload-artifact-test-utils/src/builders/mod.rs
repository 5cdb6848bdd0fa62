//! Test data builders

mod tree;

pub use tree::TreeBuilder;

pub mod compile;
pub mod predicate;
pub mod validate;

pub use compile::compile;

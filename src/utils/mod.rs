pub mod candidates;

pub use candidates::*;

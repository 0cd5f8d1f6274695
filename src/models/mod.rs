pub mod common;
pub mod draw;
pub mod history;
pub mod picker;

pub use common::*;
pub use draw::*;
pub use history::*;
pub use picker::*;

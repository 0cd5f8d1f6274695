pub mod celebration;
pub mod gemini;

pub use celebration::*;
pub use gemini::*;

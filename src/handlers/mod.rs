pub mod picker;

pub use picker::picker_config;

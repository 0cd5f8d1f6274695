pub mod draw_machine;
pub mod draw_service;

pub use draw_machine::{DrawEffect, DrawMachine, SHUFFLE_TICKS, TICK_INTERVAL};
pub use draw_service::*;
